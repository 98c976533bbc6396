//! `auxo_asset` data source.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tfkit::{Attribute, DataSource, Diagnostics, Schema, decode, encode};

use crate::api::tf::DiagnoseExt;
use crate::api::tf::dto::AssetDto;
use crate::api::tf::mappers::asset_to_dto;
use crate::domain::Service;

/// Looks up an asset by its exact name.
pub struct AssetDataSource {
    service: Arc<Service>,
}

impl AssetDataSource {
    #[must_use]
    pub const fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DataSource for AssetDataSource {
    fn type_name(&self) -> &'static str {
        "asset"
    }

    fn schema(&self) -> Schema {
        Schema::new("An asset known to AUXO.")
            .attribute(Attribute::string("id").computed().describe("ID of the asset"))
            .attribute(Attribute::string("name").required().describe("Exact name of the asset"))
    }

    async fn read(&self, config: Value) -> Result<Value, Diagnostics> {
        let config: AssetDto = decode("asset configuration", config)?;
        let name = config.name.value_or_default();
        let asset = self
            .service
            .find_asset(&name)
            .await
            .diagnose("Unable to find asset")?;
        encode(&asset_to_dto(&asset))
    }
}
