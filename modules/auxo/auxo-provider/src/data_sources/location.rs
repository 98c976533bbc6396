//! `auxo_location` data source.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tfkit::{Attribute, DataSource, Diagnostics, Schema, decode, encode};

use crate::api::tf::DiagnoseExt;
use crate::api::tf::dto::LocationDto;
use crate::api::tf::mappers::location_to_dto;
use crate::domain::{Lookup, Service};

/// Looks up a location by uniqueness key or by name.
pub struct LocationDataSource {
    service: Arc<Service>,
}

impl LocationDataSource {
    #[must_use]
    pub const fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DataSource for LocationDataSource {
    fn type_name(&self) -> &'static str {
        "location"
    }

    fn schema(&self) -> Schema {
        Schema::new("A location known to AUXO. Set exactly one of uniqueness_key or name.")
            .attribute(Attribute::string("id").computed().describe("ID of the location"))
            .attribute(
                Attribute::string("uniqueness_key")
                    .optional_computed()
                    .describe("Uniqueness key of the location"),
            )
            .attribute(Attribute::string("name").optional_computed().describe("Name of the location"))
            .attribute(Attribute::float64("latitude").computed().describe("Latitude of the location"))
            .attribute(Attribute::float64("longitude").computed().describe("Longitude of the location"))
    }

    async fn read(&self, config: Value) -> Result<Value, Diagnostics> {
        let config: LocationDto = decode("location configuration", config)?;
        let lookup = Lookup::from_inputs(config.uniqueness_key.into_option(), config.name.into_option())
            .diagnose("Unable to find location")?;
        let location = self
            .service
            .find_location(&lookup)
            .await
            .diagnose("Unable to find location")?;
        encode(&location_to_dto(&location))
    }
}
