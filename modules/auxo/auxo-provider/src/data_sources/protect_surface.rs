//! `auxo_protectsurface` data source.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tfkit::{Attribute, DataSource, Diagnostics, Schema, decode, encode};

use crate::api::tf::DiagnoseExt;
use crate::api::tf::dto::ProtectSurfaceDto;
use crate::api::tf::mappers::protect_surface_to_dto;
use crate::domain::{Lookup, Service};

/// Looks up a protect surface by uniqueness key or by name.
pub struct ProtectSurfaceDataSource {
    service: Arc<Service>,
}

impl ProtectSurfaceDataSource {
    #[must_use]
    pub const fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DataSource for ProtectSurfaceDataSource {
    fn type_name(&self) -> &'static str {
        "protectsurface"
    }

    fn schema(&self) -> Schema {
        let computed: [(&'static str, fn(&'static str) -> Attribute); 20] = [
            ("description", Attribute::string),
            ("main_contact", Attribute::string),
            ("security_contact", Attribute::string),
            ("in_control_boundary", Attribute::bool),
            ("in_zero_trust_focus", Attribute::bool),
            ("relevance", Attribute::int64),
            ("confidentiality", Attribute::int64),
            ("integrity", Attribute::int64),
            ("availability", Attribute::int64),
            ("data_tags", Attribute::set_of_string),
            ("compliance_tags", Attribute::set_of_string),
            ("customer_labels", Attribute::map_of_string),
            ("soc_tags", Attribute::set_of_string),
            ("allow_flows_from_outside", Attribute::bool),
            ("allow_flows_to_outside", Attribute::bool),
            ("maturity_step1", Attribute::int64),
            ("maturity_step2", Attribute::int64),
            ("maturity_step3", Attribute::int64),
            ("maturity_step4", Attribute::int64),
            ("maturity_step5", Attribute::int64),
        ];
        computed.into_iter().fold(
            Schema::new("A protect surface known to AUXO. Set exactly one of uniqueness_key or name.")
                .attribute(Attribute::string("id").computed().describe("ID of the protect surface"))
                .attribute(
                    Attribute::string("uniqueness_key")
                        .optional_computed()
                        .describe("Uniqueness key of the protect surface"),
                )
                .attribute(
                    Attribute::string("name")
                        .optional_computed()
                        .describe("Name of the protect surface"),
                ),
            |schema, (name, attribute)| schema.attribute(attribute(name).computed()),
        )
    }

    async fn read(&self, config: Value) -> Result<Value, Diagnostics> {
        let config: ProtectSurfaceDto = decode("protectsurface configuration", config)?;
        let lookup = Lookup::from_inputs(
            config.uniqueness_key.clone().into_option(),
            config.name.clone().into_option(),
        )
        .diagnose("Unable to find protectsurface")?;
        let ps = self
            .service
            .find_protect_surface(&lookup)
            .await
            .diagnose("Unable to find protectsurface")?;
        encode(&protect_surface_to_dto(&ProtectSurfaceDto::default(), &ps))
    }
}
