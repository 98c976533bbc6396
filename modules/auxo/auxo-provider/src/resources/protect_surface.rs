//! `auxo_protectsurface` resource.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tfkit::{Attribute, Diagnostics, Resource, Schema, decode, encode};
use tracing::debug;

use super::known_id;
use crate::api::tf::DiagnoseExt;
use crate::api::tf::dto::ProtectSurfaceDto;
use crate::api::tf::mappers::{protect_surface_from_dto, protect_surface_to_dto};
use crate::domain::Service;

/// Core attributes of a protect surface. Measures and peer flows belong to
/// `auxo_measure` and `auxo_transactionflow`.
pub struct ProtectSurfaceResource {
    service: Arc<Service>,
}

impl ProtectSurfaceResource {
    #[must_use]
    pub const fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

fn level(name: &str, description: &str) -> Attribute {
    Attribute::int64(name).with_default(1).describe(description)
}

#[async_trait]
impl Resource for ProtectSurfaceResource {
    fn type_name(&self) -> &'static str {
        "protectsurface"
    }

    fn schema(&self) -> Schema {
        Schema::new("A protect surface is the unit of protection in a zero trust architecture.")
            .attribute(Attribute::string("id").computed().describe("Computed unique ID of the protect surface"))
            .attribute(
                Attribute::string("uniqueness_key")
                    .optional_computed()
                    .requires_replace()
                    .describe("Custom and optional uniqueness key to identify the protect surface"),
            )
            .attribute(Attribute::string("name").required().describe("Name of the protect surface"))
            .attribute(Attribute::string("description").with_default("").describe("Description of the protect surface"))
            .attribute(Attribute::string("main_contact").with_default("").describe("Main contact person ID"))
            .attribute(Attribute::string("security_contact").with_default("").describe("Security contact person ID"))
            .attribute(Attribute::bool("in_control_boundary").with_default(false).describe("Within the control boundary"))
            .attribute(Attribute::bool("in_zero_trust_focus").with_default(false).describe("Within the zero trust focus"))
            .attribute(Attribute::int64("relevance").required().describe("Relevance of the protect surface (0-100)"))
            .attribute(level("confidentiality", "Confidentiality level (1-3)"))
            .attribute(level("integrity", "Integrity level (1-3)"))
            .attribute(level("availability", "Availability level (1-3)"))
            .attribute(Attribute::set_of_string("data_tags").describe("Data tags"))
            .attribute(Attribute::set_of_string("compliance_tags").describe("Compliance tags"))
            .attribute(Attribute::map_of_string("customer_labels").optional_computed().describe("Customer labels"))
            .attribute(Attribute::set_of_string("soc_tags").describe("SOC tags"))
            .attribute(Attribute::bool("allow_flows_from_outside").with_default(false).describe("Allow flows from outside"))
            .attribute(Attribute::bool("allow_flows_to_outside").with_default(false).describe("Allow flows to outside"))
            .attribute(level("maturity_step1", "Maturity of step 1"))
            .attribute(level("maturity_step2", "Maturity of step 2"))
            .attribute(level("maturity_step3", "Maturity of step 3"))
            .attribute(level("maturity_step4", "Maturity of step 4"))
            .attribute(level("maturity_step5", "Maturity of step 5"))
    }

    async fn create(&self, plan: Value) -> Result<Value, Diagnostics> {
        let plan: ProtectSurfaceDto = decode("protectsurface plan", plan)?;
        let created = self
            .service
            .create_protect_surface(protect_surface_from_dto(&plan))
            .await
            .diagnose("Error creating protectsurface")?;
        encode(&protect_surface_to_dto(&plan, &created))
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics> {
        let state: ProtectSurfaceDto = decode("protectsurface state", state)?;
        let id = known_id(&state.id, "id")?;
        match self
            .service
            .get_protect_surface(id)
            .await
            .diagnose("Error reading protectsurface")?
        {
            Some(ps) => encode(&protect_surface_to_dto(&state, &ps)).map(Some),
            None => {
                debug!(id, "protect surface is gone, removing from state");
                Ok(None)
            }
        }
    }

    async fn update(&self, prior: Value, plan: Value) -> Result<Value, Diagnostics> {
        let prior: ProtectSurfaceDto = decode("protectsurface state", prior)?;
        let plan: ProtectSurfaceDto = decode("protectsurface plan", plan)?;
        let mut desired = protect_surface_from_dto(&plan);
        desired.id = known_id(&prior.id, "id")?.to_owned();
        let updated = self
            .service
            .update_protect_surface(desired)
            .await
            .diagnose("Error updating protectsurface")?;
        encode(&protect_surface_to_dto(&plan, &updated))
    }

    async fn delete(&self, state: Value) -> Result<(), Diagnostics> {
        let state: ProtectSurfaceDto = decode("protectsurface state", state)?;
        self.service
            .delete_protect_surface(known_id(&state.id, "id")?)
            .await
            .diagnose("Error deleting protectsurface")
    }

    async fn import(&self, id: &str) -> Result<Option<Value>, Diagnostics> {
        let found = self
            .service
            .get_protect_surface(id)
            .await
            .diagnose("Error importing protectsurface")?;
        found
            .map(|ps| encode(&protect_surface_to_dto(&ProtectSurfaceDto::default(), &ps)))
            .transpose()
    }
}
