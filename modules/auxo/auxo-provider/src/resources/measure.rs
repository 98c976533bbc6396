//! `auxo_measure` resource: the measures map of one protect surface.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tfkit::{Attribute, Diagnostics, Resource, Schema, decode, encode};
use tracing::debug;

use super::known_id;
use crate::api::tf::DiagnoseExt;
use crate::api::tf::dto::MeasureResourceDto;
use crate::api::tf::mappers::{desired_measures_from_dto, measures_to_dto};
use crate::domain::Service;

pub struct MeasureResource {
    service: Arc<Service>,
}

impl MeasureResource {
    #[must_use]
    pub const fn new(service: Arc<Service>) -> Self {
        Self { service }
    }

    async fn apply(&self, plan: Value, summary: &str) -> Result<Value, Diagnostics> {
        let plan: MeasureResourceDto = decode("measure plan", plan)?;
        let id = known_id(&plan.protectsurface, "protectsurface")?;
        let desired = desired_measures_from_dto(&plan.measures.clone().value_or_default());
        let ps = self.service.apply_measures(id, &desired).await.diagnose(summary)?;
        encode(&MeasureResourceDto {
            protectsurface: ps.id.clone().into(),
            measures: measures_to_dto(&plan.measures, &ps.measures),
        })
    }
}

fn measure_attributes() -> Vec<Attribute> {
    vec![
        Attribute::bool("assigned").required().describe("Measure assigned to the protect surface"),
        Attribute::string("assigned_by").with_default("").describe("Who assigned this measure"),
        Attribute::int64("assigned_timestamp").optional_computed().describe("When this measure was assigned"),
        Attribute::bool("implemented").describe("Is this measure implemented"),
        Attribute::string("implemented_by").with_default("").describe("Who implemented this measure"),
        Attribute::int64("implemented_timestamp").optional_computed().describe("When this measure was implemented"),
        Attribute::bool("evidenced").describe("Is there evidence that this measure is implemented"),
        Attribute::string("evidenced_by").with_default("").describe("Who evidenced this measure"),
        Attribute::int64("evidenced_timestamp").optional_computed().describe("When this measure was evidenced"),
        Attribute::bool("risk_no_implementation_accepted")
            .optional_computed()
            .describe("Is the risk of not implementing this measure accepted"),
        Attribute::bool("risk_no_evidence_accepted")
            .optional_computed()
            .describe("Is the risk of not having evidence for this measure accepted"),
        Attribute::string("risk_accepted_comment")
            .optional_computed()
            .describe("Comment on the acceptance of the risk(s)"),
        Attribute::string("risk_acceptance_by").with_default("").describe("Who accepted the risk(s)"),
        Attribute::int64("risk_acceptance_timestamp")
            .optional_computed()
            .describe("When the risk(s) were accepted"),
    ]
}

#[async_trait]
impl Resource for MeasureResource {
    fn type_name(&self) -> &'static str {
        "measure"
    }

    fn schema(&self) -> Schema {
        Schema::new("The measures of a protect surface.")
            .attribute(Attribute::string("protectsurface").required().describe("ID of the protect surface"))
            .attribute(
                Attribute::map_nested("measures", measure_attributes())
                    .describe("Measures of the protect surface, keyed by measure name"),
            )
    }

    async fn create(&self, plan: Value) -> Result<Value, Diagnostics> {
        self.apply(plan, "Error creating measures").await
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics> {
        let state: MeasureResourceDto = decode("measure state", state)?;
        let id = known_id(&state.protectsurface, "protectsurface")?;
        let Some(ps) = self
            .service
            .get_protect_surface(id)
            .await
            .diagnose("Error reading measures")?
        else {
            debug!(id, "protect surface is gone, removing measures from state");
            return Ok(None);
        };
        encode(&MeasureResourceDto {
            protectsurface: ps.id.clone().into(),
            measures: measures_to_dto(&state.measures, &ps.measures),
        })
        .map(Some)
    }

    async fn update(&self, _prior: Value, plan: Value) -> Result<Value, Diagnostics> {
        self.apply(plan, "Error updating measures").await
    }

    async fn delete(&self, state: Value) -> Result<(), Diagnostics> {
        let state: MeasureResourceDto = decode("measure state", state)?;
        self.service
            .clear_measures(known_id(&state.protectsurface, "protectsurface")?)
            .await
            .diagnose("Error deleting measures")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use auxo_sdk::ProtectSurface;
    use serde_json::json;

    use super::*;
    use crate::testing::{FakeAuxo, service_with};

    fn setup() -> (Arc<FakeAuxo>, MeasureResource) {
        let (fake, service) = service_with(FakeAuxo::with_catalog(["encryption", "logging"]));
        fake.insert_protect_surface(ProtectSurface {
            id: "ps-1".to_owned(),
            name: "Web".to_owned(),
            ..ProtectSurface::default()
        });
        (fake, MeasureResource::new(service))
    }

    #[tokio::test]
    async fn assigned_measure_is_written_and_read_back() {
        let (fake, resource) = setup();
        let mut plan = json!({
            "protectsurface": "ps-1",
            "measures": {"encryption": {"assigned": true, "assigned_by": "alice"}},
        });
        resource.schema().apply_defaults(&mut plan);

        let state = resource.create(plan).await.unwrap();

        let encryption = &state["measures"]["encryption"];
        assert_eq!(encryption["assigned"], true);
        assert_eq!(encryption["assigned_by"], "alice");
        assert!(encryption["assigned_timestamp"].as_i64().unwrap() > 0);
        assert_eq!(encryption["implemented"], Value::Null);
        assert_eq!(encryption["risk_accepted_comment"], Value::Null);

        let stored = fake.protect_surface("ps-1").unwrap();
        let assignment = stored.measures["encryption"].assignment.clone().unwrap();
        assert!(assignment.assigned);
        assert_eq!(assignment.last_determined_by_person_id, "alice");
        assert_eq!(fake.writes(), vec!["update_protect_surface"]);

        let refreshed = resource.read(state.clone()).await.unwrap().unwrap();
        assert_eq!(refreshed, state);
    }

    #[tokio::test]
    async fn unknown_measure_is_rejected_without_writes() {
        let (fake, resource) = setup();
        let plan = json!({
            "protectsurface": "ps-1",
            "measures": {"firewalling": {"assigned": true}},
        });

        let err = resource.create(plan).await.unwrap_err().to_string();

        assert!(err.contains("Measure [firewalling] does not exist"), "{err}");
        assert!(err.contains("encryption,logging"), "{err}");
        assert!(fake.writes().is_empty());
    }

    #[tokio::test]
    async fn delete_clears_measures() {
        let (fake, resource) = setup();
        let state = resource
            .create(json!({
                "protectsurface": "ps-1",
                "measures": {"logging": {"assigned": true, "implemented": true}},
            }))
            .await
            .unwrap();

        resource.delete(state).await.unwrap();

        assert!(fake.protect_surface("ps-1").unwrap().measures.is_empty());
    }

    #[tokio::test]
    async fn gone_protect_surface_removes_measures_from_state() {
        let (fake, resource) = setup();
        fake.remove_protect_surface("ps-1");
        let state = json!({"protectsurface": "ps-1", "measures": null});
        assert!(resource.read(state.clone()).await.unwrap().is_none());
        resource.delete(state).await.unwrap();
    }
}
