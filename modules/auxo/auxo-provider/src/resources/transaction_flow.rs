//! `auxo_transactionflow` resource: peer flows of one protect surface.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tfkit::{Attribute, Diagnostics, Resource, Schema, decode, encode};
use tracing::debug;

use super::known_id;
use crate::api::tf::DiagnoseExt;
use crate::api::tf::dto::TransactionFlowDto;
use crate::api::tf::mappers::{flow_sets_from_dto, flow_sets_to_dto};
use crate::domain::Service;

pub struct TransactionFlowResource {
    service: Arc<Service>,
}

impl TransactionFlowResource {
    #[must_use]
    pub const fn new(service: Arc<Service>) -> Self {
        Self { service }
    }

    async fn apply(&self, plan: Value, summary: &str) -> Result<Value, Diagnostics> {
        let plan: TransactionFlowDto = decode("transactionflow plan", plan)?;
        let id = known_id(&plan.protectsurface, "protectsurface")?;
        let ps = self
            .service
            .apply_flows(id, &flow_sets_from_dto(&plan))
            .await
            .diagnose(summary)?;
        encode(&flow_sets_to_dto(&plan, &ps))
    }
}

#[async_trait]
impl Resource for TransactionFlowResource {
    fn type_name(&self) -> &'static str {
        "transactionflow"
    }

    fn schema(&self) -> Schema {
        Schema::new("Allowed and blocked transaction flows between protect surfaces.")
            .attribute(Attribute::string("protectsurface").required().describe("ID of the protect surface"))
            .attribute(
                Attribute::set_of_string("incoming_protectsurfaces_allow")
                    .describe("Protect surface IDs allowed to send traffic to this protect surface"),
            )
            .attribute(
                Attribute::set_of_string("incoming_protectsurfaces_block")
                    .describe("Protect surface IDs blocked from sending traffic to this protect surface"),
            )
            .attribute(
                Attribute::set_of_string("outgoing_protectsurfaces_allow")
                    .describe("Protect surface IDs this protect surface may send traffic to"),
            )
            .attribute(
                Attribute::set_of_string("outgoing_protectsurfaces_block")
                    .describe("Protect surface IDs this protect surface may not send traffic to"),
            )
    }

    async fn create(&self, plan: Value) -> Result<Value, Diagnostics> {
        self.apply(plan, "Error creating transaction flows").await
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics> {
        let state: TransactionFlowDto = decode("transactionflow state", state)?;
        let id = known_id(&state.protectsurface, "protectsurface")?;
        let Some(ps) = self
            .service
            .get_protect_surface(id)
            .await
            .diagnose("Error reading transaction flows")?
        else {
            debug!(id, "protect surface is gone, removing transaction flows from state");
            return Ok(None);
        };
        encode(&flow_sets_to_dto(&state, &ps)).map(Some)
    }

    async fn update(&self, _prior: Value, plan: Value) -> Result<Value, Diagnostics> {
        self.apply(plan, "Error updating transaction flows").await
    }

    async fn delete(&self, state: Value) -> Result<(), Diagnostics> {
        let state: TransactionFlowDto = decode("transactionflow state", state)?;
        self.service
            .clear_flows(known_id(&state.protectsurface, "protectsurface")?)
            .await
            .diagnose("Error deleting transaction flows")
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

    fn setup() -> (Arc<FakeAuxo>, TransactionFlowResource) {
        let (fake, service) = service_with(FakeAuxo::default());
        for id in ["ps-1", "ps-2", "ps-3"] {
            fake.insert_protect_surface(ProtectSurface {
                id: id.to_owned(),
                name: id.to_owned(),
                ..ProtectSurface::default()
            });
        }
        (fake, TransactionFlowResource::new(service))
    }

    #[tokio::test]
    async fn flows_round_trip() {
        let (fake, resource) = setup();
        let plan = json!({
            "protectsurface": "ps-1",
            "incoming_protectsurfaces_allow": ["ps-2"],
            "outgoing_protectsurfaces_block": ["ps-3"],
        });

        let state = resource.create(plan).await.unwrap();

        assert_eq!(state["incoming_protectsurfaces_allow"], json!(["ps-2"]));
        assert_eq!(state["outgoing_protectsurfaces_block"], json!(["ps-3"]));
        assert_eq!(state["incoming_protectsurfaces_block"], Value::Null);
        let stored = fake.protect_surface("ps-1").unwrap();
        assert!(stored.flows_from_other_ps["ps-2"].allow);
        assert!(!stored.flows_to_other_ps["ps-3"].allow);

        let refreshed = resource.read(state.clone()).await.unwrap().unwrap();
        assert_eq!(refreshed, state);
    }

    #[tokio::test]
    async fn allow_and_block_overlap_is_rejected() {
        let (fake, resource) = setup();
        let plan = json!({
            "protectsurface": "ps-1",
            "incoming_protectsurfaces_allow": ["ps-2"],
            "incoming_protectsurfaces_block": ["ps-2"],
        });

        let err = resource.create(plan).await.unwrap_err().to_string();

        assert!(err.contains("protectsurface ID: ps-2"), "{err}");
        assert!(fake.writes().is_empty());
    }

    #[tokio::test]
    async fn delete_clears_flows() {
        let (fake, resource) = setup();
        let state = resource
            .create(json!({"protectsurface": "ps-1", "outgoing_protectsurfaces_allow": ["ps-2"]}))
            .await
            .unwrap();

        resource.delete(state).await.unwrap();

        let stored = fake.protect_surface("ps-1").unwrap();
        assert!(stored.flows_to_other_ps.is_empty());
        assert!(stored.flows_from_other_ps.is_empty());
    }
}
