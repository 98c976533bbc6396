//! `auxo_state` resource.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tfkit::{Attribute, Diagnostics, Resource, Schema, decode, encode};
use tracing::debug;

use super::known_id;
use crate::api::tf::DiagnoseExt;
use crate::api::tf::dto::StateDto;
use crate::api::tf::mappers::{state_from_dto, state_to_dto};
use crate::domain::Service;

pub const DEFAULT_CONTENT_TYPE: &str = "ipv4";
pub const DEFAULT_MAINTAINER: &str = "api_terraform";

pub struct StateResource {
    service: Arc<Service>,
}

impl StateResource {
    #[must_use]
    pub const fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Resource for StateResource {
    fn type_name(&self) -> &'static str {
        "state"
    }

    fn schema(&self) -> Schema {
        Schema::new("A state contains resources and their location, belonging to a protect surface.")
            .attribute(Attribute::string("id").computed().describe("Computed unique ID of the state"))
            .attribute(
                Attribute::string("uniqueness_key")
                    .optional_computed()
                    .requires_replace()
                    .describe("Custom and optional uniqueness key to identify the state"),
            )
            .attribute(Attribute::string("description").required().describe("Description of the state"))
            .attribute(Attribute::string("protectsurface_id").required().describe("ID of the protect surface"))
            .attribute(Attribute::string("location_id").required().describe("ID of the location"))
            .attribute(
                Attribute::string("content_type")
                    .with_default(DEFAULT_CONTENT_TYPE)
                    .describe("Content type of the state, e.g. ipv4, ipv6, azure_resource"),
            )
            .attribute(
                Attribute::set_of_string("exists_on_assets")
                    .optional_computed()
                    .describe("Asset IDs which could match this state"),
            )
            .attribute(
                Attribute::string("maintainer")
                    .with_default(DEFAULT_MAINTAINER)
                    .describe("Maintainer of the state, either api or portal_manual"),
            )
            .attribute(
                Attribute::set_of_string("content")
                    .required()
                    .describe("Content of the state, e.g. \"10.1.1.2/32\""),
            )
    }

    async fn create(&self, plan: Value) -> Result<Value, Diagnostics> {
        let plan: StateDto = decode("state plan", plan)?;
        let created = self
            .service
            .create_state(state_from_dto(&plan))
            .await
            .diagnose("Error creating state")?;
        encode(&state_to_dto(&plan, &created))
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics> {
        let state: StateDto = decode("state state", state)?;
        let id = known_id(&state.id, "id")?;
        let Some(remote) = self.service.get_state(id).await.diagnose("Error reading state")? else {
            debug!(id, "state is gone, removing from state");
            return Ok(None);
        };
        encode(&state_to_dto(&state, &remote)).map(Some)
    }

    async fn update(&self, prior: Value, plan: Value) -> Result<Value, Diagnostics> {
        let prior: StateDto = decode("state state", prior)?;
        let plan: StateDto = decode("state plan", plan)?;
        let mut desired = state_from_dto(&plan);
        desired.id = known_id(&prior.id, "id")?.to_owned();
        if desired.uniqueness_key.is_empty() {
            desired.uniqueness_key = prior.uniqueness_key.clone().value_or_default();
        }
        if plan.exists_on_assets.is_computed() {
            desired.exists_on_asset_ids = prior.exists_on_assets.clone().into_option();
        }
        let updated = self
            .service
            .update_state(desired)
            .await
            .diagnose("Error updating state")?;
        encode(&state_to_dto(&plan, &updated))
    }

    async fn delete(&self, state: Value) -> Result<(), Diagnostics> {
        let state: StateDto = decode("state state", state)?;
        self.service
            .delete_state(known_id(&state.id, "id")?)
            .await
            .diagnose("Error deleting state")
    }

    async fn import(&self, id: &str) -> Result<Option<Value>, Diagnostics> {
        self.service
            .get_state(id)
            .await
            .diagnose("Error importing state")?
            .map(|remote| encode(&state_to_dto(&StateDto::default(), &remote)))
            .transpose()
    }
}
