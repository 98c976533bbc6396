//! `auxo_location` resource.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tfkit::{Attribute, Diagnostics, Resource, Schema, decode, encode};
use tracing::debug;

use super::known_id;
use crate::api::tf::DiagnoseExt;
use crate::api::tf::dto::LocationDto;
use crate::api::tf::mappers::{location_from_dto, location_to_dto};
use crate::domain::Service;

pub struct LocationResource {
    service: Arc<Service>,
}

impl LocationResource {
    #[must_use]
    pub const fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Resource for LocationResource {
    fn type_name(&self) -> &'static str {
        "location"
    }

    fn schema(&self) -> Schema {
        Schema::new("A location is a geographic place where states of protect surfaces reside.")
            .attribute(Attribute::string("id").computed().describe("Computed unique ID of the location"))
            .attribute(
                Attribute::string("uniqueness_key")
                    .optional_computed()
                    .requires_replace()
                    .describe("Custom and optional uniqueness key to identify the location"),
            )
            .attribute(Attribute::string("name").required().describe("Name of the location"))
            .attribute(Attribute::float64("latitude").with_default(0.0).describe("Latitude of the location"))
            .attribute(Attribute::float64("longitude").with_default(0.0).describe("Longitude of the location"))
    }

    async fn create(&self, plan: Value) -> Result<Value, Diagnostics> {
        let plan: LocationDto = decode("location plan", plan)?;
        let created = self
            .service
            .create_location(location_from_dto(&plan))
            .await
            .diagnose("Error creating location")?;
        encode(&location_to_dto(&created))
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics> {
        let state: LocationDto = decode("location state", state)?;
        let id = known_id(&state.id, "id")?;
        let Some(location) = self
            .service
            .get_location(id)
            .await
            .diagnose("Error reading location")?
        else {
            debug!(id, "location is gone, removing from state");
            return Ok(None);
        };
        encode(&location_to_dto(&location)).map(Some)
    }

    async fn update(&self, prior: Value, plan: Value) -> Result<Value, Diagnostics> {
        let prior: LocationDto = decode("location state", prior)?;
        let plan: LocationDto = decode("location plan", plan)?;
        let mut desired = location_from_dto(&plan);
        desired.id = known_id(&prior.id, "id")?.to_owned();
        if desired.uniqueness_key.is_empty() {
            desired.uniqueness_key = prior.uniqueness_key.value_or_default();
        }
        let updated = self
            .service
            .update_location(desired)
            .await
            .diagnose("Error updating location")?;
        encode(&location_to_dto(&updated))
    }

    async fn delete(&self, state: Value) -> Result<(), Diagnostics> {
        let state: LocationDto = decode("location state", state)?;
        self.service
            .delete_location(known_id(&state.id, "id")?)
            .await
            .diagnose("Error deleting location")
    }

    async fn import(&self, id: &str) -> Result<Option<Value>, Diagnostics> {
        self.service
            .get_location(id)
            .await
            .diagnose("Error importing location")?
            .map(|location| encode(&location_to_dto(&location)))
            .transpose()
    }
}
