//! Accessor used before the provider is configured.
//!
//! Schemas can be listed without credentials; any remote call fails.

use async_trait::async_trait;
use auxo_sdk::{
    Asset, AuxoClientV1, AuxoError, Contact, Location, MeasureCatalog, ProtectSurface, State,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredClient;

fn unconfigured<T>() -> Result<T, AuxoError> {
    Err(AuxoError::InvalidConfig("the provider is not configured".to_owned()))
}

#[async_trait]
impl AuxoClientV1 for UnconfiguredClient {
    async fn list_protect_surfaces(&self) -> Result<Vec<ProtectSurface>, AuxoError> {
        unconfigured()
    }

    async fn get_protect_surface(&self, _id: &str) -> Result<ProtectSurface, AuxoError> {
        unconfigured()
    }

    async fn create_protect_surface(
        &self,
        _ps: &ProtectSurface,
        _overwrite: bool,
    ) -> Result<ProtectSurface, AuxoError> {
        unconfigured()
    }

    async fn update_protect_surface(&self, _ps: &ProtectSurface) -> Result<ProtectSurface, AuxoError> {
        unconfigured()
    }

    async fn delete_protect_surface(&self, _id: &str) -> Result<(), AuxoError> {
        unconfigured()
    }

    async fn get_measure_catalog(&self) -> Result<MeasureCatalog, AuxoError> {
        unconfigured()
    }

    async fn list_locations(&self) -> Result<Vec<Location>, AuxoError> {
        unconfigured()
    }

    async fn get_location(&self, _id: &str) -> Result<Location, AuxoError> {
        unconfigured()
    }

    async fn create_location(&self, _location: &Location) -> Result<Location, AuxoError> {
        unconfigured()
    }

    async fn update_location(&self, _location: &Location) -> Result<Location, AuxoError> {
        unconfigured()
    }

    async fn delete_location(&self, _id: &str) -> Result<(), AuxoError> {
        unconfigured()
    }

    async fn get_state(&self, _id: &str) -> Result<State, AuxoError> {
        unconfigured()
    }

    async fn create_state(&self, _state: &State) -> Result<State, AuxoError> {
        unconfigured()
    }

    async fn update_state(&self, _state: &State) -> Result<State, AuxoError> {
        unconfigured()
    }

    async fn delete_state(&self, _id: &str) -> Result<(), AuxoError> {
        unconfigured()
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, AuxoError> {
        unconfigured()
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, AuxoError> {
        unconfigured()
    }
}
