//! Client trait for the AUXO API.
//!
//! The provider talks to the platform only through this trait. The HTTP
//! implementation lives in the provider crate; tests substitute an
//! in-memory fake.

use async_trait::async_trait;

use crate::error::AuxoError;
use crate::models::{Asset, Contact, Location, MeasureCatalog, ProtectSurface, State};

/// Remote-aggregate accessor.
///
/// ```ignore
/// let ps = client.get_protect_surface("ps-1").await?;
/// let saved = client.create_protect_surface(&ps, true).await?;
/// ```
#[async_trait]
pub trait AuxoClientV1: Send + Sync {
    /// # Errors
    ///
    /// Transport, decode or API errors.
    async fn list_protect_surfaces(&self) -> Result<Vec<ProtectSurface>, AuxoError>;

    /// # Errors
    ///
    /// - `NotFound` if the protect surface is gone
    /// - transport, decode or API errors otherwise
    async fn get_protect_surface(&self, id: &str) -> Result<ProtectSurface, AuxoError>;

    /// Creates a protect surface. With `overwrite` an existing aggregate with
    /// the same uniqueness key or id is replaced as a whole.
    ///
    /// # Errors
    ///
    /// Transport, decode or API errors.
    async fn create_protect_surface(
        &self,
        ps: &ProtectSurface,
        overwrite: bool,
    ) -> Result<ProtectSurface, AuxoError>;

    /// # Errors
    ///
    /// - `NotFound` if the protect surface is gone
    /// - transport, decode or API errors otherwise
    async fn update_protect_surface(&self, ps: &ProtectSurface) -> Result<ProtectSurface, AuxoError>;

    /// # Errors
    ///
    /// - `NotFound` if the protect surface is gone
    /// - transport or API errors otherwise
    async fn delete_protect_surface(&self, id: &str) -> Result<(), AuxoError>;

    /// # Errors
    ///
    /// Transport, decode or API errors.
    async fn get_measure_catalog(&self) -> Result<MeasureCatalog, AuxoError>;

    /// # Errors
    ///
    /// Transport, decode or API errors.
    async fn list_locations(&self) -> Result<Vec<Location>, AuxoError>;

    /// # Errors
    ///
    /// - `NotFound` if the location is gone
    /// - transport, decode or API errors otherwise
    async fn get_location(&self, id: &str) -> Result<Location, AuxoError>;

    /// # Errors
    ///
    /// Transport, decode or API errors.
    async fn create_location(&self, location: &Location) -> Result<Location, AuxoError>;

    /// # Errors
    ///
    /// - `NotFound` if the location is gone
    /// - transport, decode or API errors otherwise
    async fn update_location(&self, location: &Location) -> Result<Location, AuxoError>;

    /// # Errors
    ///
    /// - `NotFound` if the location is gone
    /// - transport or API errors otherwise
    async fn delete_location(&self, id: &str) -> Result<(), AuxoError>;

    /// # Errors
    ///
    /// - `NotFound` if the state is gone
    /// - transport, decode or API errors otherwise
    async fn get_state(&self, id: &str) -> Result<State, AuxoError>;

    /// # Errors
    ///
    /// Transport, decode or API errors.
    async fn create_state(&self, state: &State) -> Result<State, AuxoError>;

    /// # Errors
    ///
    /// - `NotFound` if the state is gone
    /// - transport, decode or API errors otherwise
    async fn update_state(&self, state: &State) -> Result<State, AuxoError>;

    /// # Errors
    ///
    /// - `NotFound` if the state is gone
    /// - transport or API errors otherwise
    async fn delete_state(&self, id: &str) -> Result<(), AuxoError>;

    /// # Errors
    ///
    /// Transport, decode or API errors.
    async fn list_contacts(&self) -> Result<Vec<Contact>, AuxoError>;

    /// # Errors
    ///
    /// Transport, decode or API errors.
    async fn list_assets(&self) -> Result<Vec<Asset>, AuxoError>;
}
