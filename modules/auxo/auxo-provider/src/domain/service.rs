//! Domain service for the AUXO provider.
//!
//! Every resource and data source is constructed with an `Arc<Service>`.
//! Writes that read-modify-write the protect surface aggregate (core
//! attributes, measures, transaction flows) run under one provider-wide
//! lock. Reads never take it.

use std::sync::Arc;

use auxo_sdk::{Asset, AuxoClientV1, AuxoError, Contact, Location, ProtectSurface, State};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::error::DomainError;
use super::flows::{FlowSets, clear_flows};
use super::lookup::{Lookup, select_one};
use super::measures::{DesiredMeasures, clear_measures, reconcile_measures};
use super::surface::overlay_core_attributes;

const PROTECT_SURFACE: &str = "protectsurface";
const LOCATION: &str = "location";
const STATE: &str = "state";

fn log_and_convert(op: &str, entity: &'static str, e: AuxoError) -> DomainError {
    match e {
        AuxoError::NotFound(key) => {
            debug!(operation = op, entity, %key, "auxo object not found");
            DomainError::not_found(entity, key)
        }
        other => {
            tracing::error!(operation = op, error = ?other, "auxo call failed");
            DomainError::Remote(other)
        }
    }
}

/// Turns a not-found error into `None`.
fn found<T>(result: Result<T, DomainError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Typed provider context: the API client and the aggregate write lock.
pub struct Service {
    client: Arc<dyn AuxoClientV1>,
    write_lock: Arc<Mutex<()>>,
}

impl Service {
    #[must_use]
    pub fn new(client: Arc<dyn AuxoClientV1>) -> Self {
        Self::with_lock(client, Arc::new(Mutex::new(())))
    }

    /// Shares an existing write lock.
    #[must_use]
    pub const fn with_lock(client: Arc<dyn AuxoClientV1>, write_lock: Arc<Mutex<()>>) -> Self {
        Self { client, write_lock }
    }

    async fn fetch_protect_surface(&self, op: &str, id: &str) -> Result<ProtectSurface, DomainError> {
        self.client
            .get_protect_surface(id)
            .await
            .map_err(|e| log_and_convert(op, PROTECT_SURFACE, e))
    }

    // =========================================================================
    // Protect surfaces
    // =========================================================================

    /// Creates a protect surface without overwriting an existing one.
    ///
    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self, desired), fields(uniqueness_key = %desired.uniqueness_key, name = %desired.name))]
    pub async fn create_protect_surface(
        &self,
        desired: ProtectSurface,
    ) -> Result<ProtectSurface, DomainError> {
        let _guard = self.write_lock.lock().await;
        info!("Creating protect surface");
        self.client
            .create_protect_surface(&desired, false)
            .await
            .map_err(|e| log_and_convert("create_protect_surface", PROTECT_SURFACE, e))
    }

    /// `Ok(None)` when the protect surface is gone.
    ///
    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self))]
    pub async fn get_protect_surface(&self, id: &str) -> Result<Option<ProtectSurface>, DomainError> {
        found(self.fetch_protect_surface("get_protect_surface", id).await)
    }

    /// Overlays the core attributes of `desired` on the current aggregate,
    /// keeping measures and peer flows.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the protect surface is gone
    /// - `Validation` if the uniqueness key would change
    /// - `Remote` on API failure
    #[instrument(skip(self, desired), fields(id = %desired.id))]
    pub async fn update_protect_surface(
        &self,
        desired: ProtectSurface,
    ) -> Result<ProtectSurface, DomainError> {
        let _guard = self.write_lock.lock().await;
        let current = self
            .fetch_protect_surface("update_protect_surface", &desired.id)
            .await?;
        let merged = overlay_core_attributes(current, desired)?;
        info!("Updating protect surface");
        self.client
            .update_protect_surface(&merged)
            .await
            .map_err(|e| log_and_convert("update_protect_surface", PROTECT_SURFACE, e))
    }

    /// Deletes a protect surface; one that is already gone counts as deleted.
    ///
    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self))]
    pub async fn delete_protect_surface(&self, id: &str) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        info!("Deleting protect surface");
        let result = self
            .client
            .delete_protect_surface(id)
            .await
            .map_err(|e| log_and_convert("delete_protect_surface", PROTECT_SURFACE, e));
        found(result).map(|_| ())
    }

    /// # Errors
    ///
    /// - `AmbiguousName` if the name is shared by several protect surfaces
    /// - `NotFound` if nothing matches
    /// - `Remote` on API failure
    #[instrument(skip(self))]
    pub async fn find_protect_surface(&self, lookup: &Lookup) -> Result<ProtectSurface, DomainError> {
        let all = self
            .client
            .list_protect_surfaces()
            .await
            .map_err(|e| log_and_convert("list_protect_surfaces", PROTECT_SURFACE, e))?;
        select_one(all, lookup)
    }

    // =========================================================================
    // Measures
    // =========================================================================

    /// Replaces the measures of a protect surface.
    ///
    /// The names are checked against the remote catalog before anything is
    /// written.
    ///
    /// # Errors
    ///
    /// - `Validation` for a measure missing from the catalog
    /// - `NotFound` if the protect surface is gone
    /// - `Remote` on API failure
    #[instrument(skip(self, desired), fields(measures = desired.len()))]
    pub async fn apply_measures(
        &self,
        protect_surface_id: &str,
        desired: &DesiredMeasures,
    ) -> Result<ProtectSurface, DomainError> {
        let _guard = self.write_lock.lock().await;
        let current = self
            .fetch_protect_surface("apply_measures", protect_surface_id)
            .await?;
        let catalog = self
            .client
            .get_measure_catalog()
            .await
            .map_err(|e| log_and_convert("get_measure_catalog", "measure catalog", e))?;

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let merged = reconcile_measures(current, desired, &catalog, now)?;
        info!("Writing measures");
        self.client
            .update_protect_surface(&merged)
            .await
            .map_err(|e| log_and_convert("apply_measures", PROTECT_SURFACE, e))
    }

    /// Removes every measure; a protect surface that is gone has none.
    ///
    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self))]
    pub async fn clear_measures(&self, protect_surface_id: &str) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let Some(current) =
            found(self.fetch_protect_surface("clear_measures", protect_surface_id).await)?
        else {
            return Ok(());
        };
        info!("Clearing measures");
        self.client
            .create_protect_surface(&clear_measures(current), true)
            .await
            .map(|_| ())
            .map_err(|e| log_and_convert("clear_measures", PROTECT_SURFACE, e))
    }

    // =========================================================================
    // Transaction flows
    // =========================================================================

    /// Replaces the peer flows of a protect surface.
    ///
    /// # Errors
    ///
    /// - `Conflict` when a peer is both allowed and blocked
    /// - `NotFound` if the protect surface is gone
    /// - `Remote` on API failure
    #[instrument(skip(self, flows))]
    pub async fn apply_flows(
        &self,
        protect_surface_id: &str,
        flows: &FlowSets,
    ) -> Result<ProtectSurface, DomainError> {
        flows.validate()?;
        let _guard = self.write_lock.lock().await;
        let current = self
            .fetch_protect_surface("apply_flows", protect_surface_id)
            .await?;
        let merged = flows.apply_to(current)?;
        info!("Writing transaction flows");
        self.client
            .create_protect_surface(&merged, true)
            .await
            .map_err(|e| log_and_convert("apply_flows", PROTECT_SURFACE, e))
    }

    /// Removes every peer flow; a protect surface that is gone has none.
    ///
    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self))]
    pub async fn clear_flows(&self, protect_surface_id: &str) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let Some(current) =
            found(self.fetch_protect_surface("clear_flows", protect_surface_id).await)?
        else {
            return Ok(());
        };
        info!("Clearing transaction flows");
        self.client
            .create_protect_surface(&clear_flows(current), true)
            .await
            .map(|_| ())
            .map_err(|e| log_and_convert("clear_flows", PROTECT_SURFACE, e))
    }

    // =========================================================================
    // Locations
    // =========================================================================

    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self, location), fields(name = %location.name))]
    pub async fn create_location(&self, location: Location) -> Result<Location, DomainError> {
        info!("Creating location");
        self.client
            .create_location(&location)
            .await
            .map_err(|e| log_and_convert("create_location", LOCATION, e))
    }

    /// `Ok(None)` when the location is gone.
    ///
    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self))]
    pub async fn get_location(&self, id: &str) -> Result<Option<Location>, DomainError> {
        found(
            self.client
                .get_location(id)
                .await
                .map_err(|e| log_and_convert("get_location", LOCATION, e)),
        )
    }

    /// # Errors
    ///
    /// - `NotFound` if the location is gone
    /// - `Remote` on API failure
    #[instrument(skip(self, location), fields(id = %location.id))]
    pub async fn update_location(&self, location: Location) -> Result<Location, DomainError> {
        info!("Updating location");
        self.client
            .update_location(&location)
            .await
            .map_err(|e| log_and_convert("update_location", LOCATION, e))
    }

    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self))]
    pub async fn delete_location(&self, id: &str) -> Result<(), DomainError> {
        info!("Deleting location");
        let result = self
            .client
            .delete_location(id)
            .await
            .map_err(|e| log_and_convert("delete_location", LOCATION, e));
        found(result).map(|_| ())
    }

    /// # Errors
    ///
    /// - `AmbiguousName` if the name is shared by several locations
    /// - `NotFound` if nothing matches
    /// - `Remote` on API failure
    #[instrument(skip(self))]
    pub async fn find_location(&self, lookup: &Lookup) -> Result<Location, DomainError> {
        let all = self
            .client
            .list_locations()
            .await
            .map_err(|e| log_and_convert("list_locations", LOCATION, e))?;
        select_one(all, lookup)
    }

    // =========================================================================
    // States
    // =========================================================================

    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self, state), fields(protectsurface = %state.protectsurface, location = %state.location))]
    pub async fn create_state(&self, state: State) -> Result<State, DomainError> {
        info!("Creating state");
        self.client
            .create_state(&state)
            .await
            .map_err(|e| log_and_convert("create_state", STATE, e))
    }

    /// `Ok(None)` when the state is gone.
    ///
    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self))]
    pub async fn get_state(&self, id: &str) -> Result<Option<State>, DomainError> {
        found(
            self.client
                .get_state(id)
                .await
                .map_err(|e| log_and_convert("get_state", STATE, e)),
        )
    }

    /// # Errors
    ///
    /// - `NotFound` if the state is gone
    /// - `Remote` on API failure
    #[instrument(skip(self, state), fields(id = %state.id))]
    pub async fn update_state(&self, state: State) -> Result<State, DomainError> {
        info!("Updating state");
        self.client
            .update_state(&state)
            .await
            .map_err(|e| log_and_convert("update_state", STATE, e))
    }

    /// # Errors
    ///
    /// `Remote` on API failure.
    #[instrument(skip(self))]
    pub async fn delete_state(&self, id: &str) -> Result<(), DomainError> {
        info!("Deleting state");
        let result = self
            .client
            .delete_state(id)
            .await
            .map_err(|e| log_and_convert("delete_state", STATE, e));
        found(result).map(|_| ())
    }

    // =========================================================================
    // Contacts and assets
    // =========================================================================

    /// Finds the contact with exactly this email address.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no contact has this address
    /// - `Remote` on API failure
    #[instrument(skip(self))]
    pub async fn find_contact(&self, email: &str) -> Result<Contact, DomainError> {
        self.client
            .list_contacts()
            .await
            .map_err(|e| log_and_convert("list_contacts", "contact", e))?
            .into_iter()
            .find(|c| c.email == email)
            .ok_or_else(|| DomainError::not_found("contact", format!("email {email}")))
    }

    /// Finds the asset with exactly this name.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no asset has this name
    /// - `Remote` on API failure
    #[instrument(skip(self))]
    pub async fn find_asset(&self, name: &str) -> Result<Asset, DomainError> {
        self.client
            .list_assets()
            .await
            .map_err(|e| log_and_convert("list_assets", "asset", e))?
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| DomainError::not_found("asset", format!("name {name}")))
    }
}
