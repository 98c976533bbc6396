//! In-memory AUXO backend for tests.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use auxo_sdk::{
    Asset, AuxoClientV1, AuxoError, Contact, Location, MeasureCatalog, ProtectSurface, State,
};

use crate::domain::Service;

#[derive(Default)]
struct Store {
    protect_surfaces: BTreeMap<String, ProtectSurface>,
    locations: BTreeMap<String, Location>,
    states: BTreeMap<String, State>,
    contacts: Vec<Contact>,
    assets: Vec<Asset>,
    catalog: MeasureCatalog,
    next_id: u64,
    writes: Vec<String>,
}

impl Store {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// Fake accessor recording every mutating call.
#[derive(Default)]
pub struct FakeAuxo {
    store: Mutex<Store>,
    read_delay: Option<Duration>,
}

impl FakeAuxo {
    pub fn with_catalog<I: IntoIterator<Item = &'static str>>(names: I) -> Self {
        let fake = Self::default();
        fake.store.lock().unwrap().catalog = MeasureCatalog::from_names(names);
        fake
    }

    /// Delays every protect surface fetch, widening read-modify-write races.
    pub const fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    pub fn insert_protect_surface(&self, mut ps: ProtectSurface) -> ProtectSurface {
        let mut store = self.store.lock().unwrap();
        if ps.id.is_empty() {
            ps.id = store.next_id("ps");
        }
        store.protect_surfaces.insert(ps.id.clone(), ps.clone());
        ps
    }

    pub fn insert_location(&self, mut location: Location) -> Location {
        let mut store = self.store.lock().unwrap();
        if location.id.is_empty() {
            location.id = store.next_id("loc");
        }
        store.locations.insert(location.id.clone(), location.clone());
        location
    }

    pub fn add_contact(&self, id: &str, email: &str) {
        self.store.lock().unwrap().contacts.push(Contact {
            id: id.to_owned(),
            email: email.to_owned(),
        });
    }

    pub fn add_asset(&self, id: &str, name: &str) {
        self.store.lock().unwrap().assets.push(Asset {
            id: id.to_owned(),
            name: name.to_owned(),
        });
    }

    pub fn protect_surface(&self, id: &str) -> Option<ProtectSurface> {
        self.store.lock().unwrap().protect_surfaces.get(id).cloned()
    }

    pub fn remove_protect_surface(&self, id: &str) {
        self.store.lock().unwrap().protect_surfaces.remove(id);
    }

    pub fn state(&self, id: &str) -> Option<State> {
        self.store.lock().unwrap().states.get(id).cloned()
    }

    /// Names of the mutating calls received so far.
    pub fn writes(&self) -> Vec<String> {
        self.store.lock().unwrap().writes.clone()
    }

    fn record(&self, op: &str) {
        self.store.lock().unwrap().writes.push(op.to_owned());
    }
}

/// Wraps `fake` in a service, keeping a handle for assertions.
pub fn service_with(fake: FakeAuxo) -> (Arc<FakeAuxo>, Arc<Service>) {
    let fake = Arc::new(fake);
    let service = Arc::new(Service::new(fake.clone()));
    (fake, service)
}

#[async_trait]
impl AuxoClientV1 for FakeAuxo {
    async fn list_protect_surfaces(&self) -> Result<Vec<ProtectSurface>, AuxoError> {
        Ok(self.store.lock().unwrap().protect_surfaces.values().cloned().collect())
    }

    async fn get_protect_surface(&self, id: &str) -> Result<ProtectSurface, AuxoError> {
        let found = self.protect_surface(id);
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        found.ok_or_else(|| AuxoError::not_found(id))
    }

    async fn create_protect_surface(
        &self,
        ps: &ProtectSurface,
        overwrite: bool,
    ) -> Result<ProtectSurface, AuxoError> {
        self.record(if overwrite {
            "create_protect_surface_overwrite"
        } else {
            "create_protect_surface"
        });
        let mut store = self.store.lock().unwrap();
        let existing = store
            .protect_surfaces
            .values()
            .find(|p| {
                (!ps.id.is_empty() && p.id == ps.id)
                    || (!ps.uniqueness_key.is_empty() && p.uniqueness_key == ps.uniqueness_key)
            })
            .map(|p| p.id.clone());

        let mut saved = ps.clone();
        match existing {
            Some(_) if !overwrite => {
                return Err(AuxoError::api(409, "409", "protectsurface already exists"));
            }
            Some(id) => saved.id = id,
            None => saved.id = store.next_id("ps"),
        }
        store.protect_surfaces.insert(saved.id.clone(), saved.clone());
        Ok(saved)
    }

    async fn update_protect_surface(&self, ps: &ProtectSurface) -> Result<ProtectSurface, AuxoError> {
        self.record("update_protect_surface");
        let mut store = self.store.lock().unwrap();
        if !store.protect_surfaces.contains_key(&ps.id) {
            return Err(AuxoError::not_found(ps.id.clone()));
        }
        store.protect_surfaces.insert(ps.id.clone(), ps.clone());
        Ok(ps.clone())
    }

    async fn delete_protect_surface(&self, id: &str) -> Result<(), AuxoError> {
        self.record("delete_protect_surface");
        self.store
            .lock()
            .unwrap()
            .protect_surfaces
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AuxoError::not_found(id))
    }

    async fn get_measure_catalog(&self) -> Result<MeasureCatalog, AuxoError> {
        Ok(self.store.lock().unwrap().catalog.clone())
    }

    async fn list_locations(&self) -> Result<Vec<Location>, AuxoError> {
        Ok(self.store.lock().unwrap().locations.values().cloned().collect())
    }

    async fn get_location(&self, id: &str) -> Result<Location, AuxoError> {
        self.store
            .lock()
            .unwrap()
            .locations
            .get(id)
            .cloned()
            .ok_or_else(|| AuxoError::not_found(id))
    }

    async fn create_location(&self, location: &Location) -> Result<Location, AuxoError> {
        self.record("create_location");
        let mut saved = location.clone();
        saved.id = String::new();
        Ok(self.insert_location(saved))
    }

    async fn update_location(&self, location: &Location) -> Result<Location, AuxoError> {
        self.record("update_location");
        let mut store = self.store.lock().unwrap();
        if !store.locations.contains_key(&location.id) {
            return Err(AuxoError::not_found(location.id.clone()));
        }
        store.locations.insert(location.id.clone(), location.clone());
        Ok(location.clone())
    }

    async fn delete_location(&self, id: &str) -> Result<(), AuxoError> {
        self.record("delete_location");
        self.store
            .lock()
            .unwrap()
            .locations
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AuxoError::not_found(id))
    }

    async fn get_state(&self, id: &str) -> Result<State, AuxoError> {
        self.state(id).ok_or_else(|| AuxoError::not_found(id))
    }

    async fn create_state(&self, state: &State) -> Result<State, AuxoError> {
        self.record("create_state");
        let mut store = self.store.lock().unwrap();
        let mut saved = state.clone();
        saved.id = store.next_id("state");
        store.states.insert(saved.id.clone(), saved.clone());
        Ok(saved)
    }

    async fn update_state(&self, state: &State) -> Result<State, AuxoError> {
        self.record("update_state");
        let mut store = self.store.lock().unwrap();
        if !store.states.contains_key(&state.id) {
            return Err(AuxoError::not_found(state.id.clone()));
        }
        store.states.insert(state.id.clone(), state.clone());
        Ok(state.clone())
    }

    async fn delete_state(&self, id: &str) -> Result<(), AuxoError> {
        self.record("delete_state");
        self.store
            .lock()
            .unwrap()
            .states
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AuxoError::not_found(id))
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, AuxoError> {
        Ok(self.store.lock().unwrap().contacts.clone())
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, AuxoError> {
        Ok(self.store.lock().unwrap().assets.clone())
    }
}
