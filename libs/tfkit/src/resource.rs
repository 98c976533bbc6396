//! Provider, resource and data source contracts.
//!
//! Plans and states cross this boundary as JSON objects. Implementations
//! decode them into typed models with [`decode`] and encode results back
//! with [`encode`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::schema::Schema;

/// A managed resource.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Suffix appended to the provider type name, e.g. `location`.
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Creates the remote object and returns the new state.
    ///
    /// # Errors
    ///
    /// Diagnostics describing why the object could not be created.
    async fn create(&self, plan: Value) -> Result<Value, Diagnostics>;

    /// Refreshes state. `Ok(None)` means the object is gone and must be
    /// removed from state.
    ///
    /// # Errors
    ///
    /// Diagnostics for any failure other than the object being gone.
    async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics>;

    /// Applies `plan` over `prior` in place and returns the new state.
    ///
    /// # Errors
    ///
    /// Diagnostics describing why the update failed.
    async fn update(&self, prior: Value, plan: Value) -> Result<Value, Diagnostics>;

    /// # Errors
    ///
    /// Diagnostics describing why the object could not be deleted.
    async fn delete(&self, state: Value) -> Result<(), Diagnostics>;

    /// Imports an existing object by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error diagnostic unless the resource supports import.
    async fn import(&self, id: &str) -> Result<Option<Value>, Diagnostics> {
        Err(Diagnostics::error(
            "Import not supported",
            format!("resource {} cannot be imported (id {id})", self.type_name()),
        ))
    }
}

/// A read-only data source.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// # Errors
    ///
    /// Diagnostics describing why the lookup failed.
    async fn read(&self, config: Value) -> Result<Value, Diagnostics>;
}

/// Provider identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub type_name: String,
    pub version: String,
}

/// Complete provider schema as reported by the `schema` operation.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

/// A provider. `configure` returns the resources and data sources bound to
/// the configured dependencies.
#[async_trait]
pub trait Provider: Send + Sync {
    fn metadata(&self) -> ProviderMetadata;

    fn schema(&self) -> ProviderSchema;

    /// # Errors
    ///
    /// Diagnostics describing invalid or incomplete configuration.
    async fn configure(&self, config: Value) -> Result<Registry, Diagnostics>;
}

/// Resources and data sources keyed by their full type name.
#[derive(Clone, Default)]
pub struct Registry {
    prefix: String,
    resources: BTreeMap<String, Arc<dyn Resource>>,
    data_sources: BTreeMap<String, Arc<dyn DataSource>>,
}

impl Registry {
    #[must_use]
    pub fn new(provider_type_name: impl Into<String>) -> Self {
        Self {
            prefix: provider_type_name.into(),
            ..Self::default()
        }
    }

    fn full_name(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.prefix)
    }

    #[must_use]
    pub fn with_resource(mut self, resource: Arc<dyn Resource>) -> Self {
        self.resources
            .insert(self.full_name(resource.type_name()), resource);
        self
    }

    #[must_use]
    pub fn with_data_source(mut self, data_source: Arc<dyn DataSource>) -> Self {
        self.data_sources
            .insert(self.full_name(data_source.type_name()), data_source);
        self
    }

    #[must_use]
    pub fn resource(&self, type_name: &str) -> Option<Arc<dyn Resource>> {
        self.resources.get(type_name).cloned()
    }

    #[must_use]
    pub fn data_source(&self, type_name: &str) -> Option<Arc<dyn DataSource>> {
        self.data_sources.get(type_name).cloned()
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn data_source_names(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    /// Schemas keyed by full type name.
    #[must_use]
    pub fn resource_schemas(&self) -> BTreeMap<String, Schema> {
        self.resources
            .iter()
            .map(|(k, r)| (k.clone(), r.schema()))
            .collect()
    }

    #[must_use]
    pub fn data_source_schemas(&self) -> BTreeMap<String, Schema> {
        self.data_sources
            .iter()
            .map(|(k, d)| (k.clone(), d.schema()))
            .collect()
    }
}

/// Decodes a plan, state or config object into a typed model.
///
/// # Errors
///
/// An error diagnostic naming `what` when the value does not match the model.
pub fn decode<T: DeserializeOwned>(what: &str, value: Value) -> Result<T, Diagnostics> {
    serde_json::from_value(value)
        .map_err(|e| Diagnostics::error(format!("Invalid {what}"), e.to_string()))
}

/// Encodes a typed model into a state object.
///
/// # Errors
///
/// An error diagnostic when the model cannot be represented as JSON.
pub fn encode<T: Serialize>(model: &T) -> Result<Value, Diagnostics> {
    serde_json::to_value(model).map_err(|e| Diagnostics::error("Unable to encode state", e.to_string()))
}
