//! The `auxo` provider: configuration block, client construction and the
//! registry of resources and data sources.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tfkit::{
    Attribute, Diagnostics, Provider, ProviderMetadata, ProviderSchema, Registry, Schema, decode,
};
use tracing::info;

use crate::config::AuxoProviderConfig;
use crate::data_sources::{
    AssetDataSource, ContactDataSource, LocationDataSource, ProtectSurfaceDataSource,
};
use crate::domain::Service;
use crate::infra::UnconfiguredClient;
use crate::infra::http::AuxoHttpClient;
use crate::resources::{
    LocationResource, MeasureResource, ProtectSurfaceResource, StateResource,
    TransactionFlowResource,
};

pub const PROVIDER_TYPE_NAME: &str = "auxo";

/// Resources and data sources sharing one service.
#[must_use]
pub fn registry(service: &Arc<Service>) -> Registry {
    Registry::new(PROVIDER_TYPE_NAME)
        .with_resource(Arc::new(ProtectSurfaceResource::new(service.clone())))
        .with_resource(Arc::new(LocationResource::new(service.clone())))
        .with_resource(Arc::new(StateResource::new(service.clone())))
        .with_resource(Arc::new(MeasureResource::new(service.clone())))
        .with_resource(Arc::new(TransactionFlowResource::new(service.clone())))
        .with_data_source(Arc::new(AssetDataSource::new(service.clone())))
        .with_data_source(Arc::new(ContactDataSource::new(service.clone())))
        .with_data_source(Arc::new(LocationDataSource::new(service.clone())))
        .with_data_source(Arc::new(ProtectSurfaceDataSource::new(service.clone())))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AuxoProvider;

impl AuxoProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn config_schema() -> Schema {
        Schema::new("Interact with the AUXO zero trust platform.")
            .attribute(
                Attribute::string("url")
                    .describe("URL of the AUXO API, defaults to api.on2it.net (env AUXO_URL)"),
            )
            .attribute(
                Attribute::string("token")
                    .sensitive()
                    .describe("Token to access the AUXO API (env AUXO_TOKEN)"),
            )
            .attribute(
                Attribute::string("name")
                    .describe("Alias of the entry in the ztctl configuration file to use"),
            )
            .attribute(
                Attribute::string("config")
                    .describe("Path of the ztctl configuration file, defaults to ~/.ztctl/config.json"),
            )
    }
}

#[async_trait]
impl Provider for AuxoProvider {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }

    fn schema(&self) -> ProviderSchema {
        let registry = registry(&Arc::new(Service::new(Arc::new(UnconfiguredClient))));
        ProviderSchema {
            provider: Self::config_schema(),
            resources: registry.resource_schemas(),
            data_sources: registry.data_source_schemas(),
        }
    }

    async fn configure(&self, config: Value) -> Result<Registry, Diagnostics> {
        let config: AuxoProviderConfig = if config.is_null() {
            AuxoProviderConfig::default()
        } else {
            decode("provider configuration", config)?
        };
        let settings = config.resolve()?;
        let client = AuxoHttpClient::new(&settings).map_err(|e| {
            Diagnostics::error(
                "Unable to create AUXO API client",
                format!(
                    "An unexpected error occurred when creating the AUXO API client. client error: {e}"
                ),
            )
        })?;
        info!(base_url = client.base_url(), "AUXO provider configured");
        Ok(registry(&Arc::new(Service::new(Arc::new(client)))))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use serde_json::json;

    use super::*;
    use crate::testing::{FakeAuxo, service_with};

    #[test]
    fn registry_prefixes_type_names() {
        let (_fake, service) = service_with(FakeAuxo::default());
        let registry = registry(&service);

        let resources: Vec<&str> = registry.resource_names().collect();
        assert_eq!(
            resources,
            vec![
                "auxo_location",
                "auxo_measure",
                "auxo_protectsurface",
                "auxo_state",
                "auxo_transactionflow"
            ]
        );
        let data_sources: Vec<&str> = registry.data_source_names().collect();
        assert_eq!(
            data_sources,
            vec!["auxo_asset", "auxo_contact", "auxo_location", "auxo_protectsurface"]
        );
    }

    #[test]
    fn token_is_sensitive() {
        let schema = AuxoProvider::new().schema();
        assert!(schema.provider.get("token").unwrap().sensitive);
        assert!(schema.resources.contains_key("auxo_measure"));
    }

    #[tokio::test]
    async fn configure_reports_missing_token() {
        let result = temp_env::async_with_vars(
            [("AUXO_TOKEN", None::<&str>), ("AUXO_URL", None), ("AUXO_TIMEOUT_SECS", None)],
            AuxoProvider::new().configure(json!({"url": "api.example"})),
        )
        .await;
        let err = result.err().unwrap();
        assert!(err.to_string().contains("Missing API Token Configuration"));
    }

    #[tokio::test]
    async fn configure_builds_registry() {
        let result = temp_env::async_with_vars(
            [("AUXO_TOKEN", None::<&str>), ("AUXO_URL", None), ("AUXO_TIMEOUT_SECS", None)],
            AuxoProvider::new().configure(json!({"url": "http://127.0.0.1:9", "token": "t"})),
        )
        .await;
        let registry = result.unwrap();
        assert!(registry.resource("auxo_protectsurface").is_some());
    }
}
