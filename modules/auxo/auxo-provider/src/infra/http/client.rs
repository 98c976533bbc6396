//! AUXO REST client (reqwest-based).
//!
//! Talks to `https://{host}/v3/` with bearer authentication. List endpoints
//! answer `{"items": [...]}`; errors carry `{"id": "<code>", "message": "..."}`.
//! No retries: a failed call surfaces immediately.

use async_trait::async_trait;
use auxo_sdk::{
    Asset, AuxoClientV1, AuxoError, Contact, GONE_CODE, Location, MeasureCatalog, ProtectSurface,
    State, null_as_default,
};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProviderSettings;

const USER_AGENT: &str = concat!("terraform-provider-auxo/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct ListResponse<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    items: Vec<T>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    id: String,
    message: String,
}

/// Base URL for a configured host; a value with a scheme is used as-is.
#[must_use]
pub fn api_base_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_owned()
    } else {
        format!("https://{host}/v3")
    }
}

/// HTTP implementation of [`AuxoClientV1`].
#[derive(Debug, Clone)]
pub struct AuxoHttpClient {
    base_url: String,
    token: SecretString,
    http_client: Client,
}

impl AuxoHttpClient {
    /// # Errors
    ///
    /// `InvalidConfig` when the HTTP client cannot be built.
    pub fn new(settings: &ProviderSettings) -> Result<Self, AuxoError> {
        let http_client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AuxoError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(
            &settings.url,
            settings.token.clone(),
            http_client,
        ))
    }

    /// Uses a pre-built `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(url: &str, token: SecretString, http_client: Client) -> Self {
        Self {
            base_url: api_base_url(url),
            token,
            http_client,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, AuxoError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(AuxoError::InvalidId((*bad).to_owned()));
        }
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AuxoError::InvalidConfig(format!("invalid API URL {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                AuxoError::InvalidConfig(format!("API URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(self.token.expose_secret())
    }

    async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, AuxoError> {
        let url = self.url(path)?;
        debug!("AUXO GET {url}");
        let response = self
            .authorized(self.http_client.get(url))
            .send()
            .await
            .map_err(transport)?;
        handle_response(response).await
    }

    async fn list<T: DeserializeOwned>(&self, path: &[&str]) -> Result<Vec<T>, AuxoError> {
        self.get::<ListResponse<T>>(path).await.map(|l| l.items)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<T, AuxoError> {
        let url = self.url(path)?;
        debug!("AUXO POST {url}");
        let response = self
            .authorized(self.http_client.post(url))
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        handle_response(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &[&str],
        body: &B,
    ) -> Result<T, AuxoError> {
        let url = self.url(path)?;
        debug!("AUXO PUT {url}");
        let response = self
            .authorized(self.http_client.put(url))
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        handle_response(response).await
    }

    async fn delete(&self, path: &[&str]) -> Result<(), AuxoError> {
        let url = self.url(path)?;
        debug!("AUXO DELETE {url}");
        let response = self
            .authorized(self.http_client.delete(url))
            .send()
            .await
            .map_err(transport)?;
        if response.status().is_success() {
            Ok(())
        } else {
            handle_error_response(response).await
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn transport(e: reqwest::Error) -> AuxoError {
    AuxoError::Transport(e.to_string())
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AuxoError> {
    if response.status().is_success() {
        let body = response.text().await.map_err(transport)?;
        serde_json::from_str(&body)
            .map_err(|e| AuxoError::Decode(format!("failed to parse response: {e}")))
    } else {
        handle_error_response(response).await
    }
}

async fn handle_error_response<T>(response: reqwest::Response) -> Result<T, AuxoError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
    let message = if !parsed.message.is_empty() {
        parsed.message
    } else if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body
    };

    if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) || parsed.id == GONE_CODE {
        return Err(AuxoError::NotFound(message));
    }
    Err(AuxoError::Api {
        status: status.as_u16(),
        code: parsed.id,
        message,
    })
}

fn overwrite_query(overwrite: bool) -> [(&'static str, &'static str); 1] {
    [("overwrite", if overwrite { "true" } else { "false" })]
}

#[async_trait]
impl AuxoClientV1 for AuxoHttpClient {
    async fn list_protect_surfaces(&self) -> Result<Vec<ProtectSurface>, AuxoError> {
        self.list(&["zerotrust", "protectsurfaces"]).await
    }

    async fn get_protect_surface(&self, id: &str) -> Result<ProtectSurface, AuxoError> {
        self.get(&["zerotrust", "protectsurfaces", id]).await
    }

    async fn create_protect_surface(
        &self,
        ps: &ProtectSurface,
        overwrite: bool,
    ) -> Result<ProtectSurface, AuxoError> {
        self.post(&["zerotrust", "protectsurfaces"], &overwrite_query(overwrite), ps)
            .await
    }

    async fn update_protect_surface(&self, ps: &ProtectSurface) -> Result<ProtectSurface, AuxoError> {
        self.put(&["zerotrust", "protectsurfaces", ps.id.as_str()], ps)
            .await
    }

    async fn delete_protect_surface(&self, id: &str) -> Result<(), AuxoError> {
        self.delete(&["zerotrust", "protectsurfaces", id]).await
    }

    async fn get_measure_catalog(&self) -> Result<MeasureCatalog, AuxoError> {
        self.get(&["zerotrust", "measures"]).await
    }

    async fn list_locations(&self) -> Result<Vec<Location>, AuxoError> {
        self.list(&["zerotrust", "locations"]).await
    }

    async fn get_location(&self, id: &str) -> Result<Location, AuxoError> {
        self.get(&["zerotrust", "locations", id]).await
    }

    async fn create_location(&self, location: &Location) -> Result<Location, AuxoError> {
        self.post(&["zerotrust", "locations"], &overwrite_query(false), location)
            .await
    }

    async fn update_location(&self, location: &Location) -> Result<Location, AuxoError> {
        self.put(&["zerotrust", "locations", location.id.as_str()], location)
            .await
    }

    async fn delete_location(&self, id: &str) -> Result<(), AuxoError> {
        self.delete(&["zerotrust", "locations", id]).await
    }

    async fn get_state(&self, id: &str) -> Result<State, AuxoError> {
        self.get(&["zerotrust", "states", id]).await
    }

    async fn create_state(&self, state: &State) -> Result<State, AuxoError> {
        self.post(&["zerotrust", "states"], &overwrite_query(false), state)
            .await
    }

    async fn update_state(&self, state: &State) -> Result<State, AuxoError> {
        self.put(&["zerotrust", "states", state.id.as_str()], state)
            .await
    }

    async fn delete_state(&self, id: &str) -> Result<(), AuxoError> {
        self.delete(&["zerotrust", "states", id]).await
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, AuxoError> {
        self.list(&["crm", "contacts"]).await
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, AuxoError> {
        self.list(&["asset", "assets"]).await
    }
}
