//! Line-delimited JSON driver.
//!
//! Each input line is one [`Request`]; each output line is one [`Response`],
//! either `{"ok": <payload>}` or `{"diagnostics": [...]}`. A resource that is
//! gone on read answers `{"ok": null}`.

use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::diagnostics::Diagnostics;
use crate::resource::{DataSource, Provider, Registry, Resource, encode};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Metadata,
    Schema,
    Configure {
        #[serde(default)]
        config: Value,
    },
    Create {
        #[serde(rename = "type")]
        type_name: String,
        plan: Value,
    },
    Read {
        #[serde(rename = "type")]
        type_name: String,
        state: Value,
    },
    Update {
        #[serde(rename = "type")]
        type_name: String,
        prior: Value,
        plan: Value,
    },
    Delete {
        #[serde(rename = "type")]
        type_name: String,
        state: Value,
    },
    Import {
        #[serde(rename = "type")]
        type_name: String,
        id: String,
    },
    ReadDataSource {
        #[serde(rename = "type")]
        type_name: String,
        config: Value,
    },
}

impl Request {
    #[must_use]
    pub const fn op_name(&self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Schema => "schema",
            Self::Configure { .. } => "configure",
            Self::Create { .. } => "create",
            Self::Read { .. } => "read",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Import { .. } => "import",
            Self::ReadDataSource { .. } => "read_data_source",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Ok(Value),
    Diagnostics(Diagnostics),
}

/// Dispatches requests to a provider and the registry it was configured with.
pub struct Server<P> {
    provider: P,
    registry: Option<Registry>,
}

impl<P: Provider> Server<P> {
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            registry: None,
        }
    }

    pub async fn handle(&mut self, request: Request) -> Response {
        match self.dispatch(request).await {
            Ok(payload) => Response::Ok(payload),
            Err(diags) => Response::Diagnostics(diags),
        }
    }

    fn registry(&self) -> Result<&Registry, Diagnostics> {
        self.registry.as_ref().ok_or_else(|| {
            Diagnostics::error(
                "Provider not configured",
                "the configure operation must succeed before resources can be used",
            )
        })
    }

    fn resource(&self, type_name: &str) -> Result<Arc<dyn Resource>, Diagnostics> {
        self.registry()?.resource(type_name).ok_or_else(|| {
            Diagnostics::error("Unknown resource type", format!("no resource named {type_name}"))
        })
    }

    fn data_source(&self, type_name: &str) -> Result<Arc<dyn DataSource>, Diagnostics> {
        self.registry()?.data_source(type_name).ok_or_else(|| {
            Diagnostics::error("Unknown data source type", format!("no data source named {type_name}"))
        })
    }

    async fn dispatch(&mut self, request: Request) -> Result<Value, Diagnostics> {
        match request {
            Request::Metadata => encode(&self.provider.metadata()),
            Request::Schema => encode(&self.provider.schema()),
            Request::Configure { config } => {
                let registry = self.provider.configure(config).await?;
                info!(
                    resources = registry.resource_names().count(),
                    data_sources = registry.data_source_names().count(),
                    "provider configured"
                );
                self.registry = Some(registry);
                Ok(Value::Null)
            }
            Request::Create {
                type_name,
                mut plan,
            } => {
                let resource = self.resource(&type_name)?;
                let schema = resource.schema();
                schema.apply_defaults(&mut plan);
                schema.missing_required(&plan).into_result()?;
                resource.create(plan).await
            }
            Request::Read { type_name, state } => {
                let resource = self.resource(&type_name)?;
                Ok(resource.read(state).await?.unwrap_or(Value::Null))
            }
            Request::Update {
                type_name,
                prior,
                mut plan,
            } => {
                let resource = self.resource(&type_name)?;
                let schema = resource.schema();
                schema.apply_defaults(&mut plan);
                schema.missing_required(&plan).into_result()?;
                let triggers = schema.replacement_triggers(&prior, &plan);
                if !triggers.is_empty() {
                    return Err(Diagnostics::error(
                        "Resource requires replacement",
                        format!(
                            "changing {} cannot be applied in place",
                            triggers.join(", ")
                        ),
                    ));
                }
                resource.update(prior, plan).await
            }
            Request::Delete { type_name, state } => {
                self.resource(&type_name)?.delete(state).await?;
                Ok(Value::Null)
            }
            Request::Import { type_name, id } => {
                let resource = self.resource(&type_name)?;
                resource.import(&id).await?.ok_or_else(|| {
                    Diagnostics::error(
                        "Cannot import non-existent remote object",
                        format!("{type_name} with id {id} does not exist"),
                    )
                })
            }
            Request::ReadDataSource { type_name, config } => {
                let data_source = self.data_source(&type_name)?;
                data_source.schema().missing_required(&config).into_result()?;
                data_source.read(config).await
            }
        }
    }

    /// Serves requests from `reader` until end of input.
    ///
    /// # Errors
    ///
    /// I/O errors on either stream.
    pub async fn serve<R, W>(mut self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<Request>(&line) {
                Ok(request) => {
                    debug!(op = request.op_name(), "handling request");
                    self.handle(request).await
                }
                Err(e) => {
                    warn!(error = %e, "malformed request");
                    Response::Diagnostics(Diagnostics::error("Malformed request", e.to_string()))
                }
            };
            let mut out = serde_json::to_vec(&response).map_err(io::Error::other)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }
        Ok(())
    }
}

/// Serves `provider` over stdin/stdout.
///
/// # Errors
///
/// I/O errors on the standard streams.
pub async fn serve_stdio<P: Provider>(provider: P) -> io::Result<()> {
    Server::new(provider)
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::resource::{ProviderMetadata, ProviderSchema};
    use crate::schema::{Attribute, Schema};

    #[derive(Default)]
    struct NoteResource {
        notes: Mutex<BTreeMap<String, Value>>,
    }

    impl NoteResource {
        fn schema_def() -> Schema {
            Schema::new("note")
                .attribute(Attribute::string("id").required().requires_replace())
                .attribute(Attribute::string("body").with_default("empty"))
        }
    }

    #[async_trait]
    impl Resource for NoteResource {
        fn type_name(&self) -> &'static str {
            "note"
        }

        fn schema(&self) -> Schema {
            Self::schema_def()
        }

        async fn create(&self, plan: Value) -> Result<Value, Diagnostics> {
            let id = plan["id"].as_str().unwrap().to_owned();
            self.notes.lock().unwrap().insert(id, plan.clone());
            Ok(plan)
        }

        async fn read(&self, state: Value) -> Result<Option<Value>, Diagnostics> {
            let id = state["id"].as_str().unwrap_or_default();
            Ok(self.notes.lock().unwrap().get(id).cloned())
        }

        async fn update(&self, _prior: Value, plan: Value) -> Result<Value, Diagnostics> {
            self.create(plan).await
        }

        async fn delete(&self, state: Value) -> Result<(), Diagnostics> {
            let id = state["id"].as_str().unwrap_or_default();
            self.notes.lock().unwrap().remove(id);
            Ok(())
        }
    }

    struct NoteProvider;

    #[async_trait]
    impl Provider for NoteProvider {
        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                type_name: "demo".to_owned(),
                version: "0.0.1".to_owned(),
            }
        }

        fn schema(&self) -> ProviderSchema {
            ProviderSchema {
                provider: Schema::new("demo"),
                resources: BTreeMap::from([("demo_note".to_owned(), NoteResource::schema_def())]),
                data_sources: BTreeMap::new(),
            }
        }

        async fn configure(&self, config: Value) -> Result<Registry, Diagnostics> {
            if config.get("reject").is_some() {
                return Err(Diagnostics::error("Rejected", "asked to"));
            }
            Ok(Registry::new("demo").with_resource(Arc::new(NoteResource::default())))
        }
    }

    fn ok(resp: Response) -> Value {
        match resp {
            Response::Ok(v) => v,
            Response::Diagnostics(d) => panic!("unexpected diagnostics: {d}"),
        }
    }

    fn diags(resp: Response) -> Diagnostics {
        match resp {
            Response::Diagnostics(d) => d,
            Response::Ok(v) => panic!("unexpected ok: {v}"),
        }
    }

    async fn configured() -> Server<NoteProvider> {
        let mut server = Server::new(NoteProvider);
        ok(server.handle(Request::Configure { config: json!({}) }).await);
        server
    }

    #[tokio::test]
    async fn resources_require_configure() {
        let mut server = Server::new(NoteProvider);
        let d = diags(
            server
                .handle(Request::Read {
                    type_name: "demo_note".to_owned(),
                    state: json!({"id": "a"}),
                })
                .await,
        );
        assert!(d.to_string().contains("Provider not configured"));
    }

    #[tokio::test]
    async fn failed_configure_keeps_server_unconfigured() {
        let mut server = Server::new(NoteProvider);
        diags(server.handle(Request::Configure { config: json!({"reject": true}) }).await);
        assert!(server.registry.is_none());
    }

    #[tokio::test]
    async fn create_applies_defaults_and_checks_required() {
        let mut server = configured().await;
        let state = ok(server
            .handle(Request::Create {
                type_name: "demo_note".to_owned(),
                plan: json!({"id": "a"}),
            })
            .await);
        assert_eq!(state["body"], json!("empty"));

        let d = diags(
            server
                .handle(Request::Create {
                    type_name: "demo_note".to_owned(),
                    plan: json!({"body": "x"}),
                })
                .await,
        );
        assert!(d.has_error());
    }

    #[tokio::test]
    async fn read_of_missing_object_is_null() {
        let mut server = configured().await;
        let v = ok(server
            .handle(Request::Read {
                type_name: "demo_note".to_owned(),
                state: json!({"id": "gone"}),
            })
            .await);
        assert!(v.is_null());
    }

    #[tokio::test]
    async fn update_refuses_replacement_changes() {
        let mut server = configured().await;
        let d = diags(
            server
                .handle(Request::Update {
                    type_name: "demo_note".to_owned(),
                    prior: json!({"id": "a", "body": "x"}),
                    plan: json!({"id": "b", "body": "x"}),
                })
                .await,
        );
        assert!(d.to_string().contains("requires replacement"));
    }

    #[tokio::test]
    async fn import_defaults_to_unsupported() {
        let mut server = configured().await;
        let d = diags(
            server
                .handle(Request::Import {
                    type_name: "demo_note".to_owned(),
                    id: "a".to_owned(),
                })
                .await,
        );
        assert!(d.to_string().contains("Import not supported"));
    }

    #[tokio::test]
    async fn serve_answers_one_line_per_request() {
        let input = concat!(
            "{\"op\":\"metadata\"}\n",
            "\n",
            "not json\n",
            "{\"op\":\"configure\",\"config\":{}}\n",
            "{\"op\":\"create\",\"type\":\"demo_note\",\"plan\":{\"id\":\"n1\",\"body\":\"hi\"}}\n",
            "{\"op\":\"read\",\"type\":\"demo_note\",\"state\":{\"id\":\"n1\"}}\n",
            "{\"op\":\"delete\",\"type\":\"demo_note\",\"state\":{\"id\":\"n1\"}}\n",
        );
        let mut out = Vec::new();
        Server::new(NoteProvider)
            .serve(input.as_bytes(), &mut out)
            .await
            .unwrap();

        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0]["ok"]["type_name"], json!("demo"));
        assert!(lines[1]["diagnostics"].is_array());
        assert_eq!(lines[2], json!({"ok": null}));
        assert_eq!(lines[4]["ok"]["body"], json!("hi"));
        assert_eq!(lines[5], json!({"ok": null}));
    }
}
