//! Provider configuration.
//!
//! Settings are layered with `figment`, lowest precedence first:
//! built-in defaults, `AUXO_*` environment variables, the provider
//! configuration block, and finally the ztctl alias entry selected by `name`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tfkit::Diagnostics;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "api.on2it.net";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const ENV_PREFIX: &str = "AUXO_";

/// Values of the provider configuration block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuxoProviderConfig {
    /// API host, or a full base URL including scheme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Alias in the ztctl configuration file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Path of the ztctl configuration file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

/// One entry of the ztctl configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ZtctlEntry {
    pub alias: String,
    pub description: String,
    pub token: String,
    pub apiaddress: String,
    pub debug: bool,
}

/// `{"configs": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ZtctlConfigFile {
    pub configs: Vec<ZtctlEntry>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {} does not exist", path.display())]
    FileMissing { path: PathBuf },

    #[error("could not parse configuration file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Could not find config entry with alias {alias}")]
    UnknownAlias { alias: String },

    #[error("no home directory to locate the default configuration file")]
    NoHomeDirectory,
}

/// Resolved settings used to build the API client.
#[derive(Debug)]
pub struct ProviderSettings {
    pub url: String,
    pub token: SecretString,
    pub timeout: Duration,
}

/// Intermediate figment layer.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Layers {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// `~/.ztctl/config.json`
#[must_use]
pub fn default_config_location() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ztctl").join("config.json"))
}

/// Reads the ztctl file at `path` and returns the entry for `alias`.
///
/// # Errors
///
/// - `FileMissing` / `Parse` when the file cannot be read
/// - `UnknownAlias` when no entry carries `alias`
pub fn load_ztctl_entry(path: &Path, alias: &str) -> Result<ZtctlEntry, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileMissing {
            path: path.to_path_buf(),
        });
    }
    let file: ZtctlConfigFile = Figment::from(Json::file(path))
        .extract()
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    file.configs
        .into_iter()
        .find(|entry| entry.alias == alias)
        .ok_or_else(|| ConfigError::UnknownAlias {
            alias: alias.to_owned(),
        })
}

impl AuxoProviderConfig {
    /// The block with empty strings dropped, so they do not shadow lower layers.
    fn without_empty(&self) -> Self {
        Self {
            url: non_empty(self.url.clone()),
            token: non_empty(self.token.clone()),
            name: non_empty(self.name.clone()),
            config: non_empty(self.config.clone()),
        }
    }

    /// Resolves the settings for the API client.
    ///
    /// # Errors
    ///
    /// Diagnostics for an unreadable ztctl file or unknown alias, a missing
    /// token, or a missing URL. All problems are reported together.
    pub fn resolve(&self) -> Result<ProviderSettings, Diagnostics> {
        let defaults = Layers {
            url: Some(DEFAULT_API_URL.to_owned()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            ..Layers::default()
        };
        let layers: Layers = Figment::from(Serialized::defaults(defaults))
            .merge(Env::prefixed(ENV_PREFIX).only(&["token", "url", "timeout_secs"]))
            .merge(Serialized::defaults(self.without_empty()))
            .extract()
            .map_err(|e| Diagnostics::error("Invalid provider configuration", e.to_string()))?;

        let mut diags = Diagnostics::new();
        let mut url = non_empty(layers.url).unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let mut token = non_empty(layers.token);

        if let Some(alias) = non_empty(layers.name) {
            let entry = non_empty(layers.config)
                .map(PathBuf::from)
                .or_else(default_config_location)
                .ok_or(ConfigError::NoHomeDirectory)
                .and_then(|path| load_ztctl_entry(&path, &alias));
            match entry {
                Ok(entry) => {
                    tracing::debug!(alias = %alias, "using ztctl configuration entry");
                    url = entry.apiaddress;
                    token = non_empty(Some(entry.token));
                }
                Err(e) => {
                    url = String::new();
                    token = None;
                    diags.add_error(
                        "Unable to read configuration file",
                        format!(
                            "An unexpected error occurred when reading the configuration file. client error: {e}"
                        ),
                    );
                }
            }
        }

        if token.is_none() {
            diags.add_error(
                "Missing API Token Configuration",
                "While configuring the provider, the API token was not found in the AUXO_TOKEN \
                 environment variable or provider configuration block 'token' or 'config' attribute.",
            );
        }
        if url.is_empty() {
            diags.add_error(
                "Missing API URL Configuration",
                "While configuring the provider, the API URL was not found in the provider \
                 configuration block 'url' or 'config' attribute.",
            );
        }
        diags.into_result()?;

        Ok(ProviderSettings {
            url,
            token: SecretString::from(token.unwrap_or_default()),
            timeout: Duration::from_secs(layers.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use std::io::Write;

    use secrecy::ExposeSecret;
    use tempfile::NamedTempFile;

    use super::*;

    const NO_ENV: [(&str, Option<&str>); 3] = [
        ("AUXO_TOKEN", None),
        ("AUXO_URL", None),
        ("AUXO_TIMEOUT_SECS", None),
    ];

    fn ztctl_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"configs": [
                {{"alias": "prod", "description": "production", "token": "file-token", "apiaddress": "api.prod.example", "debug": false}},
                {{"alias": "broken", "description": "", "token": "", "apiaddress": "", "debug": true}}
            ]}}"#
        )
        .unwrap();
        file
    }

    fn summaries(d: &Diagnostics) -> Vec<String> {
        d.iter().map(|d| d.summary.clone()).collect()
    }

    #[test]
    fn env_token_with_default_url() {
        temp_env::with_vars(
            [("AUXO_TOKEN", Some("env-token")), ("AUXO_URL", None), ("AUXO_TIMEOUT_SECS", None)],
            || {
                let s = AuxoProviderConfig::default().resolve().unwrap();
                assert_eq!(s.url, DEFAULT_API_URL);
                assert_eq!(s.token.expose_secret(), "env-token");
                assert_eq!(s.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
            },
        );
    }

    #[test]
    fn block_overrides_env_but_empty_strings_do_not() {
        temp_env::with_vars(
            [("AUXO_TOKEN", Some("env-token")), ("AUXO_URL", Some("env.example")), ("AUXO_TIMEOUT_SECS", Some("5"))],
            || {
                let block = AuxoProviderConfig {
                    url: Some("block.example".to_owned()),
                    token: Some(String::new()),
                    ..AuxoProviderConfig::default()
                };
                let s = block.resolve().unwrap();
                assert_eq!(s.url, "block.example");
                assert_eq!(s.token.expose_secret(), "env-token");
                assert_eq!(s.timeout, Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn alias_takes_precedence_over_block_values() {
        let file = ztctl_file();
        temp_env::with_vars(NO_ENV, || {
            let block = AuxoProviderConfig {
                url: Some("block.example".to_owned()),
                token: Some("block-token".to_owned()),
                name: Some("prod".to_owned()),
                config: Some(file.path().display().to_string()),
            };
            let s = block.resolve().unwrap();
            assert_eq!(s.url, "api.prod.example");
            assert_eq!(s.token.expose_secret(), "file-token");
        });
    }

    #[test]
    fn unknown_alias_is_reported() {
        let file = ztctl_file();
        temp_env::with_vars(NO_ENV, || {
            let block = AuxoProviderConfig {
                name: Some("staging".to_owned()),
                config: Some(file.path().display().to_string()),
                ..AuxoProviderConfig::default()
            };
            let d = block.resolve().unwrap_err();
            assert!(summaries(&d).contains(&"Unable to read configuration file".to_owned()));
            assert!(d.to_string().contains("alias staging"));
        });
    }

    #[test]
    fn alias_with_empty_credentials_reports_both_missing() {
        let file = ztctl_file();
        temp_env::with_vars(NO_ENV, || {
            let block = AuxoProviderConfig {
                name: Some("broken".to_owned()),
                config: Some(file.path().display().to_string()),
                ..AuxoProviderConfig::default()
            };
            let d = block.resolve().unwrap_err();
            assert_eq!(
                summaries(&d),
                vec!["Missing API Token Configuration", "Missing API URL Configuration"]
            );
        });
    }

    #[test]
    fn missing_token_is_reported() {
        temp_env::with_vars(NO_ENV, || {
            let d = AuxoProviderConfig::default().resolve().unwrap_err();
            assert_eq!(summaries(&d), vec!["Missing API Token Configuration"]);
        });
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_ztctl_entry(Path::new("/nonexistent/ztctl.json"), "prod").unwrap_err();
        assert!(matches!(err, ConfigError::FileMissing { .. }));
    }

    #[test]
    fn unknown_block_fields_are_rejected() {
        let r: Result<AuxoProviderConfig, _> =
            serde_json::from_value(serde_json::json!({"url": "x", "region": "eu"}));
        assert!(r.is_err());
    }
}
