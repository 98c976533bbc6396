//! Error types for the AUXO API.

use thiserror::Error;

/// API error code the AUXO backend uses for objects that no longer exist.
pub const GONE_CODE: &str = "410";

/// Errors returned by [`crate::AuxoClientV1`] implementations.
#[derive(Debug, Error)]
pub enum AuxoError {
    /// The object does not exist (HTTP 404/410 or API code `410`).
    #[error("not found: {0}")]
    NotFound(String),

    /// The API answered with an error.
    #[error("api error (status {status}, code {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The request could not be sent or the response not received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The identifier cannot name an object (empty, `.` or `..`).
    #[error("invalid object id '{0}'")]
    InvalidId(String),

    /// The client was constructed with unusable settings.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl AuxoError {
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    #[must_use]
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
