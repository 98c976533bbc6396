use std::fmt;

use auxo_sdk::AuxoError;
use thiserror::Error;

/// Direction of a transaction flow relative to the protect surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    Incoming,
    Outgoing,
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        })
    }
}

/// Domain-level errors of the provider.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Rejected before any remote mutation.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error(
        "duplicate in {direction}_protectsurfaces_allow and {direction}_protectsurfaces_block, protectsurface ID: {peer_id}"
    )]
    Conflict {
        peer_id: String,
        direction: FlowDirection,
    },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Duplicate {entity} name {name} on backend, please use uniqueness_key")]
    AmbiguousName { entity: &'static str, name: String },

    #[error(transparent)]
    Remote(AuxoError),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(peer_id: impl Into<String>, direction: FlowDirection) -> Self {
        Self::Conflict {
            peer_id: peer_id.into(),
            direction,
        }
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn ambiguous_name(entity: &'static str, name: impl Into<String>) -> Self {
        Self::AmbiguousName {
            entity,
            name: name.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
