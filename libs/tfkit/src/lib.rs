//! Provider framework kit
//!
//! Building blocks for declarative-infrastructure providers:
//!
//! - [`AttrValue`] - three-state attribute value (unset, computed, value)
//! - [`Schema`] / [`Attribute`] - schema declaration, defaults, requires-replace
//! - [`Diagnostics`] - errors and warnings reported to the orchestrator
//! - [`Provider`], [`Resource`], [`DataSource`] - provider contracts
//! - [`Server`] - line-delimited JSON driver over any async reader/writer
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod resource;
pub mod schema;
pub mod server;
pub mod value;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use resource::{
    DataSource, Provider, ProviderMetadata, ProviderSchema, Registry, Resource, decode, encode,
};
pub use schema::{Attribute, AttributeType, Presence, Schema};
pub use server::{Request, Response, Server, serve_stdio};
pub use value::{AttrValue, Collection, UNKNOWN_VALUE, collection_from_remote};
