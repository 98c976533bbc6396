//! AUXO SDK
//!
//! Public API of the AUXO zero-trust platform as used by the provider:
//!
//! - [`AuxoClientV1`] - remote-aggregate accessor trait
//! - [`ProtectSurface`], [`Location`], [`State`], [`Contact`], [`Asset`],
//!   [`MeasureCatalog`] - wire models
//! - [`AuxoError`] - error type
//!
//! ## Usage
//!
//! ```ignore
//! use auxo_sdk::AuxoClientV1;
//!
//! let catalog = client.get_measure_catalog().await?;
//! if catalog.contains("encryption") {
//!     // ...
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::AuxoClientV1;
pub use error::{AuxoError, GONE_CODE};
pub use models::{
    Asset, Assignment, CatalogMeasure, Contact, Coords, Evidence, Flow, Implementation, Location,
    Maturity, MeasureCatalog, MeasureGroup, MeasureState, ProtectSurface, RiskAcceptance, State,
    null_as_default,
};
