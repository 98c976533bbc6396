//! AUXO provider
//!
//! Resources and data sources for the AUXO zero-trust platform:
//!
//! - [`config`] - provider block, environment and ztctl file resolution
//! - [`domain`] - reconcilers for protect surfaces, measures, flows and lookups
//! - [`infra`] - HTTP accessor implementing [`auxo_sdk::AuxoClientV1`]
//! - [`api::tf`] - attribute DTOs, mappers and diagnostic conversion
//! - [`resources`], [`data_sources`] - the provider surface
//! - [`provider`] - [`AuxoProvider`], the entry point served by `tfkit`
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod data_sources;
pub mod domain;
pub mod infra;
pub mod provider;
pub mod resources;

#[cfg(test)]
mod testing;

pub use provider::AuxoProvider;
