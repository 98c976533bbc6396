//! Infrastructure adapters for the AUXO API.

pub mod http;
pub mod unconfigured;

pub use unconfigured::UnconfiguredClient;
