//! Domain layer: reconcilers, lookups and the write-serialising service.

pub mod error;
pub mod flows;
pub mod lookup;
pub mod measures;
pub mod service;
pub mod surface;


pub use error::{DomainError, FlowDirection};
pub use flows::FlowSets;
pub use lookup::Lookup;
pub use measures::{DesiredMeasure, DesiredMeasures, DesiredRiskAcceptance, Determination};
pub use service::Service;
