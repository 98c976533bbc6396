//! Terraform-facing models and their translation to the AUXO domain.

pub mod dto;
pub mod error;
pub mod mappers;

pub use dto::{
    AssetDto, ContactDto, LocationDto, MeasureDto, MeasureResourceDto, ProtectSurfaceDto,
    StateDto, TransactionFlowDto,
};
pub use error::{DiagnoseExt, domain_error_to_diagnostics};
