//! Read-only data sources of the provider.

pub mod asset;
pub mod contact;
pub mod location;
pub mod protect_surface;

pub use asset::AssetDataSource;
pub use contact::ContactDataSource;
pub use location::LocationDataSource;
pub use protect_surface::ProtectSurfaceDataSource;
