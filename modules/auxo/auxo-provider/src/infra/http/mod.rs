pub mod client;

pub use client::{AuxoHttpClient, api_base_url};
