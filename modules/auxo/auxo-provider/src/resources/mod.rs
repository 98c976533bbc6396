//! Managed resources of the provider.
//!
//! Every resource holds the shared [`Service`](crate::domain::Service) and
//! works on typed plan/state models from [`crate::api::tf::dto`].

pub mod location;
pub mod measure;
pub mod protect_surface;
pub mod state;
pub mod transaction_flow;

pub use location::LocationResource;
pub use measure::MeasureResource;
pub use protect_surface::ProtectSurfaceResource;
pub use state::StateResource;
pub use transaction_flow::TransactionFlowResource;

use tfkit::{AttrValue, Diagnostic, Diagnostics};

/// The known value of an identifier attribute.
pub(crate) fn known_id<'a>(value: &'a AttrValue<String>, attribute: &str) -> Result<&'a str, Diagnostics> {
    value
        .as_value()
        .map(String::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            Diagnostic::error(
                "Missing identifier",
                format!("The attribute \"{attribute}\" has no known value."),
            )
            .with_attribute(attribute)
            .into()
        })
}
