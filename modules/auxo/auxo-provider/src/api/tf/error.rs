use tfkit::{Diagnostic, Diagnostics};

use crate::domain::error::DomainError;

/// Convert domain errors to diagnostics under the given summary.
#[must_use]
pub fn domain_error_to_diagnostics(summary: &str, err: &DomainError) -> Diagnostics {
    let diagnostic = match err {
        DomainError::Validation { field, message } => {
            Diagnostic::error(summary, message.clone()).with_attribute(field.clone())
        }
        DomainError::Conflict { direction, .. } => Diagnostic::error(summary, err.to_string())
            .with_attribute(format!("{direction}_protectsurfaces_block")),
        DomainError::NotFound { .. } | DomainError::AmbiguousName { .. } => {
            Diagnostic::error(summary, err.to_string())
        }
        DomainError::Remote(_) => Diagnostic::error(summary, format!("unexpected error: {err}")),
    };
    diagnostic.into()
}

/// `?`-friendly conversion of domain results.
pub trait DiagnoseExt<T> {
    /// # Errors
    ///
    /// The domain error rendered as diagnostics under `summary`.
    fn diagnose(self, summary: &str) -> Result<T, Diagnostics>;
}

impl<T> DiagnoseExt<T> for Result<T, DomainError> {
    fn diagnose(self, summary: &str) -> Result<T, Diagnostics> {
        self.map_err(|e| domain_error_to_diagnostics(summary, &e))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used)]

    use auxo_sdk::AuxoError;

    use super::*;
    use crate::domain::FlowDirection;

    #[test]
    fn validation_points_at_the_field() {
        let d = domain_error_to_diagnostics(
            "Error creating measures",
            &DomainError::validation("measures", "Measure [x] does not exist, available measures [a]"),
        );
        let first = d.iter().next().cloned();
        let first = first.as_ref();
        assert_eq!(first.map(|d| d.summary.as_str()), Some("Error creating measures"));
        assert_eq!(first.and_then(|d| d.attribute.as_deref()), Some("measures"));
    }

    #[test]
    fn conflict_names_the_peer_and_direction() {
        let d = domain_error_to_diagnostics(
            "Error creating transaction flows",
            &DomainError::conflict("ps-7", FlowDirection::Outgoing),
        );
        let text = d.to_string();
        assert!(text.contains("outgoing_protectsurfaces_allow"), "{text}");
        assert!(text.contains("ps-7"), "{text}");
    }

    #[test]
    fn remote_errors_are_prefixed() {
        let err: Result<(), DomainError> =
            Err(DomainError::Remote(AuxoError::api(500, "500", "boom")));
        let text = err.diagnose("Error reading protectsurface").unwrap_err().to_string();
        assert!(text.contains("unexpected error: api error (status 500, code 500): boom"), "{text}");
    }
}
