//! Core attribute sync of the protect surface aggregate.

use auxo_sdk::ProtectSurface;

use super::error::DomainError;

/// Overlays the core attributes of `desired` onto `current`.
///
/// Identity, `measures` and the peer flow maps stay as they are on `current`;
/// those are owned by the measure and transaction flow resources.
///
/// # Errors
///
/// `Validation` when `desired` carries a uniqueness key different from the
/// one already set on `current`.
pub fn overlay_core_attributes(
    current: ProtectSurface,
    desired: ProtectSurface,
) -> Result<ProtectSurface, DomainError> {
    if !current.uniqueness_key.is_empty()
        && !desired.uniqueness_key.is_empty()
        && current.uniqueness_key != desired.uniqueness_key
    {
        return Err(DomainError::validation(
            "uniqueness_key",
            format!(
                "uniqueness_key cannot be changed from {} to {}; the protect surface must be replaced",
                current.uniqueness_key, desired.uniqueness_key
            ),
        ));
    }

    Ok(ProtectSurface {
        id: current.id,
        uniqueness_key: if current.uniqueness_key.is_empty() {
            desired.uniqueness_key
        } else {
            current.uniqueness_key
        },
        flows_from_other_ps: current.flows_from_other_ps,
        flows_to_other_ps: current.flows_to_other_ps,
        measures: current.measures,
        ..desired
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used)]

    use auxo_sdk::{Flow, MeasureState};

    use super::*;

    fn current() -> ProtectSurface {
        let mut ps = ProtectSurface {
            id: "ps-1".to_owned(),
            uniqueness_key: "web-uk".to_owned(),
            name: "web".to_owned(),
            relevance: 40,
            ..ProtectSurface::default()
        };
        ps.measures.insert("encryption".to_owned(), MeasureState::default());
        ps.flows_to_other_ps.insert("ps-2".to_owned(), Flow::new(true));
        ps
    }

    #[test]
    fn keeps_measures_and_flows_while_updating_core_fields() {
        let desired = ProtectSurface {
            name: "web-renamed".to_owned(),
            relevance: 80,
            ..ProtectSurface::default()
        };
        let merged = overlay_core_attributes(current(), desired).unwrap();

        assert_eq!(merged.id, "ps-1");
        assert_eq!(merged.uniqueness_key, "web-uk");
        assert_eq!(merged.name, "web-renamed");
        assert_eq!(merged.relevance, 80);
        assert!(merged.measures.contains_key("encryption"));
        assert_eq!(merged.flows_to_other_ps["ps-2"], Flow::new(true));
    }

    #[test]
    fn changing_the_uniqueness_key_is_rejected() {
        let desired = ProtectSurface {
            uniqueness_key: "other".to_owned(),
            ..ProtectSurface::default()
        };
        let err = overlay_core_attributes(current(), desired).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "uniqueness_key"));
    }

    #[test]
    fn uniqueness_key_can_be_set_once() {
        let mut unkeyed = current();
        unkeyed.uniqueness_key.clear();
        let desired = ProtectSurface {
            uniqueness_key: "fresh".to_owned(),
            ..ProtectSurface::default()
        };
        let merged = overlay_core_attributes(unkeyed, desired).unwrap();
        assert_eq!(merged.uniqueness_key, "fresh");
    }
}
