//! Reconciliation of the `measures` map of a protect surface.

use std::collections::BTreeMap;

use auxo_sdk::{
    Assignment, Evidence, Implementation, MeasureCatalog, MeasureState, ProtectSurface,
    RiskAcceptance,
};

use super::error::DomainError;

/// One boolean determination (assigned, implemented or evidenced).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Determination {
    pub value: bool,
    pub by: String,
    /// `None` when unset or not yet known; stamped on write.
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredRiskAcceptance {
    pub no_implementation_accepted: bool,
    pub no_evidence_accepted: bool,
    pub comment: String,
    pub by: String,
    pub timestamp: Option<i64>,
}

/// Desired state of one measure. A `None` category expresses no opinion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredMeasure {
    pub assignment: Option<Determination>,
    pub implementation: Option<Determination>,
    pub evidence: Option<Determination>,
    pub risk_acceptance: Option<DesiredRiskAcceptance>,
}

pub type DesiredMeasures = BTreeMap<String, DesiredMeasure>;

/// Rejects the first measure name missing from `catalog`.
///
/// # Errors
///
/// `Validation` naming the unknown measure and listing the available ones.
pub fn validate_measure_names(
    desired: &DesiredMeasures,
    catalog: &MeasureCatalog,
) -> Result<(), DomainError> {
    match desired.keys().find(|name| !catalog.contains(name)) {
        Some(unknown) => {
            let available = catalog.names().into_iter().collect::<Vec<_>>().join(",");
            Err(DomainError::validation(
                "measures",
                format!("Measure [{unknown}] does not exist, available measures [{available}]"),
            ))
        }
        None => Ok(()),
    }
}

/// Replaces the measures of `ps` with `desired`, stamping missing timestamps
/// with `now` (Unix seconds).
///
/// Measures absent from `desired` are dropped.
///
/// # Errors
///
/// `Validation` when a measure name is not in the catalog.
pub fn reconcile_measures(
    mut ps: ProtectSurface,
    desired: &DesiredMeasures,
    catalog: &MeasureCatalog,
    now: i64,
) -> Result<ProtectSurface, DomainError> {
    validate_measure_names(desired, catalog)?;
    ps.measures = desired
        .iter()
        .map(|(name, m)| (name.clone(), measure_state(m, now)))
        .collect();
    Ok(ps)
}

/// Drops every measure from `ps`.
#[must_use]
pub fn clear_measures(mut ps: ProtectSurface) -> ProtectSurface {
    ps.measures.clear();
    ps
}

fn measure_state(m: &DesiredMeasure, now: i64) -> MeasureState {
    MeasureState {
        assignment: m.assignment.as_ref().map(|d| Assignment {
            assigned: d.value,
            last_determined_by_person_id: d.by.clone(),
            last_determined_timestamp: d.timestamp.unwrap_or(now),
        }),
        implementation: m.implementation.as_ref().map(|d| Implementation {
            implemented: d.value,
            last_determined_by_person_id: d.by.clone(),
            last_determined_timestamp: d.timestamp.unwrap_or(now),
        }),
        evidence: m.evidence.as_ref().map(|d| Evidence {
            evidenced: d.value,
            last_determined_by_person_id: d.by.clone(),
            last_determined_timestamp: d.timestamp.unwrap_or(now),
        }),
        risk_acceptance: m.risk_acceptance.as_ref().map(|r| RiskAcceptance {
            risk_no_implementation_accepted: r.no_implementation_accepted,
            risk_no_evidence_accepted: r.no_evidence_accepted,
            risk_accepted_comment: r.comment.clone(),
            last_determined_by_person_id: r.by.clone(),
            last_determined_timestamp: r.timestamp.unwrap_or(now),
        }),
    }
}
