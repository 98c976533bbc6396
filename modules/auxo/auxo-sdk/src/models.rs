//! Wire models of the AUXO API.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

/// Decodes `null` as `T::default()`.
///
/// The backend encodes empty maps and lists as `null`; pair with
/// `#[serde(default)]` so a missing key is accepted as well.
///
/// # Errors
///
/// Whatever `T` fails to decode with.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Allow/block marker of a transaction flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub allow: bool,
}

impl Flow {
    #[must_use]
    pub const fn new(allow: bool) -> Self {
        Self { allow }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Maturity {
    pub step1: i64,
    pub step2: i64,
    pub step3: i64,
    pub step4: i64,
    pub step5: i64,
}

impl Default for Maturity {
    fn default() -> Self {
        Self {
            step1: 1,
            step2: 1,
            step3: 1,
            step4: 1,
            step5: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assignment {
    pub assigned: bool,
    pub last_determined_by_person_id: String,
    pub last_determined_timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Implementation {
    pub implemented: bool,
    pub last_determined_by_person_id: String,
    pub last_determined_timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evidence {
    pub evidenced: bool,
    pub last_determined_by_person_id: String,
    pub last_determined_timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAcceptance {
    pub risk_no_implementation_accepted: bool,
    pub risk_no_evidence_accepted: bool,
    pub risk_accepted_comment: String,
    pub last_determined_by_person_id: String,
    pub last_determined_timestamp: i64,
}

/// State of one measure on a protect surface. `None` means "no opinion".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<Implementation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_acceptance: Option<RiskAcceptance>,
}

/// The protect surface aggregate.
///
/// `measures` and the two peer flow maps are managed by their own resources;
/// every write submits the whole aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectSurface {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uniqueness_key: String,
    pub name: String,
    pub description: String,
    pub main_contact_person_id: String,
    pub security_contact_person_id: String,
    pub in_control_boundary: bool,
    pub in_zero_trust_focus: bool,
    pub relevance: i64,
    pub confidentiality: i64,
    pub integrity: i64,
    pub availability: i64,
    pub data_tags: Option<BTreeSet<String>>,
    pub compliance_tags: Option<BTreeSet<String>>,
    pub customer_labels: Option<BTreeMap<String, String>>,
    pub soc_tags: Option<BTreeSet<String>>,
    pub flows_from_outside: Flow,
    pub flows_to_outside: Flow,
    #[serde(deserialize_with = "null_as_default")]
    pub flows_from_other_ps: BTreeMap<String, Flow>,
    #[serde(deserialize_with = "null_as_default")]
    pub flows_to_other_ps: BTreeMap<String, Flow>,
    #[serde(deserialize_with = "null_as_default")]
    pub measures: BTreeMap<String, MeasureState>,
    pub maturity: Maturity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coords {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uniqueness_key: String,
    pub name: String,
    pub coords: Coords,
}

/// A state of a protect surface at a location (e.g. a set of CIDRs).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uniqueness_key: String,
    pub description: String,
    pub protectsurface: String,
    pub location: String,
    pub content_type: String,
    pub exists_on_asset_ids: Option<BTreeSet<String>>,
    pub maintainer: String,
    pub content: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogMeasure {
    pub name: String,
    pub caption: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureGroup {
    pub name: String,
    pub caption: String,
    #[serde(deserialize_with = "null_as_default")]
    pub measures: Vec<CatalogMeasure>,
}

/// The catalog of measures a protect surface can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureCatalog {
    #[serde(deserialize_with = "null_as_default")]
    pub groups: Vec<MeasureGroup>,
}

impl MeasureCatalog {
    /// A single-group catalog holding `names`.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: vec![MeasureGroup {
                name: "default".to_owned(),
                caption: String::new(),
                measures: names
                    .into_iter()
                    .map(|n| CatalogMeasure {
                        name: n.into(),
                        caption: String::new(),
                    })
                    .collect(),
            }],
        }
    }

    /// All measure names across groups, sorted and deduplicated.
    #[must_use]
    pub fn names(&self) -> BTreeSet<&str> {
        self.groups
            .iter()
            .flat_map(|g| g.measures.iter().map(|m| m.name.as_str()))
            .collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.groups
            .iter()
            .any(|g| g.measures.iter().any(|m| m.name == name))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_names_span_groups() {
        let catalog: MeasureCatalog = serde_json::from_value(json!({
            "groups": [
                {"name": "g1", "caption": "G1", "measures": [{"name": "logging", "caption": ""}]},
                {"name": "g2", "caption": "G2", "measures": [{"name": "encryption", "caption": ""}]}
            ]
        }))
        .unwrap();

        assert_eq!(catalog.names().into_iter().collect::<Vec<_>>(), vec!["encryption", "logging"]);
        assert!(catalog.contains("logging"));
        assert!(!catalog.contains("firewall"));
    }

    #[test]
    fn protect_surface_tolerates_missing_fields() {
        let ps: ProtectSurface = serde_json::from_value(json!({"id": "ps-1", "name": "web"})).unwrap();
        assert_eq!(ps.id, "ps-1");
        assert!(ps.measures.is_empty());
        assert!(ps.data_tags.is_none());
        assert_eq!(ps.maturity, Maturity::default());
    }

    #[test]
    fn null_collections_decode_as_empty() {
        let ps: ProtectSurface = serde_json::from_value(json!({
            "id": "ps-1",
            "name": "web",
            "measures": null,
            "flows_from_other_ps": null,
            "flows_to_other_ps": null,
            "data_tags": null,
        }))
        .unwrap();
        assert!(ps.measures.is_empty());
        assert!(ps.flows_from_other_ps.is_empty());
        assert!(ps.flows_to_other_ps.is_empty());
        assert!(ps.data_tags.is_none());

        let catalog: MeasureCatalog = serde_json::from_value(json!({
            "groups": [{"name": "g1", "caption": "", "measures": null}]
        }))
        .unwrap();
        assert!(catalog.names().is_empty());
        let empty: MeasureCatalog = serde_json::from_value(json!({"groups": null})).unwrap();
        assert!(empty.groups.is_empty());
    }

    #[test]
    fn null_collections_still_reject_wrong_types() {
        let r: Result<ProtectSurface, _> = serde_json::from_value(json!({"measures": ["encryption"]}));
        assert!(r.is_err());
    }

    #[test]
    fn absent_measure_categories_are_omitted_on_the_wire() {
        let state = MeasureState {
            assignment: Some(Assignment {
                assigned: true,
                last_determined_by_person_id: "alice".to_owned(),
                last_determined_timestamp: 10,
            }),
            ..MeasureState::default()
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({"assignment": {"assigned": true, "last_determined_by_person_id": "alice", "last_determined_timestamp": 10}})
        );
    }
}
