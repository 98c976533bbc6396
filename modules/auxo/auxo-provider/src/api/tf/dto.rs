//! Plan/state models.
//!
//! Every attribute is an [`AttrValue`] so that unset, unknown and concrete
//! values survive the round trip through the provider unchanged.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tfkit::AttrValue;

/// `auxo_protectsurface` resource and data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectSurfaceDto {
    pub id: AttrValue<String>,
    pub uniqueness_key: AttrValue<String>,
    pub name: AttrValue<String>,
    pub description: AttrValue<String>,
    pub main_contact: AttrValue<String>,
    pub security_contact: AttrValue<String>,
    pub in_control_boundary: AttrValue<bool>,
    pub in_zero_trust_focus: AttrValue<bool>,
    pub relevance: AttrValue<i64>,
    pub confidentiality: AttrValue<i64>,
    pub integrity: AttrValue<i64>,
    pub availability: AttrValue<i64>,
    pub data_tags: AttrValue<BTreeSet<String>>,
    pub compliance_tags: AttrValue<BTreeSet<String>>,
    pub customer_labels: AttrValue<BTreeMap<String, String>>,
    pub soc_tags: AttrValue<BTreeSet<String>>,
    pub allow_flows_from_outside: AttrValue<bool>,
    pub allow_flows_to_outside: AttrValue<bool>,
    pub maturity_step1: AttrValue<i64>,
    pub maturity_step2: AttrValue<i64>,
    pub maturity_step3: AttrValue<i64>,
    pub maturity_step4: AttrValue<i64>,
    pub maturity_step5: AttrValue<i64>,
}

/// `auxo_location` resource and data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationDto {
    pub id: AttrValue<String>,
    pub uniqueness_key: AttrValue<String>,
    pub name: AttrValue<String>,
    pub latitude: AttrValue<f64>,
    pub longitude: AttrValue<f64>,
}

/// `auxo_state` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDto {
    pub id: AttrValue<String>,
    pub uniqueness_key: AttrValue<String>,
    pub description: AttrValue<String>,
    pub protectsurface_id: AttrValue<String>,
    pub location_id: AttrValue<String>,
    pub content_type: AttrValue<String>,
    pub exists_on_assets: AttrValue<BTreeSet<String>>,
    pub maintainer: AttrValue<String>,
    pub content: AttrValue<BTreeSet<String>>,
}

/// One entry of the `measures` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureDto {
    pub assigned: AttrValue<bool>,
    pub assigned_by: AttrValue<String>,
    pub assigned_timestamp: AttrValue<i64>,
    pub implemented: AttrValue<bool>,
    pub implemented_by: AttrValue<String>,
    pub implemented_timestamp: AttrValue<i64>,
    pub evidenced: AttrValue<bool>,
    pub evidenced_by: AttrValue<String>,
    pub evidenced_timestamp: AttrValue<i64>,
    pub risk_no_implementation_accepted: AttrValue<bool>,
    pub risk_no_evidence_accepted: AttrValue<bool>,
    pub risk_accepted_comment: AttrValue<String>,
    pub risk_acceptance_by: AttrValue<String>,
    pub risk_acceptance_timestamp: AttrValue<i64>,
}

/// `auxo_measure` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureResourceDto {
    pub protectsurface: AttrValue<String>,
    pub measures: AttrValue<BTreeMap<String, MeasureDto>>,
}

/// `auxo_transactionflow` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionFlowDto {
    pub protectsurface: AttrValue<String>,
    pub incoming_protectsurfaces_allow: AttrValue<BTreeSet<String>>,
    pub incoming_protectsurfaces_block: AttrValue<BTreeSet<String>>,
    pub outgoing_protectsurfaces_allow: AttrValue<BTreeSet<String>>,
    pub outgoing_protectsurfaces_block: AttrValue<BTreeSet<String>>,
}

/// `auxo_contact` data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDto {
    pub id: AttrValue<String>,
    pub email: AttrValue<String>,
}

/// `auxo_asset` data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetDto {
    pub id: AttrValue<String>,
    pub name: AttrValue<String>,
}
