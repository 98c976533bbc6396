//! Translation between plan/state models and AUXO objects.
//!
//! Collections the user never configured stay unset after a read, even when
//! the backend reports them as empty.

use std::collections::{BTreeMap, BTreeSet};

use auxo_sdk::{Asset, Contact, Coords, Flow, Location, Maturity, MeasureState, ProtectSurface, State};
use tfkit::{AttrValue, collection_from_remote};

use crate::api::tf::dto::{
    AssetDto, ContactDto, LocationDto, MeasureDto, ProtectSurfaceDto, StateDto, TransactionFlowDto,
};
use crate::domain::{DesiredMeasure, DesiredMeasures, DesiredRiskAcceptance, Determination, FlowSets};

fn non_empty_set<T: Ord>(value: AttrValue<BTreeSet<T>>) -> Option<BTreeSet<T>> {
    value.into_option().filter(|s| !s.is_empty())
}

// =========================================================================
// Protect surface
// =========================================================================

/// Desired aggregate from a plan. Measures and peer flows are left empty.
#[must_use]
pub fn protect_surface_from_dto(dto: &ProtectSurfaceDto) -> ProtectSurface {
    let defaults = Maturity::default();
    ProtectSurface {
        id: dto.id.clone().value_or_default(),
        uniqueness_key: dto.uniqueness_key.clone().value_or_default(),
        name: dto.name.clone().value_or_default(),
        description: dto.description.clone().value_or_default(),
        main_contact_person_id: dto.main_contact.clone().value_or_default(),
        security_contact_person_id: dto.security_contact.clone().value_or_default(),
        in_control_boundary: dto.in_control_boundary.clone().value_or_default(),
        in_zero_trust_focus: dto.in_zero_trust_focus.clone().value_or_default(),
        relevance: dto.relevance.clone().value_or_default(),
        confidentiality: dto.confidentiality.clone().value_or(1),
        integrity: dto.integrity.clone().value_or(1),
        availability: dto.availability.clone().value_or(1),
        data_tags: non_empty_set(dto.data_tags.clone()),
        compliance_tags: non_empty_set(dto.compliance_tags.clone()),
        customer_labels: dto.customer_labels.clone().into_option().filter(|m| !m.is_empty()),
        soc_tags: non_empty_set(dto.soc_tags.clone()),
        flows_from_outside: Flow::new(dto.allow_flows_from_outside.clone().value_or_default()),
        flows_to_outside: Flow::new(dto.allow_flows_to_outside.clone().value_or_default()),
        flows_from_other_ps: BTreeMap::new(),
        flows_to_other_ps: BTreeMap::new(),
        measures: BTreeMap::new(),
        maturity: Maturity {
            step1: dto.maturity_step1.clone().value_or(defaults.step1),
            step2: dto.maturity_step2.clone().value_or(defaults.step2),
            step3: dto.maturity_step3.clone().value_or(defaults.step3),
            step4: dto.maturity_step4.clone().value_or(defaults.step4),
            step5: dto.maturity_step5.clone().value_or(defaults.step5),
        },
    }
}

/// State from the remote aggregate; `prior` decides how empty collections read back.
#[must_use]
pub fn protect_surface_to_dto(prior: &ProtectSurfaceDto, ps: &ProtectSurface) -> ProtectSurfaceDto {
    ProtectSurfaceDto {
        id: ps.id.clone().into(),
        uniqueness_key: ps.uniqueness_key.clone().into(),
        name: ps.name.clone().into(),
        description: ps.description.clone().into(),
        main_contact: ps.main_contact_person_id.clone().into(),
        security_contact: ps.security_contact_person_id.clone().into(),
        in_control_boundary: ps.in_control_boundary.into(),
        in_zero_trust_focus: ps.in_zero_trust_focus.into(),
        relevance: ps.relevance.into(),
        confidentiality: ps.confidentiality.into(),
        integrity: ps.integrity.into(),
        availability: ps.availability.into(),
        data_tags: collection_from_remote(&prior.data_tags, ps.data_tags.clone()),
        compliance_tags: collection_from_remote(&prior.compliance_tags, ps.compliance_tags.clone()),
        customer_labels: collection_from_remote(&prior.customer_labels, ps.customer_labels.clone()),
        soc_tags: collection_from_remote(&prior.soc_tags, ps.soc_tags.clone()),
        allow_flows_from_outside: ps.flows_from_outside.allow.into(),
        allow_flows_to_outside: ps.flows_to_outside.allow.into(),
        maturity_step1: ps.maturity.step1.into(),
        maturity_step2: ps.maturity.step2.into(),
        maturity_step3: ps.maturity.step3.into(),
        maturity_step4: ps.maturity.step4.into(),
        maturity_step5: ps.maturity.step5.into(),
    }
}

// =========================================================================
// Location
// =========================================================================

#[must_use]
pub fn location_from_dto(dto: &LocationDto) -> Location {
    Location {
        id: dto.id.clone().value_or_default(),
        uniqueness_key: dto.uniqueness_key.clone().value_or_default(),
        name: dto.name.clone().value_or_default(),
        coords: Coords {
            latitude: dto.latitude.clone().value_or_default(),
            longitude: dto.longitude.clone().value_or_default(),
        },
    }
}

#[must_use]
pub fn location_to_dto(location: &Location) -> LocationDto {
    LocationDto {
        id: location.id.clone().into(),
        uniqueness_key: location.uniqueness_key.clone().into(),
        name: location.name.clone().into(),
        latitude: location.coords.latitude.into(),
        longitude: location.coords.longitude.into(),
    }
}

// =========================================================================
// State
// =========================================================================

#[must_use]
pub fn state_from_dto(dto: &StateDto) -> State {
    State {
        id: dto.id.clone().value_or_default(),
        uniqueness_key: dto.uniqueness_key.clone().value_or_default(),
        description: dto.description.clone().value_or_default(),
        protectsurface: dto.protectsurface_id.clone().value_or_default(),
        location: dto.location_id.clone().value_or_default(),
        content_type: dto.content_type.clone().value_or_default(),
        exists_on_asset_ids: non_empty_set(dto.exists_on_assets.clone()),
        maintainer: dto.maintainer.clone().value_or_default(),
        content: dto.content.clone().into_option(),
    }
}

#[must_use]
pub fn state_to_dto(prior: &StateDto, state: &State) -> StateDto {
    StateDto {
        id: state.id.clone().into(),
        uniqueness_key: state.uniqueness_key.clone().into(),
        description: state.description.clone().into(),
        protectsurface_id: state.protectsurface.clone().into(),
        location_id: state.location.clone().into(),
        content_type: state.content_type.clone().into(),
        exists_on_assets: collection_from_remote(&prior.exists_on_assets, state.exists_on_asset_ids.clone()),
        maintainer: state.maintainer.clone().into(),
        content: AttrValue::Value(state.content.clone().unwrap_or_default()),
    }
}

// =========================================================================
// Measures
// =========================================================================

fn determination(value: &AttrValue<bool>, by: &AttrValue<String>, timestamp: &AttrValue<i64>) -> Option<Determination> {
    if value.is_unset() {
        return None;
    }
    Some(Determination {
        value: value.clone().value_or_default(),
        by: by.clone().value_or_default(),
        timestamp: timestamp.as_value().copied(),
    })
}

/// Present when some value field is not null and some value field is not
/// unknown; the two need not be the same field.
fn risk_acceptance(dto: &MeasureDto) -> Option<DesiredRiskAcceptance> {
    let fields = [
        (
            dto.risk_no_implementation_accepted.is_unset(),
            dto.risk_no_implementation_accepted.is_computed(),
        ),
        (dto.risk_no_evidence_accepted.is_unset(), dto.risk_no_evidence_accepted.is_computed()),
        (dto.risk_accepted_comment.is_unset(), dto.risk_accepted_comment.is_computed()),
    ];
    let any_not_null = fields.iter().any(|(unset, _)| !unset);
    let any_not_unknown = fields.iter().any(|(_, computed)| !computed);
    (any_not_null && any_not_unknown).then(|| DesiredRiskAcceptance {
        no_implementation_accepted: dto.risk_no_implementation_accepted.clone().value_or_default(),
        no_evidence_accepted: dto.risk_no_evidence_accepted.clone().value_or_default(),
        comment: dto.risk_accepted_comment.clone().value_or_default(),
        by: dto.risk_acceptance_by.clone().value_or_default(),
        timestamp: dto.risk_acceptance_timestamp.as_value().copied(),
    })
}

/// Desired measures from the `measures` attribute.
///
/// A category is present when its value attribute is configured; see
/// `risk_acceptance` for the rule across its three value attributes.
#[must_use]
pub fn desired_measures_from_dto(measures: &BTreeMap<String, MeasureDto>) -> DesiredMeasures {
    measures
        .iter()
        .map(|(name, dto)| {
            let desired = DesiredMeasure {
                assignment: determination(&dto.assigned, &dto.assigned_by, &dto.assigned_timestamp),
                implementation: determination(
                    &dto.implemented,
                    &dto.implemented_by,
                    &dto.implemented_timestamp,
                ),
                evidence: determination(&dto.evidenced, &dto.evidenced_by, &dto.evidenced_timestamp),
                risk_acceptance: risk_acceptance(dto),
            };
            (name.clone(), desired)
        })
        .collect()
}

/// State entry for one remote measure; absent categories read back unset.
#[must_use]
pub fn measure_to_dto(state: &MeasureState) -> MeasureDto {
    let mut dto = MeasureDto::default();
    if let Some(a) = &state.assignment {
        dto.assigned = a.assigned.into();
        dto.assigned_by = a.last_determined_by_person_id.clone().into();
        dto.assigned_timestamp = a.last_determined_timestamp.into();
    }
    if let Some(i) = &state.implementation {
        dto.implemented = i.implemented.into();
        dto.implemented_by = i.last_determined_by_person_id.clone().into();
        dto.implemented_timestamp = i.last_determined_timestamp.into();
    }
    if let Some(e) = &state.evidence {
        dto.evidenced = e.evidenced.into();
        dto.evidenced_by = e.last_determined_by_person_id.clone().into();
        dto.evidenced_timestamp = e.last_determined_timestamp.into();
    }
    if let Some(r) = &state.risk_acceptance {
        dto.risk_no_implementation_accepted = r.risk_no_implementation_accepted.into();
        dto.risk_no_evidence_accepted = r.risk_no_evidence_accepted.into();
        dto.risk_accepted_comment = r.risk_accepted_comment.clone().into();
        dto.risk_acceptance_by = r.last_determined_by_person_id.clone().into();
        dto.risk_acceptance_timestamp = r.last_determined_timestamp.into();
    }
    dto
}

#[must_use]
pub fn measures_to_dto(
    prior: &AttrValue<BTreeMap<String, MeasureDto>>,
    remote: &BTreeMap<String, MeasureState>,
) -> AttrValue<BTreeMap<String, MeasureDto>> {
    let mapped = remote
        .iter()
        .map(|(name, state)| (name.clone(), measure_to_dto(state)))
        .collect();
    collection_from_remote(prior, Some(mapped))
}

// =========================================================================
// Transaction flows
// =========================================================================

#[must_use]
pub fn flow_sets_from_dto(dto: &TransactionFlowDto) -> FlowSets {
    FlowSets {
        incoming_allow: dto.incoming_protectsurfaces_allow.clone().value_or_default(),
        incoming_block: dto.incoming_protectsurfaces_block.clone().value_or_default(),
        outgoing_allow: dto.outgoing_protectsurfaces_allow.clone().value_or_default(),
        outgoing_block: dto.outgoing_protectsurfaces_block.clone().value_or_default(),
    }
}

#[must_use]
pub fn flow_sets_to_dto(prior: &TransactionFlowDto, ps: &ProtectSurface) -> TransactionFlowDto {
    let flows = FlowSets::from_protect_surface(ps);
    TransactionFlowDto {
        protectsurface: ps.id.clone().into(),
        incoming_protectsurfaces_allow: collection_from_remote(
            &prior.incoming_protectsurfaces_allow,
            Some(flows.incoming_allow),
        ),
        incoming_protectsurfaces_block: collection_from_remote(
            &prior.incoming_protectsurfaces_block,
            Some(flows.incoming_block),
        ),
        outgoing_protectsurfaces_allow: collection_from_remote(
            &prior.outgoing_protectsurfaces_allow,
            Some(flows.outgoing_allow),
        ),
        outgoing_protectsurfaces_block: collection_from_remote(
            &prior.outgoing_protectsurfaces_block,
            Some(flows.outgoing_block),
        ),
    }
}

// =========================================================================
// Lookups
// =========================================================================

#[must_use]
pub fn contact_to_dto(contact: &Contact) -> ContactDto {
    ContactDto {
        id: contact.id.clone().into(),
        email: contact.email.clone().into(),
    }
}

#[must_use]
pub fn asset_to_dto(asset: &Asset) -> AssetDto {
    AssetDto {
        id: asset.id.clone().into(),
        name: asset.name.clone().into(),
    }
}
