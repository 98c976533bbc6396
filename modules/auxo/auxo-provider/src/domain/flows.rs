//! Transaction flow sets and their protect-surface representation.

use std::collections::{BTreeMap, BTreeSet};

use auxo_sdk::{Flow, ProtectSurface};

use super::error::{DomainError, FlowDirection};

/// Peer protect surfaces partitioned by direction and allow/block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowSets {
    pub incoming_allow: BTreeSet<String>,
    pub incoming_block: BTreeSet<String>,
    pub outgoing_allow: BTreeSet<String>,
    pub outgoing_block: BTreeSet<String>,
}

impl FlowSets {
    /// Fails on the first peer listed as both allowed and blocked in one direction.
    ///
    /// # Errors
    ///
    /// `Conflict` naming the peer and the direction.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(peer) = self.incoming_allow.intersection(&self.incoming_block).next() {
            return Err(DomainError::conflict(peer.clone(), FlowDirection::Incoming));
        }
        if let Some(peer) = self.outgoing_allow.intersection(&self.outgoing_block).next() {
            return Err(DomainError::conflict(peer.clone(), FlowDirection::Outgoing));
        }
        Ok(())
    }

    /// Replaces both peer flow maps of `ps`.
    ///
    /// # Errors
    ///
    /// `Conflict` when a peer is both allowed and blocked.
    pub fn apply_to(&self, mut ps: ProtectSurface) -> Result<ProtectSurface, DomainError> {
        self.validate()?;
        ps.flows_from_other_ps = flow_map(&self.incoming_allow, &self.incoming_block);
        ps.flows_to_other_ps = flow_map(&self.outgoing_allow, &self.outgoing_block);
        Ok(ps)
    }

    /// Partitions the peer flow maps of `ps`.
    #[must_use]
    pub fn from_protect_surface(ps: &ProtectSurface) -> Self {
        let (incoming_allow, incoming_block) = partition(&ps.flows_from_other_ps);
        let (outgoing_allow, outgoing_block) = partition(&ps.flows_to_other_ps);
        Self {
            incoming_allow,
            incoming_block,
            outgoing_allow,
            outgoing_block,
        }
    }
}

/// Drops every peer flow from `ps`.
#[must_use]
pub fn clear_flows(mut ps: ProtectSurface) -> ProtectSurface {
    ps.flows_from_other_ps.clear();
    ps.flows_to_other_ps.clear();
    ps
}

fn flow_map(allow: &BTreeSet<String>, block: &BTreeSet<String>) -> BTreeMap<String, Flow> {
    allow
        .iter()
        .map(|id| (id.clone(), Flow::new(true)))
        .chain(block.iter().map(|id| (id.clone(), Flow::new(false))))
        .collect()
}

fn partition(flows: &BTreeMap<String, Flow>) -> (BTreeSet<String>, BTreeSet<String>) {
    let (allow, block): (Vec<_>, Vec<_>) = flows.iter().partition(|(_, f)| f.allow);
    (
        allow.into_iter().map(|(id, _)| id.clone()).collect(),
        block.into_iter().map(|(id, _)| id.clone()).collect(),
    )
}
