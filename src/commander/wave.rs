//! Attack waves: units accumulated until a target composition is met

use std::collections::BTreeMap;

use crate::core::config::WaveSlot;
use crate::core::types::{EntityId, UnitKind};

/// A wave being filled
///
/// The per-type member count never exceeds the target. Once every target is
/// met the wave is full and ready to be committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wave {
    target: BTreeMap<UnitKind, usize>,
    members: Vec<(EntityId, UnitKind)>,
}

impl Wave {
    pub fn new(target: BTreeMap<UnitKind, usize>) -> Self {
        Self {
            target,
            members: Vec::new(),
        }
    }

    /// Build a wave from configured slots; repeated kinds add up
    pub fn from_slots(slots: &[WaveSlot]) -> Self {
        let mut target = BTreeMap::new();
        for slot in slots.iter().filter(|s| s.count > 0) {
            *target.entry(slot.unit).or_insert(0) += slot.count;
        }
        Self::new(target)
    }

    /// An empty wave with the same target composition
    pub fn successor(&self) -> Self {
        Self::new(self.target.clone())
    }

    pub fn target(&self) -> &BTreeMap<UnitKind, usize> {
        &self.target
    }

    pub fn count(&self, kind: UnitKind) -> usize {
        self.members.iter().filter(|(_, k)| *k == kind).count()
    }

    /// Add a unit if its kind is wanted and not yet filled
    pub fn try_add(&mut self, id: EntityId, kind: UnitKind) -> bool {
        let Some(&wanted) = self.target.get(&kind) else {
            return false;
        };
        if self.contains(id) || self.count(kind) >= wanted {
            return false;
        }
        self.members.push((id, kind));
        true
    }

    /// Forget a destroyed unit, freeing its slot
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.members.len();
        self.members.retain(|(member, _)| *member != id);
        self.members.len() != before
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.iter().any(|(member, _)| *member == id)
    }

    /// True once every target count is met
    pub fn is_full(&self) -> bool {
        !self.target.is_empty()
            && self
                .target
                .iter()
                .all(|(kind, wanted)| self.count(*kind) == *wanted)
    }

    /// Member ids in join order
    pub fn members(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
