//! Read-only view of the game handed to the commander every tick

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{Alliance, EntityId, UnitKind, Vec2};

/// One entity in the snapshot roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: UnitKind,
    pub position: Vec2,
    pub alliance: Alliance,
    /// True when the entity has no queued orders
    pub orders_empty: bool,
    /// Construction progress in [0, 1]; 1.0 for finished entities
    pub build_progress: f32,
    pub energy: f32,
}

impl Entity {
    pub fn new(id: EntityId, kind: UnitKind, position: Vec2, alliance: Alliance) -> Self {
        Self {
            id,
            kind,
            position,
            alliance,
            orders_empty: true,
            build_progress: 1.0,
            energy: 0.0,
        }
    }

    pub fn is_own(&self) -> bool {
        self.alliance == Alliance::Own
    }

    pub fn is_enemy(&self) -> bool {
        self.alliance == Alliance::Enemy
    }

    pub fn is_idle(&self) -> bool {
        self.orders_empty
    }

    pub fn is_complete(&self) -> bool {
        self.build_progress >= 1.0
    }
}

/// Snapshot of the world for a single tick
///
/// Produced by the external runtime; the commander never retains it past the
/// tick it was handed in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Primary currency
    pub minerals: u32,
    /// Secondary currency
    pub vespene: u32,
    pub supply_used: u32,
    pub supply_cap: u32,
    pub map_width: f32,
    pub map_height: f32,
    pub enemy_start_locations: Vec<Vec2>,
    pub entities: Vec<Entity>,
}

impl WorldSnapshot {
    pub fn new(map_width: f32, map_height: f32) -> Self {
        Self {
            map_width,
            map_height,
            ..Self::default()
        }
    }

    pub fn map_center(&self) -> Vec2 {
        Vec2::new(self.map_width / 2.0, self.map_height / 2.0)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Own entities in roster order
    pub fn own(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_own())
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_enemy())
    }

    pub fn neutral(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| e.alliance == Alliance::Neutral)
    }

    /// Own entities matching a predicate on their kind
    pub fn own_where<'a>(
        &'a self,
        pred: impl Fn(&UnitKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Entity> + 'a {
        self.own().filter(move |e| pred(&e.kind))
    }

    pub fn count_own(&self, pred: impl Fn(&UnitKind) -> bool) -> usize {
        self.own().filter(|e| pred(&e.kind)).count()
    }

    pub fn count_kind(&self, kind: UnitKind) -> usize {
        self.count_own(|k| *k == kind)
    }

    pub fn bases(&self) -> impl Iterator<Item = &Entity> {
        self.own_where(UnitKind::is_town_hall)
    }

    pub fn base_count(&self) -> usize {
        self.count_own(UnitKind::is_town_hall)
    }

    /// Marines plus marauders
    pub fn light_and_heavy_count(&self) -> usize {
        self.count_own(|k| k.is_light_combat() || k.is_heavy_combat())
    }

    /// Own structures (finished or not)
    pub fn structures(&self) -> impl Iterator<Item = &Entity> {
        self.own_where(UnitKind::is_structure)
    }

    /// Pick one own entity uniformly at random among those matching `criteria`
    ///
    /// Candidates are gathered in roster order so a seeded RNG gives a
    /// reproducible pick.
    pub fn random_unit<R: Rng + ?Sized>(
        &self,
        criteria: impl Fn(&Entity) -> bool,
        rng: &mut R,
    ) -> Option<&Entity> {
        let candidates: Vec<&Entity> = self.own().filter(|e| criteria(e)).collect();
        candidates.choose(rng).copied()
    }
}
