//! Collaborator interfaces the commander consumes
//!
//! Placement legality, worker balancing, expansion site search and
//! exploration targets belong to the surrounding runtime. They are injected
//! into the commander at construction as trait objects.

use crate::core::types::{EntityId, UnitKind, Vec2};
use crate::world::command::CommandBatch;
use crate::world::snapshot::{Entity, WorldSnapshot};

/// Geometric feasibility of placing a structure (or addon) at a point
pub trait PlacementValidator {
    fn validate(
        &self,
        snapshot: &WorldSnapshot,
        structure: UnitKind,
        at: Vec2,
        builder: EntityId,
    ) -> bool;
}

/// Resource node lookup for idle harvesters
pub trait ResourceLocator {
    fn nearest_unclaimed(&self, snapshot: &WorldSnapshot, from: Vec2) -> Option<EntityId>;
}

/// Routine worker-to-resource-site balancing
pub trait WorkerBalancer {
    /// Emit whatever rebalancing commands are needed this tick
    fn balance(&mut self, snapshot: &WorldSnapshot, commands: &mut CommandBatch);

    /// Ideal harvester count for the owned bases and gas sites
    fn expected_workers(&self, snapshot: &WorldSnapshot) -> usize;
}

/// Picks the next base location
pub trait ExpansionPlanner {
    fn next_expansion(&self, snapshot: &WorldSnapshot) -> Option<Vec2>;
}

/// Picks an unexplored or far pathable point for a scout
pub trait ScoutPlanner {
    fn scout_toward_unexplored(&mut self, snapshot: &WorldSnapshot, unit: &Entity) -> Option<Vec2>;
}

/// Nearest mineral field by squared distance
///
/// Ties keep the earlier field in roster order, so repeated queries against
/// the same snapshot return the same node.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestMineralField;

impl ResourceLocator for NearestMineralField {
    fn nearest_unclaimed(&self, snapshot: &WorldSnapshot, from: Vec2) -> Option<EntityId> {
        let mut best: Option<(f32, EntityId)> = None;
        for field in snapshot
            .neutral()
            .filter(|e| e.kind == UnitKind::MineralField)
        {
            let d = field.position.distance_squared(&from);
            if best.map_or(true, |(best_d, _)| d < best_d) {
                best = Some((d, field.id));
            }
        }
        best.map(|(_, id)| id)
    }
}

/// Bundle of collaborators handed to the commander
pub struct Services {
    pub placement: Box<dyn PlacementValidator>,
    pub resources: Box<dyn ResourceLocator>,
    pub balancer: Box<dyn WorkerBalancer>,
    pub expansions: Box<dyn ExpansionPlanner>,
    pub scouting: Box<dyn ScoutPlanner>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Alliance;

    fn field(id: u64, x: f32, y: f32) -> Entity {
        Entity::new(EntityId(id), UnitKind::MineralField, Vec2::new(x, y), Alliance::Neutral)
    }

    #[test]
    fn test_nearest_mineral_field() {
        let mut snapshot = WorldSnapshot::new(100.0, 100.0);
        snapshot.entities.push(field(1, 30.0, 30.0));
        snapshot.entities.push(field(2, 12.0, 10.0));
        snapshot.entities.push(Entity::new(
            EntityId(3),
            UnitKind::VespeneGeyser,
            Vec2::new(10.0, 10.0),
            Alliance::Neutral,
        ));

        let found = NearestMineralField.nearest_unclaimed(&snapshot, Vec2::new(10.0, 10.0));
        assert_eq!(found, Some(EntityId(2)));
    }

    #[test]
    fn test_tie_keeps_roster_order() {
        let mut snapshot = WorldSnapshot::new(100.0, 100.0);
        snapshot.entities.push(field(7, 12.0, 10.0));
        snapshot.entities.push(field(8, 8.0, 10.0));

        let found = NearestMineralField.nearest_unclaimed(&snapshot, Vec2::new(10.0, 10.0));
        assert_eq!(found, Some(EntityId(7)));
    }

    #[test]
    fn test_no_fields() {
        let snapshot = WorldSnapshot::new(100.0, 100.0);
        assert!(NearestMineralField
            .nearest_unclaimed(&snapshot, Vec2::default())
            .is_none());
    }
}
