//! Reference collaborators for the sandbox world
//!
//! Simple geometric stand-ins for what a real game runtime provides. Good
//! enough to drive the commander through a whole match.

use ahash::AHashSet;

use crate::core::types::{EntityId, UnitKind, Vec2};
use crate::world::command::{Command, CommandBatch};
use crate::world::services::{ExpansionPlanner, PlacementValidator, ScoutPlanner, WorkerBalancer};
use crate::world::snapshot::{Entity, WorldSnapshot};

/// Where an addon sits relative to its parent structure
pub const ADDON_OFFSET: Vec2 = Vec2 { x: 3.0, y: 0.0 };

/// Harvesters per base and per refinery the balancer aims for
pub const WORKERS_PER_BASE: usize = 16;
pub const WORKERS_PER_REFINERY: usize = 3;

pub fn is_addon(kind: UnitKind) -> bool {
    matches!(
        kind,
        UnitKind::BarracksTechLab | UnitKind::BarracksReactor | UnitKind::FactoryTechLab
    )
}

/// Accepts any in-bounds point with nothing solid within a clearance radius
///
/// Refineries must sit on a free geyser instead. Addons are probed at their
/// slot next to the parent, with the parent itself ignored.
#[derive(Debug, Clone, Copy)]
pub struct OpenGroundPlacement {
    pub clearance: f32,
}

impl Default for OpenGroundPlacement {
    fn default() -> Self {
        Self { clearance: 4.0 }
    }
}

impl OpenGroundPlacement {
    fn in_bounds(snapshot: &WorldSnapshot, at: Vec2) -> bool {
        at.x >= 0.0 && at.y >= 0.0 && at.x <= snapshot.map_width && at.y <= snapshot.map_height
    }

    fn is_solid(entity: &Entity) -> bool {
        entity.kind.is_structure()
            || matches!(entity.kind, UnitKind::MineralField | UnitKind::VespeneGeyser)
    }
}

impl PlacementValidator for OpenGroundPlacement {
    fn validate(
        &self,
        snapshot: &WorldSnapshot,
        structure: UnitKind,
        at: Vec2,
        builder: EntityId,
    ) -> bool {
        if structure == UnitKind::Refinery {
            let on_geyser = snapshot
                .neutral()
                .any(|g| g.kind == UnitKind::VespeneGeyser && g.position.distance(&at) < 1.0);
            let taken = snapshot
                .entities
                .iter()
                .any(|e| e.kind == UnitKind::Refinery && e.position.distance(&at) < 1.0);
            return on_geyser && !taken;
        }

        let probe = if is_addon(structure) { at + ADDON_OFFSET } else { at };
        if !Self::in_bounds(snapshot, probe) {
            return false;
        }

        !snapshot
            .entities
            .iter()
            .filter(|e| e.id != builder && Self::is_solid(e))
            .any(|e| e.position.distance(&probe) < self.clearance)
    }
}

/// Staffs every newly finished refinery and reports the ideal harvester count
#[derive(Debug, Default)]
pub struct SaturationBalancer {
    staffed: AHashSet<EntityId>,
}

impl SaturationBalancer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkerBalancer for SaturationBalancer {
    fn balance(&mut self, snapshot: &WorldSnapshot, commands: &mut CommandBatch) {
        let fresh: Vec<&Entity> = snapshot
            .own_where(|k| *k == UnitKind::Refinery)
            .filter(|r| r.is_complete() && !self.staffed.contains(&r.id))
            .collect();

        for refinery in fresh {
            let mut workers: Vec<&Entity> = snapshot
                .own_where(|k| *k == UnitKind::Worker)
                .filter(|w| w.is_complete() && !commands.has_command_for(w.id))
                .collect();
            if workers.len() < WORKERS_PER_REFINERY {
                continue;
            }
            workers.sort_by(|a, b| {
                a.position
                    .distance_squared(&refinery.position)
                    .total_cmp(&b.position.distance_squared(&refinery.position))
            });

            for worker in workers.into_iter().take(WORKERS_PER_REFINERY) {
                commands.push(Command::Gather {
                    unit: worker.id,
                    node: refinery.id,
                });
            }
            self.staffed.insert(refinery.id);
            tracing::debug!(refinery = refinery.id.0, "Refinery staffed");
        }
    }

    fn expected_workers(&self, snapshot: &WorldSnapshot) -> usize {
        let bases = snapshot.bases().filter(|b| b.is_complete()).count();
        let refineries = snapshot
            .own_where(|k| *k == UnitKind::Refinery)
            .filter(|r| r.is_complete())
            .count();
        bases * WORKERS_PER_BASE + refineries * WORKERS_PER_REFINERY
    }
}

/// Hands out a fixed list of expansion sites in order
#[derive(Debug, Clone, Default)]
pub struct SiteListExpansions {
    sites: Vec<Vec2>,
    /// A site with any town hall this close is taken
    pub occupied_radius: f32,
}

impl SiteListExpansions {
    pub fn new(sites: Vec<Vec2>) -> Self {
        Self {
            sites,
            occupied_radius: 12.0,
        }
    }
}

impl ExpansionPlanner for SiteListExpansions {
    fn next_expansion(&self, snapshot: &WorldSnapshot) -> Option<Vec2> {
        self.sites.iter().copied().find(|site| {
            !snapshot
                .entities
                .iter()
                .any(|e| e.kind.is_town_hall() && e.position.distance(site) < self.occupied_radius)
        })
    }
}

/// Cycles scouts through the map corners and center, least visited first
#[derive(Debug, Clone, Default)]
pub struct CornerScout {
    visits: [u32; 5],
}

impl CornerScout {
    pub fn new() -> Self {
        Self::default()
    }

    fn waypoints(snapshot: &WorldSnapshot) -> [Vec2; 5] {
        let (w, h) = (snapshot.map_width, snapshot.map_height);
        let inset = 8.0;
        [
            Vec2::new(inset, h - inset),
            Vec2::new(w - inset, inset),
            Vec2::new(w - inset, h - inset),
            Vec2::new(inset, inset),
            snapshot.map_center(),
        ]
    }
}

impl ScoutPlanner for CornerScout {
    fn scout_toward_unexplored(&mut self, snapshot: &WorldSnapshot, _unit: &Entity) -> Option<Vec2> {
        let waypoints = Self::waypoints(snapshot);
        // Ties resolve to the earliest waypoint
        let (index, _) = self
            .visits
            .iter()
            .enumerate()
            .min_by_key(|(i, visits)| (**visits, *i))?;
        self.visits[index] += 1;
        Some(waypoints[index])
    }
}
