//! Construction planner: the build order
//!
//! Every evaluation walks an ordered list of independent checks. Each check
//! reads counts from the snapshot and issues at most one build (the supply
//! check may issue two). A failing check never stops the ones after it, and
//! nothing is remembered between evaluations: a skipped build is simply
//! retried on the next construction tick.

use crate::commander::context::{DecisionContext, MatchContext};
use crate::core::config::{ConstructionConfig, SupplyConfig};
use crate::core::types::{Ability, EntityId, UnitKind, Vec2};
use crate::world::command::{Command, CommandBatch};
use crate::world::services::{ExpansionPlanner, PlacementValidator};
use crate::world::snapshot::{Entity, WorldSnapshot};

/// Own structure counts read once per evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructureCounts {
    pub bases: usize,
    pub orbitals: usize,
    pub depots: usize,
    pub refineries: usize,
    pub barracks: usize,
    pub factories: usize,
    pub engineering_bays: usize,
    pub armories: usize,
}

impl StructureCounts {
    /// Counts include structures still under construction
    pub fn from_snapshot(snapshot: &WorldSnapshot) -> Self {
        Self {
            bases: snapshot.base_count(),
            orbitals: snapshot.count_own(UnitKind::is_income_booster),
            depots: snapshot.count_own(UnitKind::is_supply_depot),
            refineries: snapshot.count_kind(UnitKind::Refinery),
            barracks: snapshot.count_own(UnitKind::is_barracks),
            factories: snapshot.count_own(UnitKind::is_factory),
            engineering_bays: snapshot.count_kind(UnitKind::EngineeringBay),
            armories: snapshot.count_kind(UnitKind::Armory),
        }
    }
}

/// Supply cap once every owned depot and base is finished
///
/// Computed locally instead of trusting the reported cap so depots under
/// construction already count.
pub fn projected_supply(counts: &StructureCounts, config: &SupplyConfig) -> i64 {
    counts.depots as i64 * config.per_depot + counts.bases as i64 * config.per_base
}

/// How many depots to start this evaluation (0, 1 or 2)
pub fn depots_needed(
    used: i64,
    reported_cap: i64,
    projected: i64,
    minerals: u32,
    config: &SupplyConfig,
) -> usize {
    if reported_cap >= config.max_supply {
        return 0;
    }

    let mut needed = 0;
    if used >= projected - config.headroom {
        needed += 1;
    }
    // Blocked and rich: start a second one alongside
    if needed == 1 && minerals > config.abundant_minerals && used == reported_cap {
        needed += 1;
    }
    needed
}

/// Places structures with a drafted worker
struct SiteBuilder<'v, 'a> {
    view: &'v DecisionContext<'a>,
    context: &'v mut MatchContext,
    placement: &'v dyn PlacementValidator,
    commands: &'v mut CommandBatch,
}

impl<'v, 'a> SiteBuilder<'v, 'a> {
    fn config(&self) -> &'a ConstructionConfig {
        &self.view.config.construction
    }

    /// First idle worker in roster order not already given a command this tick
    ///
    /// With `allow_busy_builders`, falls back to a random busy worker.
    fn pick_worker(&mut self) -> Option<&'a Entity> {
        let snapshot: &'a WorldSnapshot = self.view.snapshot;
        let commands = &*self.commands;
        let available = |e: &Entity| {
            e.kind == UnitKind::Worker && e.is_complete() && !commands.has_command_for(e.id)
        };

        if let Some(idle) = snapshot.own().find(|e| available(e) && e.is_idle()) {
            return Some(idle);
        }
        if self.view.config.construction.allow_busy_builders {
            return snapshot.random_unit(available, &mut self.context.rng);
        }
        None
    }

    /// Build somewhere around a drafted worker
    fn build_near_worker(&mut self, structure: UnitKind) -> bool {
        let Some(worker) = self.pick_worker() else {
            tracing::trace!(?structure, "No builder available");
            return false;
        };
        let jitter = self.config().build_jitter;
        let at = self.context.jittered(worker.position, jitter);
        self.commit(structure, at, worker.id)
    }

    /// Build at an exact site (geyser, expansion)
    fn build_at(&mut self, structure: UnitKind, at: Vec2) -> bool {
        let Some(worker) = self.pick_worker() else {
            tracing::trace!(?structure, "No builder available");
            return false;
        };
        self.commit(structure, at, worker.id)
    }

    fn commit(&mut self, structure: UnitKind, at: Vec2, builder: EntityId) -> bool {
        if !self
            .placement
            .validate(self.view.snapshot, structure, at, builder)
        {
            tracing::trace!(?structure, x = at.x, y = at.y, "Placement rejected");
            return false;
        }
        self.commands.push(Command::build(structure, at, builder));
        true
    }
}

/// Run one construction evaluation; returns the number of commands issued
pub fn plan_construction(
    view: &DecisionContext,
    context: &mut MatchContext,
    placement: &dyn PlacementValidator,
    expansions: &dyn ExpansionPlanner,
    commands: &mut CommandBatch,
) -> usize {
    let before = commands.len();
    let snapshot = view.snapshot;
    let config = &view.config.construction;
    let counts = StructureCounts::from_snapshot(snapshot);

    upgrade_bases(snapshot, config, &counts, commands);

    let mut builder = SiteBuilder {
        view,
        context,
        placement,
        commands,
    };

    // Supply
    let projected = projected_supply(&counts, &view.config.supply);
    let depots = depots_needed(
        snapshot.supply_used as i64,
        snapshot.supply_cap as i64,
        projected,
        snapshot.minerals,
        &view.config.supply,
    );
    for _ in 0..depots {
        builder.build_near_worker(UnitKind::SupplyDepot);
    }

    // Refineries, one per base until they match the orbitals
    if counts.barracks >= 2 && counts.orbitals >= 1 {
        let mut refineries = counts.refineries;
        for base in snapshot.bases() {
            if refineries >= counts.orbitals {
                break;
            }
            let geyser = free_geyser_near(snapshot, base.position, config.geyser_radius, builder.commands);
            if let Some(geyser) = geyser {
                if builder.build_at(UnitKind::Refinery, geyser) {
                    refineries += 1;
                }
            }
        }
    }

    // Barracks
    let barracks_target = (config.barracks_per_base * counts.bases).min(config.max_barracks);
    if counts.barracks < barracks_target && snapshot.minerals > config.barracks_minerals {
        builder.build_near_worker(UnitKind::Barracks);
    }

    // Factory
    if counts.factories < 1 && counts.barracks > config.tech_after_barracks {
        builder.build_near_worker(UnitKind::Factory);
    }

    // Engineering bay
    if counts.engineering_bays < 1 && counts.barracks > config.tech_after_barracks {
        builder.build_near_worker(UnitKind::EngineeringBay);
    }

    // Armory
    if counts.armories < 1
        && counts.bases > config.armory_after_bases
        && counts.factories >= 1
        && counts.engineering_bays >= 1
    {
        builder.build_near_worker(UnitKind::Armory);
    }

    // Expansion
    let expansion_minerals = config.expansion_minerals_per_base as usize * counts.bases;
    if counts.barracks >= 2
        && counts.bases <= config.max_bases
        && snapshot.minerals as usize > expansion_minerals
    {
        if let Some(site) = expansions.next_expansion(snapshot) {
            if builder.build_at(UnitKind::CommandCenter, site) {
                tracing::info!(bases = counts.bases, x = site.x, y = site.y, "Expanding");
            }
        }
    }

    let issued = builder.commands.len() - before;
    tracing::debug!(?counts, issued, "Construction evaluated");
    issued
}

/// Morph finished command centers into orbitals
fn upgrade_bases(
    snapshot: &WorldSnapshot,
    config: &ConstructionConfig,
    counts: &StructureCounts,
    commands: &mut CommandBatch,
) {
    if config.upgrade_requires_barracks && counts.barracks == 0 {
        return;
    }
    if snapshot.minerals <= config.upgrade_minerals {
        return;
    }
    for base in snapshot
        .bases()
        .filter(|b| b.kind == UnitKind::CommandCenter && b.is_complete())
    {
        commands.push(Command::Morph {
            ability: Ability::UpgradeToOrbital,
            entity: base.id,
        });
    }
}

/// Nearest geyser within `radius` of a base with no refinery on it
fn free_geyser_near(
    snapshot: &WorldSnapshot,
    base: Vec2,
    radius: f32,
    commands: &CommandBatch,
) -> Option<Vec2> {
    let taken = |at: Vec2| {
        snapshot
            .own_where(|k| *k == UnitKind::Refinery)
            .any(|r| r.position.distance(&at) < 1.0)
            || commands.iter().any(|c| {
                matches!(c, Command::Build { structure: UnitKind::Refinery, at: p, .. } if p.distance(&at) < 1.0)
            })
    };

    snapshot
        .neutral()
        .filter(|g| g.kind == UnitKind::VespeneGeyser)
        .filter(|g| g.position.distance(&base) < radius)
        .filter(|g| !taken(g.position))
        .min_by(|a, b| {
            a.position
                .distance_squared(&base)
                .total_cmp(&b.position.distance_squared(&base))
        })
        .map(|g| g.position)
}

/// Try to attach an addon to a finished production structure
///
/// The parent's own footprint is tried first. Failing that, a jittered point
/// nearby is tried, unless another structure already stands within the
/// clearance radius of it. Returns true if a build command was issued.
pub fn try_build_addon(
    view: &DecisionContext,
    context: &mut MatchContext,
    placement: &dyn PlacementValidator,
    parent: &Entity,
    addon: UnitKind,
    commands: &mut CommandBatch,
) -> bool {
    if !parent.is_complete() {
        return false;
    }

    let config = &view.config.construction;
    let snapshot = view.snapshot;
    let candidate = context.jittered(parent.position, config.addon_jitter);

    if placement.validate(snapshot, addon, parent.position, parent.id) {
        commands.push(Command::build(addon, parent.position, parent.id));
        return true;
    }

    let nearest = snapshot
        .structures()
        .map(|s| s.position.distance(&candidate))
        .fold(f32::MAX, f32::min);
    if nearest < config.addon_clearance {
        return false;
    }

    if placement.validate(snapshot, addon, candidate, parent.id) {
        commands.push(Command::build(addon, candidate, parent.id));
        return true;
    }
    false
}
