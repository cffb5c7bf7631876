//! Production manager: reacts to idle and newly created units
//!
//! Idle handling goes through a dispatch table keyed by unit kind. Kinds with
//! no registered handler are ignored.

use ahash::AHashMap;

use crate::commander::construction::try_build_addon;
use crate::commander::context::{DecisionContext, MatchContext};
use crate::core::types::{Ability, UnitKind};
use crate::world::command::{Command, CommandBatch};
use crate::world::services::{PlacementValidator, ResourceLocator};
use crate::world::snapshot::Entity;

/// Everything an idle handler may read or mutate
pub struct IdleScope<'v, 'a> {
    pub view: &'v DecisionContext<'a>,
    pub context: &'v mut MatchContext,
    pub placement: &'v dyn PlacementValidator,
    pub resources: &'v dyn ResourceLocator,
    pub commands: &'v mut CommandBatch,
}

pub type IdleHandler = fn(&mut IdleScope<'_, '_>, &Entity);

/// Dispatch table from unit kind to idle handler
pub struct ProductionManager {
    handlers: AHashMap<UnitKind, IdleHandler>,
}

impl ProductionManager {
    /// A manager with no handlers registered
    pub fn empty() -> Self {
        Self {
            handlers: AHashMap::new(),
        }
    }

    /// Register (or replace) the handler for a kind
    pub fn register(&mut self, kind: UnitKind, handler: IdleHandler) {
        self.handlers.insert(kind, handler);
    }

    pub fn handles(&self, kind: UnitKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Run the handler registered for the unit's kind; false when none is
    pub fn handle_idle(&self, scope: &mut IdleScope<'_, '_>, unit: &Entity) -> bool {
        match self.handlers.get(&unit.kind) {
            Some(handler) => {
                handler(scope, unit);
                true
            }
            None => false,
        }
    }
}

impl Default for ProductionManager {
    fn default() -> Self {
        let mut manager = Self::empty();
        manager.register(UnitKind::Worker, idle_harvester);
        manager.register(UnitKind::Mule, idle_harvester);
        manager.register(UnitKind::Barracks, idle_barracks);
        manager.register(UnitKind::Factory, idle_factory);
        manager.register(UnitKind::EngineeringBay, idle_engineering_bay);
        manager
    }
}

/// Tech lab while tech labs per reactor stay below `ratio`, reactor otherwise
///
/// Integer division: (1+1)/(0+1) = 2 is not below 2, so the second barracks
/// asks for a reactor.
pub fn choose_barracks_addon(techlabs: usize, reactors: usize, ratio: usize) -> UnitKind {
    if (techlabs + 1) / (reactors + 1) < ratio {
        UnitKind::BarracksTechLab
    } else {
        UnitKind::BarracksReactor
    }
}

/// Marauder once marines per marauder exceed `ratio`, marine otherwise
pub fn choose_infantry(marines: usize, marauders: usize, ratio: f32) -> UnitKind {
    let current = (marines + 1) as f32 / (marauders + 1) as f32;
    if current > ratio {
        UnitKind::Marauder
    } else {
        UnitKind::Marine
    }
}

fn idle_harvester(scope: &mut IdleScope<'_, '_>, unit: &Entity) {
    let snapshot = scope.view.snapshot;
    if let Some(node) = scope.resources.nearest_unclaimed(snapshot, unit.position) {
        scope.commands.push(Command::Gather { unit: unit.id, node });
    }
}

fn idle_barracks(scope: &mut IdleScope<'_, '_>, unit: &Entity) {
    let snapshot = scope.view.snapshot;
    let production = &scope.view.config.production;

    let addon = choose_barracks_addon(
        snapshot.count_kind(UnitKind::BarracksTechLab),
        snapshot.count_kind(UnitKind::BarracksReactor),
        production.techlab_to_reactor_ratio,
    );
    try_build_addon(
        scope.view,
        scope.context,
        scope.placement,
        unit,
        addon,
        scope.commands,
    );

    if unit.is_idle() {
        let infantry = choose_infantry(
            snapshot.count_own(UnitKind::is_light_combat),
            snapshot.count_own(UnitKind::is_heavy_combat),
            scope.context.light_to_heavy_ratio,
        );
        scope.commands.push(Command::train(infantry, unit.id));
    }
}

fn idle_factory(scope: &mut IdleScope<'_, '_>, unit: &Entity) {
    try_build_addon(
        scope.view,
        scope.context,
        scope.placement,
        unit,
        UnitKind::FactoryTechLab,
        scope.commands,
    );
    scope.commands.push(Command::train(UnitKind::SiegeTank, unit.id));
}

fn idle_engineering_bay(scope: &mut IdleScope<'_, '_>, unit: &Entity) {
    let production = &scope.view.config.production;
    if scope.context.tick <= production.upgrade_milestone {
        return;
    }
    if scope.view.snapshot.light_and_heavy_count() <= production.upgrade_army_threshold {
        return;
    }

    for ability in [
        Ability::ResearchInfantryWeaponsLevel1,
        Ability::ResearchInfantryArmorLevel1,
    ] {
        scope.commands.push(Command::Research {
            ability,
            structure: unit.id,
        });
    }
}

/// Send a freshly created combat unit to the staging point
pub fn rally_new_unit(unit: &Entity, context: &MatchContext, commands: &mut CommandBatch) -> bool {
    if !unit.kind.is_combat() {
        return false;
    }
    match context.staging {
        Some(staging) => {
            commands.push(Command::move_attack(unit.id, staging));
            true
        }
        None => false,
    }
}
