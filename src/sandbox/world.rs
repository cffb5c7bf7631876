//! Toy match for exercising the commander end to end
//!
//! A deliberately small model of the game: fixed costs and build times,
//! harvest income, supply, MULEs, addons, enemy raids and line-of-sight
//! sightings. Commands the model cannot honor are dropped, and the unit they
//! were aimed at is reported idle again on the next step.

use ahash::AHashSet;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::commander::Commander;
use crate::core::types::{Ability, Alliance, EntityId, Tick, UnitKind, Vec2};
use crate::sandbox::services::{is_addon, ADDON_OFFSET};
use crate::world::command::{Command, CommandBatch};
use crate::world::event::GameEvent;
use crate::world::snapshot::{Entity, WorldSnapshot};

const MAP_SIZE: f32 = 176.0;
const SIGHT_RANGE: f32 = 12.0;
const UNIT_SPEED: f32 = 0.5;
const RAIDER_SPEED: f32 = 0.4;
/// Own combat units this close wipe out an enemy unit
const ENGAGE_RANGE: f32 = 6.0;
/// Own combat units needed near an enemy structure to destroy it
const SIEGE_PARTY: usize = 6;
const RAID_START: Tick = 1800;
const RAID_INTERVAL: Tick = 900;
const WORKER_RATE: f32 = 0.045;
const MULE_RATE: f32 = 0.17;
const GAS_RATE: f32 = 0.04;
const MULE_LIFETIME: u32 = 1400;
const ENERGY_REGEN: f32 = 0.035;
const MAX_ENERGY: f32 = 200.0;
const MAX_SUPPLY: u32 = 200;
const RAIDER_KIND: UnitKind = UnitKind::Other(105);

/// Price and duration of everything the model can make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cost {
    minerals: u32,
    vespene: u32,
    supply: u32,
    ticks: u32,
}

const fn cost(minerals: u32, vespene: u32, supply: u32, ticks: u32) -> Cost {
    Cost {
        minerals,
        vespene,
        supply,
        ticks,
    }
}

fn cost_of(kind: UnitKind) -> Option<Cost> {
    let c = match kind {
        UnitKind::Worker => cost(50, 0, 1, 270),
        UnitKind::Marine => cost(50, 0, 1, 400),
        UnitKind::Marauder => cost(100, 25, 2, 480),
        UnitKind::SiegeTank => cost(150, 125, 3, 720),
        UnitKind::CommandCenter => cost(400, 0, 0, 1590),
        UnitKind::SupplyDepot => cost(100, 0, 0, 480),
        UnitKind::Refinery => cost(75, 0, 0, 480),
        UnitKind::Barracks => cost(150, 0, 0, 1030),
        UnitKind::Factory => cost(150, 100, 0, 1030),
        UnitKind::EngineeringBay => cost(125, 0, 0, 570),
        UnitKind::Armory => cost(150, 100, 0, 1030),
        UnitKind::BarracksTechLab | UnitKind::FactoryTechLab => cost(50, 25, 0, 400),
        UnitKind::BarracksReactor => cost(50, 50, 0, 560),
        _ => return None,
    };
    Some(c)
}

fn supply_of(kind: UnitKind) -> u32 {
    match kind {
        UnitKind::SiegeTankSieged => 3,
        kind => cost_of(kind).map_or(0, |c| c.supply),
    }
}

fn addon_parent(addon: UnitKind) -> Option<UnitKind> {
    match addon {
        UnitKind::BarracksTechLab | UnitKind::BarracksReactor => Some(UnitKind::Barracks),
        UnitKind::FactoryTechLab => Some(UnitKind::Factory),
        _ => None,
    }
}

const ORBITAL_MORPH: Cost = cost(150, 0, 0, 560);
const RESEARCH: Cost = cost(100, 100, 0, 2500);

/// What an entity is currently doing
#[derive(Debug, Clone, Copy, PartialEq)]
enum Task {
    Idle,
    Gathering { node: EntityId },
    /// Worker building a structure, or a parent building its addon
    Constructing { remaining: u32 },
    Training { unit: UnitKind, remaining: u32 },
    Morphing { into: UnitKind, remaining: u32 },
    Researching { remaining: u32 },
    Moving { to: Vec2 },
}

#[derive(Debug, Clone)]
struct Body {
    entity: Entity,
    task: Task,
    /// Ticks needed to finish construction
    build_ticks: u32,
    addon: Option<EntityId>,
    /// Enemy already reported as sighted
    seen: bool,
    /// Remaining lifetime of temporary units
    lifetime: Option<u32>,
}

impl Body {
    fn new(entity: Entity) -> Self {
        Self {
            entity,
            task: Task::Idle,
            build_ticks: 0,
            addon: None,
            seen: false,
            lifetime: None,
        }
    }

    fn is_idle(&self) -> bool {
        self.task == Task::Idle
    }

    fn is_ready(&self) -> bool {
        self.is_idle() && self.entity.is_complete()
    }
}

/// End-of-run numbers for reports
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub tick: Tick,
    pub minerals: u32,
    pub vespene: u32,
    pub supply_used: u32,
    pub supply_cap: u32,
    pub own_units: BTreeMap<UnitKind, usize>,
    pub enemy_units: usize,
    pub own_losses: usize,
    pub enemy_losses: usize,
}

/// A small two-player map with a passive enemy that sends periodic raids
pub struct SandboxWorld {
    tick: Tick,
    minerals: f32,
    vespene: f32,
    bodies: Vec<Body>,
    next_id: u64,
    rng: ChaCha8Rng,
    pending: Vec<GameEvent>,
    /// Units whose last command was dropped while they were idle
    retry_idle: AHashSet<EntityId>,
    researched: AHashSet<Ability>,
    main_base: Vec2,
    enemy_start: Vec2,
    expansion_sites: Vec<Vec2>,
    own_losses: usize,
    enemy_losses: usize,
}

impl SandboxWorld {
    pub fn new(seed: u64) -> Self {
        let mut world = Self {
            tick: 0,
            minerals: 50.0,
            vespene: 0.0,
            bodies: Vec::new(),
            next_id: 1,
            rng: ChaCha8Rng::seed_from_u64(seed),
            pending: Vec::new(),
            retry_idle: AHashSet::new(),
            researched: AHashSet::new(),
            main_base: Vec2::new(36.0, 36.0),
            enemy_start: Vec2::new(140.0, 140.0),
            expansion_sites: vec![
                Vec2::new(36.0, 84.0),
                Vec2::new(84.0, 36.0),
                Vec2::new(88.0, 88.0),
                Vec2::new(140.0, 92.0),
            ],
            own_losses: 0,
            enemy_losses: 0,
        };

        world.resource_cluster(world.main_base);
        world.resource_cluster(world.enemy_start);
        for site in world.expansion_sites.clone() {
            world.resource_cluster(site);
        }

        world.spawn(UnitKind::CommandCenter, world.main_base, Alliance::Own);
        for i in 0..12 {
            let at = Vec2::new(30.0 + i as f32, 32.0);
            let id = world.spawn(UnitKind::Worker, at, Alliance::Own);
            world.pending.push(GameEvent::UnitIdle(id));
        }
        world.spawn(UnitKind::CommandCenter, world.enemy_start, Alliance::Enemy);

        world
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Candidate base locations, nearest first
    pub fn expansion_sites(&self) -> Vec<Vec2> {
        self.expansion_sites.clone()
    }

    /// Eight mineral fields and two geysers around a base location
    fn resource_cluster(&mut self, base: Vec2) {
        for i in 0..8 {
            let at = Vec2::new(base.x - 7.0 + 2.0 * i as f32, base.y - 8.0);
            self.spawn(UnitKind::MineralField, at, Alliance::Neutral);
        }
        for dx in [-8.0, 8.0] {
            let at = Vec2::new(base.x + dx, base.y - 4.0);
            self.spawn(UnitKind::VespeneGeyser, at, Alliance::Neutral);
        }
    }

    fn spawn(&mut self, kind: UnitKind, position: Vec2, alliance: Alliance) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let mut body = Body::new(Entity::new(id, kind, position, alliance));
        if kind.is_income_booster() {
            body.entity.energy = 50.0;
        }
        self.bodies.push(body);
        id
    }

    fn spawn_construction(&mut self, kind: UnitKind, position: Vec2, ticks: u32) -> EntityId {
        let id = self.spawn(kind, position, Alliance::Own);
        if let Some(body) = self.body_mut(id) {
            body.entity.build_progress = 0.0;
            body.build_ticks = ticks;
        }
        id
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.bodies.iter().position(|b| b.entity.id == id)
    }

    fn body(&self, id: EntityId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.entity.id == id)
    }

    fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.entity.id == id)
    }

    fn own(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.entity.is_own())
    }

    pub fn supply_cap(&self) -> u32 {
        let cap: u32 = self
            .own()
            .filter(|b| b.entity.is_complete())
            .map(|b| {
                if b.entity.kind.is_town_hall() {
                    15
                } else if b.entity.kind.is_supply_depot() {
                    8
                } else {
                    0
                }
            })
            .sum();
        cap.min(MAX_SUPPLY)
    }

    /// Supply of live units plus units in training
    pub fn supply_used(&self) -> u32 {
        self.own()
            .map(|b| {
                let queued = match b.task {
                    Task::Training { unit, .. } => supply_of(unit),
                    _ => 0,
                };
                supply_of(b.entity.kind) + queued
            })
            .sum()
    }

    fn can_afford(&self, cost: &Cost) -> bool {
        self.minerals >= cost.minerals as f32 && self.vespene >= cost.vespene as f32
    }

    fn pay(&mut self, cost: &Cost) {
        self.minerals -= cost.minerals as f32;
        self.vespene -= cost.vespene as f32;
    }

    /// What the commander sees this tick
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot::new(MAP_SIZE, MAP_SIZE);
        snapshot.minerals = self.minerals as u32;
        snapshot.vespene = self.vespene as u32;
        snapshot.supply_used = self.supply_used();
        snapshot.supply_cap = self.supply_cap();
        snapshot.enemy_start_locations = vec![self.enemy_start];
        snapshot.entities = self
            .bodies
            .iter()
            .filter(|b| !b.entity.is_enemy() || b.seen)
            .map(|b| {
                let mut entity = b.entity.clone();
                entity.orders_empty = b.is_idle();
                entity
            })
            .collect();
        snapshot
    }

    /// Run one commander tick against the world and advance the world by one step
    pub fn advance(&mut self, commander: &mut Commander) -> CommandBatch {
        let snapshot = self.snapshot();
        let events = std::mem::take(&mut self.pending);
        let commands = commander.tick(&snapshot, &events);
        self.apply(&commands);
        self.pending = self.step();
        commands
    }

    /// Carry out a batch in order, dropping whatever cannot be honored
    pub fn apply(&mut self, commands: &CommandBatch) {
        for command in commands.iter() {
            if !self.execute(command) {
                let actor = command.actor();
                if self.body(actor).map_or(false, |b| b.is_idle() && b.entity.is_own()) {
                    self.retry_idle.insert(actor);
                }
            }
        }
    }

    fn execute(&mut self, command: &Command) -> bool {
        match *command {
            Command::Train { unit, producer } => self.train(unit, producer),
            Command::Build {
                structure,
                at,
                builder,
            } => {
                if is_addon(structure) {
                    self.build_addon(structure, at, builder)
                } else {
                    self.build(structure, at, builder)
                }
            }
            Command::Morph { ability, entity } => self.morph(ability, entity),
            Command::Research { ability, structure } => self.research(ability, structure),
            Command::MoveAttack { unit, at } => match self.body_mut(unit) {
                Some(body) if body.entity.is_own() && !body.entity.kind.is_structure() => {
                    body.task = Task::Moving { to: at };
                    true
                }
                _ => false,
            },
            Command::Gather { unit, node } => self.gather(unit, node),
            Command::Cast { ability, caster, at } => self.cast(ability, caster, at),
        }
    }

    fn train(&mut self, unit: UnitKind, producer: EntityId) -> bool {
        let Some(cost) = cost_of(unit) else {
            return false;
        };
        let Some(body) = self.body(producer) else {
            return false;
        };
        let produces = match unit {
            UnitKind::Worker => body.entity.kind.is_town_hall(),
            UnitKind::Marine | UnitKind::Marauder => body.entity.kind == UnitKind::Barracks,
            UnitKind::SiegeTank => body.entity.kind == UnitKind::Factory,
            _ => false,
        };
        let needs_tech_lab = matches!(unit, UnitKind::Marauder | UnitKind::SiegeTank);
        let tech_lab_ready = body
            .addon
            .and_then(|id| self.body(id))
            .map_or(false, |a| {
                a.entity.is_complete()
                    && matches!(a.entity.kind, UnitKind::BarracksTechLab | UnitKind::FactoryTechLab)
            });

        if !produces
            || !body.is_ready()
            || (needs_tech_lab && !tech_lab_ready)
            || !self.can_afford(&cost)
            || self.supply_used() + cost.supply > self.supply_cap()
        {
            return false;
        }

        self.pay(&cost);
        if let Some(body) = self.body_mut(producer) {
            body.task = Task::Training {
                unit,
                remaining: cost.ticks,
            };
        }
        true
    }

    fn build(&mut self, structure: UnitKind, at: Vec2, builder: EntityId) -> bool {
        let Some(cost) = cost_of(structure) else {
            return false;
        };
        let Some(body) = self.body(builder) else {
            return false;
        };
        if body.entity.kind != UnitKind::Worker
            || !body.entity.is_own()
            || matches!(body.task, Task::Constructing { .. })
            || !self.can_afford(&cost)
        {
            return false;
        }

        let site = if structure == UnitKind::Refinery {
            match self.bodies.iter().find(|b| {
                b.entity.kind == UnitKind::VespeneGeyser && b.entity.position.distance(&at) < 1.0
            }) {
                Some(geyser) => geyser.entity.position,
                None => return false,
            }
        } else {
            at
        };

        self.pay(&cost);
        self.spawn_construction(structure, site, cost.ticks);
        if let Some(body) = self.body_mut(builder) {
            body.task = Task::Constructing {
                remaining: cost.ticks,
            };
        }
        tracing::trace!(?structure, x = site.x, y = site.y, "Construction started");
        true
    }

    /// The parent lifts to `at` and the addon lands in the slot beside it
    fn build_addon(&mut self, addon: UnitKind, at: Vec2, parent: EntityId) -> bool {
        let (Some(cost), Some(parent_kind)) = (cost_of(addon), addon_parent(addon)) else {
            return false;
        };
        let Some(body) = self.body(parent) else {
            return false;
        };
        if body.entity.kind != parent_kind
            || !body.is_ready()
            || body.addon.is_some()
            || !self.can_afford(&cost)
        {
            return false;
        }

        self.pay(&cost);
        let addon_id = self.spawn_construction(addon, at + ADDON_OFFSET, cost.ticks);
        if let Some(body) = self.body_mut(parent) {
            body.entity.position = at;
            body.addon = Some(addon_id);
            body.task = Task::Constructing {
                remaining: cost.ticks,
            };
        }
        true
    }

    fn morph(&mut self, ability: Ability, entity: EntityId) -> bool {
        if ability != Ability::UpgradeToOrbital || !self.can_afford(&ORBITAL_MORPH) {
            return false;
        }
        let has_barracks = self
            .own()
            .any(|b| b.entity.kind == UnitKind::Barracks && b.entity.is_complete());
        match self.body(entity) {
            Some(b) if b.entity.kind == UnitKind::CommandCenter && b.is_ready() && has_barracks => {}
            _ => return false,
        }

        self.pay(&ORBITAL_MORPH);
        if let Some(body) = self.body_mut(entity) {
            body.task = Task::Morphing {
                into: UnitKind::OrbitalCommand,
                remaining: ORBITAL_MORPH.ticks,
            };
        }
        true
    }

    fn research(&mut self, ability: Ability, structure: EntityId) -> bool {
        let researchable = matches!(
            ability,
            Ability::ResearchInfantryWeaponsLevel1 | Ability::ResearchInfantryArmorLevel1
        );
        if !researchable || self.researched.contains(&ability) || !self.can_afford(&RESEARCH) {
            return false;
        }
        match self.body(structure) {
            Some(b) if b.entity.kind == UnitKind::EngineeringBay && b.is_ready() => {}
            _ => return false,
        }

        self.pay(&RESEARCH);
        self.researched.insert(ability);
        if let Some(body) = self.body_mut(structure) {
            body.task = Task::Researching {
                remaining: RESEARCH.ticks,
            };
        }
        true
    }

    fn gather(&mut self, unit: EntityId, node: EntityId) -> bool {
        let node_ok = self.body(node).map_or(false, |n| {
            n.entity.kind == UnitKind::MineralField
                || (n.entity.kind == UnitKind::Refinery && n.entity.is_own() && n.entity.is_complete())
        });
        match self.body_mut(unit) {
            Some(body)
                if node_ok
                    && body.entity.kind.is_harvester()
                    && !matches!(body.task, Task::Constructing { .. }) =>
            {
                body.task = Task::Gathering { node };
                true
            }
            _ => false,
        }
    }

    fn cast(&mut self, ability: Ability, caster: EntityId, at: Vec2) -> bool {
        if ability != Ability::CalldownMule {
            return false;
        }
        match self.body_mut(caster) {
            Some(body) if body.entity.kind.is_income_booster() && body.entity.energy >= 50.0 => {
                body.entity.energy -= 50.0;
            }
            _ => return false,
        }
        let mule = self.spawn(UnitKind::Mule, at, Alliance::Own);
        if let Some(body) = self.body_mut(mule) {
            body.lifetime = Some(MULE_LIFETIME);
        }
        self.pending_idle(mule);
        true
    }

    fn pending_idle(&mut self, id: EntityId) {
        self.retry_idle.insert(id);
    }

    /// Advance the model by one tick and return the events it produced
    pub fn step(&mut self) -> Vec<GameEvent> {
        self.tick += 1;
        let mut events = Vec::new();

        self.harvest();
        self.progress(&mut events);
        self.raid();
        self.skirmish(&mut events);
        self.sight(&mut events);

        let mut retry: Vec<EntityId> = self.retry_idle.drain().collect();
        retry.sort();
        for id in retry {
            if self.body(id).map_or(false, |b| b.is_idle() && b.entity.is_complete()) {
                events.push(GameEvent::UnitIdle(id));
            }
        }
        events
    }

    fn harvest(&mut self) {
        let mut minerals = 0.0;
        let mut vespene = 0.0;
        let mut lost: Vec<EntityId> = Vec::new();

        for body in self.bodies.iter().filter(|b| b.entity.is_own()) {
            let Task::Gathering { node } = body.task else {
                continue;
            };
            match self.body(node).map(|n| n.entity.kind) {
                Some(UnitKind::MineralField) if body.entity.kind == UnitKind::Mule => minerals += MULE_RATE,
                Some(UnitKind::MineralField) => minerals += WORKER_RATE,
                Some(UnitKind::Refinery) => vespene += GAS_RATE,
                _ => lost.push(body.entity.id),
            }
        }

        self.minerals += minerals;
        self.vespene += vespene;
        for id in lost {
            if let Some(body) = self.body_mut(id) {
                body.task = Task::Idle;
            }
            self.pending_idle(id);
        }
    }

    fn progress(&mut self, events: &mut Vec<GameEvent>) {
        let mut spawns: Vec<(UnitKind, Vec2)> = Vec::new();
        let mut expired: Vec<EntityId> = Vec::new();

        for body in self.bodies.iter_mut() {
            let id = body.entity.id;

            if body.entity.is_own() && !body.entity.is_complete() && body.build_ticks > 0 {
                body.entity.build_progress += 1.0 / body.build_ticks as f32;
                if body.entity.build_progress >= 1.0 {
                    body.entity.build_progress = 1.0;
                    events.push(GameEvent::UnitIdle(id));
                }
            }

            if body.entity.is_own() && body.entity.kind.is_income_booster() {
                body.entity.energy = (body.entity.energy + ENERGY_REGEN).min(MAX_ENERGY);
            }

            if let Some(lifetime) = body.lifetime.as_mut() {
                *lifetime = lifetime.saturating_sub(1);
                if *lifetime == 0 {
                    expired.push(id);
                }
            }

            let finished = match &mut body.task {
                Task::Constructing { remaining } | Task::Researching { remaining } => {
                    *remaining = remaining.saturating_sub(1);
                    *remaining == 0
                }
                Task::Training { unit, remaining } => {
                    *remaining = remaining.saturating_sub(1);
                    if *remaining == 0 {
                        spawns.push((*unit, body.entity.position + Vec2::new(2.0, -2.0)));
                    }
                    *remaining == 0
                }
                Task::Morphing { into, remaining } => {
                    *remaining = remaining.saturating_sub(1);
                    if *remaining == 0 {
                        body.entity.kind = *into;
                        body.entity.energy = 50.0;
                    }
                    *remaining == 0
                }
                Task::Moving { to } => {
                    let to = *to;
                    let pos = body.entity.position;
                    if pos.distance(&to) <= UNIT_SPEED {
                        body.entity.position = to;
                        true
                    } else {
                        body.entity.position = pos + pos.towards(&to) * UNIT_SPEED;
                        false
                    }
                }
                Task::Idle | Task::Gathering { .. } => false,
            };

            if finished {
                body.task = Task::Idle;
                if body.entity.is_own() {
                    events.push(GameEvent::UnitIdle(id));
                }
            }
        }

        for (kind, at) in spawns {
            let jitter = Vec2::new(self.rng.gen_range(-1.0..=1.0), self.rng.gen_range(-1.0..=1.0));
            let id = self.spawn(kind, at + jitter, Alliance::Own);
            events.push(GameEvent::UnitCreated(id));
            events.push(GameEvent::UnitIdle(id));
        }

        for id in expired {
            self.remove(id, events);
        }
    }

    /// Periodic enemy raiding parties heading for the main base
    fn raid(&mut self) {
        if self.tick >= RAID_START && self.tick % RAID_INTERVAL == 0 {
            let size = self.rng.gen_range(1..=3);
            for _ in 0..size {
                let offset = Vec2::new(self.rng.gen_range(-4.0..=4.0), self.rng.gen_range(-4.0..=4.0));
                let id = self.spawn(RAIDER_KIND, self.enemy_start + offset, Alliance::Enemy);
                let target = self.main_base;
                if let Some(body) = self.body_mut(id) {
                    body.task = Task::Moving { to: target };
                }
            }
        }

        for body in self
            .bodies
            .iter_mut()
            .filter(|b| b.entity.is_enemy() && b.entity.kind == RAIDER_KIND)
        {
            if let Task::Moving { to } = body.task {
                let pos = body.entity.position;
                if pos.distance(&to) <= RAIDER_SPEED {
                    body.entity.position = to;
                    body.task = Task::Idle;
                } else {
                    body.entity.position = pos + pos.towards(&to) * RAIDER_SPEED;
                }
            }
        }
    }

    /// Crude combat resolution
    ///
    /// Enemy units die to any nearby own combat unit, enemy structures to a
    /// large enough party. Unopposed raiders pick off a worker every 40 ticks.
    fn skirmish(&mut self, events: &mut Vec<GameEvent>) {
        let army: Vec<Vec2> = self
            .own()
            .filter(|b| b.entity.kind.is_combat())
            .map(|b| b.entity.position)
            .collect();

        let mut dead: Vec<EntityId> = Vec::new();
        let mut raiders: Vec<Vec2> = Vec::new();
        for body in self.bodies.iter().filter(|b| b.entity.is_enemy()) {
            let pos = body.entity.position;
            let nearby = army.iter().filter(|p| p.distance(&pos) < ENGAGE_RANGE).count();
            let destroyed = if body.entity.kind.is_structure() {
                nearby >= SIEGE_PARTY
            } else {
                nearby > 0
            };
            if destroyed {
                dead.push(body.entity.id);
            } else if !body.entity.kind.is_structure() {
                raiders.push(pos);
            }
        }

        if self.tick % 40 == 0 {
            for raider in raiders {
                let victim = self
                    .own()
                    .filter(|b| !b.entity.kind.is_structure() && !dead.contains(&b.entity.id))
                    .find(|b| b.entity.position.distance(&raider) < 2.0)
                    .map(|b| b.entity.id);
                if let Some(victim) = victim {
                    dead.push(victim);
                }
            }
        }

        for id in dead {
            self.remove(id, events);
        }
    }

    fn remove(&mut self, id: EntityId, events: &mut Vec<GameEvent>) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let body = self.bodies.remove(index);
        if body.entity.is_own() {
            if body.entity.kind != UnitKind::Mule {
                self.own_losses += 1;
            }
            events.push(GameEvent::UnitDestroyed(id));
        } else {
            self.enemy_losses += 1;
        }
    }

    /// Report enemies the first time any own entity sees them
    fn sight(&mut self, events: &mut Vec<GameEvent>) {
        let eyes: Vec<Vec2> = self.own().map(|b| b.entity.position).collect();
        for body in self.bodies.iter_mut().filter(|b| b.entity.is_enemy() && !b.seen) {
            let pos = body.entity.position;
            if eyes.iter().any(|e| e.distance(&pos) < SIGHT_RANGE) {
                body.seen = true;
                events.push(GameEvent::EnemySighted {
                    unit: body.entity.id,
                    position: pos,
                });
            }
        }
    }

    pub fn count_own(&self, kind: UnitKind) -> usize {
        self.own().filter(|b| b.entity.kind == kind).count()
    }

    pub fn summary(&self) -> WorldSummary {
        let mut own_units = BTreeMap::new();
        for body in self.own() {
            *own_units.entry(body.entity.kind).or_insert(0) += 1;
        }
        WorldSummary {
            tick: self.tick,
            minerals: self.minerals as u32,
            vespene: self.vespene as u32,
            supply_used: self.supply_used(),
            supply_cap: self.supply_cap(),
            own_units,
            enemy_units: self.bodies.iter().filter(|b| b.entity.is_enemy()).count(),
            own_losses: self.own_losses,
            enemy_losses: self.enemy_losses,
        }
    }
}
