//! Tick orchestrator
//!
//! Owns the match state and the injected collaborators and runs every
//! component on its cadence, in a fixed order, once per tick.

use crate::commander::attack;
use crate::commander::construction::plan_construction;
use crate::commander::context::{DecisionContext, MatchContext};
use crate::commander::economy::manage_economy;
use crate::commander::production::{rally_new_unit, IdleScope, ProductionManager};
use crate::commander::scouting::manage_scouts;
use crate::commander::staging::{compute_staging_point, rally_idle_army};
use crate::commander::threat::{respond_to_threats, threats};
use crate::core::config::CommanderConfig;
use crate::core::error::Result;
use crate::core::types::Tick;
use crate::world::command::CommandBatch;
use crate::world::event::GameEvent;
use crate::world::services::Services;
use crate::world::snapshot::WorldSnapshot;

/// The strategic commander for one match
pub struct Commander {
    config: CommanderConfig,
    services: Services,
    production: ProductionManager,
    context: MatchContext,
}

fn due(tick: Tick, cadence: Tick) -> bool {
    tick % cadence == 0
}

impl Commander {
    /// Validate the profile and set up a fresh match
    pub fn new(config: CommanderConfig, services: Services) -> Result<Self> {
        config.validate()?;
        let context = MatchContext::new(&config);
        tracing::debug!(profile = %config.name, seed = config.seed, strategy = ?config.attack.strategy, "Commander created");
        Ok(Self {
            config,
            services,
            production: ProductionManager::default(),
            context,
        })
    }

    /// Replace the idle dispatch table
    pub fn with_production(mut self, production: ProductionManager) -> Self {
        self.production = production;
        self
    }

    pub fn config(&self) -> &CommanderConfig {
        &self.config
    }

    pub fn context(&self) -> &MatchContext {
        &self.context
    }

    pub fn current_tick(&self) -> Tick {
        self.context.tick
    }

    /// Advance one tick and return the commands to issue
    pub fn tick(&mut self, snapshot: &WorldSnapshot, events: &[GameEvent]) -> CommandBatch {
        self.context.tick += 1;
        let tick = self.context.tick;
        let cadence = &self.config.cadence;
        let strategy = self.config.attack.strategy;
        let view = DecisionContext::new(snapshot, &self.config);
        let mut commands = CommandBatch::new();

        for event in events {
            if let GameEvent::EnemySighted { position, .. } = event {
                self.context.sightings.record(*position);
            }
        }

        if due(tick, cadence.economy) {
            manage_economy(
                &view,
                &mut self.context,
                self.services.balancer.as_mut(),
                &mut commands,
            );
        }

        if due(tick, cadence.rally) {
            if let Some(staging) = compute_staging_point(snapshot, &self.config.staging) {
                self.context.staging = Some(staging);
            }
            let found = threats(snapshot, self.context.staging, self.config.threat.radius);
            let defenders = respond_to_threats(snapshot, &found, &mut commands);
            let rallied = rally_idle_army(snapshot, self.context.staging, &mut commands);
            tracing::debug!(tick, threats = found.len(), defenders, rallied, "Army managed");
        }

        if due(tick, cadence.construction) {
            plan_construction(
                &view,
                &mut self.context,
                self.services.placement.as_ref(),
                self.services.expansions.as_ref(),
                &mut commands,
            );
        }

        for event in events {
            match event {
                GameEvent::UnitCreated(id) => {
                    let Some(unit) = snapshot.get(*id) else {
                        continue;
                    };
                    if strategy.uses_waves() && attack::enlist(unit, &mut self.context) {
                        attack::commit_wave(&view, &mut self.context, &mut commands);
                    }
                    // A unit that just completed a wave is already on its way
                    if !commands.has_command_for(unit.id) {
                        rally_new_unit(unit, &self.context, &mut commands);
                    }
                }
                GameEvent::UnitDestroyed(id) => {
                    attack::discharge(*id, &mut self.context);
                }
                GameEvent::UnitIdle(id) => {
                    let Some(unit) = snapshot.get(*id) else {
                        continue;
                    };
                    let mut scope = IdleScope {
                        view: &view,
                        context: &mut self.context,
                        placement: self.services.placement.as_ref(),
                        resources: self.services.resources.as_ref(),
                        commands: &mut commands,
                    };
                    self.production.handle_idle(&mut scope, unit);
                }
                GameEvent::EnemySighted { .. } => {}
            }
        }

        if due(tick, cadence.scouting) {
            manage_scouts(
                &view,
                &mut self.context,
                self.services.scouting.as_mut(),
                &mut commands,
            );
        }

        if due(tick, cadence.attack) {
            if strategy.uses_waves() {
                attack::commit_wave(&view, &mut self.context, &mut commands);
            }
            if strategy.uses_opportunistic() {
                attack::opportunistic_attack(&view, &mut self.context, &mut commands);
            }
            if self.context.sightings.len() > self.config.memory.decimate_above {
                let removed = self.context.sightings.decimate();
                tracing::debug!(tick, removed, kept = self.context.sightings.len(), "Sighting memory decimated");
            }
        }

        if !commands.is_empty() {
            tracing::debug!(tick, commands = commands.len(), "Tick evaluated");
        }
        commands
    }
}
