//! Attack coordinator
//!
//! Two policies that may run side by side:
//! - wave commit: new units fill a wave; a full wave is sent at the enemy
//!   start location and a fresh one opens
//! - opportunistic: once the army is large enough late in the game, strike a
//!   position drawn from sighting memory

use crate::commander::context::{DecisionContext, MatchContext};
use crate::core::types::EntityId;
use crate::world::command::{Command, CommandBatch};
use crate::world::snapshot::Entity;

/// Add a newly created unit to the open wave; false if its slot is full or unwanted
pub fn enlist(unit: &Entity, context: &mut MatchContext) -> bool {
    unit.kind.is_combat() && context.wave.try_add(unit.id, unit.kind)
}

/// Drop a destroyed unit from the open wave
pub fn discharge(unit: EntityId, context: &mut MatchContext) -> bool {
    context.wave.remove(unit)
}

/// Send the open wave if every target count is met
///
/// Without a known enemy start location the full wave keeps waiting.
/// Returns the number of units ordered.
pub fn commit_wave(
    view: &DecisionContext,
    context: &mut MatchContext,
    commands: &mut CommandBatch,
) -> usize {
    if !context.wave.is_full() {
        return 0;
    }
    let Some(&target) = view.snapshot.enemy_start_locations.first() else {
        return 0;
    };

    let members: Vec<EntityId> = context.wave.members().collect();
    for &unit in &members {
        commands.push(Command::move_attack(unit, target));
    }
    context.wave = context.wave.successor();

    tracing::info!(
        tick = context.tick,
        units = members.len(),
        x = target.x,
        y = target.y,
        "Wave committed"
    );
    members.len()
}

/// Strike a remembered sighting with idle and staged combat units
pub fn opportunistic_attack(
    view: &DecisionContext,
    context: &mut MatchContext,
    commands: &mut CommandBatch,
) -> usize {
    let snapshot = view.snapshot;
    let config = &view.config.attack;

    if context.tick <= config.minute_milestone
        || snapshot.light_and_heavy_count() <= config.army_threshold
    {
        return 0;
    }

    let Some(target) = context.sightings.sample(&mut context.rng) else {
        tracing::debug!(tick = context.tick, "No sightings to attack");
        return 0;
    };

    let staging = context.staging;
    let near_staging = |e: &Entity| {
        staging.map_or(false, |s| e.position.distance(&s) < config.staging_radius)
    };

    let mut issued = 0;
    for unit in snapshot
        .own()
        .filter(|e| e.kind.is_combat() && (e.is_idle() || near_staging(e)))
    {
        commands.push(Command::move_attack(unit.id, target));
        issued += 1;
    }

    tracing::info!(
        tick = context.tick,
        units = issued,
        x = target.x,
        y = target.y,
        "Opportunistic attack"
    );
    issued
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CommanderConfig, WaveSlot};
    use crate::core::types::{Alliance, UnitKind, Vec2};
    use crate::world::snapshot::WorldSnapshot;

    fn own(id: u64, kind: UnitKind, x: f32, y: f32) -> Entity {
        Entity::new(EntityId(id), kind, Vec2::new(x, y), Alliance::Own)
    }

    fn small_wave_config() -> CommanderConfig {
        let mut config = CommanderConfig::default();
        config.attack.wave = vec![
            WaveSlot { unit: UnitKind::Marine, count: 2 },
            WaveSlot { unit: UnitKind::SiegeTank, count: 1 },
        ];
        config
    }

    #[test]
    fn test_wave_commits_only_when_full() {
        let config = small_wave_config();
        let mut snapshot = WorldSnapshot::new(200.0, 200.0);
        snapshot.enemy_start_locations = vec![Vec2::new(180.0, 180.0)];
        let view = DecisionContext::new(&snapshot, &config);
        let mut context = MatchContext::new(&config);
        let mut commands = CommandBatch::new();

        assert!(enlist(&own(1, UnitKind::Marine, 0.0, 0.0), &mut context));
        assert!(enlist(&own(2, UnitKind::Marine, 0.0, 0.0), &mut context));
        assert!(!enlist(&own(3, UnitKind::Marine, 0.0, 0.0), &mut context));
        assert!(!enlist(&own(4, UnitKind::Worker, 0.0, 0.0), &mut context));
        assert_eq!(commit_wave(&view, &mut context, &mut commands), 0);

        assert!(enlist(&own(5, UnitKind::SiegeTank, 0.0, 0.0), &mut context));
        assert_eq!(commit_wave(&view, &mut context, &mut commands), 3);
        assert_eq!(
            commands.into_vec(),
            vec![
                Command::move_attack(EntityId(1), Vec2::new(180.0, 180.0)),
                Command::move_attack(EntityId(2), Vec2::new(180.0, 180.0)),
                Command::move_attack(EntityId(5), Vec2::new(180.0, 180.0)),
            ]
        );
        assert!(context.wave.is_empty());
        assert!(!context.wave.target().is_empty());
    }

    #[test]
    fn test_full_wave_waits_without_start_location() {
        let config = small_wave_config();
        let snapshot = WorldSnapshot::new(200.0, 200.0);
        let view = DecisionContext::new(&snapshot, &config);
        let mut context = MatchContext::new(&config);
        let mut commands = CommandBatch::new();

        enlist(&own(1, UnitKind::Marine, 0.0, 0.0), &mut context);
        enlist(&own(2, UnitKind::Marine, 0.0, 0.0), &mut context);
        enlist(&own(3, UnitKind::SiegeTank, 0.0, 0.0), &mut context);
        assert_eq!(commit_wave(&view, &mut context, &mut commands), 0);
        assert_eq!(context.wave.len(), 3);
    }

    #[test]
    fn test_destroyed_member_frees_slot() {
        let config = small_wave_config();
        let mut context = MatchContext::new(&config);
        enlist(&own(1, UnitKind::SiegeTank, 0.0, 0.0), &mut context);
        assert!(discharge(EntityId(1), &mut context));
        assert!(enlist(&own(2, UnitKind::SiegeTank, 0.0, 0.0), &mut context));
    }

    fn army_snapshot(count: u64) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot::new(200.0, 200.0);
        for id in 1..=count {
            snapshot.entities.push(own(id, UnitKind::Marine, 20.0, 20.0));
        }
        snapshot
    }

    #[test]
    fn test_opportunistic_needs_milestone_and_army() {
        let config = CommanderConfig::default();
        let mut context = MatchContext::new(&config);
        context.sightings.record(Vec2::new(150.0, 150.0));
        let mut commands = CommandBatch::new();

        let small = army_snapshot(40);
        context.tick = 12600;
        assert_eq!(
            opportunistic_attack(&DecisionContext::new(&small, &config), &mut context, &mut commands),
            0
        );

        let large = army_snapshot(41);
        context.tick = 12000;
        assert_eq!(
            opportunistic_attack(&DecisionContext::new(&large, &config), &mut context, &mut commands),
            0
        );

        context.tick = 12600;
        assert_eq!(
            opportunistic_attack(&DecisionContext::new(&large, &config), &mut context, &mut commands),
            41
        );
        assert_eq!(context.sightings.len(), 1, "single sighting is kept");
    }

    #[test]
    fn test_empty_memory_suppresses_attack() {
        let config = CommanderConfig::default();
        let mut context = MatchContext::new(&config);
        context.tick = 13000;
        let snapshot = army_snapshot(50);
        let mut commands = CommandBatch::new();

        let issued =
            opportunistic_attack(&DecisionContext::new(&snapshot, &config), &mut context, &mut commands);
        assert_eq!(issued, 0);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_busy_units_join_only_near_staging() {
        let config = CommanderConfig::default();
        let mut context = MatchContext::new(&config);
        context.tick = 13000;
        context.staging = Some(Vec2::new(100.0, 100.0));
        context.sightings.record(Vec2::new(150.0, 150.0));

        let mut snapshot = army_snapshot(41);
        for unit in snapshot.entities.iter_mut() {
            unit.orders_empty = false;
        }
        let mut staged = own(100, UnitKind::SiegeTankSieged, 105.0, 100.0);
        staged.orders_empty = false;
        snapshot.entities.push(staged);

        let mut commands = CommandBatch::new();
        let issued =
            opportunistic_attack(&DecisionContext::new(&snapshot, &config), &mut context, &mut commands);
        assert_eq!(issued, 1);
        assert_eq!(
            commands.into_vec(),
            vec![Command::move_attack(EntityId(100), Vec2::new(150.0, 150.0))]
        );
    }
}
