//! Scouting coordinator
//!
//! Early game: one light unit per enemy start location. Later: a few random
//! idle army units sent wherever the scout planner has not looked yet.

use crate::commander::context::{DecisionContext, MatchContext};
use crate::core::types::EntityId;
use crate::world::command::{Command, CommandBatch};
use crate::world::services::ScoutPlanner;

/// Run one scouting evaluation; returns the number of scouts dispatched
pub fn manage_scouts(
    view: &DecisionContext,
    context: &mut MatchContext,
    planner: &mut dyn ScoutPlanner,
    commands: &mut CommandBatch,
) -> usize {
    let snapshot = view.snapshot;
    let config = &view.config.scouting;
    let mut picked: Vec<EntityId> = Vec::new();

    if context.tick < config.milestone {
        for &location in &snapshot.enemy_start_locations {
            let scout = snapshot.random_unit(
                |e| {
                    e.kind.is_light_combat()
                        && e.is_idle()
                        && !picked.contains(&e.id)
                        && !commands.has_command_for(e.id)
                },
                &mut context.rng,
            );
            if let Some(scout) = scout {
                picked.push(scout.id);
                commands.push(Command::move_attack(scout.id, location));
            }
        }
    } else {
        for _ in 0..config.scouts_per_wave {
            let scout = snapshot.random_unit(
                |e| {
                    e.kind.is_combat()
                        && e.is_idle()
                        && !picked.contains(&e.id)
                        && !commands.has_command_for(e.id)
                },
                &mut context.rng,
            );
            let Some(scout) = scout else {
                break;
            };
            picked.push(scout.id);
            if let Some(point) = planner.scout_toward_unexplored(snapshot, scout) {
                commands.push(Command::move_attack(scout.id, point));
            }
        }
    }

    if !picked.is_empty() {
        tracing::debug!(tick = context.tick, scouts = picked.len(), "Scouts dispatched");
    }
    picked.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CommanderConfig;
    use crate::core::types::{Alliance, UnitKind, Vec2};
    use crate::world::snapshot::{Entity, WorldSnapshot};

    /// Always points at the same spot
    struct FixedTarget(Option<Vec2>);

    impl ScoutPlanner for FixedTarget {
        fn scout_toward_unexplored(&mut self, _: &WorldSnapshot, _: &Entity) -> Option<Vec2> {
            self.0
        }
    }

    fn own(id: u64, kind: UnitKind) -> Entity {
        Entity::new(EntityId(id), kind, Vec2::new(10.0, 10.0), Alliance::Own)
    }

    fn run(snapshot: &WorldSnapshot, tick: u64, planner: &mut dyn ScoutPlanner) -> CommandBatch {
        let config = CommanderConfig::default();
        let view = DecisionContext::new(snapshot, &config);
        let mut context = MatchContext::new(&config);
        context.tick = tick;
        let mut commands = CommandBatch::new();
        manage_scouts(&view, &mut context, planner, &mut commands);
        commands
    }

    #[test]
    fn test_early_scouts_visit_each_start_location() {
        let mut snapshot = WorldSnapshot::new(200.0, 200.0);
        snapshot.enemy_start_locations = vec![Vec2::new(180.0, 180.0), Vec2::new(20.0, 180.0)];
        for id in 1..4 {
            snapshot.entities.push(own(id, UnitKind::Marine));
        }
        snapshot.entities.push(own(9, UnitKind::Marauder));

        let commands = run(&snapshot, 600, &mut FixedTarget(None)).into_vec();
        assert_eq!(commands.len(), 2);
        let mut scouts: Vec<EntityId> = commands.iter().map(|c| c.actor()).collect();
        scouts.dedup();
        assert_eq!(scouts.len(), 2, "each location gets its own scout");
        assert!(scouts.iter().all(|id| id.0 < 4), "only marines scout early");
        assert!(matches!(commands[0], Command::MoveAttack { at, .. } if at == Vec2::new(180.0, 180.0)));
    }

    #[test]
    fn test_no_idle_marine_no_scout() {
        let mut snapshot = WorldSnapshot::new(200.0, 200.0);
        snapshot.enemy_start_locations = vec![Vec2::new(180.0, 180.0)];
        let mut busy = own(1, UnitKind::Marine);
        busy.orders_empty = false;
        snapshot.entities.push(busy);

        assert!(run(&snapshot, 600, &mut FixedTarget(None)).is_empty());
    }

    #[test]
    fn test_late_scouts_follow_planner() {
        let mut snapshot = WorldSnapshot::new(200.0, 200.0);
        for id in 1..6 {
            snapshot.entities.push(own(id, UnitKind::Marauder));
        }
        let target = Vec2::new(100.0, 150.0);

        let commands = run(&snapshot, 6000, &mut FixedTarget(Some(target))).into_vec();
        assert_eq!(commands.len(), 2);
        assert!(commands
            .iter()
            .all(|c| matches!(c, Command::MoveAttack { at, .. } if *at == target)));
        assert_ne!(commands[0].actor(), commands[1].actor());

        assert!(run(&snapshot, 6000, &mut FixedTarget(None)).is_empty());
    }
}
