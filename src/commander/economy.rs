//! Economy: worker balancing, MULE calldowns and worker production

use crate::commander::context::{DecisionContext, MatchContext};
use crate::core::types::{Ability, UnitKind};
use crate::world::command::{Command, CommandBatch};
use crate::world::services::WorkerBalancer;

/// Town hall kinds that train workers
const WORKER_PRODUCERS: [UnitKind; 2] = [UnitKind::CommandCenter, UnitKind::OrbitalCommand];

/// Run one economy evaluation
pub fn manage_economy(
    view: &DecisionContext,
    context: &mut MatchContext,
    balancer: &mut dyn WorkerBalancer,
    commands: &mut CommandBatch,
) {
    let snapshot = view.snapshot;
    let config = &view.config.economy;

    balancer.balance(snapshot, commands);

    // Jitter keeps several MULEs from stacking on one tile
    for orbital in snapshot.own_where(UnitKind::is_income_booster) {
        if orbital.energy > config.mule_energy {
            let at = context.jittered(orbital.position, config.mule_jitter);
            commands.push(Command::Cast {
                ability: Ability::CalldownMule,
                caster: orbital.id,
                at,
            });
        }
    }

    let target = balancer.expected_workers(snapshot) + config.extra_workers;
    context.target_workers = target;

    if snapshot.count_kind(UnitKind::Worker) < target {
        for kind in WORKER_PRODUCERS {
            let producer = snapshot
                .own()
                .find(|e| e.kind == kind && e.is_complete() && e.is_idle());
            if let Some(producer) = producer {
                commands.push(Command::train(UnitKind::Worker, producer.id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CommanderConfig;
    use crate::core::types::{Alliance, EntityId, Vec2};
    use crate::world::command::CommandCategory;
    use crate::world::snapshot::{Entity, WorldSnapshot};

    /// Balancer with a fixed ideal count that never issues commands
    struct FixedBalancer(usize);

    impl WorkerBalancer for FixedBalancer {
        fn balance(&mut self, _snapshot: &WorldSnapshot, _commands: &mut CommandBatch) {}

        fn expected_workers(&self, _snapshot: &WorldSnapshot) -> usize {
            self.0
        }
    }

    fn own(id: u64, kind: UnitKind) -> Entity {
        Entity::new(EntityId(id), kind, Vec2::new(20.0, 20.0), Alliance::Own)
    }

    fn run(snapshot: &WorldSnapshot, ideal: usize) -> (CommandBatch, MatchContext) {
        let config = CommanderConfig::default();
        let view = DecisionContext::new(snapshot, &config);
        let mut context = MatchContext::new(&config);
        let mut commands = CommandBatch::new();
        manage_economy(&view, &mut context, &mut FixedBalancer(ideal), &mut commands);
        (commands, context)
    }

    #[test]
    fn test_trains_from_each_producer_type_below_target() {
        let mut snapshot = WorldSnapshot::new(100.0, 100.0);
        snapshot.entities.push(own(1, UnitKind::CommandCenter));
        snapshot.entities.push(own(2, UnitKind::OrbitalCommand));
        snapshot.entities.push(own(3, UnitKind::CommandCenter));
        snapshot.entities.push(own(4, UnitKind::Worker));

        let (commands, context) = run(&snapshot, 10);
        assert_eq!(context.target_workers, 12);
        let trained: Vec<_> = commands.iter().collect();
        assert_eq!(
            trained,
            vec![
                &Command::train(UnitKind::Worker, EntityId(1)),
                &Command::train(UnitKind::Worker, EntityId(2)),
            ]
        );
    }

    #[test]
    fn test_no_training_at_target() {
        let mut snapshot = WorldSnapshot::new(100.0, 100.0);
        snapshot.entities.push(own(1, UnitKind::CommandCenter));
        for id in 10..14 {
            snapshot.entities.push(own(id, UnitKind::Worker));
        }
        let (commands, _) = run(&snapshot, 2);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_busy_or_unfinished_producers_skipped() {
        let mut snapshot = WorldSnapshot::new(100.0, 100.0);
        let mut busy = own(1, UnitKind::CommandCenter);
        busy.orders_empty = false;
        let mut building = own(2, UnitKind::CommandCenter);
        building.build_progress = 0.4;
        snapshot.entities.extend([busy, building]);

        let (commands, _) = run(&snapshot, 10);
        assert_eq!(commands.count(CommandCategory::Train), 0);
    }

    #[test]
    fn test_mule_only_above_energy_threshold() {
        let mut snapshot = WorldSnapshot::new(100.0, 100.0);
        let mut charged = own(1, UnitKind::OrbitalCommand);
        charged.energy = 51.0;
        charged.orders_empty = false;
        let mut drained = own(2, UnitKind::OrbitalCommand);
        drained.energy = 50.0;
        drained.orders_empty = false;
        snapshot.entities.extend([charged, drained]);

        let (commands, _) = run(&snapshot, 0);
        let casts: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                Command::Cast { caster, at, .. } => Some((*caster, *at)),
                _ => None,
            })
            .collect();
        assert_eq!(casts.len(), 1);
        assert_eq!(casts[0].0, EntityId(1));
        assert!((casts[0].1.x - 20.0).abs() <= 2.0);
        assert!((casts[0].1.y - 20.0).abs() <= 2.0);
    }
}
