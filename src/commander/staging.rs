//! Staging point geometry and idle-army rally

use crate::core::config::StagingConfig;
use crate::core::types::Vec2;
use crate::world::command::{Command, CommandBatch};
use crate::world::snapshot::WorldSnapshot;

/// Compute the rally point in front of the base closest to map center
///
/// Returns `None` while at most one base is owned, meaning the current
/// staging point stays as it is. Ties keep the first base in roster order.
pub fn compute_staging_point(snapshot: &WorldSnapshot, config: &StagingConfig) -> Option<Vec2> {
    if snapshot.base_count() <= 1 {
        return None;
    }

    let center = snapshot.map_center();
    let mut bases = snapshot.bases();
    let mut closest = bases.next()?;
    for base in bases {
        if base.position.distance(&center) < closest.position.distance(&center) {
            closest = base;
        }
    }

    let dir = closest.position.towards(&center);
    Some(Vec2::new(
        closest.position.x + dir.x * config.forward_x,
        closest.position.y + dir.y * config.forward_y,
    ))
}

/// Send idle combat units to the staging point
///
/// Units already commanded this tick (e.g. by the threat response) are left
/// alone. Returns the number of orders issued.
pub fn rally_idle_army(
    snapshot: &WorldSnapshot,
    staging: Option<Vec2>,
    commands: &mut CommandBatch,
) -> usize {
    let Some(staging) = staging else {
        return 0;
    };

    let idle: Vec<_> = snapshot
        .own()
        .filter(|e| e.kind.is_combat() && e.is_idle() && !commands.has_command_for(e.id))
        .map(|e| e.id)
        .collect();

    for &id in &idle {
        commands.push(Command::move_attack(id, staging));
    }
    idle.len()
}
