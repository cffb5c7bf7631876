//! Threat detection around bases and the staging point

use crate::core::types::Vec2;
use crate::world::command::{Command, CommandBatch};
use crate::world::snapshot::{Entity, WorldSnapshot};

/// Hostile entities closer than `radius` to the staging point or any own base
pub fn threats(snapshot: &WorldSnapshot, staging: Option<Vec2>, radius: f32) -> Vec<&Entity> {
    let bases: Vec<Vec2> = snapshot.bases().map(|b| b.position).collect();

    snapshot
        .enemies()
        .filter(|enemy| {
            let near_staging = staging.map_or(false, |s| enemy.position.distance(&s) < radius);
            near_staging || bases.iter().any(|b| enemy.position.distance(b) < radius)
        })
        .collect()
}

/// Order every idle combat unit onto the threat nearest to it
pub fn respond_to_threats(
    snapshot: &WorldSnapshot,
    threats: &[&Entity],
    commands: &mut CommandBatch,
) -> usize {
    if threats.is_empty() {
        return 0;
    }

    let mut issued = 0;
    for unit in snapshot.own().filter(|e| e.kind.is_combat() && e.is_idle()) {
        let nearest = threats.iter().min_by(|a, b| {
            let da = a.position.distance_squared(&unit.position);
            let db = b.position.distance_squared(&unit.position);
            da.total_cmp(&db)
        });
        if let Some(threat) = nearest {
            commands.push(Command::move_attack(unit.id, threat.position));
            issued += 1;
        }
    }

    tracing::debug!(threats = threats.len(), defenders = issued, "Responding to threats");
    issued
}
