//! Notifications queued by the runtime and drained once per tick

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    /// An own entity ran out of orders
    UnitIdle(EntityId),
    /// A hostile entity became visible at a position
    EnemySighted { unit: EntityId, position: Vec2 },
    /// An own entity finished training
    UnitCreated(EntityId),
    /// An own entity was destroyed
    UnitDestroyed(EntityId),
}
