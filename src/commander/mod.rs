//! Strategic commander: the decision engine
//!
//! Components, leaves first:
//! - `memory`: enemy sighting memory
//! - `staging`, `threat`: rally point geometry and base defense
//! - `economy`, `construction`, `production`: macro management
//! - `scouting`, `attack`: army coordination
//! - `orchestrator`: runs everything on its cadence once per tick
//!
//! All mutable match state lives in [`MatchContext`]; components receive the
//! per-tick [`DecisionContext`] plus the collaborators they need.

pub mod attack;
pub mod construction;
pub mod context;
pub mod economy;
pub mod memory;
pub mod orchestrator;
pub mod production;
pub mod scouting;
pub mod staging;
pub mod threat;
pub mod wave;

pub use context::{DecisionContext, MatchContext};
pub use memory::SightingMemory;
pub use orchestrator::Commander;
pub use production::{IdleHandler, IdleScope, ProductionManager};
pub use wave::Wave;
