//! Forge Commander - Strategic decision engine for a real-time strategy faction
//!
//! Each tick the runtime hands the [`commander::Commander`] a read-only
//! [`world::WorldSnapshot`] plus the events since the last tick, and gets back
//! a batch of fire-and-forget commands.

pub mod commander;
pub mod core;
pub mod sandbox;
pub mod world;
