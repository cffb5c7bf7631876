//! Per-match mutable state and the per-tick read-only view

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::commander::memory::SightingMemory;
use crate::commander::wave::Wave;
use crate::core::config::CommanderConfig;
use crate::core::types::{Tick, Vec2};
use crate::world::snapshot::WorldSnapshot;

/// Everything the commander remembers between ticks
///
/// Owned by the orchestrator and lent to one component at a time.
#[derive(Debug, Clone)]
pub struct MatchContext {
    pub tick: Tick,
    pub sightings: SightingMemory,
    /// Rally point; unset until more than one base is owned
    pub staging: Option<Vec2>,
    /// The wave currently being filled
    pub wave: Wave,
    /// Marines per marauder the barracks aim for
    pub light_to_heavy_ratio: f32,
    /// Last worker target computed by the economy manager
    pub target_workers: usize,
    pub rng: ChaCha8Rng,
}

impl MatchContext {
    pub fn new(config: &CommanderConfig) -> Self {
        Self {
            tick: 0,
            sightings: SightingMemory::new(),
            staging: None,
            wave: Wave::from_slots(&config.attack.wave),
            light_to_heavy_ratio: config.production.light_to_heavy_ratio,
            target_workers: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// `center` offset by up to `scale` on each axis
    pub fn jittered(&mut self, center: Vec2, scale: f32) -> Vec2 {
        let rx: f32 = self.rng.gen_range(-1.0..=1.0);
        let ry: f32 = self.rng.gen_range(-1.0..=1.0);
        Vec2::new(center.x + rx * scale, center.y + ry * scale)
    }
}

/// Read-only inputs of one tick
pub struct DecisionContext<'a> {
    pub snapshot: &'a WorldSnapshot,
    pub config: &'a CommanderConfig,
}

impl<'a> DecisionContext<'a> {
    pub fn new(snapshot: &'a WorldSnapshot, config: &'a CommanderConfig) -> Self {
        Self { snapshot, config }
    }
}
