//! Commander configuration with documented thresholds
//!
//! Every magic number the decision engine uses is collected here. A profile
//! is loaded once at match start (from TOML, or the defaults below) and is
//! never mutated by the engine afterwards.
//!
//! Tick milestones assume roughly 1200 ticks per in-game minute.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{CommanderError, Result};
use crate::core::types::{Tick, UnitKind};

/// How often each subsystem is evaluated, in ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    pub economy: Tick,
    pub construction: Tick,
    /// Staging recompute, threat response and idle-army rally
    pub rally: Tick,
    pub scouting: Tick,
    pub attack: Tick,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            economy: 5,
            construction: 5,
            rally: 100,
            scouting: 600,
            attack: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Orbital energy above which a MULE is called down
    pub mule_energy: f32,
    /// Max per-axis offset of the MULE drop point
    pub mule_jitter: f32,
    /// Workers kept on top of the balancer's ideal count (builders)
    pub extra_workers: usize,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            mule_energy: 50.0,
            mule_jitter: 2.0,
            extra_workers: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyConfig {
    pub per_depot: i64,
    pub per_base: i64,
    /// Hard supply maximum of the game
    pub max_supply: i64,
    /// Start a depot once used supply is within this distance of the projected cap
    pub headroom: i64,
    /// Minerals above which a second depot may be started in the same evaluation
    pub abundant_minerals: u32,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            per_depot: 8,
            per_base: 15,
            max_supply: 200,
            headroom: 3,
            abundant_minerals: 400,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionConfig {
    /// Minerals needed before morphing a command center into an orbital
    pub upgrade_minerals: u32,
    /// Only morph once a barracks exists (orbital prerequisite)
    pub upgrade_requires_barracks: bool,
    pub barracks_minerals: u32,
    pub barracks_per_base: usize,
    pub max_barracks: usize,
    /// Factory and engineering bay unlock once barracks count exceeds this
    pub tech_after_barracks: usize,
    /// Armory unlocks once base count exceeds this
    pub armory_after_bases: usize,
    /// Expansion stops once base count exceeds this
    pub max_bases: usize,
    pub expansion_minerals_per_base: u32,
    /// Draft a busy worker when no idle one exists
    pub allow_busy_builders: bool,
    /// Max per-axis offset of a structure from its builder
    pub build_jitter: f32,
    /// Max distance from a base for its refinery geyser
    pub geyser_radius: f32,
    /// Max per-axis offset of the fallback addon point
    pub addon_jitter: f32,
    /// Abort the fallback addon point when a structure is closer than this
    pub addon_clearance: f32,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            upgrade_minerals: 150,
            upgrade_requires_barracks: true,
            barracks_minerals: 170,
            barracks_per_base: 2,
            max_barracks: 8,
            tech_after_barracks: 3,
            armory_after_bases: 2,
            max_bases: 3,
            expansion_minerals_per_base: 400,
            allow_busy_builders: false,
            build_jitter: 10.0,
            geyser_radius: 15.0,
            addon_jitter: 15.0,
            addon_clearance: 6.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    /// Marines per marauder above which barracks switch to marauders
    pub light_to_heavy_ratio: f32,
    /// Tech labs per reactor below which barracks ask for another tech lab
    pub techlab_to_reactor_ratio: usize,
    /// Tick after which the engineering bay may research
    pub upgrade_milestone: Tick,
    /// Marines plus marauders required before researching
    pub upgrade_army_threshold: usize,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            light_to_heavy_ratio: 2.7,
            techlab_to_reactor_ratio: 2,
            upgrade_milestone: 7200,
            upgrade_army_threshold: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub forward_x: f32,
    pub forward_y: f32,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            forward_x: 5.0,
            forward_y: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    pub radius: f32,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self { radius: 15.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutingConfig {
    /// Before this tick scouts visit enemy start locations, after it they explore
    pub milestone: Tick,
    pub scouts_per_wave: usize,
}

impl Default for ScoutingConfig {
    fn default() -> Self {
        Self {
            milestone: 6000,
            scouts_per_wave: 2,
        }
    }
}

/// Which attack policy (or both) the attack coordinator runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackStrategy {
    /// Accumulate new units into waves, commit each full wave
    WaveCommit,
    /// Strike remembered sightings once the army is big enough
    #[default]
    Opportunistic,
    /// Run both policies independently
    Both,
}

impl AttackStrategy {
    pub fn uses_waves(&self) -> bool {
        matches!(self, AttackStrategy::WaveCommit | AttackStrategy::Both)
    }

    pub fn uses_opportunistic(&self) -> bool {
        matches!(self, AttackStrategy::Opportunistic | AttackStrategy::Both)
    }
}

impl std::str::FromStr for AttackStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "wave_commit" | "wave" => Ok(AttackStrategy::WaveCommit),
            "opportunistic" => Ok(AttackStrategy::Opportunistic),
            "both" => Ok(AttackStrategy::Both),
            other => Err(format!("unknown attack strategy '{}'", other)),
        }
    }
}

/// One entry of a wave's target composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveSlot {
    pub unit: UnitKind,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    pub strategy: AttackStrategy,
    /// Tick after which opportunistic attacks are allowed
    pub minute_milestone: Tick,
    /// Marines plus marauders required for an opportunistic attack
    pub army_threshold: usize,
    /// Units this close to the staging point join an opportunistic attack
    pub staging_radius: f32,
    /// Target composition of every wave
    pub wave: Vec<WaveSlot>,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            strategy: AttackStrategy::default(),
            minute_milestone: 12000,
            army_threshold: 40,
            staging_radius: 10.0,
            wave: vec![
                WaveSlot { unit: UnitKind::Marine, count: 16 },
                WaveSlot { unit: UnitKind::Marauder, count: 6 },
                WaveSlot { unit: UnitKind::SiegeTank, count: 2 },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Sighting memory is decimated only when it holds more entries than this
    pub decimate_above: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { decimate_above: 50 }
    }
}

/// Complete commander profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommanderConfig {
    /// Name of this profile (set from filename)
    pub name: String,
    /// Seed of the injected RNG (build jitter, random picks, target sampling)
    pub seed: u64,
    pub cadence: CadenceConfig,
    pub economy: EconomyConfig,
    pub supply: SupplyConfig,
    pub construction: ConstructionConfig,
    pub production: ProductionConfig,
    pub staging: StagingConfig,
    pub threat: ThreatConfig,
    pub scouting: ScoutingConfig,
    pub attack: AttackConfig,
    pub memory: MemoryConfig,
}

impl CommanderConfig {
    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let cadence = &self.cadence;
        if [
            cadence.economy,
            cadence.construction,
            cadence.rally,
            cadence.scouting,
            cadence.attack,
        ]
        .contains(&0)
        {
            return Err(CommanderError::InvalidConfig(
                "cadences must be at least 1 tick".into(),
            ));
        }

        if self.threat.radius <= 0.0 || self.attack.staging_radius <= 0.0 {
            return Err(CommanderError::InvalidConfig(
                "radii must be positive".into(),
            ));
        }

        if self.production.light_to_heavy_ratio <= 0.0 || self.production.techlab_to_reactor_ratio == 0 {
            return Err(CommanderError::InvalidConfig(format!(
                "production ratios must be positive (light_to_heavy_ratio = {}, techlab_to_reactor_ratio = {})",
                self.production.light_to_heavy_ratio, self.production.techlab_to_reactor_ratio
            )));
        }

        if self.attack.strategy.uses_waves()
            && (self.attack.wave.is_empty() || self.attack.wave.iter().all(|slot| slot.count == 0))
        {
            return Err(CommanderError::InvalidConfig(
                "wave strategy needs a non-empty wave composition".into(),
            ));
        }

        Ok(())
    }
}

/// Load and validate a profile from a TOML file
///
/// The profile name is taken from the file stem.
pub fn load_profile(path: impl AsRef<Path>) -> Result<CommanderConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| CommanderError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = parse_profile(&contents)?;
    config.name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(config)
}

/// Parse and validate a profile from TOML text
pub fn parse_profile(contents: &str) -> Result<CommanderConfig> {
    let config: CommanderConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}
