//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for entities, as reported by the game snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Game tick counter (one snapshot per tick)
pub type Tick = u64;

/// 2D position in map coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Unit vector pointing from `self` towards `target`
    pub fn towards(&self, target: &Self) -> Self {
        (*target - *self).normalize()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

/// Which side an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alliance {
    Own,
    Ally,
    Neutral,
    Enemy,
}

/// Type tag of an entity
///
/// Only the kinds the commander reasons about are named; everything else the
/// snapshot reports arrives as `Other` with the raw game type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    // Workers
    Worker,
    Mule,

    // Town halls
    CommandCenter,
    OrbitalCommand,
    OrbitalCommandFlying,
    PlanetaryFortress,

    // Structures
    SupplyDepot,
    SupplyDepotLowered,
    Refinery,
    Barracks,
    BarracksFlying,
    BarracksTechLab,
    BarracksReactor,
    Factory,
    FactoryFlying,
    FactoryTechLab,
    EngineeringBay,
    Armory,

    // Combat units
    Marine,
    Marauder,
    SiegeTank,
    SiegeTankSieged,

    // Neutral resources
    MineralField,
    VespeneGeyser,

    Other(u32),
}

impl UnitKind {
    pub fn is_town_hall(&self) -> bool {
        matches!(
            self,
            UnitKind::CommandCenter
                | UnitKind::OrbitalCommand
                | UnitKind::OrbitalCommandFlying
                | UnitKind::PlanetaryFortress
        )
    }

    /// Orbital commands boost income through the MULE calldown
    pub fn is_income_booster(&self) -> bool {
        matches!(self, UnitKind::OrbitalCommand | UnitKind::OrbitalCommandFlying)
    }

    pub fn is_supply_depot(&self) -> bool {
        matches!(self, UnitKind::SupplyDepot | UnitKind::SupplyDepotLowered)
    }

    pub fn is_barracks(&self) -> bool {
        matches!(self, UnitKind::Barracks | UnitKind::BarracksFlying)
    }

    pub fn is_factory(&self) -> bool {
        matches!(self, UnitKind::Factory | UnitKind::FactoryFlying)
    }

    pub fn is_light_combat(&self) -> bool {
        matches!(self, UnitKind::Marine)
    }

    pub fn is_heavy_combat(&self) -> bool {
        matches!(self, UnitKind::Marauder)
    }

    pub fn is_siege(&self) -> bool {
        matches!(self, UnitKind::SiegeTank | UnitKind::SiegeTankSieged)
    }

    /// Units the army coordinators move around
    pub fn is_combat(&self) -> bool {
        self.is_light_combat() || self.is_heavy_combat() || self.is_siege()
    }

    pub fn is_harvester(&self) -> bool {
        matches!(self, UnitKind::Worker | UnitKind::Mule)
    }

    pub fn is_structure(&self) -> bool {
        self.is_town_hall()
            || self.is_supply_depot()
            || self.is_barracks()
            || self.is_factory()
            || matches!(
                self,
                UnitKind::Refinery
                    | UnitKind::BarracksTechLab
                    | UnitKind::BarracksReactor
                    | UnitKind::FactoryTechLab
                    | UnitKind::EngineeringBay
                    | UnitKind::Armory
            )
    }
}

/// Abilities issued through `Morph`, `Research` and `Cast` commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    UpgradeToOrbital,
    CalldownMule,
    ResearchInfantryWeaponsLevel1,
    ResearchInfantryArmorLevel1,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_towards_is_unit_length() {
        let from = Vec2::new(10.0, 10.0);
        let to = Vec2::new(13.0, 14.0);
        let dir = from.towards(&to);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!((dir.x - 0.6).abs() < 1e-5);
        assert!((dir.y - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_towards_same_point_is_zero() {
        let p = Vec2::new(4.0, 4.0);
        assert_eq!(p.towards(&p), Vec2::default());
    }

    #[test]
    fn test_kind_roles() {
        assert!(UnitKind::OrbitalCommand.is_town_hall());
        assert!(UnitKind::OrbitalCommand.is_income_booster());
        assert!(!UnitKind::CommandCenter.is_income_booster());
        assert!(UnitKind::SiegeTankSieged.is_combat());
        assert!(!UnitKind::Worker.is_combat());
        assert!(UnitKind::SupplyDepotLowered.is_structure());
        assert!(!UnitKind::Other(42).is_structure());
    }
}
