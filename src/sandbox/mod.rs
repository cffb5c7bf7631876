//! Sandbox: reference collaborators and a toy match
//!
//! Used by the `commander_sim` binary, the integration tests and the bench.

pub mod services;
pub mod world;

pub use services::{CornerScout, OpenGroundPlacement, SaturationBalancer, SiteListExpansions};
pub use world::{SandboxWorld, WorldSummary};

use crate::core::types::Vec2;
use crate::world::services::{NearestMineralField, Services};

/// The sandbox collaborators, expanding through `expansion_sites` in order
pub fn default_services(expansion_sites: Vec<Vec2>) -> Services {
    Services {
        placement: Box::new(OpenGroundPlacement::default()),
        resources: Box::new(NearestMineralField),
        balancer: Box::new(SaturationBalancer::new()),
        expansions: Box::new(SiteListExpansions::new(expansion_sites)),
        scouting: Box::new(CornerScout::new()),
    }
}
