//! The commander's view of the game: snapshot in, events in, commands out

pub mod command;
pub mod event;
pub mod services;
pub mod snapshot;

pub use command::{Command, CommandBatch, CommandCategory};
pub use event::GameEvent;
pub use services::{
    ExpansionPlanner, NearestMineralField, PlacementValidator, ResourceLocator, ScoutPlanner,
    Services, WorkerBalancer,
};
pub use snapshot::{Entity, WorldSnapshot};
