pub mod config;
pub mod error;
pub mod types;

pub use config::{load_profile, AttackStrategy, CommanderConfig};
pub use error::{CommanderError, Result};
