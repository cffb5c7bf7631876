//! Commands emitted by the commander
//!
//! Commands are fire-and-forget: the execution layer may silently ignore one
//! aimed at a busy or destroyed entity.

use serde::{Deserialize, Serialize};

use crate::core::types::{Ability, EntityId, UnitKind, Vec2};

/// A single command for the execution layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Train {
        unit: UnitKind,
        producer: EntityId,
    },
    /// Construct a structure; for addons `builder` is the parent structure
    Build {
        structure: UnitKind,
        at: Vec2,
        builder: EntityId,
    },
    Morph {
        ability: Ability,
        entity: EntityId,
    },
    Research {
        ability: Ability,
        structure: EntityId,
    },
    MoveAttack {
        unit: EntityId,
        at: Vec2,
    },
    Gather {
        unit: EntityId,
        node: EntityId,
    },
    /// Point-targeted ability such as the MULE calldown
    Cast {
        ability: Ability,
        caster: EntityId,
        at: Vec2,
    },
}

/// Coarse command category, used for logging and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandCategory {
    Train,
    Build,
    Morph,
    Research,
    MoveAttack,
    Gather,
    Cast,
}

impl Command {
    pub fn category(&self) -> CommandCategory {
        match self {
            Command::Train { .. } => CommandCategory::Train,
            Command::Build { .. } => CommandCategory::Build,
            Command::Morph { .. } => CommandCategory::Morph,
            Command::Research { .. } => CommandCategory::Research,
            Command::MoveAttack { .. } => CommandCategory::MoveAttack,
            Command::Gather { .. } => CommandCategory::Gather,
            Command::Cast { .. } => CommandCategory::Cast,
        }
    }

    /// The entity the command is addressed to
    pub fn actor(&self) -> EntityId {
        match self {
            Command::Train { producer, .. } => *producer,
            Command::Build { builder, .. } => *builder,
            Command::Morph { entity, .. } => *entity,
            Command::Research { structure, .. } => *structure,
            Command::MoveAttack { unit, .. } => *unit,
            Command::Gather { unit, .. } => *unit,
            Command::Cast { caster, .. } => *caster,
        }
    }

    pub fn move_attack(unit: EntityId, at: Vec2) -> Self {
        Command::MoveAttack { unit, at }
    }

    pub fn train(unit: UnitKind, producer: EntityId) -> Self {
        Command::Train { unit, producer }
    }

    pub fn build(structure: UnitKind, at: Vec2, builder: EntityId) -> Self {
        Command::Build {
            structure,
            at,
            builder,
        }
    }
}

/// Ordered batch of commands produced during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandBatch {
    commands: Vec<Command>,
}

impl CommandBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn count(&self, category: CommandCategory) -> usize {
        self.commands
            .iter()
            .filter(|c| c.category() == category)
            .count()
    }

    /// Builds of a given structure in this batch
    pub fn builds_of(&self, structure: UnitKind) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Build { structure: s, .. } if *s == structure))
            .count()
    }

    /// True if this batch already gave the entity a command
    pub fn has_command_for(&self, id: EntityId) -> bool {
        self.commands.iter().any(|c| c.actor() == id)
    }

    pub fn into_vec(self) -> Vec<Command> {
        self.commands
    }
}

impl IntoIterator for CommandBatch {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
