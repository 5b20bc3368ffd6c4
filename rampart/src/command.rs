//! Commands the command mode composes and hands to the world.

use std::fmt;

use crate::coord::WorldPos;
use crate::world::{EntityId, EntityTypeId, PlayerId};

/// What a command is aimed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandTarget {
    /// An entity occupies the clicked position.
    Entity(EntityId),
    /// Nothing there; the position itself is the target.
    Position(WorldPos),
    /// Production order for a unit type.
    Produce(EntityTypeId),
}

/// An ability a command is forced to use, overriding the world's
/// contextual choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    Move,
    Gather,
    Garrison,
    Build,
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Ability::Move => "move",
            Ability::Gather => "gather",
            Ability::Garrison => "garrison",
            Ability::Build => "build",
        };
        f.write_str(s)
    }
}

/// A composed order, applied to each selected entity by the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub player: PlayerId,
    pub target: CommandTarget,
    /// Forced ability, `None` lets the world pick contextually.
    pub ability: Option<Ability>,
    /// Direct commands execute immediately instead of queueing.
    pub direct: bool,
}

impl Command {
    /// A direct command, the form every pointer/shortcut path issues.
    pub fn direct(player: PlayerId, target: CommandTarget) -> Self {
        Self {
            player,
            target,
            ability: None,
            direct: true,
        }
    }

    pub fn with_ability(mut self, ability: Option<Ability>) -> Self {
        self.ability = ability;
        self
    }
}
