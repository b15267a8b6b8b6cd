//! Global events used for cross-system communication.
//!
//! Physics-facing systems translate raw collisions into these events and
//! gameplay systems react to them. This keeps the gameplay rules testable
//! without stepping the physics pipeline.

use bevy::prelude::*;

/// Kinds of collectible found in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Coin,
    Key,
}

/// Kinds of tile that end the level when touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardKind {
    Spikes,
    Door,
}

/// How a level ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Touched a spike tile.
    Spiked,
    /// Reached the door without the key.
    ForgotKey,
    /// Reached the door carrying the key.
    Escaped { coins: u32, total: u32 },
}

impl Outcome {
    /// Whether the player lost.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Outcome::Escaped { .. })
    }
}

/// Sent when the player overlaps a collectible.
#[derive(Event, Debug, Clone, Copy)]
pub struct ItemPickupEvent {
    /// The item entity being picked up
    pub item: Entity,
    /// The player entity
    pub player: Entity,
    pub kind: ItemKind,
}

/// Sent when the player's character controller runs into a hazard tile.
#[derive(Event, Debug, Clone, Copy)]
pub struct HazardContactEvent {
    pub kind: HazardKind,
}

/// Sent exactly once per level when an end state is reached.
#[derive(Event, Debug, Clone, Copy)]
pub struct LevelEndEvent {
    pub outcome: Outcome,
}

/// Asks for the level to be torn down and rebuilt.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RestartRequest;
