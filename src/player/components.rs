//! Player-related components.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Tracks player movement state for physics.
#[derive(Component, Debug, Default)]
pub struct MovementState {
    /// Pixels per second, +y up
    pub velocity: Vec2,
    pub grounded: bool,
    /// What the ground probe hit last frame
    pub ground_entity: Option<Entity>,
}

/// Which way the sprite faces.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Horizontal intent for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
    None,
}

impl Steer {
    /// Left wins when both directions are held.
    pub fn from_keys(left: bool, right: bool) -> Self {
        if left {
            Steer::Left
        } else if right {
            Steer::Right
        } else {
            Steer::None
        }
    }

    /// -1, 0 or +1.
    pub fn sign(&self) -> f32 {
        match self {
            Steer::Left => -1.0,
            Steer::Right => 1.0,
            Steer::None => 0.0,
        }
    }
}
