//! Camera components.

use bevy::prelude::*;

use crate::core::Tween;

/// The single game camera. It outlives levels and is reset on each build.
#[derive(Component)]
pub struct MainCamera;

/// Smoothly tracks a target entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct CameraFollow {
    pub target: Entity,
    /// Fraction of the remaining distance covered per 60 Hz frame
    pub lerp: f32,
    /// The target may drift this far (full width, height) before the
    /// camera moves
    pub deadzone: Vec2,
}

/// Map extents the view is kept inside.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    pub size: Vec2,
}

/// A scripted zoom and pan, used once the level is over.
#[derive(Component, Debug, Clone)]
pub struct CameraMove {
    pub zoom: Tween<f32>,
    pub pan: Tween<Vec2>,
}

impl CameraMove {
    /// Zoom from `from_zoom` to `to_zoom` while panning to `target`.
    pub fn towards(from_zoom: f32, to_zoom: f32, from: Vec2, target: Vec2, secs: f32) -> Self {
        Self {
            zoom: Tween::new(from_zoom, to_zoom, secs),
            pan: Tween::new(from, target, secs),
        }
    }
}
