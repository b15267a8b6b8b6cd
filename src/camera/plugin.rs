//! Camera plugin - the 2D game camera.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::systems::{animate_camera_move, follow_target, spawn_camera};
use crate::core::GameState;

/// Camera updates; runs after physics has moved the player.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraSet;

/// Camera plugin - follow, bounds and end-of-level moves.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            PostUpdate,
            CameraSet
                .after(PhysicsSet::Writeback)
                .before(TransformSystem::TransformPropagate),
        )
        .add_systems(Startup, spawn_camera)
        .add_systems(
            PostUpdate,
            (follow_target, animate_camera_move)
                .chain()
                .in_set(CameraSet)
                .run_if(in_state(GameState::InGame)),
        );
    }
}
