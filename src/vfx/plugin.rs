//! VFX plugin - particle emitters for walking, jumping and dying.

use bevy::prelude::*;

use super::systems::{emit_particles, follow_targets, update_particles};
use crate::core::PlayState;

/// VFX plugin - emits and animates particles while the level isn't paused.
pub struct VfxPlugin;

impl Plugin for VfxPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (follow_targets, emit_particles, update_particles)
                .chain()
                .run_if(in_state(PlayState::Running).or(in_state(PlayState::Over))),
        );
    }
}
