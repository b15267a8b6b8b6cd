//! Pickups plugin - coins and the key.

use bevy::prelude::*;

use super::systems::{apply_pickups, detect_pickups};
use crate::core::PlayState;
use crate::outcome::LevelProgress;

/// Pickups plugin - turns sensor overlaps into collected items.
pub struct PickupsPlugin;

impl Plugin for PickupsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (detect_pickups, apply_pickups)
                .chain()
                .run_if(resource_exists::<LevelProgress>)
                .run_if(in_state(PlayState::Running)),
        );
    }
}
