//! Outcome plugin - ends the level on spikes or at the door.

use bevy::prelude::*;

use super::progress::LevelProgress;
use super::systems::{present_outcome, resolve_end_states};
use crate::core::{GameState, PlayState};
use crate::pickups::apply_pickups;
use crate::player::detect_hazards;

/// Outcome plugin - resolves hazard contacts into end states.
pub struct OutcomePlugin;

impl Plugin for OutcomePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                // A key picked up on the same frame as the door still counts
                resolve_end_states
                    .after(detect_hazards)
                    .after(apply_pickups)
                    .run_if(in_state(PlayState::Running)),
                present_outcome,
            )
                .chain()
                .run_if(resource_exists::<LevelProgress>)
                .run_if(in_state(GameState::InGame)),
        );
    }
}
