//! Player plugin - movement, ground contact and hazard detection.

use bevy::prelude::*;

use super::movement;

/// Player plugin - handles player movement and contacts.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // Set up movement systems
        movement::setup_movement_systems(app);
    }
}
