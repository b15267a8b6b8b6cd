//! Debug plugin - D shows or hides the physics collider overlay.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Debug plugin - expects `RapierDebugRenderPlugin` to be added by the app.
pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            toggle_physics_overlay.run_if(resource_exists::<DebugRenderContext>),
        );
    }
}

/// Flip the collider overlay on D.
pub fn toggle_physics_overlay(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut context: ResMut<DebugRenderContext>,
) {
    if keyboard.just_pressed(KeyCode::KeyD) {
        context.enabled = !context.enabled;
        info!(
            "Physics overlay {}",
            if context.enabled { "on" } else { "off" }
        );
    }
}
