//! Cliffside - Entry Point
//!
//! Controls:
//! - Left/Right arrows: Run
//! - Up arrow: Jump
//! - Escape: Pause/Unpause
//! - R: Restart once the level is over
//! - D: Toggle the physics overlay

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use cliffside_platformer::core::GameConfig;

fn main() {
    let config = GameConfig::load();

    App::new()
        // Bevy default plugins
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.window_title.clone(),
                        resolution: config.window_size.into(),
                        ..default()
                    }),
                    ..default()
                })
                // Tile art is pixel art
                .set(ImagePlugin::default_nearest()),
        )

        // Physics; the player integrates its own gravity
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(64.0))
        .add_plugins(RapierDebugRenderPlugin {
            enabled: false,
            ..default()
        })
        .add_systems(Startup, disable_world_gravity)

        // Audio
        .add_plugins(bevy_kira_audio::AudioPlugin)

        // Our game plugin
        .insert_resource(config)
        .add_plugins(cliffside_platformer::PlatformerPlugin)

        .run();
}

fn disable_world_gravity(mut configs: Query<&mut RapierConfiguration>) {
    for mut config in configs.iter_mut() {
        config.gravity = Vec2::ZERO;
    }
}
