//! Cliffside - a small side-scrolling platformer in Bevy.
//!
//! Run and jump across a tile map, grab the coins and the key, avoid the
//! spikes and leave through the door.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, tuning, pause and restart
//! - **Preload**: Loading screen that gathers images, atlases and sounds
//! - **Animation**: Sprite sheet clips and still frames
//! - **World**: Level data, tile layers, colliders, parallax, platforms
//! - **Player**: Movement, ground contact, hazard detection
//! - **Pickups**: Coins and the key
//! - **Outcome**: Level progress and end states
//! - **Camera**: Follow, map bounds, end-of-level zoom and pan
//! - **Vfx**: Particle emitters
//! - **Audio**: Sound effects
//! - **UI**: Loading screen, HUD, pause menu
//! - **Debug**: Physics overlay toggle

pub mod animation;
pub mod audio;
pub mod camera;
pub mod core;
pub mod debug;
pub mod outcome;
pub mod pickups;
pub mod player;
pub mod preload;
pub mod ui;
pub mod vfx;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct PlatformerPlugin;

impl Plugin for PlatformerPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Assets and animation
            .add_plugins(preload::PreloadPlugin)
            .add_plugins(animation::AnimationPlugin)

            // World and gameplay
            .add_plugins(world::WorldPlugin)
            .add_plugins(player::PlayerPlugin)
            .add_plugins(pickups::PickupsPlugin)
            .add_plugins(outcome::OutcomePlugin)

            // Presentation
            .add_plugins(camera::CameraPlugin)
            .add_plugins(vfx::VfxPlugin)
            .add_plugins(audio::AudioFxPlugin)
            .add_plugins(ui::UiPlugin)
            .add_plugins(debug::DebugPlugin);
    }
}
