//! World plugin - level loading, tile layers, objects and platforms.

use bevy::prelude::*;

use crate::animation::AnimationLibrary;
use crate::camera::{reset_camera, CameraSet, MainCamera};
use crate::core::{GameConfig, GameState};
use crate::outcome::LevelProgress;
use crate::player::{spawn_player, Player};
use crate::preload::GameAssets;
use crate::vfx::{spawn_emitters, EmitterPresets};

use super::builder::{build_layers, LevelEntity};
use super::data::{load_level_definitions, load_palette_files, CurrentLevel, LevelRegistry};
use super::parallax::apply_parallax;
use super::platforms::{setup_platform_systems, PlatformCycle};
use super::spawning::spawn_objects;

/// World plugin - handles level loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (load_palette_files, load_level_definitions).chain(),
        )
        .add_systems(OnEnter(GameState::InGame), setup_level)
        .add_systems(OnExit(GameState::InGame), cleanup_level)
        .add_systems(
            PostUpdate,
            apply_parallax
                .after(CameraSet)
                .before(TransformSystem::TransformPropagate),
        );

        setup_platform_systems(app);
    }
}

/// Set up the level from data.
#[allow(clippy::too_many_arguments)]
pub fn setup_level(
    mut commands: Commands,
    level_registry: Res<LevelRegistry>,
    current_level: Res<CurrentLevel>,
    config: Res<GameConfig>,
    assets: Res<GameAssets>,
    library: Res<AnimationLibrary>,
    presets: Res<EmitterPresets>,
    camera_query: Query<Entity, With<MainCamera>>,
) {
    let Some(level) = level_registry.get(&current_level.name) else {
        error!("Level '{}' not found in registry!", current_level.name);
        return;
    };

    info!("Building level: {}", level.name);

    build_layers(&mut commands, level, &assets);
    spawn_objects(&mut commands, level, &assets, &library);

    let start = level.grid_to_world(level.player_start.0, level.player_start.1);
    let player = spawn_player(&mut commands, start, &config, &assets, &library);
    spawn_emitters(&mut commands, &presets);

    match camera_query.get_single() {
        Ok(camera) => reset_camera(&mut commands, camera, player, start, level.size_in_pixels(), &config),
        Err(_) => warn!("No main camera, the level will not be followed"),
    }

    commands.insert_resource(LevelProgress::new(level.coin_count()));
    commands.insert_resource(PlatformCycle::from_config(&config));
}

/// Clean up level entities when leaving InGame state.
fn cleanup_level(
    mut commands: Commands,
    level_query: Query<Entity, With<LevelEntity>>,
    player_query: Query<Entity, With<Player>>,
) {
    for entity in level_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    for entity in player_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
