//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::config::GameConfig;
use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Restarting) and the PlayState sub-state
/// - Global events (ItemPickupEvent, HazardContactEvent, etc.)
/// - Pause and restart flow
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(GameConfig::load());
        }

        app
            // Initialize game states
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            // Register global events
            .add_event::<ItemPickupEvent>()
            .add_event::<HazardContactEvent>()
            .add_event::<LevelEndEvent>()
            .add_event::<RestartRequest>()

            // Restarting lasts a single frame
            .add_systems(OnEnter(GameState::Restarting), finish_restart)

            // Physics only steps while the level is live
            .add_systems(OnEnter(PlayState::Paused), pause_physics)
            .add_systems(OnEnter(PlayState::Running), resume_physics)

            .add_systems(
                Update,
                (
                    handle_pause_input.run_if(
                        in_state(PlayState::Running).or(in_state(PlayState::Paused)),
                    ),
                    handle_restart_input.run_if(in_state(PlayState::Over)),
                    apply_restart.run_if(in_state(GameState::InGame)),
                )
                    .chain(),
            );
    }
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<PlayState>>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            PlayState::Running => next_state.set(PlayState::Paused),
            PlayState::Paused => next_state.set(PlayState::Running),
            PlayState::Over => {}
        }
    }
}

/// R restarts the level once an end state is showing.
fn handle_restart_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut restart: EventWriter<RestartRequest>,
) {
    if keyboard.pressed(KeyCode::KeyR) {
        restart.send(RestartRequest);
    }
}

/// Leave InGame so the level is torn down, then come straight back.
fn apply_restart(
    mut requests: EventReader<RestartRequest>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if requests.read().count() > 0 {
        info!("Restarting level");
        next_state.set(GameState::Restarting);
    }
}

fn finish_restart(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

fn pause_physics(mut configs: Query<&mut RapierConfiguration>) {
    for mut config in configs.iter_mut() {
        config.physics_pipeline_active = false;
    }
}

fn resume_physics(mut configs: Query<&mut RapierConfiguration>) {
    for mut config in configs.iter_mut() {
        config.physics_pipeline_active = true;
    }
}
