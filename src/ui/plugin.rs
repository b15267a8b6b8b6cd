//! UI plugin - loading screen, HUD and pause menu.

use bevy::prelude::*;

use crate::core::{GameState, PlayState, RestartRequest};
use super::hud;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Setup HUD systems
        hud::setup_hud_systems(app);

        app
            // Loading screen
            .add_systems(OnEnter(GameState::Loading), setup_loading_screen)
            .add_systems(OnExit(GameState::Loading), cleanup_loading_screen)

            // Pause menu
            .add_systems(OnEnter(PlayState::Paused), setup_pause_menu)
            .add_systems(Update, pause_menu_input.run_if(in_state(PlayState::Paused)))
            .add_systems(OnExit(PlayState::Paused), cleanup_pause_menu);
    }
}

/// Marker for loading screen UI entities.
#[derive(Component)]
struct LoadingUi;

/// Marker for pause menu UI entities.
#[derive(Component)]
struct PauseMenuUi;

/// Marker for menu buttons.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum MenuButton {
    Resume,
    Restart,
}

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVERED: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

/// Set up the loading screen.
fn setup_loading_screen(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.05, 0.05, 0.08)),
            LoadingUi,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading..."),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

fn cleanup_loading_screen(mut commands: Commands, query: Query<Entity, With<LoadingUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

/// Helper to spawn a menu button.
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

/// Set up the pause menu.
fn setup_pause_menu(mut commands: Commands) {
    // Semi-transparent overlay
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            PauseMenuUi,
        ))
        .with_children(|parent| {
            // Title
            parent.spawn((
                Text::new("PAUSED"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            spawn_menu_button(parent, "Resume", MenuButton::Resume);
            spawn_menu_button(parent, "Restart", MenuButton::Restart);
        });
}

/// Handle pause menu button interactions.
fn pause_menu_input(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_state: ResMut<NextState<PlayState>>,
    mut restart: EventWriter<RestartRequest>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BUTTON_PRESSED.into();
                match button {
                    MenuButton::Resume => {
                        next_state.set(PlayState::Running);
                    }
                    MenuButton::Restart => {
                        restart.send(RestartRequest);
                    }
                }
            }
            Interaction::Hovered => {
                *bg_color = BUTTON_HOVERED.into();
            }
            Interaction::None => {
                *bg_color = BUTTON_IDLE.into();
            }
        }
    }
}

/// Clean up pause menu entities.
fn cleanup_pause_menu(mut commands: Commands, query: Query<Entity, With<PauseMenuUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use crate::core::{CorePlugin, GameConfig};

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(GameConfig::default())
            .add_plugins(CorePlugin)
            .add_systems(OnEnter(PlayState::Paused), setup_pause_menu)
            .add_systems(Update, pause_menu_input.run_if(in_state(PlayState::Paused)))
            .add_systems(OnExit(PlayState::Paused), cleanup_pause_menu);

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::InGame);
        app.update();
        app.world_mut()
            .resource_mut::<NextState<PlayState>>()
            .set(PlayState::Paused);
        app.update();
        app
    }

    fn press_button(app: &mut App, which: MenuButton) {
        let world = app.world_mut();
        let mut buttons = world.query::<(&MenuButton, &mut Interaction)>();
        for (button, mut interaction) in buttons.iter_mut(world) {
            if *button == which {
                *interaction = Interaction::Pressed;
            }
        }
    }

    fn menu_count(app: &mut App) -> usize {
        let world = app.world_mut();
        world.query::<&PauseMenuUi>().iter(world).count()
    }

    #[test]
    fn resume_closes_the_menu() {
        let mut app = test_app();
        assert_eq!(menu_count(&mut app), 1);

        press_button(&mut app, MenuButton::Resume);
        app.update();
        app.update();
        assert_eq!(*app.world().resource::<State<PlayState>>().get(), PlayState::Running);
        assert_eq!(menu_count(&mut app), 0);
    }

    #[test]
    fn restart_rebuilds_from_running() {
        let mut app = test_app();

        press_button(&mut app, MenuButton::Restart);
        for _ in 0..4 {
            app.update();
        }
        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
        assert_eq!(*app.world().resource::<State<PlayState>>().get(), PlayState::Running);
    }
}
