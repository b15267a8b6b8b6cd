//! In-game HUD - coin counter and key indicator.

use bevy::prelude::*;

use crate::core::GameState;
use crate::outcome::LevelProgress;

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for the coin counter text.
#[derive(Component)]
pub struct CoinCounter;

/// Marker for the key indicator text.
#[derive(Component)]
pub struct KeyIndicator;

const KEY_MISSING: Color = Color::srgba(0.6, 0.6, 0.6, 0.6);
const KEY_HELD: Color = Color::srgb(1.0, 0.85, 0.2);

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            update_hud
                .run_if(in_state(GameState::InGame))
                .run_if(resource_exists_and_changed::<LevelProgress>),
        );
}

/// Text of the coin counter.
pub fn coin_label(progress: &LevelProgress) -> String {
    format!("Coins {}/{}", progress.coins_taken, progress.coins_total)
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // HUD root container (top-left corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Start,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(coin_label(&LevelProgress::default())),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    margin: UiRect::bottom(Val::Px(6.0)),
                    ..default()
                },
                CoinCounter,
            ));

            parent.spawn((
                Text::new("Key"),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(KEY_MISSING),
                KeyIndicator,
            ));
        });
}

/// Refresh the counter and key indicator from the level progress.
fn update_hud(
    progress: Res<LevelProgress>,
    mut coins: Query<&mut Text, (With<CoinCounter>, Without<KeyIndicator>)>,
    mut key: Query<&mut TextColor, With<KeyIndicator>>,
) {
    for mut text in coins.iter_mut() {
        text.0 = coin_label(&progress);
    }
    for mut color in key.iter_mut() {
        color.0 = if progress.has_key { KEY_HELD } else { KEY_MISSING };
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
