//! End-state resolution and presentation.

use bevy::prelude::*;

use super::progress::LevelProgress;
use crate::animation::AnimationLibrary;
use crate::audio::{PlaySoundEvent, SoundEffect};
use crate::camera::{begin_camera_move, MainCamera};
use crate::core::{GameConfig, HazardContactEvent, LevelEndEvent, Outcome, PlayState};
use crate::player::{Player, PLAYER_Z};
use crate::preload::GameAssets;
use crate::vfx::{DeathVfx, ParticleEmitter, WalkingVfx};
use crate::world::LevelEntity;

/// Depth end-state text is drawn at.
const TEXT_Z: f32 = 10.0;

/// Where the death burst appears relative to the player.
const DEATH_BURST_OFFSET: Vec2 = Vec2::new(0.0, 50.0);

const RESTART_HINT: &str = "(Press 'R' to restart)";

/// One line of end-state text, placed relative to the player.
#[derive(Debug, Clone, PartialEq)]
pub struct EndText {
    pub text: String,
    pub font_size: f32,
    pub offset_y: f32,
}

impl EndText {
    fn new(text: impl Into<String>, font_size: f32, offset_y: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            offset_y,
        }
    }
}

/// Text shown for an outcome.
pub fn end_texts(outcome: Outcome) -> Vec<EndText> {
    match outcome {
        Outcome::Spiked => vec![
            EndText::new("Get Spiked!", 64.0, 100.0),
            EndText::new(RESTART_HINT, 32.0, -100.0),
        ],
        Outcome::ForgotKey => vec![
            EndText::new("Forgot the key!", 64.0, 200.0),
            EndText::new(RESTART_HINT, 32.0, 125.0),
        ],
        Outcome::Escaped { coins, total } => vec![
            EndText::new(format!("{}/{} Coins", coins, total), 28.0, 250.0),
            EndText::new("Wow you made it!", 56.0, 200.0),
            EndText::new(RESTART_HINT, 32.0, 125.0),
        ],
    }
}

/// Still frame left where the player was, if any.
pub fn remains_still(outcome: Outcome) -> Option<&'static str> {
    match outcome {
        Outcome::Spiked => Some("dead"),
        Outcome::ForgotKey => Some("hit"),
        Outcome::Escaped { .. } => None,
    }
}

/// Settle the first hazard contact into an outcome and end the level.
pub fn resolve_end_states(
    mut contacts: EventReader<HazardContactEvent>,
    mut progress: ResMut<LevelProgress>,
    mut ends: EventWriter<LevelEndEvent>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    for contact in contacts.read() {
        if let Some(outcome) = progress.resolve(contact.kind) {
            info!("Level over: {:?}", outcome);
            ends.send(LevelEndEvent { outcome });
            next_state.set(PlayState::Over);
        }
    }
}

/// Show the end of the level: text, remains, particles, sound and a
/// final camera move. The player is hidden.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn present_outcome(
    mut commands: Commands,
    mut ends: EventReader<LevelEndEvent>,
    config: Res<GameConfig>,
    assets: Option<Res<GameAssets>>,
    library: Option<Res<AnimationLibrary>>,
    mut player_query: Query<(&Transform, &mut Visibility, Option<&Sprite>), With<Player>>,
    camera_query: Query<(Entity, &Transform, &OrthographicProjection), (With<MainCamera>, Without<Player>)>,
    mut walking: Query<&mut ParticleEmitter, (With<WalkingVfx>, Without<DeathVfx>)>,
    mut death: Query<
        (&mut ParticleEmitter, &mut Transform),
        (With<DeathVfx>, Without<WalkingVfx>, Without<Player>, Without<MainCamera>),
    >,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    let Some(LevelEndEvent { outcome }) = ends.read().last().copied() else {
        return;
    };
    let Ok((player_transform, mut visibility, player_sprite)) = player_query.get_single_mut() else {
        return;
    };
    let at = player_transform.translation.truncate();

    for line in end_texts(outcome) {
        commands.spawn((
            Text2d::new(line.text),
            TextFont {
                font_size: line.font_size,
                ..default()
            },
            TextColor(Color::WHITE),
            Transform::from_xyz(at.x, at.y + line.offset_y, TEXT_Z),
            LevelEntity,
        ));
    }

    if let (Some(still), Some(assets), Some(library)) =
        (remains_still(outcome), assets.as_ref(), library.as_ref())
    {
        if let Some(mut sprite) = assets.still_sprite(library, still) {
            sprite.flip_x = player_sprite.is_some_and(|s| s.flip_x);
            commands.spawn((
                sprite,
                Transform::from_xyz(at.x, at.y, PLAYER_Z).with_scale(player_transform.scale),
                LevelEntity,
            ));
        }
    }

    if outcome.is_failure() {
        if let Ok((mut burst, mut burst_transform)) = death.get_single_mut() {
            let position = at + DEATH_BURST_OFFSET;
            burst_transform.translation.x = position.x;
            burst_transform.translation.y = position.y;
            burst.start();
        }
        sounds.send(PlaySoundEvent(SoundEffect::Fail));
    }

    for mut dust in walking.iter_mut() {
        dust.stop();
        dust.stop_follow();
    }

    if let Ok((camera, camera_transform, projection)) = camera_query.get_single() {
        begin_camera_move(
            &mut commands,
            camera,
            camera_transform.translation.truncate(),
            projection.scale,
            at,
            &config,
        );
    }

    *visibility = Visibility::Hidden;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spiked_text_sits_above_and_below() {
        let texts = end_texts(Outcome::Spiked);
        assert_eq!(texts[0], EndText::new("Get Spiked!", 64.0, 100.0));
        assert_eq!(texts[1].offset_y, -100.0);
        assert_eq!(texts[1].text, RESTART_HINT);
    }

    #[test]
    fn escaped_text_shows_coin_tally() {
        let texts = end_texts(Outcome::Escaped { coins: 3, total: 5 });
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0].text, "3/5 Coins");
        assert_eq!(texts[1].text, "Wow you made it!");
        assert_eq!(remains_still(Outcome::Escaped { coins: 3, total: 5 }), None);
    }

    #[test]
    fn remains_depend_on_outcome() {
        assert_eq!(remains_still(Outcome::Spiked), Some("dead"));
        assert_eq!(remains_still(Outcome::ForgotKey), Some("hit"));
        assert!(Outcome::ForgotKey.is_failure());
    }
}
