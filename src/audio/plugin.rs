//! Sound effect playback.

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl};

use crate::preload::GameAssets;

/// Every sound the level can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Jump,
    Coin,
    Key,
    Fail,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] = [
        SoundEffect::Jump,
        SoundEffect::Coin,
        SoundEffect::Key,
        SoundEffect::Fail,
    ];

    /// Path relative to the assets folder.
    pub fn path(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "audio/phaseJump2.ogg",
            SoundEffect::Coin => "audio/powerUp9.ogg",
            SoundEffect::Key => "audio/powerUp11.ogg",
            SoundEffect::Fail => "audio/phaserDown3.ogg",
        }
    }
}

/// Request to play a sound once.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySoundEvent(pub SoundEffect);

/// Audio plugin - turns `PlaySoundEvent`s into kira playback.
///
/// Expects `bevy_kira_audio::AudioPlugin` to be added by the app.
pub struct AudioFxPlugin;

impl Plugin for AudioFxPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlaySoundEvent>()
            .add_systems(Update, play_sound_effects.run_if(resource_exists::<GameAssets>));
    }
}

/// Play every requested sound effect.
pub fn play_sound_effects(
    mut events: EventReader<PlaySoundEvent>,
    audio: Res<Audio>,
    assets: Res<GameAssets>,
) {
    for PlaySoundEvent(effect) in events.read() {
        match assets.sounds.get(effect) {
            Some(handle) => {
                audio.play(handle.clone());
            }
            None => warn!("No sound loaded for {:?}", effect),
        }
    }
}
