//! Handles to every image, atlas layout and sound the level uses.

use bevy::asset::UntypedAssetId;
use bevy::prelude::*;
use bevy_kira_audio::AudioSource;
use std::collections::HashMap;

use crate::animation::{AnimationLibrary, SheetId, SpriteAnimation};
use crate::audio::SoundEffect;

/// Image and grid layout of one sprite sheet.
#[derive(Debug, Clone)]
pub struct SheetHandles {
    pub image: Handle<Image>,
    pub layout: Handle<TextureAtlasLayout>,
}

/// Everything requested while loading.
#[derive(Resource, Default)]
pub struct GameAssets {
    pub sheets: HashMap<SheetId, SheetHandles>,
    /// Particle images keyed by their asset path
    pub particles: HashMap<String, Handle<Image>>,
    pub sounds: HashMap<SoundEffect, Handle<AudioSource>>,
}

impl GameAssets {
    /// A sprite showing one frame of a sheet.
    pub fn atlas_sprite(&self, sheet: SheetId, index: usize) -> Sprite {
        match self.sheets.get(&sheet) {
            Some(handles) => Sprite::from_atlas_image(
                handles.image.clone(),
                TextureAtlas {
                    layout: handles.layout.clone(),
                    index,
                },
            ),
            None => {
                warn!("Sprite sheet {:?} was never loaded", sheet);
                Sprite::default()
            }
        }
    }

    /// A sprite plus its animation, starting on the clip's first frame.
    pub fn animated_sprite(
        &self,
        library: &AnimationLibrary,
        clip_name: &str,
    ) -> Option<(Sprite, SpriteAnimation)> {
        let clip = library.clip(clip_name)?;
        let first = clip.frames.first().copied().unwrap_or(0);
        Some((
            self.atlas_sprite(clip.sheet, first),
            SpriteAnimation::from_clip(clip_name, clip),
        ))
    }

    /// A sprite showing a named still frame.
    pub fn still_sprite(&self, library: &AnimationLibrary, name: &str) -> Option<Sprite> {
        let still = library.still(name)?;
        Some(self.atlas_sprite(still.sheet, still.frame))
    }

    /// Ids of every requested asset, for load tracking.
    pub fn untyped_ids(&self) -> Vec<UntypedAssetId> {
        let mut ids: Vec<UntypedAssetId> = Vec::new();
        ids.extend(self.sheets.values().map(|s| s.image.id().untyped()));
        ids.extend(self.particles.values().map(|h| h.id().untyped()));
        ids.extend(self.sounds.values().map(|h| h.id().untyped()));
        ids
    }
}
