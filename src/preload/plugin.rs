//! Preload plugin - requests assets, builds atlas layouts and waits for
//! everything to arrive before the level starts.

use bevy::asset::{LoadState, UntypedAssetId};
use bevy::prelude::*;
use std::collections::HashSet;

use super::assets::{GameAssets, SheetHandles};
use crate::animation::AnimationLibrary;
use crate::audio::SoundEffect;
use crate::core::GameState;
use crate::vfx::EmitterPresets;

/// Preload plugin - the Loading state.
pub struct PreloadPlugin;

impl Plugin for PreloadPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), request_assets)
            .add_systems(
                Update,
                wait_for_assets.run_if(in_state(GameState::Loading)),
            );
    }
}

/// Read clip and emitter data, then request every image and sound.
pub fn request_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let library = AnimationLibrary::load();
    let presets = EmitterPresets::load();

    let mut assets = GameAssets::default();

    for (id, sheet) in &library.sheets {
        let layout = TextureAtlasLayout::from_grid(
            UVec2::new(sheet.frame_size.0, sheet.frame_size.1),
            sheet.columns,
            sheet.rows,
            None,
            None,
        );
        assets.sheets.insert(
            *id,
            SheetHandles {
                image: asset_server.load(sheet.image.clone()),
                layout: layouts.add(layout),
            },
        );
    }

    for path in presets.image_paths() {
        assets
            .particles
            .entry(path.to_string())
            .or_insert_with(|| asset_server.load(path.to_string()));
    }

    for effect in SoundEffect::ALL {
        assets.sounds.insert(effect, asset_server.load(effect.path()));
    }

    info!(
        "Requested {} sheets, {} particle images, {} sounds",
        assets.sheets.len(),
        assets.particles.len(),
        assets.sounds.len()
    );

    commands.insert_resource(library);
    commands.insert_resource(presets);
    commands.insert_resource(assets);
}

/// Move on once every asset has loaded or failed. Missing files are
/// reported and then ignored so the level stays playable.
fn wait_for_assets(
    asset_server: Res<AssetServer>,
    assets: Option<Res<GameAssets>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut reported: Local<HashSet<UntypedAssetId>>,
) {
    let Some(assets) = assets else {
        return;
    };

    let mut pending = 0;
    for id in assets.untyped_ids() {
        match asset_server.load_state(id) {
            LoadState::Loaded => {}
            LoadState::Failed(err) => {
                if reported.insert(id) {
                    warn!("Asset failed to load, continuing without it: {}", err);
                }
            }
            _ => pending += 1,
        }
    }

    if pending == 0 {
        info!("Assets ready");
        next_state.set(GameState::InGame);
    }
}
