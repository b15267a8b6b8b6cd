//! Level construction from data definitions.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::data::{ColliderRun, LayerRole, LevelDefinition, ResolvedLayer};
use super::parallax::Parallax;
use crate::animation::{SheetId, SpriteAnimation};
use crate::core::HazardKind;
use crate::preload::GameAssets;

/// Marker for everything that belongs to the running level and is
/// removed when the level is torn down.
#[derive(Component)]
pub struct LevelEntity;

/// A tile layer's root entity; tiles are its children.
#[derive(Component)]
pub struct TileLayer {
    pub name: String,
}

/// Collider of a plain ground tile run.
#[derive(Component)]
pub struct SolidTile;

/// Collider that ends the level when the player touches it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardTile(pub HazardKind);

/// Invisible walls around the map.
#[derive(Component)]
pub struct WorldBound;

/// Build every tile layer and its colliders.
pub fn build_layers(commands: &mut Commands, level: &LevelDefinition, assets: &GameAssets) {
    for layer in &level.layers {
        spawn_layer_tiles(commands, level, layer, assets);

        if layer.role.is_solid() {
            spawn_layer_colliders(commands, level, layer);
        }
    }

    spawn_world_bounds(commands, level);
}

/// Spawn the sprites of one layer under a common root.
fn spawn_layer_tiles(
    commands: &mut Commands,
    level: &LevelDefinition,
    layer: &ResolvedLayer,
    assets: &GameAssets,
) {
    let tile_size = level.tile_size;
    let origin = layer
        .parallax
        .map(|p| Vec2::new(p.offset.0, p.offset.1))
        .unwrap_or(Vec2::ZERO);

    let mut root = commands.spawn((
        TileLayer {
            name: layer.name.clone(),
        },
        Transform::from_xyz(origin.x, origin.y, layer.z),
        Visibility::default(),
        LevelEntity,
    ));
    if let Some(parallax) = layer.parallax {
        root.insert(Parallax::from(parallax));
    }

    root.with_children(|parent| {
        for tile in &layer.tiles {
            let position = level.grid_to_world(tile.grid.0, tile.grid.1);
            let mut sprite = assets.atlas_sprite(SheetId::Tiles, tile.index);
            sprite.custom_size = Some(Vec2::splat(tile_size));

            let mut entity = parent.spawn((sprite, Transform::from_xyz(position.x, position.y, 0.0)));
            if let Some(animation) = &tile.animation {
                entity.insert(SpriteAnimation::from_frames(
                    animation.frames.clone(),
                    animation.fps,
                    true,
                ));
            }
        }
    });

    debug!("Built layer '{}' with {} tiles", layer.name, layer.tiles.len());
}

/// World-space centre and half extents of a collider run.
pub fn run_rect(level: &LevelDefinition, run: &ColliderRun) -> (Vec2, Vec2) {
    let tile_size = level.tile_size;
    let first = level.grid_to_world(run.first, run.row);
    let half = Vec2::new(run.len() as f32 * tile_size / 2.0, tile_size / 2.0);
    let center = Vec2::new(first.x - tile_size / 2.0 + half.x, first.y);
    (center, half)
}

/// Spawn fixed colliders for a solid layer, one per horizontal run.
fn spawn_layer_colliders(commands: &mut Commands, level: &LevelDefinition, layer: &ResolvedLayer) {
    let hazard = match layer.role {
        LayerRole::Spikes => Some(HazardTile(HazardKind::Spikes)),
        LayerRole::Door => Some(HazardTile(HazardKind::Door)),
        LayerRole::Ground | LayerRole::Decoration => None,
    };

    let runs = layer.collider_runs();
    for run in &runs {
        let (center, half) = run_rect(level, run);
        let mut entity = commands.spawn((
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y),
            Transform::from_xyz(center.x, center.y, 0.0),
            LevelEntity,
        ));
        match hazard {
            Some(hazard) => entity.insert(hazard),
            None => entity.insert(SolidTile),
        };
    }

    debug!("Layer '{}' has {} collider runs", layer.name, runs.len());
}

/// Keep the player inside the map on all four sides.
fn spawn_world_bounds(commands: &mut Commands, level: &LevelDefinition) {
    let size = level.size_in_pixels();
    let thickness = level.tile_size;

    let walls = [
        // Left, right
        (Vec2::new(-thickness / 2.0, size.y / 2.0), Vec2::new(thickness / 2.0, size.y / 2.0 + thickness)),
        (Vec2::new(size.x + thickness / 2.0, size.y / 2.0), Vec2::new(thickness / 2.0, size.y / 2.0 + thickness)),
        // Bottom, top
        (Vec2::new(size.x / 2.0, -thickness / 2.0), Vec2::new(size.x / 2.0 + thickness, thickness / 2.0)),
        (Vec2::new(size.x / 2.0, size.y + thickness / 2.0), Vec2::new(size.x / 2.0 + thickness, thickness / 2.0)),
    ];

    for (center, half) in walls {
        commands.spawn((
            WorldBound,
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y),
            Transform::from_xyz(center.x, center.y, 0.0),
            LevelEntity,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::data::{parse_level, PaletteRegistry};

    #[test]
    fn run_rect_covers_its_tiles() {
        let level = parse_level(
            r#"(
                name: "runs",
                player_start: (0, 0),
                tile_palette: { '#': (index: 1) },
                layers: [(name: "Ground", role: Ground, rows: ["....", ".###"])],
            )"#,
            "runs.ron",
            &PaletteRegistry::default(),
        )
        .unwrap();

        let runs = level.layers[0].collider_runs();
        assert_eq!(runs.len(), 1);
        let (center, half) = run_rect(&level, &runs[0]);
        // Columns 1..=3 on the bottom row
        assert_eq!(half, Vec2::new(96.0, 32.0));
        assert_eq!(center, Vec2::new(160.0, 32.0));
    }
}
