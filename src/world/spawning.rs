//! Entity spawning for the level's object layer.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::builder::LevelEntity;
use super::data::{LevelDefinition, ObjectKind, ObjectSpawn};
use super::platforms::MovingPlatform;
use crate::animation::{AnimationLibrary, SheetId};
use crate::core::ItemKind;
use crate::pickups::Collectible;
use crate::preload::GameAssets;

/// Depth objects are drawn at, above the ground layer.
pub const OBJECT_Z: f32 = 2.0;

/// Fraction of a tile covered by a collectible's sensor.
const PICKUP_EXTENT: f32 = 0.4;

/// Spawn every coin, key and moving platform of the level.
pub fn spawn_objects(
    commands: &mut Commands,
    level: &LevelDefinition,
    assets: &GameAssets,
    library: &AnimationLibrary,
) {
    for object in &level.objects {
        match object.kind.item() {
            Some(kind) => spawn_collectible(commands, level, object, kind, assets, library),
            None => spawn_platform(commands, level, object, assets),
        }
    }

    info!(
        "Spawned {} objects ({} coins)",
        level.objects.len(),
        level.coin_count()
    );
}

/// Clip name an item animates with.
fn item_clip(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Coin => "coin",
        ItemKind::Key => "key",
    }
}

fn spawn_collectible(
    commands: &mut Commands,
    level: &LevelDefinition,
    object: &ObjectSpawn,
    kind: ItemKind,
    assets: &GameAssets,
    library: &AnimationLibrary,
) {
    let position = level.grid_to_world(object.grid.0, object.grid.1);
    let half = level.tile_size * PICKUP_EXTENT;

    let mut entity = commands.spawn((
        Collectible(kind),
        Transform::from_xyz(position.x, position.y, OBJECT_Z),
        Collider::cuboid(half, half),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
        LevelEntity,
    ));

    match assets.animated_sprite(library, item_clip(kind)) {
        Some((mut sprite, animation)) => {
            sprite.custom_size = Some(Vec2::splat(level.tile_size));
            entity.insert((sprite, animation));
        }
        None => {
            warn!("No '{}' clip, {:?} will be invisible", item_clip(kind), kind);
            entity.insert(Visibility::default());
        }
    }
}

fn spawn_platform(
    commands: &mut Commands,
    level: &LevelDefinition,
    object: &ObjectSpawn,
    assets: &GameAssets,
) {
    debug_assert_eq!(object.kind, ObjectKind::Platform);
    let position = level.grid_to_world(object.grid.0, object.grid.1);
    let half = level.tile_size / 2.0;

    let mut sprite = assets.atlas_sprite(SheetId::Tiles, level.platform_tile);
    sprite.custom_size = Some(Vec2::splat(level.tile_size));

    commands.spawn((
        MovingPlatform,
        sprite,
        Transform::from_xyz(position.x, position.y, OBJECT_Z),
        RigidBody::KinematicVelocityBased,
        Velocity::zero(),
        Collider::cuboid(half, half),
        LevelEntity,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use crate::world::data::{parse_level, PaletteRegistry};

    fn level() -> LevelDefinition {
        parse_level(
            r#####"(
                name: "objects",
                player_start: (0, 1),
                tile_palette: { '#': (index: 1) },
                object_palette: { 'c': Coin, 'k': Key, 'p': Platform },
                layers: [(name: "Ground", role: Ground, rows: ["....", "####"])],
                objects: ["cpkc", "...."],
            )"#####,
            "objects.ron",
            &PaletteRegistry::default(),
        )
        .unwrap()
    }

    #[test]
    fn spawns_one_entity_per_object() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        let level = level();

        app.world_mut()
            .run_system_once(move |mut commands: Commands| {
                spawn_objects(&mut commands, &level, &GameAssets::default(), &AnimationLibrary::default());
            })
            .unwrap();

        let world = app.world_mut();
        let coins = world
            .query::<&Collectible>()
            .iter(world)
            .filter(|c| c.0 == ItemKind::Coin)
            .count();
        let keys = world
            .query::<&Collectible>()
            .iter(world)
            .filter(|c| c.0 == ItemKind::Key)
            .count();
        let platforms = world
            .query_filtered::<&Transform, With<MovingPlatform>>()
            .iter(world)
            .count();
        assert_eq!((coins, keys, platforms), (2, 1, 1));
    }
}
