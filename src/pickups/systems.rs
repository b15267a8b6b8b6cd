//! Pickup detection and collection.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashSet;

use super::components::Collectible;
use crate::audio::{PlaySoundEvent, SoundEffect};
use crate::core::{ItemKind, ItemPickupEvent};
use crate::outcome::LevelProgress;
use crate::player::Player;

/// Translate sensor overlaps between the player and collectibles into
/// pickup events.
pub fn detect_pickups(
    mut collisions: EventReader<CollisionEvent>,
    players: Query<Entity, With<Player>>,
    collectibles: Query<&Collectible>,
    mut pickups: EventWriter<ItemPickupEvent>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };

        let (player, item) = if players.contains(*a) {
            (*a, *b)
        } else if players.contains(*b) {
            (*b, *a)
        } else {
            continue;
        };

        if let Ok(Collectible(kind)) = collectibles.get(item) {
            pickups.send(ItemPickupEvent {
                item,
                player,
                kind: *kind,
            });
        }
    }
}

fn pickup_sound(kind: ItemKind) -> SoundEffect {
    match kind {
        ItemKind::Coin => SoundEffect::Coin,
        ItemKind::Key => SoundEffect::Key,
    }
}

/// Count each picked up item once, play its sound and remove it.
pub fn apply_pickups(
    mut commands: Commands,
    mut pickups: EventReader<ItemPickupEvent>,
    collectibles: Query<&Collectible>,
    mut progress: ResMut<LevelProgress>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    let mut taken: HashSet<Entity> = HashSet::new();

    for pickup in pickups.read() {
        // Several overlaps can report the same item before it despawns
        if !collectibles.contains(pickup.item) || !taken.insert(pickup.item) {
            continue;
        }

        progress.collect(pickup.kind);
        sounds.send(PlaySoundEvent(pickup_sound(pickup.kind)));
        commands.entity(pickup.item).despawn_recursive();

        info!(
            "Picked up {:?} ({}/{} coins, key: {})",
            pickup.kind, progress.coins_taken, progress.coins_total, progress.has_key
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use bevy_rapier2d::rapier::prelude::CollisionEventFlags;

    fn pickup_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<CollisionEvent>()
            .add_event::<ItemPickupEvent>()
            .add_event::<PlaySoundEvent>()
            .insert_resource(LevelProgress::new(2));
        app
    }

    fn sounds(app: &App) -> Vec<SoundEffect> {
        let events = app.world().resource::<Events<PlaySoundEvent>>();
        let sent = events.get_cursor().read(events).map(|e| e.0).collect();
        sent
    }

    #[test]
    fn sensor_overlap_becomes_pickup() {
        let mut app = pickup_app();
        let player = app.world_mut().spawn(Player).id();
        let coin = app.world_mut().spawn(Collectible(ItemKind::Coin)).id();
        let wall = app.world_mut().spawn_empty().id();

        app.world_mut().send_event(CollisionEvent::Started(
            coin,
            player,
            CollisionEventFlags::SENSOR,
        ));
        app.world_mut().send_event(CollisionEvent::Started(
            player,
            wall,
            CollisionEventFlags::empty(),
        ));
        app.world_mut().run_system_once(detect_pickups).unwrap();

        let events = app.world().resource::<Events<ItemPickupEvent>>();
        let sent: Vec<_> = events.get_cursor().read(events).copied().collect();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].item, coin);
        assert_eq!(sent[0].player, player);
        assert_eq!(sent[0].kind, ItemKind::Coin);
    }

    #[test]
    fn duplicate_events_count_once() {
        let mut app = pickup_app();
        let player = app.world_mut().spawn(Player).id();
        let coin = app.world_mut().spawn(Collectible(ItemKind::Coin)).id();
        let key = app.world_mut().spawn(Collectible(ItemKind::Key)).id();

        for (item, kind) in [(coin, ItemKind::Coin), (coin, ItemKind::Coin), (key, ItemKind::Key)] {
            app.world_mut().send_event(ItemPickupEvent { item, player, kind });
        }
        app.world_mut().run_system_once(apply_pickups).unwrap();

        let progress = app.world().resource::<LevelProgress>();
        assert_eq!(progress.coins_taken, 1);
        assert!(progress.has_key);
        assert!(app.world().get::<Collectible>(coin).is_none());
        assert!(app.world().get::<Collectible>(key).is_none());
        assert_eq!(sounds(&app), vec![SoundEffect::Coin, SoundEffect::Key]);
    }

    #[test]
    fn despawned_item_is_ignored() {
        let mut app = pickup_app();
        let player = app.world_mut().spawn(Player).id();
        let coin = app.world_mut().spawn(Collectible(ItemKind::Coin)).id();
        app.world_mut().despawn(coin);

        app.world_mut().send_event(ItemPickupEvent {
            item: coin,
            player,
            kind: ItemKind::Coin,
        });
        app.world_mut().run_system_once(apply_pickups).unwrap();

        assert_eq!(app.world().resource::<LevelProgress>().coins_taken, 0);
        assert!(sounds(&app).is_empty());
    }
}
