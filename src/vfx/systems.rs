//! Particle emission and integration.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use std::collections::HashMap;

use super::components::*;
use super::data::EmitterPresets;
use crate::preload::GameAssets;
use crate::world::LevelEntity;

/// Depth particles are drawn at.
const PARTICLE_Z: f32 = 6.0;

/// Spawn the player's three emitters, all stopped.
pub fn spawn_emitters(commands: &mut Commands, presets: &EmitterPresets) {
    commands.spawn((
        WalkingVfx,
        ParticleEmitter::new(presets.walking.clone()),
        Transform::default(),
        LevelEntity,
    ));
    commands.spawn((
        JumpVfx,
        ParticleEmitter::new(presets.jump.clone()),
        Transform::default(),
        LevelEntity,
    ));
    commands.spawn((
        DeathVfx,
        ParticleEmitter::new(presets.death.clone()),
        Transform::default(),
        LevelEntity,
    ));
}

/// Move following emitters onto their targets.
pub fn follow_targets(
    mut emitters: Query<(&ParticleEmitter, &mut Transform)>,
    targets: Query<&GlobalTransform, Without<ParticleEmitter>>,
) {
    for (emitter, mut transform) in emitters.iter_mut() {
        let Some(follow) = emitter.follow else {
            continue;
        };
        if let Ok(target) = targets.get(follow.target) {
            let position = target.translation().truncate() + follow.offset;
            transform.translation.x = position.x;
            transform.translation.y = position.y;
        }
    }
}

/// Spawn the particles each emitter owes this frame.
pub fn emit_particles(
    mut commands: Commands,
    time: Res<Time>,
    assets: Option<Res<GameAssets>>,
    mut emitters: Query<(Entity, &mut ParticleEmitter, &Transform)>,
    particles: Query<&Particle>,
) {
    let delta = time.delta();

    let mut alive: HashMap<Entity, usize> = HashMap::new();
    for particle in particles.iter() {
        *alive.entry(particle.emitter).or_default() += 1;
    }

    let mut rng = rand::thread_rng();
    for (entity, mut emitter, transform) in emitters.iter_mut() {
        let count = emitter.due(delta, alive.get(&entity).copied().unwrap_or(0));

        for _ in 0..count {
            let image = emitter
                .config
                .frames
                .choose(&mut rng)
                .and_then(|path| assets.as_ref().and_then(|a| a.particles.get(path)))
                .cloned()
                .unwrap_or_default();

            let particle = Particle {
                emitter: entity,
                velocity: emitter.speed,
                gravity: emitter.config.gravity,
                age: 0.0,
                lifespan: emitter.config.lifespan,
                scale: emitter.config.scale,
                alpha: emitter.config.alpha,
            };

            commands.spawn((
                Sprite {
                    image,
                    color: Color::srgba(1.0, 1.0, 1.0, particle.current_alpha()),
                    ..default()
                },
                Transform::from_xyz(transform.translation.x, transform.translation.y, PARTICLE_Z)
                    .with_scale(Vec3::splat(particle.current_scale())),
                particle,
                LevelEntity,
            ));
        }
    }
}

/// Age, move, scale and fade particles; remove the dead ones.
pub fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut particles: Query<(Entity, &mut Particle, &mut Transform, &mut Sprite)>,
) {
    let dt = time.delta_secs();

    for (entity, mut particle, mut transform, mut sprite) in particles.iter_mut() {
        particle.age += dt;
        if particle.expired() {
            commands.entity(entity).despawn();
            continue;
        }

        let gravity = particle.gravity;
        particle.velocity.y += gravity * dt;
        transform.translation.x += particle.velocity.x * dt;
        transform.translation.y += particle.velocity.y * dt;
        transform.scale = Vec3::splat(particle.current_scale());
        sprite.color = Color::srgba(1.0, 1.0, 1.0, particle.current_alpha());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn tick(app: &mut App, secs: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
    }

    #[test]
    fn death_burst_spawns_and_expires() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        let mut emitter = ParticleEmitter::new(EmitterPresets::default().death);
        emitter.start();
        app.world_mut()
            .spawn((emitter, Transform::from_xyz(10.0, 20.0, 0.0)));

        tick(&mut app, 0.016);
        app.world_mut().run_system_once(emit_particles).unwrap();
        let mut query = app.world_mut().query::<(&Particle, &Transform)>();
        let spawned: Vec<_> = query.iter(app.world()).map(|(_, t)| t.translation).collect();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].truncate(), Vec2::new(10.0, 20.0));

        // Drifts upward, then dies
        tick(&mut app, 0.1);
        app.world_mut().run_system_once(update_particles).unwrap();
        let mut query = app.world_mut().query::<(&Particle, &Transform)>();
        let (particle, transform) = query.single(app.world());
        assert!(particle.velocity.y > 0.0);
        assert!(transform.translation.y > 20.0);

        tick(&mut app, 0.3);
        app.world_mut().run_system_once(update_particles).unwrap();
        let mut query = app.world_mut().query::<&Particle>();
        assert_eq!(query.iter(app.world()).count(), 0);
    }

    #[test]
    fn emitter_tracks_follow_target() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        let target = app
            .world_mut()
            .spawn(GlobalTransform::from_xyz(100.0, 50.0, 0.0))
            .id();
        let mut emitter = ParticleEmitter::new(EmitterPresets::default().walking);
        emitter.start_follow(target, Vec2::new(-20.0, -40.0));
        let entity = app.world_mut().spawn((emitter, Transform::default())).id();

        app.world_mut().run_system_once(follow_targets).unwrap();
        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.translation.truncate(), Vec2::new(80.0, 10.0));
    }
}
