//! Side-scrolling movement: run, jump, fall and ride platforms.
//!
//! Gravity and velocity are integrated here rather than by the physics
//! world; Rapier's character controller resolves the resulting
//! translation against the level colliders.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use crate::animation::{AnimationLibrary, SpriteAnimation};
use crate::audio::{PlaySoundEvent, SoundEffect};
use crate::core::{GameConfig, GameState, HazardContactEvent, PlayState};
use crate::preload::GameAssets;
use crate::vfx::{JumpVfx, ParticleEmitter, WalkingVfx};
use crate::world::{HazardTile, MovingPlatform};

/// Depth the player is drawn at.
pub const PLAYER_Z: f32 = 5.0;

/// Gap the character controller keeps between the player and walls.
const CONTROLLER_OFFSET: f32 = 1.0;

/// How far inside the collider the ground rays start.
const PROBE_INSET: f32 = 1.0;

/// Where the jump puff appears relative to the player's centre.
const JUMP_PUFF_OFFSET: Vec2 = Vec2::new(0.0, -30.0);

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(
        Update,
        (player_movement, resolve_contacts, detect_hazards)
            .chain()
            .run_if(in_state(GameState::InGame))
            .run_if(in_state(PlayState::Running)),
    )
    .add_systems(OnEnter(PlayState::Over), freeze_player);
}

/// Apply acceleration or drag, then clamp to the top speed.
pub fn step_horizontal(vx: f32, steer: Steer, config: &GameConfig, dt: f32) -> f32 {
    let vx = match steer {
        Steer::None => {
            let slowed = vx.abs() - config.drag * dt;
            if slowed <= 0.0 {
                0.0
            } else {
                slowed * vx.signum()
            }
        }
        _ => vx + steer.sign() * config.acceleration * dt,
    };
    vx.clamp(-config.max_velocity, config.max_velocity)
}

/// Apply gravity while airborne and cap the fall speed.
pub fn step_vertical(vy: f32, grounded: bool, config: &GameConfig, dt: f32) -> f32 {
    let vy = if grounded {
        // Landing cancels the fall but leaves a fresh jump alone
        vy.max(0.0)
    } else {
        vy - config.gravity * dt
    };
    vy.max(-config.max_fall_speed)
}

/// Clip to play for the current input and ground contact.
pub fn select_animation(steer: Steer, grounded: bool) -> &'static str {
    if !grounded {
        return "jump";
    }
    match steer {
        Steer::None => "idle",
        _ => "walk",
    }
}

/// Origins of the ground rays: both corners of the base and its middle,
/// a little inside the collider.
pub fn ground_ray_origins(position: Vec2, half_extents: Vec2) -> [Vec2; 3] {
    let y = position.y - (half_extents.y - PROBE_INSET);
    let reach = (half_extents.x - PROBE_INSET).max(0.0);
    [
        Vec2::new(position.x, y),
        Vec2::new(position.x - reach, y),
        Vec2::new(position.x + reach, y),
    ]
}

/// Vertical movement for one frame. Standing still on the ground still
/// presses down so the controller stays in contact with what's below.
pub fn vertical_translation(vy: f32, grounded: bool, config: &GameConfig, dt: f32) -> f32 {
    if grounded && vy <= 0.0 {
        -(CONTROLLER_OFFSET + config.ground_probe)
    } else {
        vy * dt
    }
}

/// Walking dust trails behind the feet: offset from the player's centre
/// and the velocity given to each particle.
pub fn walking_dust(facing: Facing, display_height: f32, particle_velocity: f32) -> (Vec2, Vec2) {
    let half = display_height / 2.0;
    let y = -(half - 30.0);
    match facing {
        Facing::Left => (Vec2::new(half, y), Vec2::new(particle_velocity, 0.0)),
        Facing::Right => (Vec2::new(half - 70.0, y), Vec2::new(-particle_velocity, 0.0)),
    }
}

/// Read the arrow keys, integrate velocity and hand the translation to
/// the character controller.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<GameConfig>,
    library: Option<Res<AnimationLibrary>>,
    rapier_context: Query<&RapierContext>,
    platforms: Query<&Velocity, With<MovingPlatform>>,
    mut player_query: Query<
        (
            Entity,
            &Transform,
            &mut MovementState,
            &mut Facing,
            &mut KinematicCharacterController,
            &mut Sprite,
            Option<&mut SpriteAnimation>,
        ),
        With<Player>,
    >,
    mut walking: Query<&mut ParticleEmitter, (With<WalkingVfx>, Without<JumpVfx>)>,
    mut jump_puff: Query<
        (&mut ParticleEmitter, &mut Transform),
        (With<JumpVfx>, Without<WalkingVfx>, Without<Player>),
    >,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    let Ok((player_entity, transform, mut state, mut facing, mut controller, mut sprite, animation)) =
        player_query.get_single_mut()
    else {
        return;
    };
    let dt = time.delta_secs();
    let position = transform.translation.truncate();

    // Ground check: short rays down from the middle and both corners of
    // the base, so standing on a ledge with the centre past its edge counts
    let half_extents = Vec2::new(
        config.player_half_extents.0 * transform.scale.x,
        config.player_half_extents.1 * transform.scale.y,
    );
    let ground = if let Ok(context) = rapier_context.get_single() {
        let filter = QueryFilter::default()
            .exclude_collider(player_entity)
            .exclude_sensors();
        ground_ray_origins(position, half_extents)
            .into_iter()
            .find_map(|origin| {
                context.cast_ray(
                    origin,
                    Vec2::NEG_Y,
                    PROBE_INSET + CONTROLLER_OFFSET + config.ground_probe,
                    true,
                    filter,
                )
            })
            .map(|(entity, _)| entity)
    } else {
        None
    };
    // Fallback: assume grounded if no physics context
    state.grounded = ground.is_some() || rapier_context.is_empty();
    state.ground_entity = ground;

    let steer = Steer::from_keys(
        keyboard.pressed(KeyCode::ArrowLeft),
        keyboard.pressed(KeyCode::ArrowRight),
    );

    if steer != Steer::None {
        *facing = if steer == Steer::Left { Facing::Left } else { Facing::Right };
    }
    sprite.flip_x = *facing == Facing::Left;

    // Walking dust follows the feet and only starts on the ground
    if let Ok(mut dust) = walking.get_single_mut() {
        if steer == Steer::None {
            dust.stop();
        } else {
            let (offset, speed) =
                walking_dust(*facing, config.player_display_height(), config.particle_velocity);
            dust.start_follow(player_entity, offset);
            dust.set_speed(speed);
            if state.grounded {
                dust.start();
            }
        }
    }

    if let (Some(mut animation), Some(library)) = (animation, library.as_ref()) {
        animation.play(select_animation(steer, state.grounded), library);
    }

    state.velocity.x = step_horizontal(state.velocity.x, steer, &config, dt);
    state.velocity.y = step_vertical(state.velocity.y, state.grounded, &config, dt);

    if state.grounded && keyboard.just_pressed(KeyCode::ArrowUp) {
        state.velocity.y = config.jump_velocity;

        if let Ok((mut puff, mut puff_transform)) = jump_puff.get_single_mut() {
            let at = position + JUMP_PUFF_OFFSET;
            puff_transform.translation.x = at.x;
            puff_transform.translation.y = at.y;
            puff.set_speed(Vec2::new(0.0, -config.particle_velocity));
            puff.start();
        }
        sounds.send(PlaySoundEvent(SoundEffect::Jump));
    }

    let mut translation = Vec2::new(
        state.velocity.x * dt,
        vertical_translation(state.velocity.y, state.grounded, &config, dt),
    );

    // Ride along with whatever platform we're standing on
    if let Some(platform) = state.ground_entity.and_then(|e| platforms.get(e).ok()) {
        translation.x += platform.linvel.x * dt;
    }

    controller.translation = Some(translation);
}

/// Cancel velocity the controller could not apply last frame: bumping
/// the head stops the rise, running into a wall stops the run.
pub fn resolve_contacts(
    mut player_query: Query<(&mut MovementState, &KinematicCharacterControllerOutput), With<Player>>,
) {
    let Ok((mut state, output)) = player_query.get_single_mut() else {
        return;
    };

    let desired = output.desired_translation;
    let effective = output.effective_translation;
    const EPSILON: f32 = 0.01;

    if state.velocity.y > 0.0 && desired.y > 0.0 && effective.y < desired.y - EPSILON {
        state.velocity.y = 0.0;
    }
    if desired.x.abs() > EPSILON && effective.x.abs() < EPSILON {
        state.velocity.x = 0.0;
    }
}

/// First hazard among the colliders the player touched.
pub fn first_hazard(
    touched: impl IntoIterator<Item = Entity>,
    hazard_of: impl Fn(Entity) -> Option<HazardTile>,
) -> Option<HazardTile> {
    touched.into_iter().find_map(hazard_of)
}

/// Turn contact with hazard tiles into events: anything the character
/// controller collided with, plus whatever the player stands on.
pub fn detect_hazards(
    player_query: Query<
        (&MovementState, Option<&KinematicCharacterControllerOutput>),
        With<Player>,
    >,
    hazards: Query<&HazardTile>,
    mut events: EventWriter<HazardContactEvent>,
) {
    let Ok((state, output)) = player_query.get_single() else {
        return;
    };

    let touched = output
        .into_iter()
        .flat_map(|output| output.collisions.iter().map(|c| c.entity))
        .chain(state.ground_entity);
    if let Some(HazardTile(kind)) = first_hazard(touched, |e| hazards.get(e).ok().copied()) {
        debug!("Player touched {:?}", kind);
        events.send(HazardContactEvent { kind });
    }
}

/// Stop the player in place once the level is over.
fn freeze_player(
    mut player_query: Query<
        (&mut MovementState, &mut KinematicCharacterController, Option<&mut SpriteAnimation>),
        With<Player>,
    >,
) {
    for (mut state, mut controller, animation) in player_query.iter_mut() {
        state.velocity = Vec2::ZERO;
        controller.translation = None;
        if let Some(mut animation) = animation {
            animation.stop();
        }
    }
}

/// Body, collider and controller of the player, without visuals.
pub fn player_body(position: Vec2, config: &GameConfig) -> impl Bundle {
    let (half_x, half_y) = config.player_half_extents;
    (
        Player,
        MovementState::default(),
        Facing::default(),
        Transform::from_xyz(position.x, position.y, PLAYER_Z)
            .with_scale(Vec3::splat(config.player_scale)),
        // Rapier physics components
        RigidBody::KinematicPositionBased,
        Collider::cuboid(half_x, half_y),
        KinematicCharacterController {
            offset: CharacterLength::Absolute(CONTROLLER_OFFSET),
            up: Vec2::Y,
            max_slope_climb_angle: 45_f32.to_radians(),
            min_slope_slide_angle: 30_f32.to_radians(),
            // Coins and keys are sensors and must not block movement
            filter_flags: QueryFilterFlags::EXCLUDE_SENSORS,
            ..default()
        },
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
    )
}

/// Spawn the player entity at a world position.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec2,
    config: &GameConfig,
    assets: &GameAssets,
    library: &AnimationLibrary,
) -> Entity {
    let player = commands.spawn(player_body(position, config)).id();

    match assets.animated_sprite(library, "idle") {
        Some((sprite, animation)) => {
            commands.entity(player).insert((sprite, animation));
        }
        None => {
            warn!("No 'idle' clip, the player will be invisible");
            commands.entity(player).insert(Visibility::default());
        }
    }

    info!("Spawned player at ({:.0}, {:.0})", position.x, position.y);
    player
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HazardKind;
    use crate::vfx::EmitterPresets;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn accelerates_then_caps() {
        let config = GameConfig::default();
        let vx = step_horizontal(0.0, Steer::Right, &config, DT);
        assert!((vx - 2000.0 / 60.0).abs() < 1e-3);

        let mut vx = 0.0;
        for _ in 0..120 {
            vx = step_horizontal(vx, Steer::Left, &config, DT);
        }
        assert_eq!(vx, -500.0);
    }

    #[test]
    fn drag_stops_without_overshoot() {
        let config = GameConfig::default();
        let vx = step_horizontal(500.0, Steer::None, &config, DT);
        assert!((vx - (500.0 - 2000.0 / 60.0)).abs() < 1e-3);
        assert_eq!(step_horizontal(10.0, Steer::None, &config, DT), 0.0);
        assert_eq!(step_horizontal(-10.0, Steer::None, &config, DT), 0.0);
    }

    #[test]
    fn gravity_and_fall_cap() {
        let config = GameConfig::default();
        assert_eq!(step_vertical(-300.0, true, &config, DT), 0.0);
        assert_eq!(step_vertical(800.0, true, &config, DT), 800.0);
        assert!((step_vertical(0.0, false, &config, DT) + 25.0).abs() < 1e-3);
        assert_eq!(step_vertical(-2399.0, false, &config, 1.0), -2400.0);
    }

    #[test]
    fn rays_cover_both_corners_of_the_base() {
        let origins = ground_ray_origins(Vec2::new(100.0, 200.0), Vec2::new(27.0, 42.0));
        assert_eq!(origins[0], Vec2::new(100.0, 159.0));
        assert_eq!(origins[1], Vec2::new(74.0, 159.0));
        assert_eq!(origins[2], Vec2::new(126.0, 159.0));
    }

    #[test]
    fn standing_still_presses_into_the_ground() {
        let config = GameConfig::default();
        assert_eq!(vertical_translation(0.0, true, &config, DT), -5.0);
        // Taking off and falling move by velocity
        assert!((vertical_translation(800.0, true, &config, DT) - 800.0 / 60.0).abs() < 1e-3);
        assert!((vertical_translation(-600.0, false, &config, DT) + 10.0).abs() < 1e-3);
    }

    #[test]
    fn animation_choice() {
        assert_eq!(select_animation(Steer::None, true), "idle");
        assert_eq!(select_animation(Steer::Left, true), "walk");
        assert_eq!(select_animation(Steer::Right, false), "jump");
        assert_eq!(select_animation(Steer::None, false), "jump");
    }

    #[test]
    fn left_wins_over_right() {
        assert_eq!(Steer::from_keys(true, true), Steer::Left);
        assert_eq!(Steer::from_keys(false, true), Steer::Right);
        assert_eq!(Steer::from_keys(false, false), Steer::None);
    }

    #[test]
    fn dust_trails_behind() {
        let (left_offset, left_speed) = walking_dust(Facing::Left, 84.0, 100.0);
        let (right_offset, right_speed) = walking_dust(Facing::Right, 84.0, 100.0);
        assert_eq!(left_offset, Vec2::new(42.0, -12.0));
        assert_eq!(right_offset, Vec2::new(-28.0, -12.0));
        assert_eq!(left_speed.x, 100.0);
        assert_eq!(right_speed.x, -100.0);
    }

    #[test]
    fn first_hazard_skips_plain_ground() {
        let ground = Entity::from_raw(1);
        let spikes = Entity::from_raw(2);
        let lookup = |e: Entity| (e == spikes).then_some(HazardTile(crate::core::HazardKind::Spikes));
        assert_eq!(first_hazard([ground], lookup), None);
        assert_eq!(
            first_hazard([ground, spikes], lookup),
            Some(HazardTile(crate::core::HazardKind::Spikes))
        );
    }

    fn movement_app() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<PlaySoundEvent>()
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(GameConfig::default())
            .insert_resource(AnimationLibrary::default());

        let player = app
            .world_mut()
            .spawn((
                Player,
                MovementState::default(),
                Facing::default(),
                Transform::default(),
                KinematicCharacterController::default(),
                Sprite::default(),
            ))
            .id();
        (app, player)
    }

    fn step(app: &mut App) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(DT));
        app.world_mut().run_system_once(player_movement).unwrap();
    }

    #[test]
    fn running_left_flips_sprite() {
        let (mut app, player) = movement_app();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ArrowLeft);
        step(&mut app);

        let world = app.world();
        assert!(world.get::<MovementState>(player).unwrap().velocity.x < 0.0);
        assert_eq!(*world.get::<Facing>(player).unwrap(), Facing::Left);
        assert!(world.get::<Sprite>(player).unwrap().flip_x);
        assert!(world
            .get::<KinematicCharacterController>(player)
            .unwrap()
            .translation
            .is_some());
    }

    #[test]
    fn jump_sets_velocity_and_plays_sound() {
        let (mut app, player) = movement_app();
        let puff = app
            .world_mut()
            .spawn((
                JumpVfx,
                ParticleEmitter::new(EmitterPresets::default().jump),
                Transform::default(),
            ))
            .id();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ArrowUp);
        step(&mut app);

        assert_eq!(
            app.world().get::<MovementState>(player).unwrap().velocity.y,
            800.0
        );
        let events = app.world().resource::<Events<PlaySoundEvent>>();
        let mut reader = events.get_cursor();
        let sent: Vec<_> = reader.read(events).map(|e| e.0).collect();
        assert_eq!(sent, vec![SoundEffect::Jump]);

        // The puff drifts down from the feet
        let emitter = app.world().get::<ParticleEmitter>(puff).unwrap();
        assert!(emitter.active);
        assert_eq!(emitter.speed, Vec2::new(0.0, -100.0));
        let at = app.world().get::<Transform>(puff).unwrap().translation;
        assert_eq!(at.truncate(), JUMP_PUFF_OFFSET);
    }

    /// Headless app stepping the real physics pipeline at 60 Hz.
    fn physics_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            bevy::transform::TransformPlugin,
            bevy::hierarchy::HierarchyPlugin,
            RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(64.0),
        ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(DT)))
        .add_event::<PlaySoundEvent>()
        .add_event::<HazardContactEvent>()
        .init_resource::<ButtonInput<KeyCode>>()
        .insert_resource(GameConfig::default())
        .add_systems(
            Update,
            (player_movement, resolve_contacts, detect_hazards).chain(),
        );
        app
    }

    fn spawn_block(app: &mut App, center: Vec2, half: Vec2, extra: impl Bundle) -> Entity {
        let transform = Transform::from_xyz(center.x, center.y, 0.0);
        app.world_mut()
            .spawn((
                Collider::cuboid(half.x, half.y),
                transform,
                GlobalTransform::from(transform),
                extra,
            ))
            .id()
    }

    fn spawn_player_at(app: &mut App, position: Vec2) -> Entity {
        let config = GameConfig::default();
        let player = app.world_mut().spawn(player_body(position, &config)).id();
        let transform = *app.world().get::<Transform>(player).unwrap();
        app.world_mut()
            .entity_mut(player)
            .insert((GlobalTransform::from(transform), Sprite::default()));
        player
    }

    /// Unscaled half height 28 at scale 1.5.
    const PLAYER_HALF_HEIGHT: f32 = 42.0;

    #[test]
    fn landing_on_spikes_reports_contact_from_any_height() {
        for drop in [2.0, 8.0, 20.0, 37.0, 64.0, 100.0, 150.0, 200.0] {
            let mut app = physics_app();
            // Spike tile with its top at y = 32
            spawn_block(&mut app, Vec2::ZERO, Vec2::splat(32.0), HazardTile(HazardKind::Spikes));
            let start = 32.0 + PLAYER_HALF_HEIGHT + CONTROLLER_OFFSET + drop;
            spawn_player_at(&mut app, Vec2::new(0.0, start));

            let mut reader = app
                .world()
                .resource::<Events<HazardContactEvent>>()
                .get_cursor();
            let mut contacts = 0;
            for _ in 0..180 {
                app.update();
                let events = app.world().resource::<Events<HazardContactEvent>>();
                contacts += reader.read(events).count();
            }
            assert!(contacts > 0, "no spike contact after a {drop} px drop");
        }
    }

    #[test]
    fn ledge_under_one_corner_is_ground() {
        let mut app = physics_app();
        // Ledge top at y = 32, right edge at x = 0
        spawn_block(&mut app, Vec2::new(-200.0, 0.0), Vec2::new(200.0, 32.0), ());
        // Centre 12 px past the edge, 15 px of the base still on the ledge
        let player = spawn_player_at(&mut app, Vec2::new(12.0, 32.0 + PLAYER_HALF_HEIGHT + 3.0));
        for _ in 0..60 {
            app.update();
        }

        let state = app.world().get::<MovementState>(player).unwrap();
        assert!(state.grounded);
        assert_eq!(state.velocity.y, 0.0);
        let rest = app.world().get::<Transform>(player).unwrap().translation.y;
        assert!((rest - (32.0 + PLAYER_HALF_HEIGHT)).abs() < 3.0, "resting at {rest}");

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ArrowUp);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .reset_all();
        for _ in 0..5 {
            app.update();
        }
        let y = app.world().get::<Transform>(player).unwrap().translation.y;
        assert!(y > rest + 20.0, "jumped from {rest} to {y}");
    }

    #[test]
    fn platform_carries_the_player() {
        let mut app = physics_app();
        let platform = app
            .world_mut()
            .spawn((
                MovingPlatform,
                RigidBody::KinematicVelocityBased,
                Velocity::linear(Vec2::new(75.0, 0.0)),
                Collider::cuboid(96.0, 16.0),
                Transform::default(),
                GlobalTransform::default(),
            ))
            .id();
        let player = spawn_player_at(&mut app, Vec2::new(0.0, 16.0 + PLAYER_HALF_HEIGHT + 2.0));
        for _ in 0..60 {
            app.update();
        }

        let state = app.world().get::<MovementState>(player).unwrap();
        assert_eq!(state.ground_entity, Some(platform));
        assert_eq!(state.velocity.x, 0.0);
        let platform_x = app.world().get::<Transform>(platform).unwrap().translation.x;
        let player_x = app.world().get::<Transform>(player).unwrap().translation.x;
        assert!(platform_x > 50.0, "platform at {platform_x}");
        assert!((player_x - platform_x).abs() < 10.0, "player {player_x}, platform {platform_x}");
    }
}
