//! Camera follow, bounds and scripted moves.

use bevy::prelude::*;

use super::components::*;
use crate::core::GameConfig;

/// Projection scale for a zoom factor; zoom 0.5 shows twice the world.
pub fn zoom_to_scale(zoom: f32) -> f32 {
    if zoom <= 0.0 {
        return 1.0;
    }
    1.0 / zoom
}

/// Where the camera must be so `target` sits inside the deadzone box.
pub fn deadzone_goal(camera: Vec2, target: Vec2, deadzone: Vec2) -> Vec2 {
    let half = deadzone / 2.0;
    let offset = target - camera;
    let excess = offset - offset.clamp(-half, half);
    camera + excess
}

/// Per-frame lerp fraction adjusted for frame time.
pub fn frame_lerp(lerp: f32, dt: f32) -> f32 {
    1.0 - (1.0 - lerp.clamp(0.0, 1.0)).powf(dt * 60.0)
}

/// Keep the view inside the map. A map smaller than the view is
/// centred instead.
pub fn clamp_to_bounds(center: Vec2, half_view: Vec2, size: Vec2) -> Vec2 {
    let axis = |c: f32, half: f32, extent: f32| {
        if extent <= half * 2.0 {
            extent / 2.0
        } else {
            c.clamp(half, extent - half)
        }
    };
    Vec2::new(
        axis(center.x, half_view.x, size.x),
        axis(center.y, half_view.y, size.y),
    )
}

/// Spawn the game camera.
pub fn spawn_camera(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        Camera2d,
        MainCamera,
        OrthographicProjection {
            scale: zoom_to_scale(config.camera_zoom),
            ..OrthographicProjection::default_2d()
        },
    ));
}

/// Point the camera at a freshly built level and follow `target`.
pub fn reset_camera(
    commands: &mut Commands,
    camera: Entity,
    target: Entity,
    at: Vec2,
    map_size: Vec2,
    config: &GameConfig,
) {
    commands
        .entity(camera)
        .remove::<CameraMove>()
        .insert((
            Transform::from_xyz(at.x, at.y, 0.0),
            OrthographicProjection {
                scale: zoom_to_scale(config.camera_zoom),
                ..OrthographicProjection::default_2d()
            },
            CameraFollow {
                target,
                lerp: config.camera_lerp,
                deadzone: Vec2::new(config.camera_deadzone.0, config.camera_deadzone.1),
            },
            CameraBounds { size: map_size },
        ));
}

/// Stop following and start a zoom and pan towards `target`.
pub fn begin_camera_move(
    commands: &mut Commands,
    camera: Entity,
    from: Vec2,
    current_scale: f32,
    target: Vec2,
    config: &GameConfig,
) {
    // Scale and zoom are reciprocal, so the same mapping works both ways
    let from_zoom = zoom_to_scale(current_scale);
    commands.entity(camera).remove::<CameraFollow>().insert(CameraMove::towards(
        from_zoom,
        config.end_zoom,
        from,
        target,
        config.end_camera_secs,
    ));
}

/// Ease the camera towards its follow target.
pub fn follow_target(
    time: Res<Time>,
    targets: Query<&Transform, Without<MainCamera>>,
    mut cameras: Query<
        (&mut Transform, &CameraFollow, &OrthographicProjection, Option<&CameraBounds>),
        With<MainCamera>,
    >,
) {
    for (mut transform, follow, projection, bounds) in cameras.iter_mut() {
        let Ok(target) = targets.get(follow.target) else {
            continue;
        };

        let current = transform.translation.truncate();
        let goal = deadzone_goal(current, target.translation.truncate(), follow.deadzone);
        let mut next = current.lerp(goal, frame_lerp(follow.lerp, time.delta_secs()));

        if let Some(bounds) = bounds {
            next = clamp_to_bounds(next, projection.area.half_size(), bounds.size);
        }

        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

/// Advance scripted zoom and pan. The pan stays inside the map at the
/// zoom reached this frame.
pub fn animate_camera_move(
    time: Res<Time>,
    mut cameras: Query<(
        &mut Transform,
        &mut OrthographicProjection,
        &mut CameraMove,
        Option<&CameraBounds>,
    )>,
) {
    let delta = time.delta();
    for (mut transform, mut projection, mut movement, bounds) in cameras.iter_mut() {
        // The projection area lags a frame behind scale changes
        let unscaled_half = if projection.scale > 0.0 {
            projection.area.half_size() / projection.scale
        } else {
            projection.area.half_size()
        };

        projection.scale = zoom_to_scale(movement.zoom.tick(delta));
        let mut position = movement.pan.tick(delta);
        if let Some(bounds) = bounds {
            position = clamp_to_bounds(position, unscaled_half * projection.scale, bounds.size);
        }

        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}
