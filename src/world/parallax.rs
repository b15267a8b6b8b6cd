//! Parallax scrolling for background layers.

use bevy::prelude::*;

use super::data::ParallaxDef;

/// Makes a layer scroll slower than the world.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    pub factor: f32,
    pub offset: Vec2,
}

impl From<ParallaxDef> for Parallax {
    fn from(def: ParallaxDef) -> Self {
        Self {
            factor: def.factor,
            offset: Vec2::new(def.offset.0, def.offset.1),
        }
    }
}

impl Parallax {
    /// Where the layer root sits for a given camera position. A factor of
    /// 1.0 leaves the layer in place, 0.0 drags it along with the camera.
    pub fn position(&self, camera: Vec2) -> Vec2 {
        self.offset + camera * (1.0 - self.factor)
    }
}

/// Reposition parallax layers after the camera has moved.
pub fn apply_parallax(
    camera_query: Query<&Transform, With<Camera2d>>,
    mut layers: Query<(&mut Transform, &Parallax), Without<Camera2d>>,
) {
    let Ok(camera) = camera_query.get_single() else {
        return;
    };
    let camera = camera.translation.truncate();

    for (mut transform, parallax) in layers.iter_mut() {
        let position = parallax.position(camera);
        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn half_factor_moves_half_as_far() {
        let parallax = Parallax {
            factor: 0.5,
            offset: Vec2::new(-200.0, 200.0),
        };
        assert_eq!(parallax.position(Vec2::ZERO), Vec2::new(-200.0, 200.0));
        // Layer drifts by half the camera travel, so it appears to move at half speed
        assert_eq!(parallax.position(Vec2::new(400.0, 100.0)), Vec2::new(0.0, 250.0));
    }

    #[test]
    fn system_follows_camera() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.world_mut()
            .spawn((Camera2d, Transform::from_xyz(1000.0, 0.0, 0.0)));
        let layer = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 0.0, -20.0),
                Parallax {
                    factor: 0.75,
                    offset: Vec2::new(-100.0, 100.0),
                },
            ))
            .id();

        app.world_mut().run_system_once(apply_parallax).unwrap();
        let transform = app.world().get::<Transform>(layer).unwrap();
        assert_eq!(transform.translation, Vec3::new(150.0, 100.0, -20.0));
    }
}
