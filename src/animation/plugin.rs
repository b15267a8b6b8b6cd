//! Animation plugin - steps every animated sprite.

use bevy::prelude::*;

use super::components::SpriteAnimation;
use crate::core::PlayState;

/// Animation plugin - advances `SpriteAnimation`s while the level isn't paused.
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            advance_sprite_animations
                .run_if(in_state(PlayState::Running).or(in_state(PlayState::Over))),
        );
    }
}

/// Step animations and write the current frame into the sprite's atlas.
pub fn advance_sprite_animations(
    time: Res<Time>,
    mut query: Query<(&mut SpriteAnimation, &mut Sprite)>,
) {
    for (mut animation, mut sprite) in query.iter_mut() {
        animation.advance(time.delta());

        let Some(frame) = animation.current_frame() else {
            continue;
        };
        if let Some(atlas) = sprite.texture_atlas.as_mut() {
            if atlas.index != frame {
                atlas.index = frame;
            }
        }
    }
}
