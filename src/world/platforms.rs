//! Moving platforms that slide back and forth in unison.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::time::Duration;

use crate::core::{GameConfig, PlayState};

/// Marker for platforms driven by the shared `PlatformCycle`.
#[derive(Component)]
pub struct MovingPlatform;

/// Shared horizontal velocity of all moving platforms. The direction
/// flips each time the timer fires.
#[derive(Resource, Debug, Clone)]
pub struct PlatformCycle {
    pub velocity: f32,
    pub timer: Timer,
}

impl PlatformCycle {
    pub fn new(speed: f32, interval: f32) -> Self {
        Self {
            velocity: speed,
            timer: Timer::from_seconds(interval.max(0.0), TimerMode::Repeating),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.platform_speed, config.platform_reverse_secs)
    }

    /// Advance the cycle and return the velocity for this frame.
    pub fn tick(&mut self, delta: Duration) -> f32 {
        self.timer.tick(delta);
        // Two reversals in one long frame cancel out
        if self.timer.times_finished_this_tick() % 2 == 1 {
            self.velocity = -self.velocity;
        }
        self.velocity
    }
}

/// The cycle only counts down while the level is live. Once it is over
/// the platforms keep sliding but never turn around.
pub fn setup_platform_systems(app: &mut App) {
    app.add_systems(
        Update,
        (
            advance_platform_cycle.run_if(in_state(PlayState::Running)),
            oscillate_platforms
                .run_if(in_state(PlayState::Running).or(in_state(PlayState::Over))),
        )
            .chain()
            .run_if(resource_exists::<PlatformCycle>),
    );
}

pub fn advance_platform_cycle(time: Res<Time>, mut cycle: ResMut<PlatformCycle>) {
    cycle.tick(time.delta());
}

/// Push the cycle's velocity into every platform body.
pub fn oscillate_platforms(
    cycle: Res<PlatformCycle>,
    mut platforms: Query<&mut Velocity, With<MovingPlatform>>,
) {
    for mut body in platforms.iter_mut() {
        body.linvel = Vec2::new(cycle.velocity, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn reverses_after_interval() {
        let mut cycle = PlatformCycle::new(75.0, 1.0);
        assert_eq!(cycle.tick(secs(0.5)), 75.0);
        assert_eq!(cycle.tick(secs(0.4)), 75.0);
        assert_eq!(cycle.tick(secs(0.2)), -75.0);
        assert_eq!(cycle.tick(secs(0.8)), -75.0);
        assert_eq!(cycle.tick(secs(0.2)), 75.0);
        // Two intervals in one frame: back where it was
        assert_eq!(cycle.tick(secs(2.0)), 75.0);
    }

    #[test]
    fn default_interval_matches_800_frames() {
        let cycle = PlatformCycle::from_config(&GameConfig::default());
        assert!((cycle.timer.duration().as_secs_f32() * 60.0 - 800.0).abs() < 1e-3);
        assert_eq!(cycle.velocity, 75.0);
    }

    #[test]
    fn all_platforms_share_velocity() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(PlatformCycle::new(75.0, 1.0));
        let a = app.world_mut().spawn((MovingPlatform, Velocity::zero())).id();
        let b = app.world_mut().spawn((MovingPlatform, Velocity::zero())).id();
        let other = app.world_mut().spawn(Velocity::zero()).id();

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(secs(1.5));
        app.world_mut().run_system_once(advance_platform_cycle).unwrap();
        app.world_mut().run_system_once(oscillate_platforms).unwrap();

        for entity in [a, b] {
            assert_eq!(app.world().get::<Velocity>(entity).unwrap().linvel, Vec2::new(-75.0, 0.0));
        }
        assert_eq!(app.world().get::<Velocity>(other).unwrap().linvel, Vec2::ZERO);
    }

    fn set_play_state(app: &mut App, state: PlayState) {
        app.world_mut().resource_mut::<NextState<PlayState>>().set(state);
        app.update();
    }

    fn platform_velocity(app: &App, platform: Entity) -> f32 {
        app.world().get::<Velocity>(platform).unwrap().linvel.x
    }

    #[test]
    fn cycle_holds_while_paused_and_never_reverses_once_over() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(secs(0.1)))
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()
            .insert_resource(PlatformCycle::new(75.0, 0.25));
        setup_platform_systems(&mut app);
        let platform = app.world_mut().spawn((MovingPlatform, Velocity::zero())).id();

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::InGame);
        for _ in 0..4 {
            app.update();
        }
        assert_eq!(platform_velocity(&app, platform), -75.0);

        set_play_state(&mut app, PlayState::Paused);
        let held = app.world().resource::<PlatformCycle>().timer.elapsed();
        for _ in 0..5 {
            app.update();
        }
        let cycle = app.world().resource::<PlatformCycle>();
        assert_eq!(cycle.timer.elapsed(), held);
        assert_eq!(cycle.velocity, -75.0);

        set_play_state(&mut app, PlayState::Over);
        app.world_mut().get_mut::<Velocity>(platform).unwrap().linvel = Vec2::ZERO;
        for _ in 0..5 {
            app.update();
        }
        // Still driven, same direction
        assert_eq!(platform_velocity(&app, platform), -75.0);
    }
}
