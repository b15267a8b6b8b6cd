//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. For example,
//! player movement only runs while the level is `Running`, while the
//! restart key is only read once the level is `Over`.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// The game transitions between these states:
/// - Start in `Loading` while images and sounds are requested
/// - Move to `InGame` when loading completes (or fails)
/// - `Restarting` is passed through for a single frame so the level is
///   torn down and rebuilt from scratch
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading assets and data files
    #[default]
    Loading,
    /// The level is built and on screen
    InGame,
    /// Level teardown before the next `InGame`
    Restarting,
}

/// Sub-states for gameplay - only active when GameState::InGame.
///
/// - `Running`: normal movement, pickups, platforms
/// - `Paused`: everything frozen, pause overlay visible
/// - `Over`: an end state was reached; the world stays visible and
///   waits for the restart key
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    #[default]
    Running,
    Paused,
    Over,
}
