//! Outcome module - level progress and the three ways a level ends.

mod plugin;
mod progress;
mod systems;

pub use plugin::OutcomePlugin;
pub use progress::LevelProgress;
pub use systems::{end_texts, present_outcome, remains_still, resolve_end_states, EndText};
