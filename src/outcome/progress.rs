//! Per-level progress and the end-state rules.

use bevy::prelude::*;

use crate::core::{HazardKind, ItemKind, Outcome};

/// What the player has achieved in the current attempt. Replaced with a
/// fresh value every time the level is built.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct LevelProgress {
    pub coins_taken: u32,
    pub coins_total: u32,
    pub has_key: bool,
    pub outcome: Option<Outcome>,
}

impl LevelProgress {
    pub fn new(coins_total: u32) -> Self {
        Self {
            coins_total,
            ..default()
        }
    }

    /// Record a picked up item.
    pub fn collect(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Coin => self.coins_taken += 1,
            ItemKind::Key => self.has_key = true,
        }
    }

    /// Decide how touching a hazard ends the level. Only the first
    /// hazard counts; later contacts return `None`.
    pub fn resolve(&mut self, hazard: HazardKind) -> Option<Outcome> {
        if self.is_over() {
            return None;
        }

        let outcome = match hazard {
            HazardKind::Spikes => Outcome::Spiked,
            HazardKind::Door if self.has_key => Outcome::Escaped {
                coins: self.coins_taken,
                total: self.coins_total,
            },
            HazardKind::Door => Outcome::ForgotKey,
        };
        self.outcome = Some(outcome);
        Some(outcome)
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}
