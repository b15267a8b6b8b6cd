//! Collectible components.

use bevy::prelude::*;

use crate::core::ItemKind;

/// A coin or key waiting to be picked up.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collectible(pub ItemKind);
