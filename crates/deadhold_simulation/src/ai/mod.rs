//! Zombie AI module
//!
//! Прямолинейное преследование игрока + ближняя атака по cooldown.

use bevy::prelude::*;

pub mod zombie;

// Re-export основных типов
pub use zombie::{seek, zombie_ai, ZombieIntent};

use crate::TickStep;

/// AI Plugin
///
/// zombie_ai в TickStep::Ai (после движения игрока, до боя)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, zombie_ai.in_set(TickStep::Ai));
    }
}
