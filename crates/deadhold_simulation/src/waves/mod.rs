//! Waves module: раунды и спавн зомби

use bevy::prelude::*;

pub mod director;


pub use director::{
    advance_round, next_spawn_delay_ms, roll_spawn, roll_variant, spawn_request, wave_director, zombies_for_round,
    RoundState, SpawnPoints,
};

use crate::components::ZombieIdAllocator;
use crate::TickStep;

/// Wave Plugin
///
/// wave_director в TickStep::Waves (после боя: убитые этого тика уже despawn'нуты)
pub struct WavePlugin;

impl Plugin for WavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoundState>()
            .init_resource::<SpawnPoints>()
            .init_resource::<ZombieIdAllocator>();

        app.add_systems(Update, wave_director.in_set(TickStep::Waves));
    }
}
