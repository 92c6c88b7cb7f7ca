//! Авто-реген здоровья игрока (фаза Commit тика)

use bevy::prelude::*;

use crate::components::PlayerState;
use crate::config::SimulationConfig;
use crate::schedule::SimClock;

/// System: +1 HP за секунду sim time, пока игрок ранен и жив
pub fn regenerate_player_health(
    clock: Res<SimClock>,
    config: Res<SimulationConfig>,
    mut player: ResMut<PlayerState>,
) {
    player.regenerate(clock.delta_us(), &config.player);
}
