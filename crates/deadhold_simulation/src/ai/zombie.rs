//! Zombie AI: идти к игроку, в радиусе атаки бить
//!
//! Без pathfinding и коллизий: прямая к игроку по плоскости XZ.
//! Атака строго реже attack_cooldown_ms, по мёртвому игроку не бьём.

use bevy::prelude::*;

use crate::announcer::Announcer;
use crate::components::{PlayerState, Zombie};
use crate::config::SimulationConfig;
use crate::game_state::{handle_player_death, GamePhase};
use crate::logger;
use crate::schedule::SimClock;
use crate::waves::RoundState;

/// Решение зомби на тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZombieIntent {
    /// Смещение по XZ за тик
    Chase { step: Vec3 },
    Attack,
}

/// Куда смотреть и что делать (чистая функция)
///
/// Возвращает yaw (None если стоим ровно на игроке) и намерение.
pub fn seek(
    zombie: Vec3,
    player: Vec3,
    speed: f32,
    dt: f32,
    attack_range: f32,
) -> (Option<f32>, ZombieIntent) {
    let offset = Vec3::new(player.x - zombie.x, 0.0, player.z - zombie.z);
    let distance = offset.length();
    let yaw = (distance > 0.0).then(|| offset.x.atan2(offset.z));

    if distance > attack_range {
        let step = offset / distance * speed * dt;
        (yaw, ZombieIntent::Chase { step })
    } else {
        (yaw, ZombieIntent::Attack)
    }
}

/// System: зомби двигаются и атакуют (TickStep::Ai)
///
/// Порядок обхода по ZombieId: кто раньше заспавнен, тот раньше бьёт.
pub fn zombie_ai(
    clock: Res<SimClock>,
    config: Res<SimulationConfig>,
    round: Res<RoundState>,
    mut phase: ResMut<GamePhase>,
    mut player: ResMut<PlayerState>,
    mut announcer: ResMut<Announcer>,
    mut zombies: Query<&mut Zombie>,
) {
    let now = clock.now_ms();
    let dt = clock.delta_secs();
    let tuning = &config.zombies;

    let mut ordered: Vec<Mut<Zombie>> = zombies.iter_mut().collect();
    ordered.sort_by_key(|zombie| zombie.id);

    for mut zombie in ordered {
        if !zombie.is_active() {
            continue;
        }

        let (yaw, intent) = seek(zombie.position, player.position, zombie.speed, dt, tuning.attack_range);
        if let Some(yaw) = yaw {
            zombie.yaw = yaw;
        }

        match intent {
            ZombieIntent::Chase { step } => zombie.position += step,
            ZombieIntent::Attack => {
                if !player.is_alive() || !zombie.can_attack(now, tuning.attack_cooldown_ms) {
                    continue;
                }

                zombie.last_attack_ms = Some(now);
                let died = player.take_damage(tuning.attack_damage);
                logger::log(&format!(
                    "🧟 Zombie {:?} hits player for {} (hp {})",
                    zombie.id, tuning.attack_damage, player.health.current
                ));

                if died {
                    handle_player_death(&mut phase, &mut announcer, round.round);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_chase_step_toward_player() {
        let (yaw, intent) = seek(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 1.7, 0.0), 2.0, 0.5, 1.2);

        assert_relative_eq!(yaw.unwrap(), 0.0);
        match intent {
            ZombieIntent::Chase { step } => {
                assert_relative_eq!(step.z, 1.0, epsilon = 1e-6);
                assert_eq!(step.y, 0.0);
            }
            other => panic!("expected chase, got {:?}", other),
        }
    }

    #[test]
    fn test_attack_inside_range() {
        let (_, intent) = seek(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.7, 0.0), 2.0, 0.5, 1.2);
        assert_eq!(intent, ZombieIntent::Attack);
    }

    #[test]
    fn test_range_boundary_attacks() {
        // distance == attack_range → атака (движение только строго дальше)
        let (_, intent) = seek(Vec3::new(0.0, 0.0, 1.5), Vec3::new(0.0, 0.0, 0.0), 2.0, 0.5, 1.5);
        assert_eq!(intent, ZombieIntent::Attack);
    }

    #[test]
    fn test_yaw_faces_player() {
        let (yaw, _) = seek(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 1.0, 0.1, 1.2);
        assert_relative_eq!(yaw.unwrap(), std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_on_top_of_player_keeps_yaw() {
        let (yaw, intent) = seek(Vec3::ZERO, Vec3::new(0.0, 1.7, 0.0), 1.0, 0.1, 1.2);
        assert_eq!(yaw, None);
        assert_eq!(intent, ZombieIntent::Attack);
    }
}
