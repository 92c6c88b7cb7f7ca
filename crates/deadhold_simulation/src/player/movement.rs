//! Player controller: WASD + sprint + прыжок + гравитация
//!
//! Направление берётся из yaw камеры (TickInput::look без Y).
//! Горизонталь скользит вдоль стен (LevelGeometry::slide), вертикаль
//! ограничена полом на высоте глаз.

use bevy::prelude::*;

use super::level::LevelGeometry;
use crate::components::PlayerState;
use crate::config::{PlayerTuning, SimulationConfig};
use crate::input::{MovementIntent, TickInput};
use crate::schedule::SimClock;

/// Единичный вектор движения на плоскости XZ (или ноль)
pub fn movement_direction(intent: MovementIntent, look: Vec3) -> Vec3 {
    let forward = Vec3::new(look.x, 0.0, look.z).normalize_or_zero();
    let right = forward.cross(Vec3::Y).normalize_or_zero();

    let mut direction = Vec3::ZERO;
    if intent.forward {
        direction += forward;
    }
    if intent.backward {
        direction -= forward;
    }
    if intent.right {
        direction += right;
    }
    if intent.left {
        direction -= right;
    }

    direction.normalize_or_zero()
}

/// Один шаг контроллера на dt секунд
pub fn step_player(
    player: &mut PlayerState,
    input: &TickInput,
    level: &LevelGeometry,
    tuning: &PlayerTuning,
    dt: f32,
) {
    let direction = movement_direction(input.movement, input.look);
    let moving = direction != Vec3::ZERO;
    let speed = if input.sprint {
        tuning.sprint_speed
    } else {
        tuning.walk_speed
    };

    if input.jump && player.grounded {
        player.velocity_y = tuning.jump_impulse;
        player.grounded = false;
    }
    player.velocity_y -= tuning.gravity * dt;

    let mut position = level.slide(player.position, direction * speed * dt, tuning.collision_radius);
    position.y += player.velocity_y * dt;

    if position.y < tuning.eye_height {
        position.y = tuning.eye_height;
        player.velocity_y = 0.0;
        player.grounded = true;
    }

    player.position = position;
    player.is_moving = moving;
    player.is_sprinting = input.sprint && moving;
}

/// System: движение игрока (TickStep::Movement)
pub fn player_movement(
    clock: Res<SimClock>,
    input: Res<TickInput>,
    config: Res<SimulationConfig>,
    level: Res<LevelGeometry>,
    mut player: ResMut<PlayerState>,
) {
    step_player(&mut player, &input, &level, &config.player, clock.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn forward() -> MovementIntent {
        MovementIntent {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_right_is_positive_x_when_looking_north() {
        let intent = MovementIntent {
            right: true,
            ..Default::default()
        };
        assert_eq!(movement_direction(intent, Vec3::NEG_Z), Vec3::X);
    }

    #[test]
    fn test_diagonal_normalized() {
        let intent = MovementIntent {
            forward: true,
            right: true,
            ..Default::default()
        };
        assert_relative_eq!(movement_direction(intent, Vec3::NEG_Z).length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_look_pitch_ignored() {
        let direction = movement_direction(forward(), Vec3::new(0.0, -0.9, -0.1));
        assert_relative_eq!(direction.z, -1.0, epsilon = 1e-6);
        assert_eq!(direction.y, 0.0);
    }

    #[test]
    fn test_walk_and_sprint_distance() {
        let tuning = PlayerTuning::default();
        let level = LevelGeometry::open();

        let mut walker = PlayerState::new(&tuning);
        let input = TickInput::idle(Duration::from_secs(1)).moving(forward());
        step_player(&mut walker, &input, &level, &tuning, 0.5);
        assert_relative_eq!(walker.position.z, -4.0, epsilon = 1e-5);
        assert!(walker.is_moving);
        assert!(!walker.is_sprinting);

        let mut sprinter = PlayerState::new(&tuning);
        let mut input = TickInput::idle(Duration::from_secs(1)).moving(forward());
        input.sprint = true;
        step_player(&mut sprinter, &input, &level, &tuning, 0.5);
        assert_relative_eq!(sprinter.position.z, -7.0, epsilon = 1e-5);
        assert!(sprinter.is_sprinting);
    }

    #[test]
    fn test_sprint_without_moving_is_not_sprinting() {
        let tuning = PlayerTuning::default();
        let mut player = PlayerState::new(&tuning);
        let mut input = TickInput::idle(Duration::from_millis(16));
        input.sprint = true;

        step_player(&mut player, &input, &LevelGeometry::open(), &tuning, 0.016);
        assert!(!player.is_moving);
        assert!(!player.is_sprinting);
    }

    #[test]
    fn test_jump_and_land() {
        let tuning = PlayerTuning::default();
        let level = LevelGeometry::open();
        let mut player = PlayerState::new(&tuning);

        let mut jump = TickInput::idle(Duration::from_millis(100));
        jump.jump = true;
        step_player(&mut player, &jump, &level, &tuning, 0.1);
        assert!(!player.grounded);
        assert!(player.position.y > tuning.eye_height);

        // Второй прыжок в воздухе игнорируется
        let vy = player.velocity_y;
        step_player(&mut player, &jump, &level, &tuning, 0.1);
        assert_relative_eq!(player.velocity_y, vy - tuning.gravity * 0.1, epsilon = 1e-5);

        let idle = TickInput::idle(Duration::from_millis(100));
        for _ in 0..20 {
            step_player(&mut player, &idle, &level, &tuning, 0.1);
        }
        assert!(player.grounded);
        assert_eq!(player.position.y, tuning.eye_height);
        assert_eq!(player.velocity_y, 0.0);
    }

    #[test]
    fn test_never_below_floor() {
        let tuning = PlayerTuning::default();
        let mut player = PlayerState::new(&tuning);

        step_player(&mut player, &TickInput::idle(Duration::ZERO), &LevelGeometry::open(), &tuning, 5.0);
        assert_eq!(player.position.y, tuning.eye_height);
    }
}
