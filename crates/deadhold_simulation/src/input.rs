//! Ввод одного тика
//!
//! Renderer собирает клавиши/мышь и отдаёт `TickInput` в `SimulationStore::advance`.
//! Все флаги одноразовые: действуют только в этом тике.

use bevy::prelude::*;
use std::time::Duration;

/// WASD
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Луч прицела в мировых координатах (камера → центр экрана)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TickInput {
    /// Сколько времени прошло с прошлого тика
    pub delta: Duration,
    pub movement: MovementIntent,
    pub sprint: bool,
    pub jump: bool,
    /// Направление взгляда камеры (только yaw идёт в движение)
    pub look: Vec3,
    /// Явный луч прицела; None = из позиции игрока по `look`
    pub aim: Option<AimRay>,
    pub fire: bool,
    pub melee: bool,
    pub reload: bool,
    pub interact: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self::idle(Duration::ZERO)
    }
}

impl TickInput {
    /// Тик без нажатий (камера смотрит в -Z)
    pub fn idle(delta: Duration) -> Self {
        Self {
            delta,
            movement: MovementIntent::default(),
            sprint: false,
            jump: false,
            look: Vec3::NEG_Z,
            aim: None,
            fire: false,
            melee: false,
            reload: false,
            interact: false,
        }
    }

    pub fn firing(mut self) -> Self {
        self.fire = true;
        self
    }

    pub fn meleeing(mut self) -> Self {
        self.melee = true;
        self
    }

    pub fn reloading(mut self) -> Self {
        self.reload = true;
        self
    }

    pub fn interacting(mut self) -> Self {
        self.interact = true;
        self
    }

    pub fn moving(mut self, movement: MovementIntent) -> Self {
        self.movement = movement;
        self
    }

    pub fn looking(mut self, look: Vec3) -> Self {
        self.look = look;
        self
    }

    pub fn aiming(mut self, origin: Vec3, direction: Vec3) -> Self {
        self.aim = Some(AimRay { origin, direction });
        self
    }

    /// Луч атаки: явный прицел или взгляд из глаз игрока
    pub fn aim_ray(&self, eye: Vec3) -> AimRay {
        let ray = self.aim.unwrap_or(AimRay {
            origin: eye,
            direction: self.look,
        });

        AimRay {
            origin: ray.origin,
            direction: ray.direction.normalize_or(Vec3::NEG_Z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_ray_defaults_to_look() {
        let input = TickInput::idle(Duration::from_millis(16)).looking(Vec3::new(3.0, 0.0, 0.0));
        let ray = input.aim_ray(Vec3::new(0.0, 1.7, 0.0));

        assert_eq!(ray.origin, Vec3::new(0.0, 1.7, 0.0));
        assert_eq!(ray.direction, Vec3::X);
    }

    #[test]
    fn test_degenerate_look_falls_back() {
        let input = TickInput::idle(Duration::ZERO).looking(Vec3::ZERO);
        assert_eq!(input.aim_ray(Vec3::ZERO).direction, Vec3::NEG_Z);
    }
}
