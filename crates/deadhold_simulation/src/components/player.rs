//! Игрок (единственный на сессию → Resource)
//!
//! Позиция = позиция глаз (y ≥ eye_height). Движение считает
//! player::movement, урон наносят зомби (ai) и команда DamagePlayer.

use bevy::prelude::*;

use super::Health;
use crate::config::PlayerTuning;
use crate::economy::Wallet;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub health: Health,
    pub wallet: Wallet,
    pub position: Vec3,
    /// Вертикальная скорость (прыжок/гравитация)
    pub velocity_y: f32,
    /// Стоит на полу → можно прыгать
    pub grounded: bool,
    pub is_moving: bool,
    pub is_sprinting: bool,
    /// Накопленное sim time для авто-регена (мкс)
    pub regen_carry_us: u64,
}

impl PlayerState {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            health: Health::new(tuning.max_health),
            wallet: Wallet::new(tuning.starting_points),
            position: Vec3::new(0.0, tuning.eye_height, 0.0),
            velocity_y: 0.0,
            grounded: true,
            is_moving: false,
            is_sprinting: false,
            regen_carry_us: 0,
        }
    }

    pub fn points(&self) -> u32 {
        self.wallet.points()
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    /// Наносит урон. true = игрок умер именно от этого удара
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.health.is_alive();
        self.health.take_damage(amount);
        was_alive && !self.health.is_alive()
    }

    /// Авто-реген: +regen_per_second HP за каждую полную секунду sim time,
    /// пока 0 < health < max. Возвращает сколько HP восстановлено.
    pub fn regenerate(&mut self, delta_us: u64, tuning: &PlayerTuning) -> u32 {
        const SECOND_US: u64 = 1_000_000;

        if !self.health.is_wounded() {
            self.regen_carry_us = 0;
            return 0;
        }

        self.regen_carry_us += delta_us;
        let seconds = self.regen_carry_us / SECOND_US;
        self.regen_carry_us %= SECOND_US;

        let before = self.health.current;
        let amount = u32::try_from(seconds)
            .unwrap_or(u32::MAX)
            .saturating_mul(tuning.regen_per_second);
        self.health.heal(amount);
        if !self.health.is_wounded() {
            self.regen_carry_us = 0;
        }
        self.health.current - before
    }
}
