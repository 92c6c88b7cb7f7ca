//! Экономика: очки игрока и цены
//!
//! Очки начисляются за попадания и убийства (combat::damage),
//! тратятся на wall-buy оружие и патроны (combat::Armory).
//! Инвариант: баланс никогда не уходит в минус, отказ не списывает ничего.

use serde::Serialize;

use crate::combat::WeaponKind;
use crate::error::Rejection;

/// Кошелёк игрока
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Wallet {
    points: u32,
}

impl Wallet {
    pub fn new(points: u32) -> Self {
        Self { points }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.points >= cost
    }

    pub fn spend(&mut self, cost: u32) -> Result<(), Rejection> {
        if !self.can_afford(cost) {
            return Err(Rejection::InsufficientPoints {
                cost,
                balance: self.points,
            });
        }
        self.points -= cost;
        Ok(())
    }

    pub fn credit(&mut self, amount: u32) {
        self.points = self.points.saturating_add(amount);
    }
}

pub fn weapon_price(kind: WeaponKind) -> u32 {
    kind.stats().price
}

/// Патроны стоят половину цены оружия (округление вниз)
pub fn ammo_price(kind: WeaponKind) -> u32 {
    kind.stats().price / 2
}
