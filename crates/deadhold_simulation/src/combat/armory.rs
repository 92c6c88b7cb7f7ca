//! Armory: текущее оружие, патроны, перезарядка, cooldown'ы
//!
//! Единственный владелец weapon state игрока (Resource).
//! Все gated действия возвращают `Result<_, Rejection>`; отказ ничего не меняет.
//!
//! Cooldown'ы выстрела и удара глобальные (не per-weapon):
//! смена оружия не сбрасывает ни last_fired, ни last_melee.

use bevy::prelude::*;

use super::weapon_stats::{WeaponKind, WeaponStats};
use crate::config::CombatTuning;
use crate::economy::{ammo_price, weapon_price, Wallet};
use crate::error::Rejection;
use crate::schedule::{ScheduledEvent, Scheduler, TimerToken};

/// Магазин + запас одного оружия
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoState {
    pub mag: u32,
    pub reserve: u32,
}

/// Идущая перезарядка
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveReload {
    pub weapon: WeaponKind,
    pub started_ms: u64,
    /// Токен ReloadComplete в Scheduler
    pub token: TimerToken,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Armory {
    current: WeaponKind,
    ammo: [AmmoState; 6],
    reload: Option<ActiveReload>,
    last_fired_ms: Option<u64>,
    last_melee_ms: Option<u64>,
}

impl Default for Armory {
    fn default() -> Self {
        Self::new()
    }
}

impl Armory {
    /// Стартовый набор: пистолет в руках, полные магазины, стартовые запасы
    pub fn new() -> Self {
        let ammo = WeaponKind::ALL.map(|kind| {
            let stats = kind.stats();
            AmmoState {
                mag: stats.mag_size,
                reserve: stats.starting_reserve,
            }
        });

        Self {
            current: WeaponKind::Pistol,
            ammo,
            reload: None,
            last_fired_ms: None,
            last_melee_ms: None,
        }
    }

    pub fn current(&self) -> WeaponKind {
        self.current
    }

    pub fn current_stats(&self) -> &'static WeaponStats {
        self.current.stats()
    }

    pub fn ammo(&self, kind: WeaponKind) -> AmmoState {
        self.ammo[kind.index()]
    }

    pub fn current_ammo(&self) -> AmmoState {
        self.ammo(self.current)
    }

    pub fn reload(&self) -> Option<ActiveReload> {
        self.reload
    }

    pub fn is_reloading(&self) -> bool {
        self.reload.is_some()
    }

    pub fn last_fired_ms(&self) -> Option<u64> {
        self.last_fired_ms
    }

    pub fn last_melee_ms(&self) -> Option<u64> {
        self.last_melee_ms
    }

    /// Прогресс перезарядки 0..=1 (для HUD)
    pub fn reload_progress(&self, now_ms: u64) -> Option<f32> {
        self.reload.map(|reload| {
            let total = reload.weapon.stats().reload_time_ms.max(1);
            let elapsed = now_ms.saturating_sub(reload.started_ms).min(total);
            elapsed as f32 / total as f32
        })
    }

    // === Выстрел ===

    pub fn can_fire(&self, now_ms: u64, tuning: &CombatTuning) -> Result<(), Rejection> {
        if self.is_reloading() {
            return Err(Rejection::Reloading);
        }

        let stats = self.current_stats();
        if let Some(remaining_ms) = remaining(self.last_fired_ms, now_ms, stats.fire_rate_ms) {
            return Err(Rejection::FireCooldown { remaining_ms });
        }

        if self.current_ammo().mag == 0 {
            return Err(Rejection::MagazineEmpty);
        }

        if let Some(remaining_ms) = remaining(self.last_melee_ms, now_ms, tuning.melee_fire_block_ms) {
            return Err(Rejection::MeleeRecovery { remaining_ms });
        }

        Ok(())
    }

    /// Выстрел: -1 патрон, last_fired = now. Возвращает остаток в магазине
    pub fn fire(&mut self, now_ms: u64, tuning: &CombatTuning) -> Result<u32, Rejection> {
        self.can_fire(now_ms, tuning)?;

        let ammo = &mut self.ammo[self.current.index()];
        ammo.mag -= 1;
        self.last_fired_ms = Some(now_ms);
        Ok(ammo.mag)
    }

    // === Melee ===

    pub fn can_melee(&self, now_ms: u64, tuning: &CombatTuning) -> Result<(), Rejection> {
        match remaining(self.last_melee_ms, now_ms, tuning.melee_cooldown_ms) {
            Some(remaining_ms) => Err(Rejection::MeleeCooldown { remaining_ms }),
            None => Ok(()),
        }
    }

    /// Удар ножом (патроны и перезарядка не важны)
    pub fn melee(&mut self, now_ms: u64, tuning: &CombatTuning) -> Result<(), Rejection> {
        self.can_melee(now_ms, tuning)?;
        self.last_melee_ms = Some(now_ms);
        Ok(())
    }

    // === Перезарядка ===

    pub fn can_reload(&self) -> Result<(), Rejection> {
        let ammo = self.current_ammo();
        if ammo.mag == self.current_stats().mag_size {
            return Err(Rejection::MagazineFull);
        }
        if ammo.reserve == 0 {
            return Err(Rejection::NoReserve);
        }
        if self.is_reloading() {
            return Err(Rejection::AlreadyReloading);
        }
        Ok(())
    }

    /// Старт перезарядки: ReloadComplete через reload_time текущего оружия
    pub fn begin_reload(&mut self, now_ms: u64, scheduler: &mut Scheduler) -> Result<TimerToken, Rejection> {
        self.can_reload()?;

        let weapon = self.current;
        let token = scheduler.schedule(
            now_ms + weapon.stats().reload_time_ms,
            ScheduledEvent::ReloadComplete { weapon },
        );
        self.reload = Some(ActiveReload {
            weapon,
            started_ms: now_ms,
            token,
        });
        Ok(token)
    }

    /// Завершение перезарядки по токену. Чужой/устаревший токен игнорируется.
    ///
    /// Переносит min(mag_size - mag, reserve) из запаса в магазин.
    pub fn complete_reload(&mut self, token: TimerToken) -> Option<u32> {
        let reload = self.reload.filter(|reload| reload.token == token)?;
        self.reload = None;

        let stats = reload.weapon.stats();
        let ammo = &mut self.ammo[reload.weapon.index()];
        let moved = stats.mag_size.saturating_sub(ammo.mag).min(ammo.reserve);
        ammo.mag += moved;
        ammo.reserve -= moved;
        Some(moved)
    }

    /// Прервать перезарядку (отменяет ReloadComplete)
    pub fn cancel_reload(&mut self, scheduler: &mut Scheduler) -> bool {
        match self.reload.take() {
            Some(reload) => {
                scheduler.cancel(reload.token);
                true
            }
            None => false,
        }
    }

    // === Покупки ===

    /// Покупка оружия: списать цену, взять в руки, прервать перезарядку
    pub fn buy_weapon(
        &mut self,
        kind: WeaponKind,
        wallet: &mut Wallet,
        scheduler: &mut Scheduler,
    ) -> Result<(), Rejection> {
        if kind == self.current {
            return Err(Rejection::AlreadyEquipped);
        }
        wallet.spend(weapon_price(kind))?;

        self.cancel_reload(scheduler);
        self.current = kind;
        Ok(())
    }

    /// Покупка патронов: запас = mag_size × 4 (не прибавляется)
    pub fn buy_ammo(&mut self, kind: WeaponKind, wallet: &mut Wallet) -> Result<(), Rejection> {
        wallet.spend(ammo_price(kind))?;
        self.ammo[kind.index()].reserve = kind.stats().mag_size * 4;
        Ok(())
    }
}

/// Сколько мс осталось до конца окна (None = окно прошло или не открывалось)
fn remaining(stamp_ms: Option<u64>, now_ms: u64, window_ms: u64) -> Option<u64> {
    let elapsed = now_ms.saturating_sub(stamp_ms?);
    (elapsed < window_ms).then(|| window_ms - elapsed)
}
