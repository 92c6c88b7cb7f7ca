//! Combat resolver: луч атаки → цель и сырой урон
//!
//! Чистая функция от результатов raycast. Правила:
//! - ignorable попадания пропускаются;
//! - берётся ближайшее значимое попадание (порядок `hits` не важен);
//! - ближайшее дальше дальности атаки = промах;
//! - ближайшее в сцену = пуля остановлена;
//! - попадание в зомби: урон оружия × headshot multiplier (голова).
//!   Melee всегда считается попаданием в тело.
//!
//! Существование зомби проверяет вызывающий (неизвестный id = промах).

use super::damage::DamageEvent;
use super::weapon_stats::WeaponKind;
use crate::config::CombatTuning;
use crate::spatial::{BodyPart, HitTarget, RayHit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Shot(WeaponKind),
    Melee,
}

impl AttackKind {
    pub fn range(self, tuning: &CombatTuning) -> f32 {
        match self {
            AttackKind::Shot(weapon) => weapon.stats().range,
            AttackKind::Melee => tuning.melee_range,
        }
    }

    pub fn base_damage(self, tuning: &CombatTuning) -> f32 {
        match self {
            AttackKind::Shot(weapon) => weapon.stats().damage,
            AttackKind::Melee => tuning.melee_damage,
        }
    }
}

/// Итог разрешения луча
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Пусто или всё дальше дальности
    Miss,
    /// Первым оказалась стена/проп
    Blocked { distance: f32 },
    /// Попадание в зомби
    Hit { event: DamageEvent, distance: f32 },
}

pub fn resolve_ray(hits: &[RayHit], attack: AttackKind, tuning: &CombatTuning) -> Resolution {
    let Some(hit) = hits
        .iter()
        .filter(|hit| !hit.ignorable)
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
    else {
        return Resolution::Miss;
    };

    if hit.distance > attack.range(tuning) {
        return Resolution::Miss;
    }

    let target = match hit.target {
        HitTarget::Scenery => return Resolution::Blocked { distance: hit.distance },
        HitTarget::Zombie(id) => id,
    };

    let body_part = match attack {
        AttackKind::Melee => BodyPart::Body,
        AttackKind::Shot(_) => hit.body_part.unwrap_or_default(),
    };

    let multiplier = match body_part {
        BodyPart::Head => tuning.headshot_multiplier,
        BodyPart::Body => 1.0,
    };

    Resolution::Hit {
        event: DamageEvent {
            target,
            raw_damage: attack.base_damage(tuning) * multiplier,
            body_part,
        },
        distance: hit.distance,
    }
}
