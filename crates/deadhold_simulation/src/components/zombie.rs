//! Зомби: компонент, варианты, запрос на спавн

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ZombieTuning;
use crate::spatial::BodyPart;

/// Стабильный ID зомби (монотонный, не переиспользуется в сессии store)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ZombieId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZombieVariant {
    #[default]
    Standard,
    /// Быстрый и хрупкий
    Fast,
    /// Медленный, толстый, режет входящий урон
    Tank,
}

impl ZombieVariant {
    pub fn speed_multiplier(self, tuning: &ZombieTuning) -> f32 {
        match self {
            ZombieVariant::Standard => 1.0,
            ZombieVariant::Fast => tuning.fast_speed_multiplier,
            ZombieVariant::Tank => tuning.tank_speed_multiplier,
        }
    }

    pub fn health_multiplier(self, tuning: &ZombieTuning) -> f32 {
        match self {
            ZombieVariant::Standard => 1.0,
            ZombieVariant::Fast => tuning.fast_health_multiplier,
            ZombieVariant::Tank => tuning.tank_health_multiplier,
        }
    }

    /// Доля входящего урона, которая реально снимается
    pub fn damage_taken_multiplier(self, tuning: &ZombieTuning) -> f32 {
        match self {
            ZombieVariant::Tank => tuning.tank_damage_multiplier,
            _ => 1.0,
        }
    }
}

/// Куда пришлось последнее попадание (для брызг крови/вспышки)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum HitType {
    #[default]
    None,
    Body,
    Head,
}

impl From<BodyPart> for HitType {
    fn from(part: BodyPart) -> Self {
        match part {
            BodyPart::Body => HitType::Body,
            BodyPart::Head => HitType::Head,
        }
    }
}

/// Запрос на спавн (статы уже с учётом раунда и варианта)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub position: Vec3,
    pub speed: f32,
    pub health: f32,
    pub variant: ZombieVariant,
}

/// Зомби
///
/// Инвариант: 0 < health ≤ max_health у каждого живого entity.
/// Убитый зомби despawn'ится в том же тике, поэтому отдельного
/// флага `active` нет: entity есть ⇔ зомби активен.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Zombie {
    pub id: ZombieId,
    /// Позиция ног (y = 0)
    pub position: Vec3,
    /// Поворот к игроку (радианы вокруг Y)
    pub yaw: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub variant: ZombieVariant,
    pub last_attack_ms: Option<u64>,
    pub last_hit: HitType,
}

impl Zombie {
    pub fn spawn(id: ZombieId, request: &SpawnRequest) -> Self {
        Self {
            id,
            position: request.position,
            yaw: 0.0,
            health: request.health,
            max_health: request.health,
            speed: request.speed,
            variant: request.variant,
            last_attack_ms: None,
            last_hit: HitType::None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.health > 0.0
    }

    /// Атака разрешена строго после cooldown (или если ещё не атаковал)
    pub fn can_attack(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_attack_ms {
            Some(last) => now_ms.saturating_sub(last) > cooldown_ms,
            None => true,
        }
    }
}

/// Выдача ZombieId (монотонно, на всю жизнь store)
#[derive(Resource, Debug, Default)]
pub struct ZombieIdAllocator {
    next: u64,
}

impl ZombieIdAllocator {
    pub fn allocate(&mut self) -> ZombieId {
        let id = ZombieId(self.next);
        self.next += 1;
        id
    }
}
