//! Таблица оружия
//!
//! Статы неизменны в рантайме: один `WeaponStats` на `WeaponKind`.
//! Состояние (патроны, перезарядка, cooldown'ы) живёт в `Armory`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    Rifle,
    Shotgun,
    Smg,
    Sniper,
    Pump,
}

/// Weapon stats (только чтение)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    /// Отображаемое имя
    pub name: &'static str,

    /// Урон за попадание (до headshot/tank модификаторов)
    pub damage: f32,

    /// Минимальный интервал между выстрелами (мс)
    pub fire_rate_ms: u64,

    pub mag_size: u32,

    pub reload_time_ms: u64,

    /// Дальность (метры). Попадание дальше = промах
    pub range: f32,

    /// Цена на wall-buy (0 = стартовое)
    pub price: u32,

    /// Запас патронов в начале сессии
    pub starting_reserve: u32,
}

const PISTOL: WeaponStats = WeaponStats {
    name: "M1911",
    damage: 25.0,
    fire_rate_ms: 200,
    mag_size: 8,
    reload_time_ms: 1500,
    range: 50.0,
    price: 0,
    starting_reserve: 32,
};

const RIFLE: WeaponStats = WeaponStats {
    name: "AK-47",
    damage: 40.0,
    fire_rate_ms: 100,
    mag_size: 30,
    reload_time_ms: 2500,
    range: 100.0,
    price: 1200,
    starting_reserve: 120,
};

const SHOTGUN: WeaponStats = WeaponStats {
    name: "Olympia",
    damage: 100.0,
    fire_rate_ms: 800,
    mag_size: 2,
    reload_time_ms: 3000,
    range: 15.0,
    price: 500,
    starting_reserve: 20,
};

const SMG: WeaponStats = WeaponStats {
    name: "MP5",
    damage: 22.0,
    fire_rate_ms: 75,
    mag_size: 40,
    reload_time_ms: 2000,
    range: 40.0,
    price: 1000,
    starting_reserve: 200,
};

const SNIPER: WeaponStats = WeaponStats {
    name: "L96A1",
    damage: 300.0,
    fire_rate_ms: 1200,
    mag_size: 5,
    reload_time_ms: 3500,
    range: 200.0,
    price: 2500,
    starting_reserve: 30,
};

const PUMP: WeaponStats = WeaponStats {
    name: "Remington 870",
    damage: 150.0,
    fire_rate_ms: 900,
    mag_size: 6,
    reload_time_ms: 4000,
    range: 20.0,
    price: 1500,
    starting_reserve: 48,
};

impl WeaponKind {
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::Pistol,
        WeaponKind::Rifle,
        WeaponKind::Shotgun,
        WeaponKind::Smg,
        WeaponKind::Sniper,
        WeaponKind::Pump,
    ];

    pub fn stats(self) -> &'static WeaponStats {
        match self {
            WeaponKind::Pistol => &PISTOL,
            WeaponKind::Rifle => &RIFLE,
            WeaponKind::Shotgun => &SHOTGUN,
            WeaponKind::Smg => &SMG,
            WeaponKind::Sniper => &SNIPER,
            WeaponKind::Pump => &PUMP,
        }
    }

    /// Индекс в массивах per-weapon состояния
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
