//! Настройки симуляции (tuning)
//!
//! Все числа геймплея живут здесь: скорость игрока, урон, таймеры, волны.
//! Значения по умолчанию = боевой баланс. Тесты и headless binary
//! переопределяют отдельные поля через JSON (`#[serde(default)]` на всех уровнях).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ошибка загрузки конфигурации
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("spawn delay range is empty ({min_ms} ms > {max_ms} ms)")]
    EmptySpawnDelay { min_ms: u64, max_ms: u64 },

    #[error("live zombie cap must be positive")]
    ZeroZombieCap,

    #[error("player max health must be positive")]
    ZeroMaxHealth,
}

/// Полная конфигурация симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed для `DeterministicRng`
    pub seed: u64,
    pub player: PlayerTuning,
    pub combat: CombatTuning,
    pub zombies: ZombieTuning,
    pub waves: WaveTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            player: PlayerTuning::default(),
            combat: CombatTuning::default(),
            zombies: ZombieTuning::default(),
            waves: WaveTuning::default(),
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.waves.spawn_delay_min_ms > self.waves.spawn_delay_max_ms {
            return Err(ConfigError::EmptySpawnDelay {
                min_ms: self.waves.spawn_delay_min_ms,
                max_ms: self.waves.spawn_delay_max_ms,
            });
        }
        if self.waves.max_live_zombies == 0 {
            return Err(ConfigError::ZeroZombieCap);
        }
        if self.player.max_health == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }
        Ok(())
    }
}

/// Игрок: движение, здоровье, стартовые очки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: u32,
    pub starting_points: u32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    /// Высота глаз = высота "пола" для позиции игрока
    pub eye_height: f32,
    /// Полуразмер AABB игрока для коллизий со стенами
    pub collision_radius: f32,
    /// HP в секунду, пока 0 < health < max
    pub regen_per_second: u32,
    /// Дистанция, на которой wall-buy станция считается "под прицелом"
    pub wall_buy_radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            starting_points: 500,
            walk_speed: 8.0,
            sprint_speed: 14.0,
            gravity: 30.0,
            jump_impulse: 10.0,
            eye_height: 1.7,
            collision_radius: 0.5,
            regen_per_second: 1,
            wall_buy_radius: 3.0,
        }
    }
}

/// Бой игрока: melee, headshot, очки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub melee_damage: f32,
    pub melee_range: f32,
    /// Повторный удар не раньше чем через N мс
    pub melee_cooldown_ms: u64,
    /// Выстрел заблокирован N мс после удара
    pub melee_fire_block_ms: u64,
    pub headshot_multiplier: f32,
    pub points_per_hit: u32,
    pub points_per_kill: u32,
    /// Бонус сверху `points_per_kill` за убийство в голову
    pub headshot_kill_bonus: u32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            melee_damage: 150.0,
            melee_range: 2.5,
            melee_cooldown_ms: 800,
            melee_fire_block_ms: 500,
            headshot_multiplier: 1.2,
            points_per_hit: 10,
            points_per_kill: 60,
            headshot_kill_bonus: 40,
        }
    }
}

/// Зомби: атака, статы по раунду, модификаторы вариантов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieTuning {
    pub attack_range: f32,
    pub attack_damage: u32,
    /// Атака разрешена строго после N мс с прошлой
    pub attack_cooldown_ms: u64,
    pub base_speed: f32,
    pub speed_per_round: f32,
    pub base_health: f32,
    pub health_per_round: f32,
    pub fast_speed_multiplier: f32,
    pub fast_health_multiplier: f32,
    pub tank_speed_multiplier: f32,
    pub tank_health_multiplier: f32,
    /// Tank получает только эту долю урона
    pub tank_damage_multiplier: f32,
}

impl Default for ZombieTuning {
    fn default() -> Self {
        Self {
            attack_range: 1.2,
            attack_damage: 50,
            attack_cooldown_ms: 1000,
            base_speed: 1.0,
            speed_per_round: 0.1,
            base_health: 100.0,
            health_per_round: 50.0,
            fast_speed_multiplier: 1.5,
            fast_health_multiplier: 0.6,
            tank_speed_multiplier: 0.7,
            tank_health_multiplier: 2.5,
            tank_damage_multiplier: 0.5,
        }
    }
}

/// Волны: размер раунда, ритм спавна, задержки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub base_zombies: u32,
    pub zombies_per_round: u32,
    pub max_live_zombies: usize,
    pub spawn_delay_min_ms: u64,
    pub spawn_delay_max_ms: u64,
    /// Пауза между очисткой раунда и стартом следующего
    pub round_delay_ms: u64,
    /// Сколько висит сообщение раунда
    pub round_message_ms: u64,
    /// Fast возможен с раунда строго больше этого
    pub fast_after_round: u32,
    pub fast_chance: f32,
    /// Tank возможен с раунда строго больше этого
    pub tank_after_round: u32,
    /// Tank, если бросок строго больше порога
    pub tank_roll_threshold: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_zombies: 5,
            zombies_per_round: 2,
            max_live_zombies: 24,
            spawn_delay_min_ms: 1000,
            spawn_delay_max_ms: 3000,
            round_delay_ms: 5000,
            round_message_ms: 5000,
            fast_after_round: 2,
            fast_chance: 0.2,
            tank_after_round: 5,
            tank_roll_threshold: 0.9,
        }
    }
}
