//! Отказы действий
//!
//! Любое gated действие (выстрел, удар, перезарядка, покупка, смена фазы)
//! возвращает `Result<_, Rejection>`. Отказ не меняет состояние.

use crate::components::ZombieId;
use crate::game_state::{GamePhase, PhaseTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    // === Оружие ===
    #[error("weapon is reloading")]
    Reloading,

    #[error("fire rate cooldown ({remaining_ms} ms left)")]
    FireCooldown { remaining_ms: u64 },

    #[error("magazine is empty")]
    MagazineEmpty,

    #[error("firing blocked by melee recovery ({remaining_ms} ms left)")]
    MeleeRecovery { remaining_ms: u64 },

    #[error("melee cooldown ({remaining_ms} ms left)")]
    MeleeCooldown { remaining_ms: u64 },

    #[error("magazine already full")]
    MagazineFull,

    #[error("no reserve ammo")]
    NoReserve,

    #[error("reload already in progress")]
    AlreadyReloading,

    // === Экономика ===
    #[error("not enough points: need {cost}, have {balance}")]
    InsufficientPoints { cost: u32, balance: u32 },

    #[error("weapon already equipped")]
    AlreadyEquipped,

    #[error("no wall buy in reach")]
    NothingToBuy,

    // === Зомби ===
    #[error("live zombie cap reached ({cap})")]
    ZombieCap { cap: usize },

    #[error("unknown zombie {0:?}")]
    UnknownZombie(ZombieId),

    #[error("spawn needs finite positive health and speed")]
    InvalidSpawn,

    #[error("damage must be finite and positive")]
    InvalidDamage,

    // === Раунды ===
    #[error("round still in progress ({to_spawn} queued, {live} alive)")]
    RoundInProgress { to_spawn: u32, live: usize },

    // === Фазы ===
    #[error("simulation is not running (phase {0:?})")]
    NotPlaying(GamePhase),

    #[error("cannot {transition:?} from {from:?}")]
    InvalidTransition {
        from: GamePhase,
        transition: PhaseTransition,
    },
}
