//! DEADHOLD Simulation Core
//!
//! Детерминистичная симуляция zombie-survival шутера на Bevy 0.16 ECS.
//! Renderer (любой) только читает состояние, шлёт `TickInput`/`SimCommand`
//! и отвечает на raycast через `SpatialQuery`.
//!
//! Один тик = один `App::update()` (single-threaded executor):
//! Clock → Timers → Input → Movement → Ai → Combat → Waves → Commit.
//! Весь `SimulationTick` работает только в `GamePhase::Playing`.

use bevy::ecs::schedule::ExecutorKind;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod announcer;
pub mod combat;
pub mod components;
pub mod config;
pub mod economy;
pub mod error;
pub mod game_state;
pub mod input;
pub mod logger;
pub mod player;
pub mod schedule;
pub mod spatial;
pub mod store;
pub mod waves;

// Re-export базовых типов для удобства
pub use ai::AIPlugin;
pub use announcer::{Announcer, AnnouncerPlugin, FlavorTextError, FlavorTextService, NoFlavorText};
pub use combat::{Armory, AudioCue, CombatPlugin, DamageEvent, DamageOutcome, PresentationEvent, WeaponKind};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use error::Rejection;
pub use game_state::{GamePhase, PhaseTransition};
pub use input::{AimRay, MovementIntent, TickInput};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use player::PlayerPlugin;
pub use schedule::{ScheduledEvent, SchedulerPlugin, Scheduler, SimClock, TimerToken};
pub use spatial::{BodyPart, EmptySpace, HitTarget, RayHit, ScriptedHits, SpatialIndex, SpatialQuery};
pub use store::{CommandOutcome, SimCommand, SimulationSnapshot, SimulationStore};
pub use waves::{RoundState, WavePlugin};

/// Весь тик симуляции (gated по фазе: условие проверяется один раз за update)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationTick;

/// Фазы тика (строго последовательно)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickStep {
    /// SimClock += delta
    Clock,
    /// Созревшие ScheduledEvent (reload, следующий раунд, очистка сообщения)
    Timers,
    /// Перезарядка, wall-buy
    Input,
    Movement,
    Ai,
    /// Выстрел/удар → урон → очки
    Combat,
    Waves,
    /// Реген
    Commit,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            // Детерминистичный RNG (seed из конфига)
            .insert_resource(DeterministicRng::new(self.config.seed))
            .insert_resource(PlayerState::new(&self.config.player))
            .init_resource::<GamePhase>()
            .init_resource::<TickInput>()
            .init_resource::<SpatialIndex>();

        app.configure_sets(
            Update,
            SimulationTick.run_if(resource_equals(GamePhase::Playing)),
        )
        .configure_sets(
            Update,
            (
                TickStep::Clock,
                TickStep::Timers,
                TickStep::Input,
                TickStep::Movement,
                TickStep::Ai,
                TickStep::Combat,
                TickStep::Waves,
                TickStep::Commit,
            )
                .chain()
                .in_set(SimulationTick),
        );

        // Подсистемы
        app.add_plugins((
            SchedulerPlugin,
            AnnouncerPlugin,
            PlayerPlugin,
            AIPlugin,
            CombatPlugin,
            WavePlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Единственный источник случайности геймплея. Reset не пересевает:
/// поток продолжается, результат зависит только от seed и истории ввода.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт headless Bevy App для симуляции
///
/// Без MinimalPlugins: время ведёт SimClock, а не реальные часы.
pub fn create_headless_app(config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(SimulationPlugin { config });
    app.edit_schedule(Update, |schedule| {
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    });

    app
}
