//! Фазы игры (Menu / Playing / Paused / GameOver)
//!
//! Таблица переходов: единственный источник истины. Всё, что не описано
//! в `GamePhase::next`, отклоняется через `Rejection::InvalidTransition`.
//! Тик симуляции идёт только в `Playing` (см. `SimulationTick` в lib.rs).

use bevy::prelude::*;
use serde::Serialize;

use crate::announcer::Announcer;
use crate::error::Rejection;
use crate::logger;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Запрос на смену фазы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseTransition {
    Start,
    Pause,
    Resume,
    PlayerDied,
    Reset,
    QuitToMenu,
}

impl PhaseTransition {
    /// Start и Reset пересобирают сессию с нуля (игрок, оружие, раунд 1)
    pub fn reinitializes(self) -> bool {
        matches!(self, PhaseTransition::Start | PhaseTransition::Reset)
    }

    /// Эти переходы снимают все отложенные таймеры
    pub fn cancels_timers(self) -> bool {
        matches!(
            self,
            PhaseTransition::Start | PhaseTransition::Reset | PhaseTransition::QuitToMenu
        )
    }
}

impl GamePhase {
    pub fn next(self, transition: PhaseTransition) -> Result<GamePhase, Rejection> {
        use GamePhase::*;
        use PhaseTransition::*;

        match (self, transition) {
            (Menu, Start) => Ok(Playing),
            (Playing, Pause) => Ok(Paused),
            (Paused, Resume) => Ok(Playing),
            (Playing, PlayerDied) => Ok(GameOver),
            (GameOver, Reset) => Ok(Playing),
            (Paused | GameOver, QuitToMenu) => Ok(Menu),
            (from, transition) => Err(Rejection::InvalidTransition { from, transition }),
        }
    }

    pub fn is_playing(self) -> bool {
        self == GamePhase::Playing
    }

    /// Применяет переход на месте
    pub fn transition(&mut self, transition: PhaseTransition) -> Result<GamePhase, Rejection> {
        let next = self.next(transition)?;
        *self = next;
        Ok(next)
    }
}

/// Игрок умер: Playing → GameOver + запрос сообщения game over
///
/// Повторная смерть в том же тике (уже GameOver) ничего не делает.
pub fn handle_player_death(phase: &mut GamePhase, announcer: &mut Announcer, round: u32) {
    match phase.transition(PhaseTransition::PlayerDied) {
        Ok(_) => {
            logger::log_info(&format!("☠️ Player died on round {}", round));
            announcer.announce_game_over(round);
        }
        Err(reason) => logger::log(&format!("player death ignored: {}", reason)),
    }
}
