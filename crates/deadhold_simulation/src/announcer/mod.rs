//! Announcer: сообщения раунда и game over
//!
//! Текст берётся из внешнего `FlavorTextService` (генератор фраз) в фоновом
//! потоке. Тик никогда не ждёт сервис:
//! - запрос сразу ставит fallback ("Round N" / "You Survived... until now.");
//! - готовый ответ приходит через crossbeam channel и подменяет fallback
//!   в collect_announcements (каждый update, даже на паузе);
//! - ответы прошлой сессии (до Start/Reset/Quit) отбрасываются по generation.

use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::logger;
use crate::SimulationTick;

pub const GAME_OVER_FALLBACK: &str = "You Survived... until now.";

pub fn round_fallback(round: u32) -> String {
    format!("Round {}", round)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlavorTextError {
    #[error("flavor text service is not configured")]
    Unavailable,

    #[error("flavor text request timed out")]
    Timeout,

    #[error("flavor text service failed: {0}")]
    Service(String),
}

/// Генератор фраз (может быть медленным и ненадёжным)
pub trait FlavorTextService: Send + Sync + 'static {
    fn round_intro(&self, round: u32) -> Result<String, FlavorTextError>;

    fn game_over(&self, round_reached: u32) -> Result<String, FlavorTextError>;
}

/// Сервиса нет: всегда fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFlavorText;

impl FlavorTextService for NoFlavorText {
    fn round_intro(&self, _round: u32) -> Result<String, FlavorTextError> {
        Err(FlavorTextError::Unavailable)
    }

    fn game_over(&self, _round_reached: u32) -> Result<String, FlavorTextError> {
        Err(FlavorTextError::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    RoundIntro(u32),
    GameOver,
}

struct Delivery {
    generation: u64,
    slot: Slot,
    text: Result<String, FlavorTextError>,
}

#[derive(Resource)]
pub struct Announcer {
    service: Arc<dyn FlavorTextService>,
    sender: Sender<Delivery>,
    receiver: Receiver<Delivery>,
    generation: u64,
    /// Запросы, ответ на которые ещё не забран
    in_flight: usize,
    /// Раунд, чьё сообщение сейчас на экране
    shown_round: Option<u32>,
    round_message: String,
    game_over_message: Option<String>,
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new(Arc::new(NoFlavorText))
    }
}

impl Announcer {
    pub fn new(service: Arc<dyn FlavorTextService>) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            service,
            sender,
            receiver,
            generation: 0,
            in_flight: 0,
            shown_round: None,
            round_message: String::new(),
            game_over_message: None,
        }
    }

    pub fn set_service(&mut self, service: Arc<dyn FlavorTextService>) {
        self.service = service;
    }

    /// Пустая строка = сообщения нет
    pub fn round_message(&self) -> &str {
        &self.round_message
    }

    pub fn game_over_message(&self) -> Option<&str> {
        self.game_over_message.as_deref()
    }

    /// Новая сессия: всё, что ещё летит от сервиса, устаревает
    pub fn new_session(&mut self) {
        self.generation += 1;
        self.shown_round = None;
        self.round_message.clear();
        self.game_over_message = None;
    }

    pub fn announce_round(&mut self, round: u32) {
        self.shown_round = Some(round);
        self.round_message = round_fallback(round);
        self.dispatch(Slot::RoundIntro(round), move |service| service.round_intro(round));
    }

    pub fn announce_game_over(&mut self, round_reached: u32) {
        self.game_over_message = Some(GAME_OVER_FALLBACK.to_string());
        self.dispatch(Slot::GameOver, move |service| service.game_over(round_reached));
    }

    pub fn clear_round_message(&mut self) {
        self.shown_round = None;
        self.round_message.clear();
    }

    fn dispatch<F>(&mut self, slot: Slot, request: F)
    where
        F: FnOnce(&dyn FlavorTextService) -> Result<String, FlavorTextError> + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        let generation = self.generation;

        let spawned = thread::Builder::new()
            .name("flavor-text".to_string())
            .spawn(move || {
                let text = request(&*service);
                // Ошибка send = Announcer уже дропнут вместе со store
                let _ = sender.send(Delivery { generation, slot, text });
            });

        match spawned {
            Ok(_) => self.in_flight += 1,
            Err(err) => logger::log_warning(&format!("flavor text thread failed to start: {}", err)),
        }
    }

    /// Забрать готовые ответы. Возвращает сколько сообщений обновлено
    pub fn collect(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(delivery) = self.receiver.try_recv() {
            applied += usize::from(self.apply(delivery));
        }
        applied
    }

    /// Дождаться ответов на все уже отправленные запросы (тесты, headless binary)
    pub fn wait_for_pending(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut applied = self.collect();

        while self.in_flight > 0 {
            match self.receiver.recv_deadline(deadline) {
                Ok(delivery) => applied += usize::from(self.apply(delivery)),
                Err(_) => break,
            }
        }

        applied
    }

    fn apply(&mut self, delivery: Delivery) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if delivery.generation != self.generation {
            return false;
        }

        let text = match delivery.text {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return false,
            Err(err) => {
                logger::log(&format!("flavor text fallback kept: {}", err));
                return false;
            }
        };

        match delivery.slot {
            Slot::RoundIntro(round) if self.shown_round == Some(round) => {
                self.round_message = text;
                true
            }
            Slot::RoundIntro(_) => false,
            Slot::GameOver if self.game_over_message.is_some() => {
                self.game_over_message = Some(text);
                true
            }
            Slot::GameOver => false,
        }
    }
}

/// System: применить пришедшие фразы (каждый update, вне SimulationTick)
pub fn collect_announcements(mut announcer: ResMut<Announcer>) {
    announcer.collect();
}

/// Announcer Plugin
///
/// Фразы приходят и на паузе, поэтому collect_announcements не в тике.
pub struct AnnouncerPlugin;

impl Plugin for AnnouncerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Announcer>();
        app.add_systems(Update, collect_announcements.after(SimulationTick));
    }
}
