//! Симуляционное время и отложенные события
//!
//! # Архитектура
//!
//! **SimClock**: монотонные часы сессии. Растут только в `Playing`
//! (advance_clock стоит в `SimulationTick`), поэтому пауза замораживает
//! все таймеры разом: cooldown'ы, перезарядку, паузу между раундами.
//!
//! **Scheduler**: отменяемая очередь `ScheduledEvent`, ключ `(due_ms, token)`.
//! Созревшие события применяются в начале тика (fire_due_events),
//! до input/AI/combat. Порядок для одинакового due_ms = порядок постановки.
//!
//! Время в микросекундах внутри, наружу в миллисекундах: 60 Hz кадр
//! (16.666 мс) не теряет дробную часть между тиками.

use bevy::prelude::*;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::combat::WeaponKind;
use crate::TickStep;

pub mod timer_systems;

pub use timer_systems::{advance_clock, fire_due_events};

/// Scheduler Plugin
///
/// advance_clock (TickStep::Clock) → fire_due_events (TickStep::Timers)
pub struct SchedulerPlugin;

impl Plugin for SchedulerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>().init_resource::<Scheduler>();

        app.add_systems(
            Update,
            (
                advance_clock.in_set(TickStep::Clock),
                fire_due_events.in_set(TickStep::Timers),
            ),
        );
    }
}

/// Часы симуляции (детерминистичные, только sim time)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    elapsed_us: u64,
    delta_us: u64,
    /// Номер тика (считаются только тики в `Playing`)
    pub tick: u64,
}

impl SimClock {
    pub fn advance(&mut self, delta: Duration) {
        let delta_us = u64::try_from(delta.as_micros()).unwrap_or(u64::MAX);
        self.delta_us = delta_us;
        self.elapsed_us = self.elapsed_us.saturating_add(delta_us);
        self.tick = self.tick.wrapping_add(1);
    }

    /// Текущее время сессии, мс
    pub fn now_ms(&self) -> u64 {
        self.elapsed_us / 1000
    }

    pub fn delta_us(&self) -> u64 {
        self.delta_us
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta_us as f32 / 1_000_000.0
    }
}

/// Handle отложенного события (для отмены)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(u64);

/// Отложенные события сессии
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    /// Перезарядка оружия закончилась
    ReloadComplete { weapon: WeaponKind },
    /// Пауза между раундами прошла
    AdvanceRound,
    /// Убрать сообщение раунда с экрана
    ClearRoundMessage,
}

/// Очередь отложенных событий
///
/// Инвариант: токены уникальны за всю жизнь Scheduler (не переиспользуются
/// даже после cancel_all), поэтому устаревший токен никогда не отменит чужое.
#[derive(Resource, Debug, Default)]
pub struct Scheduler {
    next_token: u64,
    pending: BTreeMap<(u64, TimerToken), ScheduledEvent>,
}

impl Scheduler {
    pub fn schedule(&mut self, due_ms: u64, event: ScheduledEvent) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.pending.insert((due_ms, token), event);
        token
    }

    /// true если событие ещё ждало
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(_, pending), _| *pending != token);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.due_at(token).is_some()
    }

    pub fn due_at(&self, token: TimerToken) -> Option<u64> {
        self.pending
            .keys()
            .find(|(_, pending)| *pending == token)
            .map(|(due, _)| *due)
    }

    /// Забирает все события с due_ms ≤ now_ms (по порядку due, затем постановки)
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<(TimerToken, ScheduledEvent)> {
        let later = self.pending.split_off(&(now_ms.saturating_add(1), TimerToken(0)));
        let due = std::mem::replace(&mut self.pending, later);
        due.into_iter().map(|((_, token), event)| (token, event)).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_keeps_sub_millisecond_remainder() {
        let mut clock = SimClock::default();
        for _ in 0..60 {
            clock.advance(Duration::from_micros(16_667));
        }

        // 60 × 16.667 мс = 1000.02 мс
        assert_eq!(clock.now_ms(), 1000);
        assert_eq!(clock.tick, 60);
    }

    #[test]
    fn test_drain_due_in_order() {
        let mut scheduler = Scheduler::default();
        let late = scheduler.schedule(500, ScheduledEvent::AdvanceRound);
        let first = scheduler.schedule(100, ScheduledEvent::ClearRoundMessage);
        let second = scheduler.schedule(100, ScheduledEvent::AdvanceRound);

        let due = scheduler.drain_due(100);
        assert_eq!(
            due,
            vec![
                (first, ScheduledEvent::ClearRoundMessage),
                (second, ScheduledEvent::AdvanceRound),
            ]
        );
        assert!(scheduler.is_pending(late));
        assert_eq!(scheduler.len(), 1);

        assert!(scheduler.drain_due(499).is_empty());
        assert_eq!(scheduler.drain_due(10_000).len(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::default();
        let token = scheduler.schedule(1500, ScheduledEvent::ReloadComplete { weapon: WeaponKind::Pistol });

        assert_eq!(scheduler.due_at(token), Some(1500));
        assert!(scheduler.cancel(token));
        assert!(!scheduler.cancel(token));
        assert!(scheduler.drain_due(u64::MAX).is_empty());
    }

    #[test]
    fn test_tokens_not_reused_after_cancel_all() {
        let mut scheduler = Scheduler::default();
        let old = scheduler.schedule(10, ScheduledEvent::AdvanceRound);
        scheduler.cancel_all();
        let fresh = scheduler.schedule(10, ScheduledEvent::AdvanceRound);

        assert_ne!(old, fresh);
        assert!(!scheduler.cancel(old));
        assert!(scheduler.is_pending(fresh));
    }
}
