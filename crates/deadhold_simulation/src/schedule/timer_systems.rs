//! Timer systems (первые две фазы тика)
//!
//! advance_clock двигает SimClock на delta из TickInput,
//! fire_due_events применяет созревшие ScheduledEvent.

use bevy::prelude::{Res, ResMut, World};

use super::{ScheduledEvent, Scheduler, SimClock};
use crate::announcer::Announcer;
use crate::combat::Armory;
use crate::input::TickInput;
use crate::logger;
use crate::waves::{self, RoundState};

/// System: SimClock += delta (запускается ПЕРВЫМ в тике)
pub fn advance_clock(mut clock: ResMut<SimClock>, input: Res<TickInput>) {
    clock.advance(input.delta);
}

/// System: применить созревшие отложенные события
///
/// Exclusive system: AdvanceRound пересобирает раунд (despawn + announcer).
/// События, поставленные во время применения, ждут следующего тика.
pub fn fire_due_events(world: &mut World) {
    let now = world.resource::<SimClock>().now_ms();
    let due = world.resource_mut::<Scheduler>().drain_due(now);

    for (token, event) in due {
        match event {
            ScheduledEvent::ReloadComplete { weapon } => {
                let loaded = world.resource_mut::<Armory>().complete_reload(token);
                if let Some(loaded) = loaded {
                    logger::log(&format!("🔄 {:?} reloaded (+{} rounds) @ {} ms", weapon, loaded, now));
                }
            }
            ScheduledEvent::AdvanceRound => {
                let expected = {
                    let mut round = world.resource_mut::<RoundState>();
                    let expected = round.pending_advance == Some(token);
                    if expected {
                        round.pending_advance = None;
                    }
                    expected
                };
                if expected {
                    waves::advance_round(world);
                }
            }
            ScheduledEvent::ClearRoundMessage => {
                world.resource_mut::<Announcer>().clear_round_message();
            }
        }
    }
}
