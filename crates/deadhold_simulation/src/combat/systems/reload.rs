//! Запрос перезарядки из ввода

use bevy::prelude::*;

use crate::combat::Armory;
use crate::input::TickInput;
use crate::logger;
use crate::schedule::{Scheduler, SimClock};

/// System: R → begin_reload (ReloadComplete встаёт в Scheduler)
pub fn handle_reload_input(
    clock: Res<SimClock>,
    input: Res<TickInput>,
    mut armory: ResMut<Armory>,
    mut scheduler: ResMut<Scheduler>,
) {
    if !input.reload {
        return;
    }

    let weapon = armory.current();
    match armory.begin_reload(clock.now_ms(), &mut scheduler) {
        Ok(_) => logger::log(&format!("🔄 {:?} reload started @ {} ms", weapon, clock.now_ms())),
        Err(reason) => logger::log(&format!("reload rejected: {}", reason)),
    }
}
