//! Атаки игрока: выстрел и удар ножом
//!
//! Порядок внутри тика: сначала выстрел, потом melee.
//! Удар в том же тике разрешён (у выстрела нет блокировки melee),
//! а вот выстрел после удара ждёт melee_fire_block_ms.

use bevy::prelude::*;

use crate::combat::{
    apply_damage, hit_presentation, indicator_anchor, resolve_ray, Armory, AttackKind, PresentationEvent, Resolution,
};
use crate::components::{PlayerState, Zombie};
use crate::config::SimulationConfig;
use crate::input::TickInput;
use crate::logger;
use crate::schedule::SimClock;
use crate::spatial::SpatialIndex;
use crate::waves::RoundState;

/// System: fire/melee → raycast → урон, очки, presentation events
#[allow(clippy::too_many_arguments)]
pub fn resolve_player_attacks(
    clock: Res<SimClock>,
    input: Res<TickInput>,
    config: Res<SimulationConfig>,
    spatial: Res<SpatialIndex>,
    mut armory: ResMut<Armory>,
    mut player: ResMut<PlayerState>,
    mut round: ResMut<RoundState>,
    mut zombies: Query<(Entity, &mut Zombie)>,
    mut commands: Commands,
    mut presentation: EventWriter<PresentationEvent>,
) {
    let now = clock.now_ms();
    let mut attacks = Vec::with_capacity(2);

    if input.fire {
        let weapon = armory.current();
        match armory.fire(now, &config.combat) {
            Ok(_) => attacks.push(AttackKind::Shot(weapon)),
            Err(reason) => logger::log(&format!("fire rejected: {}", reason)),
        }
    }

    if input.melee {
        match armory.melee(now, &config.combat) {
            Ok(()) => attacks.push(AttackKind::Melee),
            Err(reason) => logger::log(&format!("melee rejected: {}", reason)),
        }
    }

    if attacks.is_empty() {
        return;
    }

    let ray = input.aim_ray(player.position);

    for attack in attacks {
        let hits = spatial.cast_ray(ray.origin, ray.direction);
        let Resolution::Hit { event, distance } = resolve_ray(&hits, attack, &config.combat) else {
            continue;
        };

        // Неизвестный или уже убитый в этом тике зомби = промах
        let Some((entity, mut zombie)) = zombies
            .iter_mut()
            .find(|(_, zombie)| zombie.id == event.target && zombie.is_active())
        else {
            continue;
        };

        let outcome = apply_damage(&mut zombie, &event, &config.combat, &config.zombies);
        let anchor = indicator_anchor(attack, ray.origin + ray.direction * distance, input.look);
        presentation.write_batch(hit_presentation(&zombie, &event, anchor));
        player.wallet.credit(outcome.points);

        if outcome.killed {
            commands.entity(entity).despawn();
            round.zombies_killed += 1;
            logger::log_info(&format!(
                "💀 Zombie {:?} ({:?}) killed by {:?} (+{} points)",
                zombie.id, zombie.variant, attack, outcome.points
            ));
        }
    }
}
