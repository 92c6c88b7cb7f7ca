//! Wave director: раунды, ритм спавна, варианты зомби
//!
//! Раунд N: 5 + 2N зомби, не больше max_live_zombies живых одновременно,
//! по одному за тик с паузой 1–3 с (ChaCha8 RNG). Раунд закончен, когда
//! спавнить нечего и живых нет → AdvanceRound через round_delay_ms.
//!
//! Порядок бросков RNG на спавн: точка, вариант, пауза до следующего.

use bevy::prelude::*;
use rand::Rng;

use crate::announcer::Announcer;
use crate::components::{SpawnRequest, Zombie, ZombieIdAllocator, ZombieVariant};
use crate::config::{SimulationConfig, WaveTuning, ZombieTuning};
use crate::logger;
use crate::schedule::{ScheduledEvent, Scheduler, SimClock, TimerToken};
use crate::DeterministicRng;

/// Состояние раундов
///
/// Инвариант: раунд растёт только через advance_round.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct RoundState {
    /// 0 до старта сессии
    pub round: u32,
    pub zombies_to_spawn: u32,
    pub round_active: bool,
    /// Спавн разрешён строго после этого времени
    pub next_spawn_ms: u64,
    pub zombies_killed: u32,
    /// Ожидающий AdvanceRound
    pub pending_advance: Option<TimerToken>,
    /// Ожидающий ClearRoundMessage
    pub message_clear: Option<TimerToken>,
}

impl RoundState {
    /// Переход к следующему раунду (без despawn и announcer)
    pub fn begin_next(&mut self, now_ms: u64, tuning: &WaveTuning) {
        self.round += 1;
        self.zombies_to_spawn = zombies_for_round(self.round, tuning);
        self.round_active = true;
        self.next_spawn_ms = now_ms;
        self.pending_advance = None;
    }
}

/// Точки спавна зомби
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SpawnPoints(pub Vec<Vec3>);

impl Default for SpawnPoints {
    fn default() -> Self {
        Self(vec![
            Vec3::new(0.0, 0.0, -14.0),
            Vec3::new(0.0, 0.0, 14.0),
            Vec3::new(-25.0, 0.0, 0.0),
            Vec3::new(25.0, 0.0, 0.0),
            Vec3::new(-15.0, 0.0, 10.0),
            Vec3::new(15.0, 0.0, -10.0),
        ])
    }
}

pub fn zombies_for_round(round: u32, tuning: &WaveTuning) -> u32 {
    tuning.base_zombies + tuning.zombies_per_round * round
}

/// Вариант по одному броску roll ∈ [0, 1)
pub fn roll_variant(round: u32, roll: f32, tuning: &WaveTuning) -> ZombieVariant {
    if round > tuning.fast_after_round && roll < tuning.fast_chance {
        ZombieVariant::Fast
    } else if round > tuning.tank_after_round && roll > tuning.tank_roll_threshold {
        ZombieVariant::Tank
    } else {
        ZombieVariant::Standard
    }
}

/// Статы зомби раунда с учётом варианта
pub fn spawn_request(round: u32, variant: ZombieVariant, position: Vec3, tuning: &ZombieTuning) -> SpawnRequest {
    let round = round as f32;
    let speed = (tuning.base_speed + tuning.speed_per_round * round) * variant.speed_multiplier(tuning);
    let health = (tuning.base_health + tuning.health_per_round * round) * variant.health_multiplier(tuning);

    SpawnRequest {
        position,
        speed,
        health,
        variant,
    }
}

/// Бросок точки и варианта. None если точек спавна нет
pub fn roll_spawn<R: Rng>(
    round: u32,
    rng: &mut R,
    points: &SpawnPoints,
    config: &SimulationConfig,
) -> Option<SpawnRequest> {
    if points.0.is_empty() {
        return None;
    }

    let position = points.0[rng.gen_range(0..points.0.len())];
    let variant = roll_variant(round, rng.gen::<f32>(), &config.waves);
    Some(spawn_request(round, variant, position, &config.zombies))
}

pub fn next_spawn_delay_ms<R: Rng>(rng: &mut R, tuning: &WaveTuning) -> u64 {
    rng.gen_range(tuning.spawn_delay_min_ms..=tuning.spawn_delay_max_ms)
}

/// System: спавн и детект конца раунда (TickStep::Waves)
#[allow(clippy::too_many_arguments)]
pub fn wave_director(
    clock: Res<SimClock>,
    config: Res<SimulationConfig>,
    points: Res<SpawnPoints>,
    mut rng: ResMut<DeterministicRng>,
    mut round: ResMut<RoundState>,
    mut scheduler: ResMut<Scheduler>,
    mut ids: ResMut<ZombieIdAllocator>,
    zombies: Query<&Zombie>,
    mut commands: Commands,
) {
    let now = clock.now_ms();
    let mut live = zombies.iter().filter(|zombie| zombie.is_active()).count();

    if round.zombies_to_spawn > 0 && now > round.next_spawn_ms && live < config.waves.max_live_zombies {
        match roll_spawn(round.round, &mut rng.rng, &points, &config) {
            Some(request) => {
                let id = ids.allocate();
                commands.spawn(Zombie::spawn(id, &request));
                live += 1;
                round.zombies_to_spawn -= 1;
                round.next_spawn_ms = now + next_spawn_delay_ms(&mut rng.rng, &config.waves);
                logger::log(&format!(
                    "🧟 Spawned {:?} ({:?}, hp {:.0}) at {:?}, {} left this round",
                    id, request.variant, request.health, request.position, round.zombies_to_spawn
                ));
            }
            None => logger::log_warning("wave director: no spawn points configured"),
        }
    }

    if round.round_active && round.zombies_to_spawn == 0 && live == 0 {
        round.round_active = false;
        let token = scheduler.schedule(now + config.waves.round_delay_ms, ScheduledEvent::AdvanceRound);
        round.pending_advance = Some(token);
        logger::log_info(&format!("✅ Round {} cleared @ {} ms", round.round, now));
    }
}

/// Начать следующий раунд (exclusive: despawn всех зомби + announcer)
///
/// Вызывается по AdvanceRound из Scheduler и при Start/Reset (раунд 1).
pub fn advance_round(world: &mut World) {
    let leftovers: Vec<Entity> = world
        .query_filtered::<Entity, With<Zombie>>()
        .iter(world)
        .collect();
    for entity in leftovers {
        world.despawn(entity);
    }

    let now = world.resource::<SimClock>().now_ms();
    let waves = world.resource::<SimulationConfig>().waves.clone();

    let (round_number, stale_clear) = {
        let mut round = world.resource_mut::<RoundState>();
        round.begin_next(now, &waves);
        (round.round, round.message_clear.take())
    };

    let clear = {
        let mut scheduler = world.resource_mut::<Scheduler>();
        if let Some(token) = stale_clear {
            scheduler.cancel(token);
        }
        scheduler.schedule(now + waves.round_message_ms, ScheduledEvent::ClearRoundMessage)
    };
    world.resource_mut::<RoundState>().message_clear = Some(clear);
    world.resource_mut::<Announcer>().announce_round(round_number);

    logger::log_info(&format!(
        "🌊 Round {} started @ {} ms ({} zombies)",
        round_number,
        now,
        zombies_for_round(round_number, &waves)
    ));
}
