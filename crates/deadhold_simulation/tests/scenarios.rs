//! Сценарии геймплея через SimulationStore
//!
//! Каждый тест: конфиг без авто-спавна (base_zombies = 0), ручной спавн
//! командами, ScriptedHits вместо настоящего raycast.

use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use bevy::prelude::*;
use deadhold_simulation::announcer::GAME_OVER_FALLBACK;
use deadhold_simulation::{
    BodyPart, CommandOutcome, DamageEvent, FlavorTextError, FlavorTextService, GamePhase, PlayerState, PresentationEvent, RayHit,
    Rejection, ScriptedHits, SimCommand, SimulationConfig, SimulationStore, SpawnRequest, TickInput,
    WeaponKind, ZombieId, ZombieVariant,
};

const FRAME: Duration = Duration::from_millis(16);

fn quiet_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.waves.base_zombies = 0;
    config.waves.zombies_per_round = 0;
    config
}

fn started(config: SimulationConfig) -> SimulationStore {
    let mut store = SimulationStore::new(config);
    store.apply(SimCommand::StartGame).expect("menu → playing");
    store
}

fn spawn_at(store: &mut SimulationStore, position: Vec3, health: f32, variant: ZombieVariant) -> ZombieId {
    let request = SpawnRequest {
        position,
        speed: 1.0,
        health,
        variant,
    };
    match store.apply(SimCommand::SpawnZombie(request)) {
        Ok(CommandOutcome::Spawned(id)) => id,
        other => panic!("spawn failed: {:?}", other),
    }
}

/// Прогнать idle тики на `total` sim time
fn run_for(store: &mut SimulationStore, total: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        store.tick(FRAME);
        elapsed += FRAME;
    }
}

#[test]
fn test_pistol_headshot_standard_zombie() {
    let mut store = started(quiet_config());
    let id = spawn_at(&mut store, Vec3::new(0.0, 0.0, -10.0), 100.0, ZombieVariant::Standard);
    store.set_spatial_query(ScriptedHits(vec![RayHit::zombie(10.0, id, BodyPart::Head)]));

    store.advance(TickInput::idle(FRAME).firing());

    let zombie = store.zombie(id).expect("zombie alive");
    assert_relative_eq!(zombie.health, 70.0, epsilon = 1e-4);
    assert_eq!(store.player().points(), 510);
    assert!(store
        .drain_presentation()
        .contains(&PresentationEvent::HitMarker { headshot: true }));
}

#[test]
fn test_rifle_body_shot_on_tank() {
    let mut config = quiet_config();
    config.player.starting_points = 2000;
    let mut store = started(config);

    store.apply(SimCommand::BuyWeapon(WeaponKind::Rifle)).expect("affordable");
    let id = spawn_at(&mut store, Vec3::new(0.0, 0.0, -10.0), 250.0, ZombieVariant::Tank);
    store.set_spatial_query(ScriptedHits(vec![RayHit::zombie(10.0, id, BodyPart::Body)]));

    store.advance(TickInput::idle(FRAME).firing());

    let zombie = store.zombie(id).expect("tank survives");
    assert_relative_eq!(zombie.health, 230.0, epsilon = 1e-4);
    assert_eq!(store.round_state().zombies_killed, 0);
}

#[test]
fn test_zombie_attack_kills_wounded_player() {
    let mut store = started(quiet_config());
    assert_eq!(store.apply(SimCommand::DamagePlayer(60)), Ok(CommandOutcome::PlayerHealth(40)));

    // В радиусе атаки сразу
    spawn_at(&mut store, Vec3::new(0.0, 0.0, -1.0), 100.0, ZombieVariant::Standard);
    store.tick(FRAME);

    assert_eq!(store.player().health.current, 0);
    assert_eq!(store.phase(), GamePhase::GameOver);
    assert_eq!(store.game_over_message(), Some(GAME_OVER_FALLBACK));

    // GameOver замораживает тик
    let frozen = store.now_ms();
    run_for(&mut store, Duration::from_secs(2));
    assert_eq!(store.now_ms(), frozen);
    assert_eq!(store.player().health.current, 0);
}

#[test]
fn test_zombie_attack_cooldown_is_strict() {
    let mut config = quiet_config();
    config.player.regen_per_second = 0;
    let mut store = started(config);
    spawn_at(&mut store, Vec3::new(0.0, 0.0, -1.0), 100.0, ZombieVariant::Standard);

    store.tick(Duration::from_millis(10));
    assert_eq!(store.player().health.current, 50);

    // Ровно 1000 мс: ещё рано
    store.tick(Duration::from_millis(1000));
    assert_eq!(store.player().health.current, 50);

    store.tick(Duration::from_millis(1));
    assert_eq!(store.player().health.current, 0);
    assert_eq!(store.phase(), GamePhase::GameOver);
}

#[test]
fn test_reload_with_full_magazine_rejected() {
    let mut store = started(quiet_config());
    assert_eq!(store.armory().current_ammo().mag, 8);
    assert_eq!(store.armory().can_reload(), Err(Rejection::MagazineFull));

    store.advance(TickInput::idle(FRAME).reloading());

    assert!(!store.armory().is_reloading());
    assert_eq!(store.armory().current_ammo().reserve, 32);
}

#[test]
fn test_reload_transfers_from_reserve() {
    let mut store = started(quiet_config());
    for _ in 0..3 {
        store.advance(TickInput::idle(Duration::from_millis(250)).firing());
    }
    assert_eq!(store.armory().current_ammo().mag, 5);

    store.advance(TickInput::idle(FRAME).reloading());
    assert!(store.armory().is_reloading());

    // Во время перезарядки выстрел отклоняется
    store.advance(TickInput::idle(FRAME).firing());
    assert_eq!(store.armory().current_ammo().mag, 5);

    run_for(&mut store, Duration::from_millis(1500));

    let ammo = store.armory().current_ammo();
    assert!(!store.armory().is_reloading());
    assert_eq!(ammo.mag, 8);
    assert_eq!(ammo.reserve, 29);
}

#[test]
fn test_weapon_switch_cancels_reload() {
    let mut store = started(quiet_config());
    store.advance(TickInput::idle(FRAME).firing());
    store.advance(TickInput::idle(FRAME).reloading());
    let token = store.armory().reload().expect("reloading").token;

    store.apply(SimCommand::BuyWeapon(WeaponKind::Shotgun)).expect("500 points is enough");

    assert!(!store.armory().is_reloading());
    assert!(!store.scheduler().is_pending(token));
    assert_eq!(store.armory().current(), WeaponKind::Shotgun);
    assert_eq!(store.player().points(), 0);

    run_for(&mut store, Duration::from_secs(2));
    assert_eq!(store.armory().ammo(WeaponKind::Pistol).mag, 7);
}

#[test]
fn test_buy_current_weapon_rejected() {
    let mut store = started(quiet_config());

    assert_eq!(
        store.apply(SimCommand::BuyWeapon(WeaponKind::Pistol)),
        Err(Rejection::AlreadyEquipped)
    );
    assert_eq!(store.player().points(), 500);
}

#[test]
fn test_ammo_purchase_sets_reserve() {
    let mut config = quiet_config();
    config.player.starting_points = 1000;
    let mut store = started(config);

    store.apply(SimCommand::BuyWeapon(WeaponKind::Shotgun)).expect("affordable");
    assert_eq!(store.armory().ammo(WeaponKind::Shotgun).reserve, 20);

    assert_eq!(
        store.apply(SimCommand::BuyAmmo(WeaponKind::Shotgun)),
        Ok(CommandOutcome::Purchased { balance: 250 })
    );
    // 2 × 4, а не 20 + 8
    assert_eq!(store.armory().ammo(WeaponKind::Shotgun).reserve, 8);

    assert_eq!(
        store.apply(SimCommand::BuyAmmo(WeaponKind::Sniper)),
        Err(Rejection::InsufficientPoints {
            cost: 1250,
            balance: 250
        })
    );
    assert_eq!(store.armory().ammo(WeaponKind::Sniper).reserve, 30);
}

#[test]
fn test_wall_buy_interact() {
    let mut config = quiet_config();
    config.player.starting_points = 1500;
    let mut store = started(config);
    assert_eq!(store.hovered_wall_buy(), None);

    store.world_mut().resource_mut::<PlayerState>().position = Vec3::new(0.0, 1.7, -12.5);
    assert_eq!(
        store.wall_buy_prompt().as_deref(),
        Some("Press [E] to Buy Weapon ($1200)")
    );

    store.advance(TickInput::idle(FRAME).interacting());
    assert_eq!(store.armory().current(), WeaponKind::Rifle);
    assert_eq!(store.player().points(), 300);

    // Теперь станция продаёт патроны (600), денег не хватает
    assert_eq!(
        store.wall_buy_prompt().as_deref(),
        Some("Not enough points for Ammo ($600)")
    );
    store.advance(TickInput::idle(FRAME).interacting());
    assert_eq!(store.player().points(), 300);
}

#[test]
fn test_reset_cancels_pending_round_advance() {
    let mut store = started(quiet_config());

    // Пустой раунд чистится в первом же тике
    store.tick(FRAME);
    let stale = store.round_state().pending_advance.expect("advance scheduled");
    run_for(&mut store, Duration::from_secs(3));

    store.apply(SimCommand::DamagePlayer(100)).expect("playing");
    assert_eq!(store.phase(), GamePhase::GameOver);
    assert_eq!(
        store.apply(SimCommand::Reset),
        Ok(CommandOutcome::Phase(GamePhase::Playing))
    );
    assert!(!store.scheduler().is_pending(stale));
    assert_eq!(store.round_state().round, 1);
    assert_eq!(store.player().health.current, 100);
    assert_eq!(store.player().points(), 500);

    // Старый AdvanceRound (≈5 с от старта) не срабатывает
    run_for(&mut store, Duration::from_secs(3));
    assert_eq!(store.round_state().round, 1);

    // Новый: 5 с после повторной очистки
    run_for(&mut store, Duration::from_millis(2200));
    assert_eq!(store.round_state().round, 2);
}

#[test]
fn test_invalid_transition_rejected() {
    let mut store = SimulationStore::new(quiet_config());

    assert!(matches!(
        store.apply(SimCommand::Reset),
        Err(Rejection::InvalidTransition { .. })
    ));
    assert_eq!(store.phase(), GamePhase::Menu);

    store.apply(SimCommand::StartGame).unwrap();
    assert!(matches!(
        store.apply(SimCommand::QuitToMenu),
        Err(Rejection::InvalidTransition { .. })
    ));
    assert_eq!(store.phase(), GamePhase::Playing);
}

#[test]
fn test_live_zombie_cap() {
    let mut store = started(quiet_config());

    for i in 0..24 {
        spawn_at(&mut store, Vec3::new(i as f32, 0.0, -12.0), 100.0, ZombieVariant::Standard);
    }

    let request = SpawnRequest {
        position: Vec3::new(0.0, 0.0, 12.0),
        speed: 1.0,
        health: 100.0,
        variant: ZombieVariant::Standard,
    };
    assert_eq!(
        store.apply(SimCommand::SpawnZombie(request)),
        Err(Rejection::ZombieCap { cap: 24 })
    );
    assert_eq!(store.zombies().len(), 24);
}

#[test]
fn test_pause_freezes_zombies_and_timers() {
    let mut store = started(quiet_config());
    let id = spawn_at(&mut store, Vec3::new(0.0, 0.0, -10.0), 100.0, ZombieVariant::Standard);
    store.tick(FRAME);
    let before = store.zombie(id).expect("alive").position;

    store.apply(SimCommand::Pause).unwrap();
    run_for(&mut store, Duration::from_secs(10));

    assert_eq!(store.zombie(id).expect("alive").position, before);
    assert_eq!(store.round_message(), "Round 1");

    store.apply(SimCommand::Resume).unwrap();
    store.tick(FRAME);
    assert!(store.zombie(id).expect("alive").position.z > before.z);
}

#[test]
fn test_full_round_cycle() {
    let mut store = started(SimulationConfig::with_seed(7));
    assert_eq!(store.round_message(), "Round 1");

    // 7 зомби, по одному каждые 1–3 с
    let mut killed = 0;
    while killed < 7 {
        store.tick(FRAME);
        for zombie in store.zombies() {
            let event = deadhold_simulation::DamageEvent {
                target: zombie.id,
                raw_damage: 1000.0,
                body_part: BodyPart::Body,
            };
            store.apply(SimCommand::ApplyDamage(event)).expect("zombie alive");
            killed += 1;
        }
        assert!(store.now_ms() < 30_000, "round 1 never finished spawning");
    }

    assert_eq!(store.round_state().zombies_killed, 7);
    assert_eq!(store.player().points(), 500 + 7 * 70);

    store.tick(FRAME);
    assert!(!store.round_state().round_active);
    let advance = store.round_state().pending_advance.expect("advance scheduled");
    assert_eq!(
        store.scheduler().due_at(advance),
        Some(store.now_ms() + 5000)
    );

    run_for(&mut store, Duration::from_millis(5100));
    assert_eq!(store.round_state().round, 2);
    assert_eq!(store.round_state().zombies_to_spawn + store.zombies().len() as u32, 9);
    assert_eq!(store.round_message(), "Round 2");
}

#[test]
fn test_advance_round_needs_cleared_round() {
    // Очередь спавна не пуста
    let mut store = started(SimulationConfig::default());
    let queued = store.round_state().zombies_to_spawn;
    assert!(queued > 0);
    assert_eq!(
        store.apply(SimCommand::AdvanceRound),
        Err(Rejection::RoundInProgress { to_spawn: queued, live: 0 })
    );
    assert_eq!(store.round_state().round, 1);
    assert_eq!(store.round_state().zombies_to_spawn, queued);

    // Очередь пуста, но зомби жив
    let mut store = started(quiet_config());
    let id = spawn_at(&mut store, Vec3::new(0.0, 0.0, -20.0), 100.0, ZombieVariant::Standard);
    assert_eq!(
        store.apply(SimCommand::AdvanceRound),
        Err(Rejection::RoundInProgress { to_spawn: 0, live: 1 })
    );
    assert_eq!(store.round_state().round, 1);

    // Зачистили: досрочный переход разрешён
    store
        .apply(SimCommand::ApplyDamage(DamageEvent {
            target: id,
            raw_damage: 1000.0,
            body_part: BodyPart::Body,
        }))
        .expect("kill");
    assert_eq!(store.apply(SimCommand::AdvanceRound), Ok(CommandOutcome::RoundStarted(2)));
    assert_eq!(store.round_message(), "Round 2");
}

#[test]
fn test_bad_command_input_leaves_state_alone() {
    let mut store = started(quiet_config());
    let player = store.player().position;

    let corpse = SpawnRequest {
        position: Vec3::new(player.x + 0.5, 0.0, player.z),
        speed: 1.0,
        health: 0.0,
        variant: ZombieVariant::Standard,
    };
    assert_eq!(store.apply(SimCommand::SpawnZombie(corpse)), Err(Rejection::InvalidSpawn));

    let id = spawn_at(&mut store, Vec3::new(0.0, 0.0, -20.0), 100.0, ZombieVariant::Standard);
    let heal = DamageEvent {
        target: id,
        raw_damage: -50.0,
        body_part: BodyPart::Head,
    };
    assert_eq!(store.apply(SimCommand::ApplyDamage(heal)), Err(Rejection::InvalidDamage));

    run_for(&mut store, Duration::from_millis(500));

    assert_eq!(store.player().health.current, 100);
    assert_eq!(store.player().points(), 500);
    let zombie = store.zombie(id).expect("alive");
    assert!(zombie.health <= zombie.max_health);
    assert_eq!(store.zombies().len(), 1);
}

#[test]
fn test_round_message_expires() {
    let mut config = quiet_config();
    config.waves.round_delay_ms = 60_000;
    let mut store = started(config);
    assert_eq!(store.round_message(), "Round 1");

    run_for(&mut store, Duration::from_millis(4900));
    assert_eq!(store.round_message(), "Round 1");

    run_for(&mut store, Duration::from_millis(200));
    assert_eq!(store.round_message(), "");
}

struct Grim;

impl FlavorTextService for Grim {
    fn round_intro(&self, round: u32) -> Result<String, FlavorTextError> {
        Ok(format!("The dead rise again: wave {}", round))
    }

    fn game_over(&self, _round_reached: u32) -> Result<String, FlavorTextError> {
        Err(FlavorTextError::Timeout)
    }
}

#[test]
fn test_flavor_text_replaces_fallback() {
    let mut store = SimulationStore::new(quiet_config()).with_flavor_text(Arc::new(Grim));
    store.apply(SimCommand::StartGame).unwrap();
    assert_eq!(store.round_message(), "Round 1");

    store.wait_for_announcements(Duration::from_secs(2));
    assert_eq!(store.round_message(), "The dead rise again: wave 1");

    store.apply(SimCommand::DamagePlayer(100)).unwrap();
    store.wait_for_announcements(Duration::from_secs(2));
    assert_eq!(store.game_over_message(), Some(GAME_OVER_FALLBACK));
}

#[test]
fn test_timers_only_while_playing() {
    let mut store = started(quiet_config());
    store.advance(TickInput::idle(FRAME).firing());
    store.advance(TickInput::idle(FRAME).reloading());

    store.apply(SimCommand::Pause).unwrap();
    run_for(&mut store, Duration::from_secs(5));
    assert!(store.armory().is_reloading());

    // ReloadComplete остался в очереди
    let token = store.armory().reload().expect("reloading").token;
    assert!(store.scheduler().is_pending(token));

    store.apply(SimCommand::Resume).unwrap();
    run_for(&mut store, Duration::from_millis(1600));
    assert!(!store.armory().is_reloading());
    assert_eq!(store.armory().current_ammo().mag, 8);
}
