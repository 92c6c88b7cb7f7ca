//! SimulationStore: единственный владелец состояния сессии
//!
//! Оборачивает headless Bevy App. Снаружи два пути мутации:
//! - `apply(SimCommand)`: именованные команды (фазы, спавн, урон, покупки);
//! - `advance(TickInput)`: один тик упорядоченных систем.
//!
//! Renderer читает состояние через accessors/`snapshot()` и забирает
//! `PresentationEvent` через `drain_presentation()` каждый кадр.

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::announcer::{Announcer, FlavorTextService};
use crate::combat::{apply_damage, Armory, DamageEvent, DamageOutcome, PresentationEvent, WeaponKind};
use crate::components::{Health, PlayerState, SpawnRequest, Zombie, ZombieId, ZombieIdAllocator, ZombieVariant};
use crate::config::SimulationConfig;
use crate::error::Rejection;
use crate::game_state::{handle_player_death, GamePhase, PhaseTransition};
use crate::input::TickInput;
use crate::logger;
use crate::player::{WallBuyOffer, WallBuyStations};
use crate::schedule::{Scheduler, SimClock};
use crate::spatial::{SpatialIndex, SpatialQuery};
use crate::waves::{self, RoundState};
use crate::create_headless_app;

/// Именованные мутации состояния
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimCommand {
    StartGame,
    Pause,
    Resume,
    Reset,
    QuitToMenu,
    /// Ручной спавн (не уменьшает счётчик раунда)
    SpawnZombie(SpawnRequest),
    /// Урон уже разрешённого попадания (броня tank, очки, kill)
    ApplyDamage(DamageEvent),
    DamagePlayer(u32),
    /// Начать следующий раунд без паузы, если текущий зачищен
    /// (ожидающий AdvanceRound снимается)
    AdvanceRound,
    BuyWeapon(WeaponKind),
    BuyAmmo(WeaponKind),
}

/// Результат принятой команды
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    Phase(GamePhase),
    Spawned(ZombieId),
    Damage(DamageOutcome),
    /// Здоровье игрока после урона
    PlayerHealth(u32),
    RoundStarted(u32),
    /// Баланс после покупки
    Purchased { balance: u32 },
}

pub struct SimulationStore {
    app: App,
    presentation_cursor: EventCursor<PresentationEvent>,
    presentation: Vec<PresentationEvent>,
}

impl SimulationStore {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            app: create_headless_app(config),
            presentation_cursor: EventCursor::default(),
            presentation: Vec::new(),
        }
    }

    pub fn with_spatial_query(mut self, query: impl SpatialQuery) -> Self {
        self.set_spatial_query(query);
        self
    }

    pub fn with_flavor_text(mut self, service: Arc<dyn FlavorTextService>) -> Self {
        self.world_mut().resource_mut::<Announcer>().set_service(service);
        self
    }

    /// Подменить raycast (renderer пересобрал сцену, тест сменил сценарий)
    pub fn set_spatial_query(&mut self, query: impl SpatialQuery) {
        self.world_mut().insert_resource(SpatialIndex::new(query));
    }

    // === Мутации ===

    /// Применить команду. Отказ = Err, состояние не тронуто
    pub fn apply(&mut self, command: SimCommand) -> Result<CommandOutcome, Rejection> {
        match command {
            SimCommand::StartGame => self.change_phase(PhaseTransition::Start),
            SimCommand::Pause => self.change_phase(PhaseTransition::Pause),
            SimCommand::Resume => self.change_phase(PhaseTransition::Resume),
            SimCommand::Reset => self.change_phase(PhaseTransition::Reset),
            SimCommand::QuitToMenu => self.change_phase(PhaseTransition::QuitToMenu),
            SimCommand::SpawnZombie(request) => {
                self.ensure_playing()?;
                self.spawn_zombie(request)
            }
            SimCommand::ApplyDamage(event) => {
                self.ensure_playing()?;
                self.damage_zombie(event)
            }
            SimCommand::DamagePlayer(amount) => {
                self.ensure_playing()?;
                Ok(self.damage_player(amount))
            }
            SimCommand::AdvanceRound => {
                self.ensure_playing()?;
                self.force_advance_round()
            }
            SimCommand::BuyWeapon(kind) => {
                self.ensure_playing()?;
                self.buy(|armory, player, scheduler| armory.buy_weapon(kind, &mut player.wallet, scheduler))
            }
            SimCommand::BuyAmmo(kind) => {
                self.ensure_playing()?;
                self.buy(|armory, player, _| armory.buy_ammo(kind, &mut player.wallet))
            }
        }
    }

    /// Один тик симуляции
    ///
    /// Вне `Playing` системы тика не работают; announcer всё равно
    /// забирает готовые фразы.
    pub fn advance(&mut self, input: TickInput) {
        self.world_mut().insert_resource(input);
        self.app.update();
        self.capture_presentation();
    }

    /// Тик без нажатий
    pub fn tick(&mut self, delta: Duration) {
        self.advance(TickInput::idle(delta));
    }

    /// Забрать все presentation events с прошлого вызова
    pub fn drain_presentation(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.presentation)
    }

    /// Дождаться фраз announcer'а (headless binary, тесты)
    pub fn wait_for_announcements(&mut self, timeout: Duration) -> usize {
        self.world_mut().resource_mut::<Announcer>().wait_for_pending(timeout)
    }

    // === Чтение ===

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn config(&self) -> &SimulationConfig {
        self.world().resource::<SimulationConfig>()
    }

    pub fn phase(&self) -> GamePhase {
        *self.world().resource::<GamePhase>()
    }

    pub fn player(&self) -> &PlayerState {
        self.world().resource::<PlayerState>()
    }

    pub fn armory(&self) -> &Armory {
        self.world().resource::<Armory>()
    }

    pub fn round_state(&self) -> &RoundState {
        self.world().resource::<RoundState>()
    }

    pub fn scheduler(&self) -> &Scheduler {
        self.world().resource::<Scheduler>()
    }

    pub fn now_ms(&self) -> u64 {
        self.world().resource::<SimClock>().now_ms()
    }

    /// Пустая строка = сообщения раунда нет
    pub fn round_message(&self) -> &str {
        self.world().resource::<Announcer>().round_message()
    }

    pub fn game_over_message(&self) -> Option<&str> {
        self.world().resource::<Announcer>().game_over_message()
    }

    /// Живые зомби, отсортированные по id
    pub fn zombies(&mut self) -> Vec<Zombie> {
        let world = self.world_mut();
        let mut zombies: Vec<Zombie> = world.query::<&Zombie>().iter(world).cloned().collect();
        zombies.sort_by_key(|zombie| zombie.id);
        zombies
    }

    pub fn zombie(&mut self, id: ZombieId) -> Option<Zombie> {
        let world = self.world_mut();
        world
            .query::<&Zombie>()
            .iter(world)
            .find(|zombie| zombie.id == id)
            .cloned()
    }

    /// Что предлагает станция под прицелом (None = рядом станции нет)
    pub fn hovered_wall_buy(&self) -> Option<WallBuyOffer> {
        let world = self.world();
        let radius = world.resource::<SimulationConfig>().player.wall_buy_radius;
        let player = world.resource::<PlayerState>();
        let station = world.resource::<WallBuyStations>().hovered(player.position, radius)?;
        Some(WallBuyOffer::for_station(&station, world.resource::<Armory>().current()))
    }

    /// Подсказка HUD для станции под прицелом
    pub fn wall_buy_prompt(&self) -> Option<String> {
        let offer = self.hovered_wall_buy()?;
        Some(offer.prompt(self.player().points()))
    }

    pub fn snapshot(&mut self) -> SimulationSnapshot {
        let zombies = self.zombies().iter().map(ZombieSnapshot::from).collect();
        let world = self.world();
        let clock = world.resource::<SimClock>();
        let player = world.resource::<PlayerState>();
        let armory = world.resource::<Armory>();
        let round = world.resource::<RoundState>();
        let announcer = world.resource::<Announcer>();

        SimulationSnapshot {
            phase: *world.resource::<GamePhase>(),
            tick: clock.tick,
            now_ms: clock.now_ms(),
            player: PlayerSnapshot {
                health: player.health,
                points: player.points(),
                position: player.position.to_array(),
                velocity_y: player.velocity_y,
                grounded: player.grounded,
                is_moving: player.is_moving,
                is_sprinting: player.is_sprinting,
            },
            weapon: armory.current(),
            ammo: WeaponKind::ALL
                .iter()
                .map(|&kind| {
                    let ammo = armory.ammo(kind);
                    AmmoSnapshot {
                        weapon: kind,
                        mag: ammo.mag,
                        reserve: ammo.reserve,
                    }
                })
                .collect(),
            reloading: armory.is_reloading(),
            round: round.round,
            zombies_to_spawn: round.zombies_to_spawn,
            round_active: round.round_active,
            zombies_killed: round.zombies_killed,
            zombies,
            pending_timers: world.resource::<Scheduler>().len(),
            round_message: announcer.round_message().to_string(),
        }
    }

    // === Внутреннее ===

    fn capture_presentation(&mut self) {
        let events = self.app.world().resource::<Events<PresentationEvent>>();
        self.presentation
            .extend(self.presentation_cursor.read(events).copied());
    }

    fn ensure_playing(&self) -> Result<(), Rejection> {
        let phase = self.phase();
        if phase.is_playing() {
            Ok(())
        } else {
            Err(Rejection::NotPlaying(phase))
        }
    }

    fn change_phase(&mut self, transition: PhaseTransition) -> Result<CommandOutcome, Rejection> {
        let next = self.phase().next(transition)?;
        let world = self.world_mut();

        if transition.reinitializes() {
            start_session(world);
        } else {
            if transition.cancels_timers() {
                end_session(world);
            }
            *world.resource_mut::<GamePhase>() = next;
        }

        logger::log_info(&format!("🎮 {:?} → {:?}", transition, next));
        Ok(CommandOutcome::Phase(next))
    }

    fn spawn_zombie(&mut self, request: SpawnRequest) -> Result<CommandOutcome, Rejection> {
        // Зомби с health <= 0 сразу неактивен: ни счёта, ни despawn
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(request.health) || !valid(request.speed) {
            return Err(Rejection::InvalidSpawn);
        }

        let cap = self.config().waves.max_live_zombies;
        let live = self.live_zombies();
        let world = self.world_mut();
        if live >= cap {
            return Err(Rejection::ZombieCap { cap });
        }

        let id = world.resource_mut::<ZombieIdAllocator>().allocate();
        world.spawn(Zombie::spawn(id, &request));
        logger::log(&format!("🧟 Spawned {:?} ({:?}) by command", id, request.variant));
        Ok(CommandOutcome::Spawned(id))
    }

    fn damage_zombie(&mut self, event: DamageEvent) -> Result<CommandOutcome, Rejection> {
        if !event.raw_damage.is_finite() || event.raw_damage <= 0.0 {
            return Err(Rejection::InvalidDamage);
        }

        let config = self.config().clone();
        let world = self.world_mut();

        let (entity, outcome) = {
            let mut zombies = world.query::<(Entity, &mut Zombie)>();
            let Some((entity, mut zombie)) = zombies
                .iter_mut(world)
                .find(|(_, zombie)| zombie.id == event.target && zombie.is_active())
            else {
                return Err(Rejection::UnknownZombie(event.target));
            };
            (entity, apply_damage(&mut zombie, &event, &config.combat, &config.zombies))
        };

        world.resource_mut::<PlayerState>().wallet.credit(outcome.points);

        if outcome.killed {
            world.despawn(entity);
            world.resource_mut::<RoundState>().zombies_killed += 1;
            logger::log_info(&format!("💀 Zombie {:?} killed (+{} points)", outcome.target, outcome.points));
        }

        Ok(CommandOutcome::Damage(outcome))
    }

    fn damage_player(&mut self, amount: u32) -> CommandOutcome {
        let world = self.world_mut();
        let round = world.resource::<RoundState>().round;

        let (remaining, died) = {
            let mut player = world.resource_mut::<PlayerState>();
            let died = player.take_damage(amount);
            (player.health.current, died)
        };

        if died {
            world.resource_scope(|world, mut announcer: Mut<Announcer>| {
                let mut phase = world.resource_mut::<GamePhase>();
                handle_player_death(&mut *phase, &mut *announcer, round);
            });
        }

        CommandOutcome::PlayerHealth(remaining)
    }

    /// Досрочно: только когда раунд зачищен (очередь пуста, живых нет)
    fn force_advance_round(&mut self) -> Result<CommandOutcome, Rejection> {
        let live = self.live_zombies();
        let to_spawn = self.round_state().zombies_to_spawn;
        if to_spawn > 0 || live > 0 {
            return Err(Rejection::RoundInProgress { to_spawn, live });
        }

        let world = self.world_mut();
        let pending = world.resource_mut::<RoundState>().pending_advance.take();
        if let Some(token) = pending {
            world.resource_mut::<Scheduler>().cancel(token);
        }

        waves::advance_round(world);
        Ok(CommandOutcome::RoundStarted(world.resource::<RoundState>().round))
    }

    fn live_zombies(&mut self) -> usize {
        let world = self.world_mut();
        world
            .query::<&Zombie>()
            .iter(world)
            .filter(|zombie| zombie.is_active())
            .count()
    }

    fn buy<F>(&mut self, purchase: F) -> Result<CommandOutcome, Rejection>
    where
        F: FnOnce(&mut Armory, &mut PlayerState, &mut Scheduler) -> Result<(), Rejection>,
    {
        self.world_mut().resource_scope(|world, mut armory: Mut<Armory>| {
            world.resource_scope(|world, mut player: Mut<PlayerState>| {
                let mut scheduler = world.resource_mut::<Scheduler>();
                purchase(&mut *armory, &mut *player, &mut *scheduler)?;
                logger::log_info(&format!(
                    "💰 Purchase ok: {:?} in hand, balance {}",
                    armory.current(),
                    player.points()
                ));
                Ok(CommandOutcome::Purchased {
                    balance: player.points(),
                })
            })
        })
    }
}

/// Start/Reset: новая сессия с нуля и сразу раунд 1
fn start_session(world: &mut World) {
    end_session(world);

    let player = PlayerState::new(&world.resource::<SimulationConfig>().player);
    world.insert_resource(player);
    world.insert_resource(Armory::new());
    world.insert_resource(RoundState::default());
    *world.resource_mut::<GamePhase>() = GamePhase::Playing;

    waves::advance_round(world);
}

/// Снять все таймеры и устаревшие фразы прошлой сессии
fn end_session(world: &mut World) {
    world.resource_mut::<Scheduler>().cancel_all();
    {
        let mut round = world.resource_mut::<RoundState>();
        round.pending_advance = None;
        round.message_clear = None;
    }
    world.resource_mut::<Announcer>().new_session();
}

// === Snapshot (для тестов детерминизма и отладки) ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub phase: GamePhase,
    pub tick: u64,
    pub now_ms: u64,
    pub player: PlayerSnapshot,
    pub weapon: WeaponKind,
    pub ammo: Vec<AmmoSnapshot>,
    pub reloading: bool,
    pub round: u32,
    pub zombies_to_spawn: u32,
    pub round_active: bool,
    pub zombies_killed: u32,
    pub zombies: Vec<ZombieSnapshot>,
    pub pending_timers: usize,
    pub round_message: String,
}

impl SimulationSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub health: Health,
    pub points: u32,
    pub position: [f32; 3],
    pub velocity_y: f32,
    pub grounded: bool,
    pub is_moving: bool,
    pub is_sprinting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmmoSnapshot {
    pub weapon: WeaponKind,
    pub mag: u32,
    pub reserve: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZombieSnapshot {
    pub id: ZombieId,
    pub variant: ZombieVariant,
    pub position: [f32; 3],
    pub yaw: f32,
    pub health: f32,
    pub max_health: f32,
    pub last_attack_ms: Option<u64>,
}

impl From<&Zombie> for ZombieSnapshot {
    fn from(zombie: &Zombie) -> Self {
        Self {
            id: zombie.id,
            variant: zombie.variant,
            position: zombie.position.to_array(),
            yaw: zombie.yaw,
            health: zombie.health,
            max_health: zombie.max_health,
            last_attack_ms: zombie.last_attack_ms,
        }
    }
}
