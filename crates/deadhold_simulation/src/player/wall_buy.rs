//! Wall-buy станции: покупка оружия и патронов со стены
//!
//! Станция "под прицелом", если игрок ближе wall_buy_radius (3D дистанция
//! от глаз до центра станции). Interact:
//! - в руках другое оружие → купить оружие за полную цену;
//! - в руках это же оружие → купить патроны за половину цены.

use bevy::prelude::*;

use crate::combat::{Armory, WeaponKind};
use crate::components::PlayerState;
use crate::config::SimulationConfig;
use crate::economy::{ammo_price, weapon_price};
use crate::error::Rejection;
use crate::input::TickInput;
use crate::logger;
use crate::schedule::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBuy {
    pub position: Vec3,
    pub weapon: WeaponKind,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WallBuyStations {
    pub stations: Vec<WallBuy>,
}

impl Default for WallBuyStations {
    fn default() -> Self {
        let station = |x, z, weapon| WallBuy {
            position: Vec3::new(x, 1.5, z),
            weapon,
        };

        Self {
            stations: vec![
                station(0.0, -14.475, WeaponKind::Rifle),
                station(0.0, 14.475, WeaponKind::Pump),
                station(24.475, 0.0, WeaponKind::Shotgun),
                station(-24.475, 0.0, WeaponKind::Pistol),
                station(-9.475, 5.0, WeaponKind::Smg),
                station(9.475, -5.0, WeaponKind::Sniper),
            ],
        }
    }
}

impl WallBuyStations {
    /// Ближайшая станция в радиусе (строго меньше)
    pub fn hovered(&self, eye: Vec3, radius: f32) -> Option<WallBuy> {
        self.stations
            .iter()
            .map(|station| (station, station.position.distance(eye)))
            .filter(|(_, distance)| *distance < radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(station, _)| *station)
    }
}

/// Что предложит станция при interact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallBuyOffer {
    Weapon { weapon: WeaponKind, cost: u32 },
    Ammo { weapon: WeaponKind, cost: u32 },
}

impl WallBuyOffer {
    pub fn for_station(station: &WallBuy, current: WeaponKind) -> Self {
        if station.weapon == current {
            WallBuyOffer::Ammo {
                weapon: station.weapon,
                cost: ammo_price(station.weapon),
            }
        } else {
            WallBuyOffer::Weapon {
                weapon: station.weapon,
                cost: weapon_price(station.weapon),
            }
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            WallBuyOffer::Weapon { cost, .. } | WallBuyOffer::Ammo { cost, .. } => *cost,
        }
    }

    /// Подсказка для HUD
    pub fn prompt(&self, balance: u32) -> String {
        let affordable = balance >= self.cost();
        match (self, affordable) {
            (WallBuyOffer::Ammo { cost, .. }, true) => format!("Press [E] to Buy Ammo (${})", cost),
            (WallBuyOffer::Ammo { cost, .. }, false) => format!("Not enough points for Ammo (${})", cost),
            (WallBuyOffer::Weapon { cost, .. }, true) => format!("Press [E] to Buy Weapon (${})", cost),
            (WallBuyOffer::Weapon { cost, .. }, false) => format!("Not enough points (${})", cost),
        }
    }
}

/// Покупка по предложению станции
pub fn purchase(
    offer: WallBuyOffer,
    player: &mut PlayerState,
    armory: &mut Armory,
    scheduler: &mut Scheduler,
) -> Result<(), Rejection> {
    match offer {
        WallBuyOffer::Weapon { weapon, .. } => armory.buy_weapon(weapon, &mut player.wallet, scheduler),
        WallBuyOffer::Ammo { weapon, .. } => armory.buy_ammo(weapon, &mut player.wallet),
    }
}

/// System: E рядом со станцией → покупка (TickStep::Input)
pub fn handle_wall_buy(
    input: Res<TickInput>,
    config: Res<SimulationConfig>,
    stations: Res<WallBuyStations>,
    mut player: ResMut<PlayerState>,
    mut armory: ResMut<Armory>,
    mut scheduler: ResMut<Scheduler>,
) {
    if !input.interact {
        return;
    }

    let Some(station) = stations.hovered(player.position, config.player.wall_buy_radius) else {
        logger::log(&format!("interact rejected: {}", Rejection::NothingToBuy));
        return;
    };

    let offer = WallBuyOffer::for_station(&station, armory.current());
    match purchase(offer, &mut player, &mut armory, &mut scheduler) {
        Ok(()) => logger::log_info(&format!("💰 {:?} (balance {})", offer, player.points())),
        Err(reason) => logger::log(&format!("purchase rejected: {}", reason)),
    }
}
