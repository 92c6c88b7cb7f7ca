//! Combat module: оружие игрока и разрешение попаданий
//!
//! ECS ответственность:
//! - Weapon state: Armory (патроны, перезарядка, cooldown'ы)
//! - Combat rules: resolve_ray (луч → цель → урон), apply_damage (броня, очки)
//! - Events: PresentationEvent (цифры урона, маркеры, кровь, звук)
//!
//! Renderer ответственность:
//! - SpatialQuery: raycast по сцене (какой меш, какая часть тела)
//! - Отрисовка PresentationEvent

use bevy::prelude::*;

pub mod armory;
pub mod damage;
pub mod events;
pub mod resolver;
pub mod systems;
pub mod weapon_stats;


// Re-export основных типов
pub use armory::{ActiveReload, AmmoState, Armory};
pub use damage::{apply_damage, hit_presentation, indicator_anchor, points_for, DamageEvent, DamageOutcome};
pub use events::{AudioCue, PresentationEvent};
pub use resolver::{resolve_ray, AttackKind, Resolution};
pub use weapon_stats::{WeaponKind, WeaponStats};

use crate::TickStep;

/// Combat Plugin
///
/// Порядок выполнения внутри тика:
/// 1. handle_reload_input (TickStep::Input, после wall-buy покупки)
/// 2. resolve_player_attacks (TickStep::Combat: выстрел, затем melee)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PresentationEvent>()
            .init_resource::<Armory>();

        app.add_systems(
            Update,
            (
                systems::handle_reload_input
                    .in_set(TickStep::Input)
                    .after(crate::player::handle_wall_buy),
                systems::resolve_player_attacks.in_set(TickStep::Combat),
            ),
        );
    }
}
