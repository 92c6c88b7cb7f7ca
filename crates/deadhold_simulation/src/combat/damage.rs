//! Применение урона к зомби и начисление очков
//!
//! DamageEvent → health зомби (с бронёй tank) → DamageOutcome.
//! Убийство = health ≤ 0; despawn делает вызывающий (система или store).

use bevy::prelude::*;

use super::events::{AudioCue, PresentationEvent};
use super::resolver::AttackKind;
use crate::components::{HitType, Zombie, ZombieId};
use crate::config::{CombatTuning, ZombieTuning};
use crate::spatial::BodyPart;

/// Урон по зомби (сырой: headshot уже учтён, броня tank ещё нет)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub target: ZombieId,
    pub raw_damage: f32,
    pub body_part: BodyPart,
}

impl DamageEvent {
    pub fn is_headshot(&self) -> bool {
        self.body_part == BodyPart::Head
    }
}

/// Результат применения урона
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub target: ZombieId,
    /// Реально снятое здоровье (после брони)
    pub applied: f32,
    pub remaining_health: f32,
    pub killed: bool,
    /// Очки игроку за это попадание
    pub points: u32,
}

/// Очки: за любое попадание + за убийство + бонус за убийство в голову
pub fn points_for(killed: bool, body_part: BodyPart, tuning: &CombatTuning) -> u32 {
    let mut points = tuning.points_per_hit;
    if killed {
        points += tuning.points_per_kill;
        if body_part == BodyPart::Head {
            points += tuning.headshot_kill_bonus;
        }
    }
    points
}

pub fn apply_damage(
    zombie: &mut Zombie,
    event: &DamageEvent,
    combat: &CombatTuning,
    zombies: &ZombieTuning,
) -> DamageOutcome {
    let applied = event.raw_damage * zombie.variant.damage_taken_multiplier(zombies);

    zombie.health -= applied;
    zombie.last_hit = HitType::from(event.body_part);

    let killed = zombie.health <= 0.0;
    if killed {
        zombie.health = 0.0;
    }

    DamageOutcome {
        target: zombie.id,
        applied,
        remaining_health: zombie.health,
        killed,
        points: points_for(killed, event.body_part, combat),
    }
}

/// Где показать цифру урона: чуть выше точки попадания и ближе к камере
pub fn indicator_anchor(attack: AttackKind, hit_point: Vec3, look: Vec3) -> Vec3 {
    match attack {
        AttackKind::Shot(_) => {
            let flat = Vec3::new(look.x, 0.0, look.z).normalize_or_zero();
            hit_point + Vec3::new(0.0, 0.2, 0.0) - flat * 0.8
        }
        AttackKind::Melee => hit_point + Vec3::new(0.0, 0.5, 0.0) - look.normalize_or_zero() * 0.5,
    }
}

/// Реакция renderer'а на попадание (по зомби уже после урона)
pub fn hit_presentation(zombie: &Zombie, event: &DamageEvent, anchor: Vec3) -> [PresentationEvent; 4] {
    let headshot = event.is_headshot();
    let (particle_count, blood_height) = if headshot { (12, 2.3) } else { (6, 1.5) };

    [
        PresentationEvent::DamageIndicator {
            position: anchor,
            amount: event.raw_damage,
            critical: headshot,
        },
        PresentationEvent::HitMarker { headshot },
        PresentationEvent::BloodSplatter {
            position: zombie.position + Vec3::new(0.0, blood_height, 0.0),
            particle_count,
        },
        PresentationEvent::AudioCue(if headshot { AudioCue::Headshot } else { AudioCue::Hit }),
    ]
}
