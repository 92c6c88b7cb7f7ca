//! Presentation events (ECS → renderer)
//!
//! Чисто визуальные/звуковые реакции на бой. Симуляция их только
//! публикует; renderer забирает через `SimulationStore::drain_presentation`.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Hit,
    Headshot,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PresentationEvent {
    /// Всплывающая цифра урона (сырой урон до брони tank)
    DamageIndicator {
        position: Vec3,
        amount: f32,
        critical: bool,
    },
    /// Маркер попадания в прицеле
    HitMarker { headshot: bool },
    /// Брызги крови из зомби
    BloodSplatter { position: Vec3, particle_count: u32 },
    AudioCue(AudioCue),
}
