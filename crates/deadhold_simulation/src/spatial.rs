//! Spatial query (raycast): граница с движком рендера/физики
//!
//! Симуляция не знает про меши. Renderer реализует `SpatialQuery`
//! (raycast по своей сцене) и отдаёт попадания, отсортированные по дистанции.
//! Combat resolver выбирает первое значимое попадание сам.

use bevy::prelude::*;

use crate::components::ZombieId;

/// Часть тела, куда пришёлся луч
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BodyPart {
    #[default]
    Body,
    Head,
}

/// Во что попал луч
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    Zombie(ZombieId),
    /// Стены, пол, пропсы
    Scenery,
}

/// Одно пересечение луча со сценой
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub target: HitTarget,
    /// Только для зомби; None = тело
    pub body_part: Option<BodyPart>,
    /// Декор без коллизии (частицы, трассеры, UI-спрайты)
    pub ignorable: bool,
}

impl RayHit {
    pub fn zombie(distance: f32, id: ZombieId, body_part: BodyPart) -> Self {
        Self {
            distance,
            target: HitTarget::Zombie(id),
            body_part: Some(body_part),
            ignorable: false,
        }
    }

    pub fn scenery(distance: f32) -> Self {
        Self {
            distance,
            target: HitTarget::Scenery,
            body_part: None,
            ignorable: false,
        }
    }

    pub fn decoration(distance: f32) -> Self {
        Self {
            ignorable: true,
            ..Self::scenery(distance)
        }
    }
}

/// Raycast по сцене
///
/// Результат: все пересечения, отсортированные по дистанции (ближайшее первым).
pub trait SpatialQuery: Send + Sync + 'static {
    fn cast_ray(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit>;
}

/// Resource-обёртка над текущей реализацией
#[derive(Resource)]
pub struct SpatialIndex(Box<dyn SpatialQuery>);

impl SpatialIndex {
    pub fn new(query: impl SpatialQuery) -> Self {
        Self(Box::new(query))
    }

    pub fn cast_ray(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
        self.0.cast_ray(origin, direction)
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(EmptySpace)
    }
}

/// Пустая сцена: луч ни во что не попадает (headless без renderer)
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySpace;

impl SpatialQuery for EmptySpace {
    fn cast_ray(&self, _origin: Vec3, _direction: Vec3) -> Vec<RayHit> {
        Vec::new()
    }
}

/// Фиксированный набор попаданий на любой луч (тесты, replay)
#[derive(Debug, Clone, Default)]
pub struct ScriptedHits(pub Vec<RayHit>);

impl SpatialQuery for ScriptedHits {
    fn cast_ray(&self, _origin: Vec3, _direction: Vec3) -> Vec<RayHit> {
        let mut hits = self.0.clone();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_hits_sorted() {
        let index = SpatialIndex::new(ScriptedHits(vec![
            RayHit::scenery(12.0),
            RayHit::zombie(4.0, ZombieId(3), BodyPart::Head),
            RayHit::decoration(1.0),
        ]));

        let hits = index.cast_ray(Vec3::ZERO, Vec3::NEG_Z);
        let distances: Vec<f32> = hits.iter().map(|hit| hit.distance).collect();
        assert_eq!(distances, vec![1.0, 4.0, 12.0]);
        assert!(hits[0].ignorable);
    }

    #[test]
    fn test_empty_space() {
        assert!(SpatialIndex::default().cast_ray(Vec3::ZERO, Vec3::X).is_empty());
    }
}
