//! Геометрия уровня (бункер): стены как AABB на плоскости XZ

use bevy::prelude::*;

/// Стена/проп: центр (x, z) и размер (width по X, depth по Z)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
}

impl Wall {
    pub const fn new(x: f32, z: f32, width: f32, depth: f32) -> Self {
        Self { x, z, width, depth }
    }

    /// Строгое пересечение с квадратом игрока (касание не считается)
    pub fn overlaps(&self, center: Vec3, half_extent: f32) -> bool {
        let (min_x, max_x) = (self.x - self.width / 2.0, self.x + self.width / 2.0);
        let (min_z, max_z) = (self.z - self.depth / 2.0, self.z + self.depth / 2.0);

        center.x + half_extent > min_x
            && center.x - half_extent < max_x
            && center.z + half_extent > min_z
            && center.z - half_extent < max_z
    }
}

const BUNKER_WALLS: [Wall; 18] = [
    // Main hall
    Wall::new(0.0, -15.0, 20.0, 1.0),
    Wall::new(0.0, 15.0, 20.0, 1.0),
    Wall::new(-10.0, -10.0, 1.0, 10.0),
    Wall::new(-10.0, 10.0, 1.0, 10.0),
    Wall::new(10.0, -10.0, 1.0, 10.0),
    Wall::new(10.0, 10.0, 1.0, 10.0),
    // West room (generator)
    Wall::new(-25.0, 0.0, 1.0, 15.0),
    Wall::new(-17.5, -7.5, 15.0, 1.0),
    Wall::new(-17.5, 7.5, 15.0, 1.0),
    // East room (lab)
    Wall::new(25.0, 0.0, 1.0, 15.0),
    Wall::new(17.5, -7.5, 15.0, 1.0),
    Wall::new(17.5, 7.5, 15.0, 1.0),
    // Pillars
    Wall::new(-5.0, -5.0, 1.0, 1.0),
    Wall::new(5.0, -5.0, 1.0, 1.0),
    Wall::new(-5.0, 5.0, 1.0, 1.0),
    Wall::new(5.0, 5.0, 1.0, 1.0),
    // Props
    Wall::new(-20.0, -5.0, 2.5, 2.5),
    Wall::new(20.0, -5.0, 6.0, 2.0),
];

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LevelGeometry {
    pub walls: Vec<Wall>,
}

impl Default for LevelGeometry {
    fn default() -> Self {
        Self {
            walls: BUNKER_WALLS.to_vec(),
        }
    }
}

impl LevelGeometry {
    /// Пустой уровень без стен (тесты)
    pub fn open() -> Self {
        Self { walls: Vec::new() }
    }

    pub fn blocks(&self, position: Vec3, half_extent: f32) -> bool {
        self.walls.iter().any(|wall| wall.overlaps(position, half_extent))
    }

    /// Горизонтальный шаг со скольжением вдоль стен
    ///
    /// Полный шаг заблокирован → только X; иначе только Z; иначе стоим.
    /// Y не трогается.
    pub fn slide(&self, from: Vec3, step: Vec3, half_extent: f32) -> Vec3 {
        let full = Vec3::new(from.x + step.x, from.y, from.z + step.z);
        if !self.blocks(full, half_extent) {
            return full;
        }

        let x_only = Vec3::new(from.x + step.x, from.y, from.z);
        if !self.blocks(x_only, half_extent) {
            return x_only;
        }

        let z_only = Vec3::new(from.x, from.y, from.z + step.z);
        if !self.blocks(z_only, half_extent) {
            return z_only;
        }

        from
    }
}
