//! Состояние сущностей сессии
//!
//! Организация по доменам:
//! - actor: здоровье (общее для игрока)
//! - player: единственный игрок (resource, не entity)
//! - zombie: зомби (entity с компонентом `Zombie`)

pub mod actor;
pub mod player;
pub mod zombie;

// Re-exports для удобного импорта
pub use actor::*;
pub use player::*;
pub use zombie::*;
