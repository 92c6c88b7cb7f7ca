//! Combat systems (фазы Input и Combat тика)

pub mod attack;
pub mod reload;


// Re-export all systems
pub use attack::*;
pub use reload::*;
