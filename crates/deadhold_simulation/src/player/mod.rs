//! Player module: контроллер движения, уровень, wall-buy

use bevy::prelude::*;

pub mod health;
pub mod level;
pub mod movement;
pub mod wall_buy;

pub use health::regenerate_player_health;
pub use level::{LevelGeometry, Wall};
pub use movement::{movement_direction, player_movement, step_player};
pub use wall_buy::{handle_wall_buy, purchase, WallBuy, WallBuyOffer, WallBuyStations};

use crate::TickStep;

/// Player Plugin
///
/// - handle_wall_buy (TickStep::Input)
/// - player_movement (TickStep::Movement)
/// - regenerate_player_health (TickStep::Commit)
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelGeometry>()
            .init_resource::<WallBuyStations>();

        app.add_systems(
            Update,
            (
                handle_wall_buy.in_set(TickStep::Input),
                player_movement.in_set(TickStep::Movement),
                regenerate_player_health.in_set(TickStep::Commit),
            ),
        );
    }
}
