//! Debug visualization for the staggered grid.
//!
//! Toggle with the 'D' key during gameplay. Shows every cell center, the
//! occupancy state, and the shooter's current aim angle.

use bevy::{color::palettes::css, input::common_conditions::input_just_pressed, prelude::*};

use super::board::Board;
use super::config::GameConfig;
use super::geometry::{GridPos, ray_endpoint};
use super::shooter::Shooter;
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DebugGridVisible>();

    app.add_systems(
        Update,
        toggle_debug.run_if(in_state(Screen::Gameplay).and(input_just_pressed(KeyCode::KeyD))),
    );
    app.add_systems(
        Update,
        draw_debug_grid.run_if(in_state(Screen::Gameplay).and(debug_visible)),
    );
}

/// Resource tracking whether the debug overlay is visible.
#[derive(Resource, Default)]
pub struct DebugGridVisible(pub bool);

fn debug_visible(debug: Res<DebugGridVisible>) -> bool {
    debug.0
}

fn toggle_debug(mut debug: ResMut<DebugGridVisible>) {
    debug.0 = !debug.0;
    let state = if debug.0 { "ON" } else { "OFF" };
    info!("Debug grid: {}", state);
}

/// Draw cell rings and the aim readout with Bevy's Gizmos.
fn draw_debug_grid(
    mut gizmos: Gizmos,
    board: Res<Board>,
    config: Res<GameConfig>,
    shooter: Res<Shooter>,
) {
    let layout = config.layout();

    for row in 0..layout.rows {
        for col in 0..layout.cols {
            let cell = GridPos::new(row, col);
            let color = if !board.get(cell).is_empty() {
                css::LIMEGREEN.with_alpha(0.5)
            } else if row == 0 {
                // The ceiling row everything must stay anchored to.
                css::GOLD.with_alpha(0.3)
            } else if row == layout.rows - 1 {
                // Landing here loses the run.
                css::INDIAN_RED.with_alpha(0.3)
            } else {
                css::WHITE.with_alpha(0.15)
            };

            let center = layout.board_to_world(layout.cell_center(cell));
            gizmos.circle_2d(center, layout.radius, color);
        }
    }

    // Aim ray from the anchor, ignoring wall bounces.
    let anchor = layout.board_to_world(shooter.anchor());
    let end = layout.board_to_world(ray_endpoint(
        120.0,
        shooter.angle_degrees(),
        shooter.anchor(),
    ));
    gizmos.line_2d(anchor, end, css::AQUA.with_alpha(0.8));
}
