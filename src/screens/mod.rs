//! The game's screens and transitions between them.

mod game_over;
mod gameplay;
mod instructions;
mod level_complete;
mod title;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.init_state::<Screen>();

    app.add_plugins((
        title::plugin,
        instructions::plugin,
        gameplay::plugin,
        level_complete::plugin,
        game_over::plugin,
    ));
}

/// The game's top-level states.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Screen {
    #[default]
    Title,
    Instructions,
    Gameplay,
    LevelComplete,
    GameOver,
}
