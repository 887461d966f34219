//! The how-to-play screen between the title and the first level.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use super::Screen;

const INSTRUCTIONS: &str = "Aim with the mouse.\n\
    Fire with a click or the spacebar.\n\
    Match three or more bubbles to pop them.\n\
    Bubbles cut off from the ceiling fall away.\n\
    Every eighth shot pushes the board down.\n\
    Don't let the bubbles reach the bottom!";

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Instructions), spawn_instructions_screen);
    app.add_systems(
        Update,
        begin_level
            .run_if(in_state(Screen::Instructions).and(input_just_pressed(KeyCode::Enter))),
    );
}

fn spawn_instructions_screen(mut commands: Commands) {
    commands.spawn((
        Name::new("Instructions Header"),
        Text2d::new("How to Play"),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::srgb(0.1, 0.1, 0.15)),
        Transform::from_xyz(0.0, 160.0, 0.0),
        DespawnOnExit(Screen::Instructions),
    ));
    commands.spawn((
        Name::new("Instructions Text"),
        Text2d::new(INSTRUCTIONS),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.2, 0.2, 0.25)),
        Transform::from_xyz(0.0, 20.0, 0.0),
        DespawnOnExit(Screen::Instructions),
    ));
    commands.spawn((
        Name::new("Instructions Prompt"),
        Text2d::new("Press Enter to start"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::srgb(0.2, 0.2, 0.25)),
        Transform::from_xyz(0.0, -140.0, 0.0),
        DespawnOnExit(Screen::Instructions),
    ));
}

fn begin_level(mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Gameplay);
}
