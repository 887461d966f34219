//! Cosmetic feedback for board events - pop bursts, drop animations and
//! floating score text. Everything here reacts to messages after the fact;
//! the board has already changed by the time these run.

use bevy::prelude::*;

use super::config::GameConfig;
use super::session::{ClusterPopped, FloatingDropped};
use super::PresentSystems;
use crate::{PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            spawn_pop_bursts,
            spawn_drop_ghosts,
            spawn_score_text,
            animate_pop_bursts,
            animate_drop_ghosts,
            animate_score_text,
        )
            .in_set(PresentSystems)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// A popped bubble mid-burst: scales up to a peak, then down to nothing.
#[derive(Component)]
struct PopBurst {
    timer: f32,
    duration: f32,
}

/// A pruned bubble falling off the bottom of the board.
#[derive(Component)]
struct DropGhost {
    velocity: f32,
}

/// Score text floating up from a popped cluster.
#[derive(Component)]
struct ScorePopup {
    timer: f32,
    duration: f32,
    start_y: f32,
}

fn spawn_pop_bursts(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut popped_events: MessageReader<ClusterPopped>,
    config: Res<GameConfig>,
) {
    let layout = config.layout();
    for event in popped_events.read() {
        for &cell in &event.cells {
            let center = layout.board_to_world(layout.cell_center(cell));
            commands.spawn((
                Name::new("Pop Burst"),
                PopBurst {
                    timer: 0.0,
                    duration: 0.15,
                },
                Transform::from_translation(center.extend(6.0)),
                Mesh2d(meshes.add(Circle::new(layout.radius))),
                MeshMaterial2d(materials.add(ColorMaterial::from_color(event.color.fill))),
                DespawnOnExit(Screen::Gameplay),
            ));
        }
    }
}

fn animate_pop_bursts(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut PopBurst)>,
) {
    for (entity, mut transform, mut pop) in &mut query {
        pop.timer += time.delta_secs();
        let progress = (pop.timer / pop.duration).min(1.0);

        // Swell to 1.4x in the first half, collapse in the second.
        let scale = if progress < 0.5 {
            1.0 + 0.8 * progress
        } else {
            1.4 * (1.0 - (progress - 0.5) * 2.0)
        };
        transform.scale = Vec3::splat(scale.max(0.0));

        if progress >= 1.0 {
            commands.entity(entity).despawn();
        }
    }
}

fn spawn_drop_ghosts(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut dropped_events: MessageReader<FloatingDropped>,
    config: Res<GameConfig>,
) {
    let layout = config.layout();
    for event in dropped_events.read() {
        for &cell in &event.cells {
            let center = layout.board_to_world(layout.cell_center(cell));
            commands.spawn((
                Name::new("Drop Ghost"),
                DropGhost { velocity: 60.0 },
                Transform::from_translation(center.extend(6.0)),
                Mesh2d(meshes.add(Circle::new(layout.radius))),
                MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgba(
                    0.3, 0.3, 0.35, 0.7,
                )))),
                DespawnOnExit(Screen::Gameplay),
            ));
        }
    }
}

/// Accelerate drop ghosts downward and cull them below the window.
fn animate_drop_ghosts(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut query: Query<(Entity, &mut Transform, &mut DropGhost)>,
) {
    let floor = -config.window_height / 2.0 - 40.0;
    for (entity, mut transform, mut ghost) in &mut query {
        ghost.velocity += 900.0 * time.delta_secs();
        transform.translation.y -= ghost.velocity * time.delta_secs();
        if transform.translation.y < floor {
            commands.entity(entity).despawn();
        }
    }
}

fn spawn_score_text(
    mut commands: Commands,
    mut popped_events: MessageReader<ClusterPopped>,
    config: Res<GameConfig>,
) {
    let layout = config.layout();
    for event in popped_events.read() {
        if event.cells.is_empty() {
            continue;
        }
        let sum: Vec2 = event
            .cells
            .iter()
            .map(|&cell| layout.cell_center(cell))
            .sum();
        let center = layout.board_to_world(sum / event.cells.len() as f32);
        let points = config.points_per_bubble * event.cells.len() as u32;

        commands.spawn((
            Name::new("Score Popup"),
            ScorePopup {
                timer: 0.0,
                duration: 0.8,
                start_y: center.y,
            },
            Text2d::new(format!("+{points}")),
            TextFont {
                font_size: 24.0,
                ..default()
            },
            TextColor(Color::srgb(0.95, 0.9, 0.2)),
            Transform::from_translation(center.extend(10.0)),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

/// Float score text upward and fade it out near the end.
fn animate_score_text(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut ScorePopup, &mut TextColor)>,
) {
    for (entity, mut transform, mut popup, mut color) in &mut query {
        popup.timer += time.delta_secs();
        let progress = (popup.timer / popup.duration).min(1.0);

        transform.translation.y = popup.start_y + 40.0 * progress;

        let alpha = if progress > 0.7 {
            1.0 - (progress - 0.7) / 0.3
        } else {
            1.0
        };
        color.0 = Color::srgba(0.95, 0.9, 0.2, alpha);

        if progress >= 1.0 {
            commands.entity(entity).despawn();
        }
    }
}
