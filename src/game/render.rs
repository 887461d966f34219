//! Presentation of the board, shooter and HUD.
//!
//! The simulation resolves each shot instantly; what the player sees is a
//! replay. A fired bubble spawns a ghost entity that travels the recorded
//! flight path, and the board visuals are rebuilt from the grid snapshot
//! only once the ghost has finished its trip. The rules never wait on any
//! of this.

use bevy::prelude::*;

use super::board::Board;
use super::config::GameConfig;
use super::palette::ColorPair;
use super::session::{Session, ShotFired};
use super::shooter::Shooter;
use super::PresentSystems;
use crate::{PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<BoardDirty>();

    app.add_systems(OnEnter(Screen::Gameplay), spawn_hud);
    app.add_systems(
        Update,
        // Chained so a freshly spawned ghost is visible to the board sync
        // in the same frame; otherwise the landed bubble would pop in
        // before its replay.
        (
            spawn_shot_ghosts,
            animate_shot_ghosts,
            sync_board_visuals,
            sync_shooter_visuals,
            update_hud,
            draw_board_frame,
        )
            .chain()
            .in_set(PresentSystems)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Ghost travel speed in pixels per second.
const GHOST_SPEED: f32 = 900.0;

/// Set when the grid changed and the visuals no longer match it.
#[derive(Resource, Debug, Default)]
pub struct BoardDirty(pub bool);

/// Marker for a bubble drawn on the grid.
#[derive(Component)]
struct BubbleVisual;

/// Cosmetic replay of a resolved shot, moving along the recorded path.
#[derive(Component, Debug)]
pub struct ProjectileGhost {
    /// Board-space waypoints, origin first.
    path: Vec<Vec2>,
    /// Index of the waypoint currently being approached.
    next: usize,
    /// Board-space position along the path.
    position: Vec2,
}

/// Marker for the chambered-bubble visual at the shooter anchor.
#[derive(Component)]
struct LoadedVisual;

/// Marker for the next-up preview visual.
#[derive(Component)]
struct PreviewVisual;

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct LevelText;

#[derive(Component)]
struct AmmoText;

/// Spawn one bubble visual: an outline disc with a smaller fill disc on top.
fn spawn_bubble_visual(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    color: ColorPair,
    radius: f32,
    outline_width: f32,
    position: Vec2,
    z: f32,
) -> Entity {
    commands
        .spawn((
            Name::new("Bubble"),
            BubbleVisual,
            Transform::from_translation(position.extend(z)),
            Mesh2d(meshes.add(Circle::new(radius + outline_width))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(color.outline))),
            DespawnOnExit(Screen::Gameplay),
            children![(
                Transform::from_xyz(0.0, 0.0, 0.1),
                Mesh2d(meshes.add(Circle::new(radius))),
                MeshMaterial2d(materials.add(ColorMaterial::from_color(color.fill))),
            )],
        ))
        .id()
}

/// Rebuild the grid visuals from the board snapshot.
///
/// Waits while a ghost is in flight so the landed bubble does not appear
/// before its replay arrives.
fn sync_board_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut dirty: ResMut<BoardDirty>,
    board: Res<Board>,
    config: Res<GameConfig>,
    ghost_query: Query<(), With<ProjectileGhost>>,
    visual_query: Query<Entity, With<BubbleVisual>>,
) {
    if !dirty.0 || !ghost_query.is_empty() {
        return;
    }
    dirty.0 = false;

    for entity in &visual_query {
        commands.entity(entity).despawn();
    }

    let layout = config.layout();
    for (pos, color) in board.filled() {
        let center = layout.board_to_world(layout.cell_center(pos));
        spawn_bubble_visual(
            &mut commands,
            &mut meshes,
            &mut materials,
            color,
            layout.radius - layout.outline_width,
            layout.outline_width,
            center,
            1.0,
        );
    }
}

/// Spawn a ghost for each resolved shot.
fn spawn_shot_ghosts(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut shot_events: MessageReader<ShotFired>,
    config: Res<GameConfig>,
) {
    for event in shot_events.read() {
        let Some(&origin) = event.path.first() else {
            continue;
        };
        let layout = config.layout();
        let radius = layout.radius - layout.outline_width;

        commands.spawn((
            Name::new("Shot Ghost"),
            ProjectileGhost {
                path: event.path.clone(),
                next: 1,
                position: origin,
            },
            Transform::from_translation(layout.board_to_world(origin).extend(5.0)),
            Mesh2d(meshes.add(Circle::new(radius + layout.outline_width))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(event.color.outline))),
            DespawnOnExit(Screen::Gameplay),
            children![(
                Transform::from_xyz(0.0, 0.0, 0.1),
                Mesh2d(meshes.add(Circle::new(radius))),
                MeshMaterial2d(materials.add(ColorMaterial::from_color(event.color.fill))),
            )],
        ));
    }
}

/// Move ghosts along their paths and despawn them at the end.
fn animate_shot_ghosts(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut ghost_query: Query<(Entity, &mut Transform, &mut ProjectileGhost)>,
) {
    let layout = config.layout();

    for (entity, mut transform, mut ghost) in &mut ghost_query {
        let mut budget = GHOST_SPEED * time.delta_secs();

        while budget > 0.0 {
            let Some(&target) = ghost.path.get(ghost.next) else {
                commands.entity(entity).despawn();
                break;
            };
            let to_target = target - ghost.position;
            let distance = to_target.length();

            if distance <= budget {
                ghost.position = target;
                ghost.next += 1;
                budget -= distance;
            } else {
                ghost.position += to_target / distance * budget;
                budget = 0.0;
            }
        }

        let world = layout.board_to_world(ghost.position);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

/// Keep the chambered bubble and the queue preview in sync with the model.
///
/// Rebuilds only when the colors actually change; the cache keeps this from
/// churning mesh assets every frame.
fn sync_shooter_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    shooter: Res<Shooter>,
    session: Res<Session>,
    config: Res<GameConfig>,
    loaded_query: Query<Entity, With<LoadedVisual>>,
    preview_query: Query<Entity, With<PreviewVisual>>,
    mut cache: Local<Option<(Option<ColorPair>, Option<ColorPair>)>>,
) {
    let loaded = shooter.loaded();
    let preview = session.queue.front().copied();
    if *cache == Some((loaded, preview)) {
        return;
    }
    *cache = Some((loaded, preview));

    for entity in loaded_query.iter().chain(preview_query.iter()) {
        commands.entity(entity).despawn();
    }

    let layout = config.layout();
    let radius = layout.radius - layout.outline_width;

    if let Some(color) = loaded {
        let entity = spawn_bubble_visual(
            &mut commands,
            &mut meshes,
            &mut materials,
            color,
            radius,
            layout.outline_width,
            layout.board_to_world(shooter.anchor()),
            2.0,
        );
        commands.entity(entity).insert(LoadedVisual);
    }
    if let Some(color) = preview {
        let offset = Vec2::new(3.0 * layout.radius, 0.0);
        let entity = spawn_bubble_visual(
            &mut commands,
            &mut meshes,
            &mut materials,
            color,
            radius * 0.6,
            layout.outline_width * 0.6,
            layout.board_to_world(shooter.anchor() + offset),
            2.0,
        );
        commands.entity(entity).insert(PreviewVisual);
    }
}

/// Spawn the score/level/ammo readouts along the bottom edge.
fn spawn_hud(mut commands: Commands, config: Res<GameConfig>) {
    let layout = config.layout();
    let baseline = layout.board_to_world(Vec2::new(0.0, config.window_height - 20.0)).y;
    let font = TextFont {
        font_size: 16.0,
        ..default()
    };

    commands.spawn((
        Name::new("Score Text"),
        ScoreText,
        Text2d::new("Score: 0"),
        font.clone(),
        TextColor(Color::srgb(0.1, 0.1, 0.1)),
        Transform::from_xyz(-config.window_width / 2.0 + 70.0, baseline, 10.0),
        DespawnOnExit(Screen::Gameplay),
    ));
    commands.spawn((
        Name::new("Level Text"),
        LevelText,
        Text2d::new("Level 1"),
        font.clone(),
        TextColor(Color::srgb(0.1, 0.1, 0.1)),
        Transform::from_xyz(0.0, baseline, 10.0),
        DespawnOnExit(Screen::Gameplay),
    ));
    commands.spawn((
        Name::new("Ammo Text"),
        AmmoText,
        Text2d::new(""),
        font,
        TextColor(Color::srgb(0.1, 0.1, 0.1)),
        Transform::from_xyz(config.window_width / 2.0 - 70.0, baseline, 10.0),
        DespawnOnExit(Screen::Gameplay),
    ));
}

fn update_hud(
    session: Res<Session>,
    shooter: Res<Shooter>,
    mut score_query: Query<&mut Text2d, With<ScoreText>>,
    mut level_query: Query<&mut Text2d, (With<LevelText>, Without<ScoreText>)>,
    mut ammo_query: Query<&mut Text2d, (With<AmmoText>, Without<ScoreText>, Without<LevelText>)>,
) {
    if let Ok(mut text) = score_query.single_mut() {
        text.0 = format!("Score: {}", session.score);
    }
    if let Ok(mut text) = level_query.single_mut() {
        text.0 = format!("Level {}", session.level);
    }
    if let Ok(mut text) = ammo_query.single_mut() {
        let chambered = usize::from(shooter.loaded().is_some());
        text.0 = format!("Ammo: {}", session.ammo_remaining() + chambered);
    }
}

/// Outline the playfield and mark the boundary row the grid must not cross.
fn draw_board_frame(mut gizmos: Gizmos, config: Res<GameConfig>) {
    let layout = config.layout();
    let wall = Color::srgb(0.25, 0.25, 0.3);

    let top_left = layout.board_to_world(Vec2::ZERO);
    let top_right = layout.board_to_world(Vec2::new(layout.board_width, 0.0));
    let floor_y = layout.margin_top + layout.rows as f32 * 2.0 * layout.radius + 5.0;
    let bottom_left = layout.board_to_world(Vec2::new(0.0, floor_y));
    let bottom_right = layout.board_to_world(Vec2::new(layout.board_width, floor_y));

    gizmos.line_2d(top_left, bottom_left, wall);
    gizmos.line_2d(top_right, bottom_right, wall);
    gizmos.line_2d(
        bottom_left,
        bottom_right,
        Color::srgb(0.85, 0.3, 0.3),
    );
}
