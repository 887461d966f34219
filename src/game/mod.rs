//! The main game module for the bubble shooter.
//!
//! This module contains all the gameplay logic including:
//! - Staggered-grid geometry and board state
//! - Per-level color palettes
//! - Shooter aiming and the reflecting guide line
//! - One-step shot resolution (flight, snap, landing)
//! - Cluster popping and floating-bubble pruning
//! - Session state: score, levels, the ammo queue and the row ratchet
//!
//! The rules live in plain types and functions; the Bevy systems here are
//! thin drivers around them. Within a frame, input runs before resolution,
//! and resolution before presentation.

pub mod board;
pub mod config;
mod debug;
mod effects;
pub mod geometry;
pub mod palette;
mod render;
mod resolver;
mod session;
mod shooter;

use bevy::prelude::*;

pub use session::Session;

pub(super) fn plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (InputSystems, ResolveSystems, PresentSystems).chain(),
    );

    app.add_plugins((
        shooter::plugin,
        session::plugin,
        render::plugin,
        effects::plugin,
        debug::plugin,
    ));
}

/// Systems reading player input and writing fire requests.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputSystems;

/// Systems resolving shots and mutating the board.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolveSystems;

/// Systems drawing the board, ghosts and HUD.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresentSystems;
