//! Game configuration - board dimensions and tuning constants.
//!
//! Everything the simulation consumes from the outside world lives here as
//! one immutable resource: window/grid geometry, the derived bubble radius,
//! and the gameplay tunables (shot step, ratchet cadence, fill density).
//! The config is validated once at startup; a level cannot be constructed
//! from a bad config, so validation failure is fatal.

use bevy::prelude::*;
use thiserror::Error;

use super::geometry::Layout;

/// Startup configuration failures. None of these are recoverable at runtime.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board needs at least 3 rows and 1 column, got {rows}x{cols}")]
    GridTooSmall { rows: usize, cols: usize },
    #[error("window {width}x{height} leaves no playable area inside the margins")]
    WindowTooSmall { width: f32, height: f32 },
    #[error("shot step must be positive, got {step}")]
    InvalidShotStep { step: f32 },
    #[error("palette has no {shade} colors")]
    PaletteMissingShade { shade: &'static str },
}

/// Immutable board and tuning parameters.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Window (and board) size in pixels.
    pub window_width: f32,
    pub window_height: f32,
    /// Margins between the window edges and the bubble field.
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Grid dimensions in cells.
    pub grid_rows: usize,
    pub grid_cols: usize,
    /// Outline ring thickness, part of the collision radius.
    pub outline_width: f32,
    /// Distance the projectile advances per simulation tick.
    pub shot_step: f32,
    /// Accepted shots between row injections. A tunable, not an invariant.
    pub shots_per_advance: u32,
    /// Length of the aiming guide polyline.
    pub guide_length: f32,
    /// Ammunition per level.
    pub queue_size: usize,
    /// Minimum cluster size that pops.
    pub min_cluster_size: usize,
    /// Score credited per popped bubble.
    pub points_per_bubble: u32,
    /// Fraction of rows filled by the initial population (before the
    /// level bonus row). A tunable, not an invariant.
    pub fill_row_fraction: f32,
    /// Fraction steering how many cells get cleared back out per row.
    pub clear_fraction: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 400.0,
            window_height: 600.0,
            margin_left: 10.0,
            margin_right: 10.0,
            margin_top: 10.0,
            margin_bottom: 10.0,
            grid_rows: 12,
            grid_cols: 12,
            outline_width: 3.0,
            shot_step: 5.0,
            shots_per_advance: 8,
            guide_length: 500.0,
            queue_size: 100,
            min_cluster_size: 3,
            points_per_bubble: 15,
            fill_row_fraction: 0.3,
            clear_fraction: 0.4,
        }
    }
}

impl GameConfig {
    /// Window size minus margins.
    fn usable_area(&self) -> (f32, f32) {
        (
            self.window_width - self.margin_left - self.margin_right,
            self.window_height - self.margin_top - self.margin_bottom,
        )
    }

    /// Bubble radius that fits the grid into the usable area, leaving one
    /// spare diameter of breathing room in each direction.
    pub fn bubble_radius(&self) -> f32 {
        let (w, h) = self.usable_area();
        (w / (self.grid_cols as f32 + 1.0)).min(h / (self.grid_rows as f32 + 1.0)) / 2.0
    }

    /// Fixed anchor the shooter fires from, near the bottom of the board.
    pub fn shooter_anchor(&self) -> Vec2 {
        Vec2::new(self.window_width / 2.0, self.window_height - 100.0)
    }

    /// The pixel-space layout handed to the simulation functions.
    pub fn layout(&self) -> Layout {
        Layout {
            rows: self.grid_rows,
            cols: self.grid_cols,
            radius: self.bubble_radius(),
            outline_width: self.outline_width,
            margin_left: self.margin_left,
            margin_top: self.margin_top,
            board_width: self.window_width,
            board_height: self.window_height,
        }
    }

    /// Reject configs no level can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Row injection shifts by two, so three rows is the floor.
        if self.grid_rows < 3 || self.grid_cols < 1 {
            return Err(ConfigError::GridTooSmall {
                rows: self.grid_rows,
                cols: self.grid_cols,
            });
        }
        let (w, h) = self.usable_area();
        if w <= 0.0 || h <= 0.0 {
            return Err(ConfigError::WindowTooSmall {
                width: self.window_width,
                height: self.window_height,
            });
        }
        if self.shot_step <= 0.0 {
            return Err(ConfigError::InvalidShotStep {
                step: self.shot_step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn radius_fits_the_tighter_axis() {
        let config = GameConfig::default();
        // usable 380x580 over a 12x12 grid: width is the tight axis.
        let expected = 380.0 / 13.0 / 2.0;
        assert!((config.bubble_radius() - expected).abs() < 1e-4);
    }

    #[test]
    fn degenerate_configs_are_rejected() {
        let mut config = GameConfig {
            grid_rows: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooSmall { .. })
        ));

        config = GameConfig {
            margin_left: 300.0,
            margin_right: 300.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowTooSmall { .. })
        ));

        config = GameConfig {
            shot_step: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidShotStep { .. })
        ));
    }
}
