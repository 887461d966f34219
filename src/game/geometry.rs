//! Staggered-grid geometry for the circle-packed bubble board.
//!
//! Bubbles sit in a rectangular matrix where even rows are shifted right by
//! one radius, interlocking with the odd rows above and below in the classic
//! bubble-shooter packing. Row 0 is the ceiling. All simulation math happens
//! in board space (top-left origin, y growing downward); the presentation
//! layer converts to Bevy's centered, y-up world space at the last moment.

use bevy::prelude::*;

/// A cell position in the dense bubble matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    /// Row index, 0 at the ceiling.
    pub row: usize,
    /// Column index, 0 at the left edge.
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Hex adjacency offsets as `(Δrow, Δcol)` pairs, depending on row parity.
///
/// Even rows are shifted right by one radius, so their diagonal neighbors
/// lean toward the next column; odd rows mirror toward the previous one.
pub const fn neighbor_offsets(row: usize) -> [(i32, i32); 6] {
    if row % 2 == 0 {
        [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)]
    } else {
        [(-1, 0), (-1, -1), (0, -1), (0, 1), (1, 0), (1, -1)]
    }
}

/// In-bounds hex neighbors of a cell on a `rows × cols` board.
pub fn neighbors_in_bounds(
    pos: GridPos,
    rows: usize,
    cols: usize,
) -> impl Iterator<Item = GridPos> {
    neighbor_offsets(pos.row)
        .into_iter()
        .filter_map(move |(dr, dc)| {
            let r = pos.row as i32 + dr;
            let c = pos.col as i32 + dc;
            (r >= 0 && (r as usize) < rows && c >= 0 && (c as usize) < cols)
                .then(|| GridPos::new(r as usize, c as usize))
        })
}

/// Pixel-space layout of the board: dimensions, margins and the bubble size.
///
/// Derived once from [`GameConfig`](super::config::GameConfig) and passed by
/// value into the pure simulation functions so they never touch resources.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub rows: usize,
    pub cols: usize,
    pub radius: f32,
    pub outline_width: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub board_width: f32,
    pub board_height: f32,
}

impl Layout {
    /// Center of a cell in board space.
    pub fn cell_center(&self, pos: GridPos) -> Vec2 {
        let r = self.radius;
        let stagger = if pos.row % 2 == 0 { r } else { 0.0 };
        Vec2::new(
            self.margin_left + r + pos.col as f32 * 2.0 * r + stagger,
            self.margin_top + pos.row as f32 * 2.0 * r + r,
        )
    }

    /// Convert a board-space point to Bevy world space (centered, y up).
    pub fn board_to_world(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.board_width * 0.5, self.board_height * 0.5 - p.y)
    }

    /// Convert a Bevy world-space point back to board space.
    pub fn world_to_board(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x + self.board_width * 0.5, self.board_height * 0.5 - p.y)
    }
}

/// Project a ray of `length` pixels from `origin` at `angle_degrees`.
///
/// 0° points right, 90° straight up. The y component is subtracted because
/// board-space y grows downward.
pub fn ray_endpoint(length: f32, angle_degrees: f32, origin: Vec2) -> Vec2 {
    let rad = angle_degrees.to_radians();
    Vec2::new(
        origin.x + length * rad.cos(),
        origin.y - length * rad.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout {
            rows: 12,
            cols: 12,
            radius: 10.0,
            outline_width: 3.0,
            margin_left: 10.0,
            margin_top: 10.0,
            board_width: 400.0,
            board_height: 600.0,
        }
    }

    #[test]
    fn even_and_odd_rows_mirror_diagonals() {
        let even = neighbor_offsets(0);
        let odd = neighbor_offsets(1);
        assert_eq!(even.len(), 6);
        assert!(even.contains(&(-1, 1)) && even.contains(&(1, 1)));
        assert!(odd.contains(&(-1, -1)) && odd.contains(&(1, -1)));
        // The four straight neighbors are shared.
        for d in [(-1, 0), (0, -1), (0, 1), (1, 0)] {
            assert!(even.contains(&d) && odd.contains(&d));
        }
    }

    #[test]
    fn corner_cells_keep_only_in_bounds_neighbors() {
        let top_left: Vec<_> = neighbors_in_bounds(GridPos::new(0, 0), 12, 12).collect();
        assert_eq!(top_left, vec![GridPos::new(0, 1), GridPos::new(1, 0), GridPos::new(1, 1)]);

        let interior: Vec<_> = neighbors_in_bounds(GridPos::new(5, 5), 12, 12).collect();
        assert_eq!(interior.len(), 6);
    }

    #[test]
    fn even_rows_are_staggered_right() {
        let l = layout();
        let even = l.cell_center(GridPos::new(0, 0));
        let odd = l.cell_center(GridPos::new(1, 0));
        assert_eq!(even, Vec2::new(10.0 + 10.0 + 10.0, 10.0 + 10.0));
        assert_eq!(odd, Vec2::new(10.0 + 10.0, 10.0 + 20.0 + 10.0));
        assert_eq!(even.x - odd.x, l.radius);
    }

    #[test]
    fn columns_advance_by_one_diameter() {
        let l = layout();
        let a = l.cell_center(GridPos::new(3, 2));
        let b = l.cell_center(GridPos::new(3, 3));
        assert_eq!(b.x - a.x, 2.0 * l.radius);
        assert_eq!(a.y, b.y);
    }

    #[test]
    fn ray_straight_up_decreases_y() {
        let end = ray_endpoint(100.0, 90.0, Vec2::new(200.0, 500.0));
        assert!((end.x - 200.0).abs() < 1e-3);
        assert!((end.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn world_conversion_round_trips() {
        let l = layout();
        let p = Vec2::new(123.0, 456.0);
        let back = l.world_to_board(l.board_to_world(p));
        assert!((back - p).length() < 1e-4);
    }
}
