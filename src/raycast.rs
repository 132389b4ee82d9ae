use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::vision::RaycastOracle;

/// A walled level: a grid of square cells placed in world space.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Level {
    pub grid: Grid,
    /// World position of the bottom-left corner of cell (0, 0)
    pub origin: Vec2,
    pub cell_size: f32,
}

impl Level {
    pub fn new(grid: Grid, origin: Vec2, cell_size: f32) -> Self {
        Level {
            grid,
            origin,
            cell_size,
        }
    }

    /// A level with no walls at all
    pub fn open() -> Self {
        Level::new(Grid::new(0, 0), Vec2::ZERO, 1.0)
    }

    /// World-space bottom-left corner of a cell
    pub fn cell_origin(&self, x: i32, y: i32) -> Vec2 {
        self.origin + Vec2::new(x as f32, y as f32) * self.cell_size
    }
}

impl RaycastOracle for Level {
    /// Grid traversal: visit every cell the ray crosses, in order, and stop
    /// at the first wall. The returned point is where the ray enters it.
    fn cast(&self, origin: Vec2, dir: Vec2, max_distance: f32) -> Option<Vec2> {
        // the traversal only terminates on a finite range
        if dir == Vec2::ZERO || self.cell_size <= 0.0 || !max_distance.is_finite() || !origin.is_finite() {
            return None;
        }

        let g = (origin - self.origin) / self.cell_size;
        let max_t = max_distance / self.cell_size;
        let (mut cell_x, mut cell_y) = (g.x.floor() as i32, g.y.floor() as i32);

        if self.grid.is_blocked(cell_x, cell_y) {
            return Some(origin);
        }

        let step_x = if dir.x > 0.0 { 1 } else { -1 };
        let step_y = if dir.y > 0.0 { 1 } else { -1 };

        let mut t_max_x = if dir.x > 0.0 {
            (cell_x as f32 + 1.0 - g.x) / dir.x
        } else if dir.x < 0.0 {
            (g.x - cell_x as f32) / -dir.x
        } else {
            f32::INFINITY
        };
        let mut t_max_y = if dir.y > 0.0 {
            (cell_y as f32 + 1.0 - g.y) / dir.y
        } else if dir.y < 0.0 {
            (g.y - cell_y as f32) / -dir.y
        } else {
            f32::INFINITY
        };
        let t_delta_x = if dir.x != 0.0 { 1.0 / dir.x.abs() } else { f32::INFINITY };
        let t_delta_y = if dir.y != 0.0 { 1.0 / dir.y.abs() } else { f32::INFINITY };

        loop {
            let t = if t_max_x < t_max_y {
                cell_x += step_x;
                let t = t_max_x;
                t_max_x += t_delta_x;
                t
            } else {
                cell_y += step_y;
                let t = t_max_y;
                t_max_y += t_delta_y;
                t
            };

            if t > max_t {
                return None;
            }
            if self.grid.is_blocked(cell_x, cell_y) {
                return Some(origin + dir * t * self.cell_size);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Level {
        // wall column at x = 5
        let mut grid = Grid::new(10, 10);
        for y in 0..10 {
            grid.set_cell(5, y, 1);
        }
        Level::new(grid, Vec2::ZERO, 1.0)
    }

    #[test]
    fn test_ray_stops_at_wall_face() {
        let level = corridor();
        let hit = level.cast(Vec2::new(2.5, 2.5), Vec2::X, 10.0).unwrap();
        assert!((hit - Vec2::new(5.0, 2.5)).length() < 1e-4);
    }

    #[test]
    fn test_ray_out_of_range_misses() {
        let level = corridor();
        assert!(level.cast(Vec2::new(2.5, 2.5), Vec2::X, 2.0).is_none());
    }

    #[test]
    fn test_ray_away_from_wall_misses() {
        let level = corridor();
        assert!(level.cast(Vec2::new(2.5, 2.5), -Vec2::X, 50.0).is_none());
    }

    #[test]
    fn test_diagonal_ray_hits_and_respects_cell_size() {
        let mut grid = Grid::new(4, 4);
        grid.set_cell(3, 3, 1);
        let level = Level::new(grid, Vec2::new(-4.0, -4.0), 2.0);
        let dir = Vec2::new(1.0, 1.0).normalize();
        let hit = level.cast(Vec2::new(-3.0, -3.0), dir, 20.0).unwrap();
        // cell (3, 3) spans world [2, 4] on both axes
        assert!((hit - Vec2::new(2.0, 2.0)).length() < 1e-3);
    }

    #[test]
    fn test_non_finite_range_returns_without_hit() {
        let level = corridor();
        assert!(level.cast(Vec2::new(2.5, 2.5), -Vec2::X, f32::INFINITY).is_none());
        assert!(level.cast(Vec2::new(2.5, 2.5), Vec2::X, f32::NAN).is_none());
    }

    #[test]
    fn test_starting_inside_wall_hits_immediately() {
        let level = corridor();
        let origin = Vec2::new(5.5, 1.0);
        assert_eq!(level.cast(origin, Vec2::Y, 10.0), Some(origin));
    }
}
