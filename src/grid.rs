use serde::{Deserialize, Serialize};

use crate::error::{PlagueError, Result};

/// Grid structure for storing cell states
/// Cell values: 0=floor, 1=wall
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    pub cells: Vec<i32>,
}

impl Grid {
    /// Create a new grid with all cells set to floor (0)
    pub fn new(rows: i32, cols: i32) -> Self {
        Grid {
            rows,
            cols,
            cells: vec![0; (rows * cols).max(0) as usize],
        }
    }

    /// Parse a layout where `#` is a wall and `.` or space is floor.
    /// The first text line is the top row, i.e. the highest y.
    pub fn from_ascii(layout: &str) -> Result<Self> {
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            return Err(PlagueError::Config("level layout is empty".into()));
        }

        let rows = lines.len() as i32;
        let cols = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as i32;
        let mut grid = Grid::new(rows, cols);

        for (line_idx, line) in lines.iter().enumerate() {
            let y = rows - 1 - line_idx as i32;
            for (x, ch) in line.chars().enumerate() {
                match ch {
                    '#' => grid.set_cell(x as i32, y, 1),
                    '.' | ' ' => {}
                    other => {
                        return Err(PlagueError::Config(format!(
                            "unexpected character {:?} in level layout",
                            other
                        )))
                    }
                }
            }
        }

        Ok(grid)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Check if a cell at (x, y) is a wall. Outside the grid is open space.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.cells[self.get_id(x, y) as usize] == 1
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> i32 {
        x + y * self.cols
    }

    /// Set cell value at (x, y); cells outside the grid are ignored
    pub fn set_cell(&mut self, x: i32, y: i32, value: i32) {
        if self.in_bounds(x, y) {
            let id = self.get_id(x, y) as usize;
            self.cells[id] = value;
        }
    }

    /// IDs of every wall cell
    pub fn blocked_cells(&self) -> Vec<i32> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| **value == 1)
            .map(|(id, _)| id as i32)
            .collect()
    }
}
