#![allow(dead_code)]

use glam::Vec2;
use plaguedoctor::{Config, Grid, Level, Session};

/// Default config with a fixed seed so every run draws the same plague
pub fn seeded_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.session.seed = Some(seed);
    config
}

/// 10x10 room with a wall border, cell (0, 0) at the world origin
pub fn walled_room() -> Level {
    let mut grid = Grid::new(10, 10);
    for i in 0..10 {
        grid.set_cell(i, 0, 1);
        grid.set_cell(i, 9, 1);
        grid.set_cell(0, i, 1);
        grid.set_cell(9, i, 1);
    }
    Level::new(grid, Vec2::ZERO, 1.0)
}

pub fn open_session(config: Config) -> Session {
    Session::new(config, Level::open()).expect("valid config")
}

pub fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-3
}
