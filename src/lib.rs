pub mod config;
pub mod disease;
pub mod error;
pub mod event_log;
pub mod grid;
pub mod infection;
pub mod lobby;
pub mod patient;
pub mod player;
pub mod raycast;
pub mod save_state;
pub mod session;
pub mod symptoms;
pub mod treatment;
pub mod vision;

pub use glam::Vec2;

pub use config::Config;
pub use error::{PlagueError, Result};
pub use grid::Grid;
pub use patient::{Patient, PatientId};
pub use player::{Player, PlayerId, PlayerInput};
pub use raycast::Level;
pub use session::{GameEvent, Session};
pub use vision::{RaycastOracle, VisionMesh, VisionPolygon};
