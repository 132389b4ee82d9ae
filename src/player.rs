use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{PlayerConfig, VisionConfig};
use crate::infection::InfectionTimer;
use crate::treatment::Treatment;
use crate::vision::{vision_cone, vision_radius, RaycastOracle, Viewer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerColour {
    Magenta,
    Cyan,
    White,
}

impl PlayerColour {
    /// Roll a tint for an owned player. The roll is over `1..3`, so only the
    /// first two tints ever come up; White is the unsynchronized default.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(1..3) {
            1 => PlayerColour::Magenta,
            2 => PlayerColour::Cyan,
            _ => PlayerColour::White,
        }
    }

    pub fn rgb(self) -> (f32, f32, f32) {
        match self {
            PlayerColour::Magenta => (1.0, 0.3, 1.0),
            PlayerColour::Cyan => (0.3, 1.0, 1.0),
            PlayerColour::White => (1.0, 1.0, 1.0),
        }
    }
}

/// Per-tick input sampled by the driver
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Horizontal and vertical axes, each in [-1, 1]
    pub axis: Vec2,
    /// Cursor position in world space
    pub aim: Option<Vec2>,
    /// Interaction key went down this tick
    pub treat_pressed: bool,
}

/// Player represents a plague doctor moving around the level
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub position: Vec2,
    /// Rotation in degrees; 0 faces +Y
    pub rotation: f32,
    /// World units per second
    pub speed: f32,
    pub colour: PlayerColour,
    pub is_owner: bool,
    pub infection: InfectionTimer,
    pub treatment: Option<Treatment>,
    pub viewer: Viewer,
}

impl Player {
    pub fn new(id: PlayerId, position: Vec2, speed: f32) -> Self {
        Player {
            id,
            position,
            rotation: 0.0,
            speed,
            colour: PlayerColour::White,
            is_owner: false,
            infection: InfectionTimer::default(),
            treatment: None,
            viewer: Viewer::default(),
        }
    }

    /// Spawn at a random point of the configured spawn rectangle
    pub fn spawn<R: Rng + ?Sized>(id: PlayerId, config: &PlayerConfig, is_owner: bool, rng: &mut R) -> Self {
        let [min_x, min_y] = config.spawn_min;
        let [max_x, max_y] = config.spawn_max;
        let position = Vec2::new(
            rng.gen_range(min_x.min(max_x)..=min_x.max(max_x)),
            rng.gen_range(min_y.min(max_y)..=min_y.max(max_y)),
        );

        let mut player = Player::new(id, position, config.speed);
        player.is_owner = is_owner;
        if is_owner {
            player.colour = PlayerColour::roll(rng);
        }
        tracing::info!(player = id.0, x = position.x, y = position.y, colour = ?player.colour, "Player spawned");
        player
    }

    pub fn is_infected(&self) -> bool {
        self.infection.is_infected()
    }

    pub fn is_treating(&self) -> bool {
        self.treatment.as_ref().is_some_and(|t| !t.finished)
    }

    /// Unit vector the player faces
    pub fn facing(&self) -> Vec2 {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        Vec2::new(-sin, cos)
    }

    /// Turn toward a world point; the sprite's forward axis is +Y
    pub fn face_towards(&mut self, target: Vec2) {
        let d = target - self.position;
        if d == Vec2::ZERO {
            return;
        }
        self.rotation = d.y.atan2(d.x).to_degrees() - 90.0;
    }

    /// Move in world space by axis * speed * dt; ignored while treating
    pub fn apply_movement(&mut self, axis: Vec2, dt: f32) {
        if self.is_treating() {
            return;
        }
        self.position += axis.clamp(Vec2::splat(-1.0), Vec2::ONE) * self.speed * dt;
    }

    /// Recompute both vision polygons from the current pose
    pub fn rebuild_vision<O: RaycastOracle + ?Sized>(&mut self, config: &VisionConfig, oracle: &O) {
        self.viewer.cone = Some(vision_cone(
            self.position,
            self.facing(),
            config.fov,
            config.num_rays,
            config.sight_range,
            oracle,
        ));
        self.viewer.radius = Some(vision_radius(
            self.position,
            config.radius_num_verts,
            config.radius,
            oracle,
        ));
    }
}
