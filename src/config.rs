use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{PlagueError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub disease: DiseaseConfig,
    #[serde(default)]
    pub patient: PatientConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub infection: InfectionConfig,
    #[serde(default)]
    pub treatment: TreatmentConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseConfig {
    /// Number of entries in the symptom catalog
    #[serde(default = "default_symptom_count")]
    pub symptom_count: usize,
    /// Number of symptoms the plague shows
    #[serde(default = "default_plague_symptom_count")]
    pub plague_symptom_count: usize,
    /// Upper bound of symptoms for a healthy patient; must not exceed symptom_count
    #[serde(default = "default_max_symptom_count")]
    pub max_symptom_count: usize,
    /// Infection chance out of 10 (compared against a draw in 1..10)
    #[serde(default = "default_plague_chance")]
    pub plague_chance: u32,
    /// Seconds each symptom icon lingers
    #[serde(default = "default_icon_time")]
    pub icon_time: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientConfig {
    #[serde(default = "default_cough_time")]
    pub cough_time: f32,
    #[serde(default = "default_patient_count")]
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_speed")]
    pub speed: f32,
    #[serde(default = "default_spawn_min")]
    pub spawn_min: [f32; 2],
    #[serde(default = "default_spawn_max")]
    pub spawn_max: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_sight_range")]
    pub sight_range: f32,
    #[serde(default = "default_num_rays")]
    pub num_rays: usize,
    /// Field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_radius_num_verts")]
    pub radius_num_verts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfectionConfig {
    #[serde(default = "default_infection_time")]
    pub infection_time: f32,
    #[serde(default = "default_trigger_radius")]
    pub trigger_radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentConfig {
    #[serde(default = "default_treat_time")]
    pub treat_time: f32,
    #[serde(default = "default_treat_distance")]
    pub treat_distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_fixed_timestep")]
    pub fixed_timestep: f32,
    #[serde(default = "default_scene")]
    pub scene: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_event_log")]
    pub enable_event_log: bool,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: String,
}

// Default values
fn default_symptom_count() -> usize { 5 }
fn default_plague_symptom_count() -> usize { 3 }
fn default_max_symptom_count() -> usize { 2 }
fn default_plague_chance() -> u32 { 2 }
fn default_icon_time() -> f32 { 1.0 }
fn default_cough_time() -> f32 { 1.0 }
fn default_patient_count() -> usize { 8 }
fn default_player_speed() -> f32 { 5.0 }
fn default_spawn_min() -> [f32; 2] { [11.5, -12.5] }
fn default_spawn_max() -> [f32; 2] { [12.5, -11.5] }
fn default_sight_range() -> f32 { 40.0 }
fn default_num_rays() -> usize { 4 }
fn default_fov() -> f32 { 45.0 }
fn default_radius() -> f32 { 3.0 }
fn default_radius_num_verts() -> usize { 24 }
fn default_infection_time() -> f32 { 3.0 }
fn default_trigger_radius() -> f32 { 1.0 }
fn default_treat_time() -> f32 { 2.0 }
fn default_treat_distance() -> f32 { 1.5 }
fn default_fixed_timestep() -> f32 { 0.02 }
fn default_scene() -> String { "LevelDevSandbox".to_string() }
fn default_enable_event_log() -> bool { true }
fn default_event_log_path() -> String { "event_log.json".to_string() }

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            symptom_count: default_symptom_count(),
            plague_symptom_count: default_plague_symptom_count(),
            max_symptom_count: default_max_symptom_count(),
            plague_chance: default_plague_chance(),
            icon_time: default_icon_time(),
        }
    }
}

impl Default for PatientConfig {
    fn default() -> Self {
        Self {
            cough_time: default_cough_time(),
            count: default_patient_count(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: default_player_speed(),
            spawn_min: default_spawn_min(),
            spawn_max: default_spawn_max(),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            sight_range: default_sight_range(),
            num_rays: default_num_rays(),
            fov: default_fov(),
            radius: default_radius(),
            radius_num_verts: default_radius_num_verts(),
        }
    }
}

impl Default for InfectionConfig {
    fn default() -> Self {
        Self {
            infection_time: default_infection_time(),
            trigger_radius: default_trigger_radius(),
        }
    }
}

impl Default for TreatmentConfig {
    fn default() -> Self {
        Self {
            treat_time: default_treat_time(),
            treat_distance: default_treat_distance(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: default_fixed_timestep(),
            scene: default_scene(),
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_event_log: default_enable_event_log(),
            event_log_path: default_event_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disease: DiseaseConfig::default(),
            patient: PatientConfig::default(),
            player: PlayerConfig::default(),
            vision: VisionConfig::default(),
            infection: InfectionConfig::default(),
            treatment: TreatmentConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from config.toml, or use defaults if it is missing or malformed
    pub fn load() -> Self {
        Self::load_or_default("config.toml")
    }

    /// Lenient variant of `load_from`: any failure logs a warning and yields defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No {} found, using default configuration", path.display());
            return Config::default();
        }

        match Self::load_from(path) {
            Ok(config) => {
                tracing::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make symptom sampling impossible or the
    /// simulation ill-defined.
    pub fn validate(&self) -> Result<()> {
        let d = &self.disease;
        if d.symptom_count == 0 {
            return Err(PlagueError::Config("symptom_count must be at least 1".into()));
        }
        if d.plague_symptom_count > d.symptom_count {
            return Err(PlagueError::Config(format!(
                "plague_symptom_count ({}) exceeds symptom_count ({})",
                d.plague_symptom_count, d.symptom_count
            )));
        }
        if d.max_symptom_count == 0 {
            return Err(PlagueError::Config("max_symptom_count must be at least 1".into()));
        }
        if d.max_symptom_count > d.symptom_count {
            return Err(PlagueError::Config(format!(
                "max_symptom_count ({}) exceeds symptom_count ({})",
                d.max_symptom_count, d.symptom_count
            )));
        }
        if d.plague_chance > 10 {
            return Err(PlagueError::Config(format!(
                "plague_chance ({}) must be within 0..=10",
                d.plague_chance
            )));
        }
        check_range("disease.icon_time", d.icon_time, 0.0, 5.0)?;
        check_non_negative("patient.cough_time", self.patient.cough_time)?;

        let p = &self.player;
        check_range("player.speed", p.speed, 0.0, 50.0)?;
        if !p.spawn_min.iter().chain(&p.spawn_max).all(|v| v.is_finite()) {
            return Err(PlagueError::Config("player spawn area must be finite".into()));
        }

        let v = &self.vision;
        check_range("vision.sight_range", v.sight_range, 0.0, 100.0)?;
        check_range("vision.fov", v.fov, 0.0, 120.0)?;
        check_non_negative("vision.radius", v.radius)?;
        if v.num_rays > MAX_NUM_RAYS {
            return Err(PlagueError::Config(format!(
                "vision.num_rays ({}) must be within 0..={}",
                v.num_rays, MAX_NUM_RAYS
            )));
        }
        if v.radius_num_verts < 3 {
            return Err(PlagueError::Config(format!(
                "radius_num_verts ({}) must be at least 3",
                v.radius_num_verts
            )));
        }

        check_non_negative("infection.infection_time", self.infection.infection_time)?;
        check_non_negative("infection.trigger_radius", self.infection.trigger_radius)?;
        check_non_negative("treatment.treat_time", self.treatment.treat_time)?;
        check_non_negative("treatment.treat_distance", self.treatment.treat_distance)?;

        let step = self.session.fixed_timestep;
        if !step.is_finite() || step <= 0.0 {
            return Err(PlagueError::Config("fixed_timestep must be positive".into()));
        }
        Ok(())
    }
}

const MAX_NUM_RAYS: usize = 50;

/// Finite and within `min..=max`; NaN fails every comparison
fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PlagueError::Config(format!(
            "{} ({}) must be within {}..={}",
            name, value, min, max
        )))
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<()> {
    check_range(name, value, 0.0, f32::MAX)
}
