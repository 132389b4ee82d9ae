use thiserror::Error;

use crate::patient::PatientId;
use crate::player::PlayerId;

#[derive(Error, Debug)]
pub enum PlagueError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Patient not found: {0:?}")]
    PatientNotFound(PatientId),

    #[error("Player not found: {0:?}")]
    PlayerNotFound(PlayerId),

    #[error("Lobby error: {0}")]
    Lobby(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlagueError>;
