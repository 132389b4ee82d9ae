use glam::Vec2;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::disease::{Disease, SymptomSet};
use crate::error::Result;
use crate::infection::InfectionTimer;
use crate::patient::{Patient, PatientId};
use crate::player::{Player, PlayerColour, PlayerId};
use crate::raycast::Level;
use crate::session::Session;
use crate::symptoms::{PlagueSignature, SymptomId};

/// Save state containing the level, the drawn plague and every entity
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveState {
    pub seed: u64,
    /// Generator position at save time
    pub rng: ChaCha8Rng,
    pub config: Config,
    pub level: Level,
    pub plague: PlagueSignature,
    pub patients: Vec<PatientSaveData>,
    pub players: Vec<PlayerSaveData>,
}

/// Patient data without display timers
#[derive(Debug, Serialize, Deserialize)]
pub struct PatientSaveData {
    pub id: PatientId,
    pub position: Vec2,
    pub is_infected: bool,
    pub treated: bool,
    pub symptoms: Vec<SymptomId>,
}

/// Player data without in-progress treatment or vision
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerSaveData {
    pub id: PlayerId,
    pub position: Vec2,
    pub rotation: f32,
    pub speed: f32,
    pub colour: PlayerColour,
    pub is_owner: bool,
    pub infection: InfectionTimer,
}

impl SaveState {
    pub fn from_session(session: &Session) -> Self {
        let patients = session
            .patients
            .iter()
            .map(|patient| PatientSaveData {
                id: patient.id,
                position: patient.position,
                is_infected: patient.is_infected,
                treated: patient.treated,
                symptoms: patient.symptoms().ids().to_vec(),
            })
            .collect();

        let players = session
            .players
            .iter()
            .map(|player| PlayerSaveData {
                id: player.id,
                position: player.position,
                rotation: player.rotation,
                speed: player.speed,
                colour: player.colour,
                is_owner: player.is_owner,
                infection: player.infection,
            })
            .collect();

        SaveState {
            seed: session.seed,
            rng: session.rng.clone(),
            config: session.config.clone(),
            level: session.level.clone(),
            plague: session.disease.plague.as_ref().clone(),
            patients,
            players,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Rebuild a session. Infected patients share the restored signature again.
    pub fn restore(self) -> Result<Session> {
        self.config.validate()?;
        let disease = Disease::with_signature(self.config.disease.clone(), self.plague);

        let patients = self
            .patients
            .into_iter()
            .map(|data| {
                let symptoms = if data.is_infected {
                    SymptomSet::Plague(Arc::clone(&disease.plague))
                } else {
                    SymptomSet::Ordinary(data.symptoms)
                };
                let mut patient = Patient::with_symptoms(data.id, data.position, symptoms);
                patient.treated = data.treated;
                patient
            })
            .collect();

        let players = self
            .players
            .into_iter()
            .map(|data| {
                let mut player = Player::new(data.id, data.position, data.speed);
                player.rotation = data.rotation;
                player.colour = data.colour;
                player.is_owner = data.is_owner;
                player.infection = data.infection;
                player
            })
            .collect();

        Ok(Session::from_parts(self.config, disease, self.level, patients, players, self.seed, self.rng))
    }
}
