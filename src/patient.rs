use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::disease::{Disease, SymptomSet};
use crate::error::Result;
use crate::symptoms::SymptomId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(pub u32);

/// A patient waiting to be diagnosed. Symptoms are assigned once at spawn.
#[derive(Debug, Clone)]
pub struct Patient {
    pub id: PatientId,
    pub position: Vec2,
    pub is_infected: bool,
    pub treated: bool,
    symptoms: SymptomSet,
    /// Which of the patient's symptoms is currently displayed
    icon_counter: usize,
    icon_timer: f32,
    cough_timer: f32,
}

impl Patient {
    pub fn spawn<R: Rng + ?Sized>(id: PatientId, position: Vec2, disease: &Disease, rng: &mut R) -> Result<Self> {
        let symptoms = disease.assign(rng)?;
        let patient = Self::with_symptoms(id, position, symptoms);
        tracing::debug!(
            patient = id.0,
            infected = patient.is_infected,
            symptoms = ?patient.symptoms.ids(),
            "Patient spawned"
        );
        Ok(patient)
    }

    pub fn with_symptoms(id: PatientId, position: Vec2, symptoms: SymptomSet) -> Self {
        Patient {
            id,
            position,
            is_infected: symptoms.is_plague(),
            treated: false,
            symptoms,
            icon_counter: 0,
            icon_timer: 0.0,
            cough_timer: 0.0,
        }
    }

    pub fn symptoms(&self) -> &SymptomSet {
        &self.symptoms
    }

    /// The symptom whose icon is shown right now; nothing once treated
    pub fn displayed_symptom(&self) -> Option<SymptomId> {
        if self.treated {
            return None;
        }
        self.symptoms.ids().get(self.icon_counter).copied()
    }

    /// Advance icon cycling and the cough cue. Returns true when the patient coughs.
    pub fn tick(&mut self, dt: f32, icon_time: f32, cough_time: f32) -> bool {
        if self.treated {
            return false;
        }

        if self.icon_counter >= self.symptoms.len() {
            self.icon_counter = 0;
        }
        if self.icon_timer < icon_time {
            self.icon_timer += dt;
        } else {
            self.icon_timer = 0.0;
            self.icon_counter = (self.icon_counter + 1) % self.symptoms.len().max(1);
        }

        if self.cough_timer < cough_time {
            self.cough_timer += dt;
            false
        } else {
            self.cough_timer = 0.0;
            true
        }
    }

    /// Mark treated and hide symptoms. Returns false if already treated.
    pub fn clear_symptoms(&mut self) -> bool {
        if self.treated {
            return false;
        }
        self.treated = true;
        true
    }
}
