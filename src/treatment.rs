use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::infection::InfectionTimer;
use crate::patient::{Patient, PatientId};

/// Euclidean nearest patient, treated or not. `None` when there are none.
pub fn nearest_patient(from: Vec2, patients: &[Patient]) -> Option<PatientId> {
    patients
        .iter()
        .min_by(|a, b| {
            a.position
                .distance_squared(from)
                .total_cmp(&b.position.distance_squared(from))
        })
        .map(|patient| patient.id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentOutcome {
    pub patient: PatientId,
    pub patient_was_infected: bool,
    /// The treating player caught the plague from this patient
    pub player_infected: bool,
}

/// A held interaction against one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    pub target: PatientId,
    pub elapsed: f32,
    pub finished: bool,
}

impl Treatment {
    /// Pick the nearest patient; only start if it is close enough and untreated.
    pub fn begin(from: Vec2, patients: &[Patient], treat_distance: f32) -> Option<Self> {
        let target = nearest_patient(from, patients)?;
        let patient = patients.iter().find(|p| p.id == target)?;

        if patient.treated || patient.position.distance(from) > treat_distance {
            return None;
        }

        Some(Treatment {
            target,
            elapsed: 0.0,
            finished: false,
        })
    }

    /// Accumulate toward `treat_time`. On the step that reaches it, the
    /// patient is cleared and its infection carried over to the player.
    /// Every later call returns `None`.
    pub fn advance(
        &mut self,
        dt: f32,
        treat_time: f32,
        patient: &mut Patient,
        player: &mut InfectionTimer,
    ) -> Option<TreatmentOutcome> {
        if self.finished {
            return None;
        }

        self.elapsed += dt;
        if self.elapsed < treat_time {
            return None;
        }

        self.finished = true;
        if !patient.clear_symptoms() {
            return None;
        }

        let player_infected = patient.is_infected && player.infect();
        Some(TreatmentOutcome {
            patient: patient.id,
            patient_was_infected: patient.is_infected,
            player_infected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disease::SymptomSet;
    use crate::symptoms::PlagueSignature;
    use std::sync::Arc;

    fn healthy(id: u32, x: f32) -> Patient {
        Patient::with_symptoms(PatientId(id), Vec2::new(x, 0.0), SymptomSet::Ordinary(vec![0]))
    }

    fn infected(id: u32, x: f32) -> Patient {
        let signature = Arc::new(PlagueSignature::from_symptoms(vec![1, 2]));
        Patient::with_symptoms(PatientId(id), Vec2::new(x, 0.0), SymptomSet::Plague(signature))
    }

    #[test]
    fn test_nearest_patient() {
        let patients = vec![healthy(0, 5.0), healthy(1, -2.0), healthy(2, 3.0)];
        assert_eq!(nearest_patient(Vec2::ZERO, &patients), Some(PatientId(1)));
        assert_eq!(nearest_patient(Vec2::ZERO, &[]), None);
    }

    #[test]
    fn test_begin_requires_proximity() {
        let patients = vec![healthy(0, 3.0)];
        assert!(Treatment::begin(Vec2::ZERO, &patients, 1.5).is_none());
        assert!(Treatment::begin(Vec2::new(2.0, 0.0), &patients, 1.5).is_some());
    }

    #[test]
    fn test_begin_skips_treated_nearest() {
        let mut patients = vec![healthy(0, 1.0), healthy(1, 1.2)];
        patients[0].clear_symptoms();
        // nearest is already treated, so nothing starts
        assert!(Treatment::begin(Vec2::ZERO, &patients, 1.5).is_none());
    }

    #[test]
    fn test_completion_infects_player_once() {
        let mut patient = infected(4, 1.0);
        let mut player = InfectionTimer::default();
        let mut treatment = Treatment::begin(Vec2::ZERO, std::slice::from_ref(&patient), 1.5).unwrap();

        assert!(treatment.advance(1.0, 2.0, &mut patient, &mut player).is_none());
        let outcome = treatment.advance(1.0, 2.0, &mut patient, &mut player).unwrap();
        assert_eq!(
            outcome,
            TreatmentOutcome {
                patient: PatientId(4),
                patient_was_infected: true,
                player_infected: true,
            }
        );
        assert!(patient.treated);
        assert!(player.is_infected());

        assert!(treatment.advance(1.0, 2.0, &mut patient, &mut player).is_none());
    }

    #[test]
    fn test_healthy_patient_leaves_player_healthy() {
        let mut patient = healthy(0, 0.5);
        let mut player = InfectionTimer::default();
        let mut treatment = Treatment::begin(Vec2::ZERO, std::slice::from_ref(&patient), 1.5).unwrap();

        let outcome = treatment.advance(5.0, 2.0, &mut patient, &mut player).unwrap();
        assert!(!outcome.player_infected);
        assert!(!player.is_infected());
        assert!(patient.treated);
    }
}
