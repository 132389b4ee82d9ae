mod common;

use common::{open_session, seeded_config};
use glam::Vec2;
use plaguedoctor::disease::SymptomSet;
use plaguedoctor::session::InfectionCause;
use plaguedoctor::{GameEvent, Level, PlagueError, PlayerId, PlayerInput, Session};
use std::collections::HashMap;
use std::sync::Arc;

fn no_input() -> HashMap<PlayerId, PlayerInput> {
    HashMap::new()
}

fn without_coughs(events: Vec<GameEvent>) -> Vec<GameEvent> {
    events
        .into_iter()
        .filter(|e| !matches!(e, GameEvent::PatientCoughed { .. }))
        .collect()
}

#[test]
fn every_infected_patient_shares_the_session_plague() {
    let mut config = seeded_config(21);
    config.disease.plague_chance = 10;
    let mut session = open_session(config);

    for i in 0..20 {
        session.spawn_patient(Vec2::new(i as f32, 0.0)).unwrap();
    }

    for patient in &session.patients {
        assert!(patient.is_infected);
        match patient.symptoms() {
            SymptomSet::Plague(signature) => assert!(Arc::ptr_eq(signature, &session.disease.plague)),
            other => panic!("infected patient carries {:?}", other),
        }
    }
    assert_eq!(session.disease.plague.len(), 3);
}

#[test]
fn healthy_patients_get_bounded_distinct_symptoms() {
    let mut config = seeded_config(8);
    config.disease.plague_chance = 0;
    config.disease.symptom_count = 6;
    config.disease.max_symptom_count = 4;
    let mut session = open_session(config);

    for i in 0..50 {
        session.spawn_patient(Vec2::new(0.0, i as f32)).unwrap();
    }

    for patient in &session.patients {
        let ids = patient.symptoms().ids();
        assert!(!patient.is_infected);
        assert!((1..=4).contains(&ids.len()));
        assert!(ids.iter().all(|&id| id < 6));
        let mut sorted = ids.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }
}

#[test]
fn same_seed_draws_same_plague() {
    let a = open_session(seeded_config(1234));
    let b = open_session(seeded_config(1234));
    assert_eq!(a.disease.plague, b.disease.plague);
}

#[test]
fn invalid_config_is_rejected_at_startup() {
    let mut config = seeded_config(1);
    config.disease.plague_symptom_count = 9;
    let result = Session::new(config, Level::open());
    assert!(matches!(result, Err(PlagueError::Config(_))));
}

#[test]
fn proximity_infects_after_infection_time() {
    let mut session = open_session(seeded_config(2));
    let carrier = session.add_player_at(Vec2::ZERO);
    let healthy = session.add_player_at(Vec2::new(1.0, 0.0));
    session.player_mut(carrier).unwrap().infection.infect();

    for _ in 0..5 {
        let events = session.advance_physics(0.5, &no_input());
        assert!(without_coughs(events).is_empty());
    }
    assert!(!session.player(healthy).unwrap().is_infected());

    let events = without_coughs(session.advance_physics(0.5, &no_input()));
    assert_eq!(
        events,
        vec![GameEvent::PlayerInfected {
            player: healthy,
            cause: InfectionCause::Proximity,
        }]
    );
    assert!(session.player(healthy).unwrap().is_infected());
}

#[test]
fn leaving_contact_resets_exposure_to_zero() {
    let mut session = open_session(seeded_config(3));
    let carrier = session.add_player_at(Vec2::ZERO);
    let healthy = session.add_player_at(Vec2::new(1.0, 0.0));
    session.player_mut(carrier).unwrap().infection.infect();

    for _ in 0..5 {
        session.advance_physics(0.5, &no_input());
    }
    assert_eq!(session.player(healthy).unwrap().infection.elapsed, 2.5);

    session.player_mut(healthy).unwrap().position = Vec2::new(10.0, 0.0);
    session.advance_physics(0.02, &no_input());
    assert_eq!(session.player(healthy).unwrap().infection.elapsed, 0.0);

    session.player_mut(healthy).unwrap().position = Vec2::new(1.0, 0.0);
    for _ in 0..5 {
        session.advance_physics(0.5, &no_input());
    }
    assert!(!session.player(healthy).unwrap().is_infected());
}

#[test]
fn treating_an_infected_patient_infects_the_doctor_once() {
    let mut config = seeded_config(4);
    config.disease.plague_chance = 10;
    let mut session = open_session(config);
    let patient = session.spawn_patient(Vec2::new(1.0, 0.0)).unwrap();
    let doctor = session.add_player_at(Vec2::ZERO);

    let mut inputs = HashMap::new();
    inputs.insert(
        doctor,
        PlayerInput {
            axis: Vec2::new(1.0, 1.0),
            aim: None,
            treat_pressed: true,
        },
    );

    let events = without_coughs(session.advance_physics(0.5, &inputs));
    assert_eq!(events, vec![GameEvent::TreatmentStarted { player: doctor, patient }]);
    assert!(session.player(doctor).unwrap().is_treating());
    // movement is suspended while treating
    assert_eq!(session.player(doctor).unwrap().position, Vec2::ZERO);

    inputs.get_mut(&doctor).unwrap().treat_pressed = false;
    for _ in 0..2 {
        assert!(without_coughs(session.advance_physics(0.5, &inputs)).is_empty());
    }

    let events = without_coughs(session.advance_physics(0.5, &inputs));
    assert_eq!(
        events,
        vec![
            GameEvent::PatientTreated {
                player: doctor,
                patient,
                was_infected: true,
            },
            GameEvent::PlayerInfected {
                player: doctor,
                cause: InfectionCause::Treatment(patient),
            },
        ]
    );
    assert!(session.patient(patient).unwrap().treated);
    assert!(session.player(doctor).unwrap().is_infected());
    assert!(!session.player(doctor).unwrap().is_treating());

    // a second key press finds the patient already treated
    inputs.get_mut(&doctor).unwrap().treat_pressed = true;
    let events = session.advance_physics(0.5, &inputs);
    assert!(events.is_empty());
    assert_eq!(session.patient(patient).unwrap().displayed_symptom(), None);
}

#[test]
fn treat_key_without_patients_is_a_no_op() {
    let mut session = open_session(seeded_config(5));
    let doctor = session.add_player_at(Vec2::ZERO);

    let mut inputs = HashMap::new();
    inputs.insert(
        doctor,
        PlayerInput {
            axis: Vec2::X,
            aim: None,
            treat_pressed: true,
        },
    );
    let events = session.advance_physics(1.0, &inputs);

    assert!(events.is_empty());
    let player = session.player(doctor).unwrap();
    assert!(!player.is_treating());
    assert_eq!(player.position, Vec2::new(5.0, 0.0));
}

#[test]
fn treatment_of_a_removed_patient_is_dropped() {
    let mut session = open_session(seeded_config(6));
    session.spawn_patient(Vec2::new(1.0, 0.0)).unwrap();
    let doctor = session.add_player_at(Vec2::ZERO);

    let mut inputs = HashMap::new();
    inputs.insert(
        doctor,
        PlayerInput {
            axis: Vec2::X,
            aim: None,
            treat_pressed: true,
        },
    );
    session.advance_physics(0.5, &inputs);
    assert!(session.player(doctor).unwrap().is_treating());

    session.patients.clear();
    inputs.get_mut(&doctor).unwrap().treat_pressed = false;
    let events = session.advance_physics(0.5, &inputs);

    assert!(events.is_empty());
    assert!(!session.player(doctor).unwrap().is_treating());
    // walking resumes on the next step
    session.advance_physics(0.5, &inputs);
    assert!(session.player(doctor).unwrap().position.x > 0.0);
}

#[test]
fn restart_rediagnoses_and_heals() {
    let mut session = open_session(seeded_config(6));
    // an open level has no floor cells to scatter onto
    assert!(session.scatter_patients(4).is_err());
    for i in 0..4 {
        session.spawn_patient(Vec2::new(i as f32 * 3.0, 0.0)).unwrap();
    }
    let doctor = session.add_player_at(Vec2::ZERO);
    session.player_mut(doctor).unwrap().infection.infect();
    session.advance_physics(1.0, &no_input());

    session.restart().unwrap();

    assert_eq!(session.patients.len(), 4);
    assert_eq!(session.patients[3].position, Vec2::new(9.0, 0.0));
    assert!(!session.player(doctor).unwrap().is_infected());
    assert_eq!(session.time, 0.0);
}
