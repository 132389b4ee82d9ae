//! One game session: the disease drawn for it, the level, and every patient
//! and player. The driver calls `advance_physics` at a fixed rate and
//! `render_tick` once per drawn frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::Config;
use crate::disease::Disease;
use crate::error::{PlagueError, Result};
use crate::infection::triggers_overlap;
use crate::patient::{Patient, PatientId};
use crate::player::{Player, PlayerId, PlayerInput};
use crate::raycast::Level;
use crate::treatment::Treatment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PatientCoughed { patient: PatientId },
    TreatmentStarted { player: PlayerId, patient: PatientId },
    PatientTreated { player: PlayerId, patient: PatientId, was_infected: bool },
    PlayerInfected { player: PlayerId, cause: InfectionCause },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfectionCause {
    /// Stayed too long next to an infected player
    Proximity,
    /// Treated an infected patient
    Treatment(PatientId),
}

pub struct Session {
    pub config: Config,
    pub disease: Disease,
    pub level: Level,
    pub patients: Vec<Patient>,
    pub players: Vec<Player>,
    /// Simulated seconds
    pub time: f32,
    pub frames_rendered: u64,
    pub seed: u64,
    pub(crate) rng: ChaCha8Rng,
    next_player_id: u32,
}

impl Session {
    /// Validate the config and draw this session's plague signature
    pub fn new(config: Config, level: Level) -> Result<Self> {
        config.validate()?;

        let seed = config.session.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let disease = Disease::new(config.disease.clone(), &mut rng)?;
        tracing::info!(seed, scene = %config.session.scene, "Session started");

        Ok(Session {
            config,
            disease,
            level,
            patients: Vec::new(),
            players: Vec::new(),
            time: 0.0,
            frames_rendered: 0,
            seed,
            rng,
            next_player_id: 0,
        })
    }

    /// Restore a session around previously saved state. `rng` continues the
    /// saved stream, so later draws do not repeat earlier ones.
    pub fn from_parts(
        config: Config,
        disease: Disease,
        level: Level,
        patients: Vec<Patient>,
        players: Vec<Player>,
        seed: u64,
        rng: ChaCha8Rng,
    ) -> Self {
        let next_player_id = players.iter().map(|p| p.id.0 + 1).max().unwrap_or(0);
        Session {
            config,
            disease,
            level,
            patients,
            players,
            time: 0.0,
            frames_rendered: 0,
            seed,
            rng,
            next_player_id,
        }
    }

    pub fn spawn_patient(&mut self, position: Vec2) -> Result<PatientId> {
        let id = PatientId(self.patients.len() as u32);
        let patient = Patient::spawn(id, position, &self.disease, &mut self.rng)?;
        self.patients.push(patient);
        Ok(id)
    }

    /// Place `count` patients at the centres of random floor cells
    pub fn scatter_patients(&mut self, count: usize) -> Result<Vec<PatientId>> {
        let grid = &self.level.grid;
        let floor: Vec<(i32, i32)> = (0..grid.rows)
            .flat_map(|y| (0..grid.cols).map(move |x| (x, y)))
            .filter(|&(x, y)| !grid.is_blocked(x, y))
            .collect();
        if floor.is_empty() {
            return Err(PlagueError::Config("level has no floor to place patients on".into()));
        }

        let half_cell = Vec2::splat(self.level.cell_size * 0.5);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let (x, y) = floor[self.rng.gen_range(0..floor.len())];
            let position = self.level.cell_origin(x, y) + half_cell;
            ids.push(self.spawn_patient(position)?);
        }
        Ok(ids)
    }

    /// Spawn a player in the configured spawn area
    pub fn add_player(&mut self, is_owner: bool) -> PlayerId {
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        let player = Player::spawn(id, &self.config.player, is_owner, &mut self.rng);
        self.players.push(player);
        id
    }

    pub fn add_player_at(&mut self, position: Vec2) -> PlayerId {
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        self.players.push(Player::new(id, position, self.config.player.speed));
        id
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(PlagueError::PlayerNotFound(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PlagueError::PlayerNotFound(id))
    }

    pub fn patient(&self, id: PatientId) -> Result<&Patient> {
        self.patients
            .iter()
            .find(|p| p.id == id)
            .ok_or(PlagueError::PatientNotFound(id))
    }

    /// Start over with a freshly drawn plague. Patients keep their positions
    /// but are re-diagnosed; players are healed and stop treating.
    pub fn restart(&mut self) -> Result<()> {
        self.disease = Disease::new(self.config.disease.clone(), &mut self.rng)?;
        let positions: Vec<Vec2> = self.patients.iter().map(|p| p.position).collect();
        self.patients.clear();
        for position in positions {
            self.spawn_patient(position)?;
        }
        for player in &mut self.players {
            player.infection = Default::default();
            player.treatment = None;
        }
        self.time = 0.0;
        tracing::info!("Session restarted");
        Ok(())
    }

    /// Fixed-rate step: input, treatment, proximity infection, vision
    /// polygons and patient cues.
    pub fn advance_physics(&mut self, dt: f32, inputs: &HashMap<PlayerId, PlayerInput>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let treat_distance = self.config.treatment.treat_distance;
        let treat_time = self.config.treatment.treat_time;

        for player in &mut self.players {
            let input = inputs.get(&player.id).copied().unwrap_or_default();

            if input.treat_pressed && !player.is_treating() {
                if let Some(treatment) = Treatment::begin(player.position, &self.patients, treat_distance) {
                    events.push(GameEvent::TreatmentStarted {
                        player: player.id,
                        patient: treatment.target,
                    });
                    player.treatment = Some(treatment);
                }
            }

            player.apply_movement(input.axis, dt);
            if let Some(aim) = input.aim {
                player.face_towards(aim);
            }

            // a treatment whose patient is gone is dropped
            if let Some(mut treatment) = player.treatment.take() {
                let Some(patient) = self.patients.iter_mut().find(|p| p.id == treatment.target) else {
                    tracing::debug!(player = player.id.0, patient = treatment.target.0, "Treatment dropped, patient is gone");
                    continue;
                };
                if let Some(outcome) = treatment.advance(dt, treat_time, patient, &mut player.infection) {
                    events.push(GameEvent::PatientTreated {
                        player: player.id,
                        patient: outcome.patient,
                        was_infected: outcome.patient_was_infected,
                    });
                    if outcome.player_infected {
                        events.push(GameEvent::PlayerInfected {
                            player: player.id,
                            cause: InfectionCause::Treatment(outcome.patient),
                        });
                    }
                }
                if !treatment.finished {
                    player.treatment = Some(treatment);
                }
            }
        }

        // Exposure reads a snapshot of who was infected before this pass
        let carriers: Vec<(PlayerId, Vec2)> = self
            .players
            .iter()
            .filter(|p| p.is_infected())
            .map(|p| (p.id, p.position))
            .collect();
        let infection = &self.config.infection;
        for player in &mut self.players {
            let in_contact = carriers
                .iter()
                .any(|&(id, pos)| id != player.id && triggers_overlap(player.position, pos, infection.trigger_radius));
            if player.infection.advance(in_contact, dt, infection.infection_time) {
                events.push(GameEvent::PlayerInfected {
                    player: player.id,
                    cause: InfectionCause::Proximity,
                });
            }
        }

        for player in &mut self.players {
            player.rebuild_vision(&self.config.vision, &self.level);
        }

        let icon_time = self.config.disease.icon_time;
        let cough_time = self.config.patient.cough_time;
        for patient in &mut self.patients {
            if patient.tick(dt, icon_time, cough_time) {
                events.push(GameEvent::PatientCoughed { patient: patient.id });
            }
        }

        self.time += dt;
        for event in &events {
            tracing::debug!(time = self.time, ?event, "Game event");
        }
        events
    }

    /// Per-frame step: re-triangulate the latest vision polygons
    pub fn render_tick(&mut self, _dt: f32) {
        for player in &mut self.players {
            player.viewer.rebuild_meshes();
        }
        self.frames_rendered += 1;
    }
}

/// Turns variable frame times into a whole number of fixed physics steps
#[derive(Debug, Clone)]
pub struct FixedStepper {
    pub step: f32,
    accumulator: f32,
    /// Drop backlog beyond this many steps per frame
    max_steps: u32,
}

impl FixedStepper {
    pub fn new(step: f32) -> Self {
        FixedStepper {
            step,
            accumulator: 0.0,
            max_steps: 8,
        }
    }

    /// How many physics steps to run for a frame lasting `frame_dt`
    pub fn steps_for(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps {
            self.accumulator = 0.0;
        }
        steps
    }
}
