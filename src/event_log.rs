use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::session::{GameEvent, InfectionCause};

/// Game event stamped with the simulation time it happened at
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Simulated milliseconds since session start
    pub timestamp_ms: u64,
    pub event: GameEvent,
}

/// Event recorder
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick's events at simulation time `time` (seconds)
    pub fn record(&mut self, time: f32, events: &[GameEvent]) {
        let timestamp_ms = (time.max(0.0) * 1000.0).round() as u64;
        self.events.extend(events.iter().cloned().map(|event| LoggedEvent { timestamp_ms, event }));
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let events = serde_json::from_str(&json)?;
        Ok(EventLog { events })
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut coughs = 0;
        let mut treatments_started = 0;
        let mut treated = 0;
        let mut plague_found = 0;
        let mut proximity_infections = 0;
        let mut treatment_infections = 0;

        for logged in &self.events {
            match &logged.event {
                GameEvent::PatientCoughed { .. } => coughs += 1,
                GameEvent::TreatmentStarted { .. } => treatments_started += 1,
                GameEvent::PatientTreated { was_infected, .. } => {
                    treated += 1;
                    if *was_infected {
                        plague_found += 1;
                    }
                }
                GameEvent::PlayerInfected { cause, .. } => match cause {
                    InfectionCause::Proximity => proximity_infections += 1,
                    InfectionCause::Treatment(_) => treatment_infections += 1,
                },
            }
        }

        let duration = self.events.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Session Duration: {}ms\n\
             Total Events: {}\n\
             Patients: {} treated of {} treatments started ({} had the plague), {} coughs\n\
             Infections: {} by proximity, {} by treatment",
            duration,
            self.events.len(),
            treated,
            treatments_started,
            plague_found,
            coughs,
            proximity_infections,
            treatment_infections
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::PatientId;
    use crate::player::PlayerId;

    #[test]
    fn test_summary_counts() {
        let mut log = EventLog::new();
        log.record(0.5, &[GameEvent::PatientCoughed { patient: PatientId(0) }]);
        log.record(
            2.0,
            &[
                GameEvent::PatientTreated {
                    player: PlayerId(0),
                    patient: PatientId(0),
                    was_infected: true,
                },
                GameEvent::PlayerInfected {
                    player: PlayerId(0),
                    cause: InfectionCause::Treatment(PatientId(0)),
                },
            ],
        );

        assert_eq!(log.events().len(), 3);
        assert_eq!(log.events()[1].timestamp_ms, 2000);
        let summary = log.summary();
        assert!(summary.contains("Session Duration: 2000ms"));
        assert!(summary.contains("1 had the plague"));
        assert!(summary.contains("0 by proximity, 1 by treatment"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");

        let mut log = EventLog::new();
        log.record(1.25, &[GameEvent::PatientCoughed { patient: PatientId(3) }]);
        log.save_to_file(&path).unwrap();

        let loaded = EventLog::load_from_file(&path).unwrap();
        assert_eq!(loaded.events(), log.events());
    }
}
