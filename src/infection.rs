use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfectionState {
    Healthy,
    /// Terminal
    Infected,
}

/// Exposure clock for one player.
///
/// Time accumulates only while in contact with an infected player and is
/// zeroed the moment contact ends; brief separations erase all exposure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfectionTimer {
    pub state: InfectionState,
    pub elapsed: f32,
}

impl Default for InfectionTimer {
    fn default() -> Self {
        InfectionTimer {
            state: InfectionState::Healthy,
            elapsed: 0.0,
        }
    }
}

impl InfectionTimer {
    pub fn infected() -> Self {
        InfectionTimer {
            state: InfectionState::Infected,
            elapsed: 0.0,
        }
    }

    pub fn is_infected(&self) -> bool {
        self.state == InfectionState::Infected
    }

    /// Force the terminal state (treating an infected patient)
    pub fn infect(&mut self) -> bool {
        let changed = !self.is_infected();
        self.state = InfectionState::Infected;
        self.elapsed = 0.0;
        changed
    }

    /// One physics step. Returns true on the Healthy -> Infected transition.
    pub fn advance(&mut self, in_contact: bool, dt: f32, infection_time: f32) -> bool {
        if self.is_infected() {
            return false;
        }

        if !in_contact {
            self.elapsed = 0.0;
            return false;
        }

        self.elapsed += dt;
        if self.elapsed >= infection_time {
            self.infect();
            return true;
        }
        false
    }
}

/// Two circular trigger volumes overlap
pub fn triggers_overlap(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < (radius * 2.0) * (radius * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_until_threshold() {
        let mut timer = InfectionTimer::default();
        assert!(!timer.advance(true, 1.0, 3.0));
        assert!(!timer.advance(true, 1.0, 3.0));
        assert!(timer.advance(true, 1.0, 3.0));
        assert!(timer.is_infected());
    }

    #[test]
    fn test_hard_reset_on_exit() {
        let mut timer = InfectionTimer::default();
        timer.advance(true, 2.9, 3.0);
        timer.advance(false, 0.02, 3.0);
        assert_eq!(timer.elapsed, 0.0);
        assert!(!timer.advance(true, 2.9, 3.0));
        assert!(!timer.is_infected());
    }

    #[test]
    fn test_infection_is_terminal() {
        let mut timer = InfectionTimer::infected();
        for _ in 0..5 {
            assert!(!timer.advance(false, 1.0, 3.0));
        }
        assert!(timer.is_infected());
    }

    #[test]
    fn test_trigger_overlap() {
        assert!(triggers_overlap(Vec2::ZERO, Vec2::new(1.9, 0.0), 1.0));
        assert!(!triggers_overlap(Vec2::ZERO, Vec2::new(2.0, 0.0), 1.0));
    }
}
