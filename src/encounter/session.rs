//! Per-session bookkeeping and the hunt state machine.

use super::types::{EncounterError, HuntState};

/// Counters for the current session.
///
/// `Idle → Running → RareFound → Running` (on continue, counters reset);
/// shutdown returns to `Idle` from anywhere.
#[derive(Debug, Clone, Default)]
pub struct HuntSession {
    state: HuntState,
    encounters: u64,
}

impl HuntSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HuntState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == HuntState::Running
    }

    /// Encounters since the session started or last continued.
    pub fn encounters(&self) -> u64 {
        self.encounters
    }

    pub fn start(&mut self) -> Result<(), EncounterError> {
        if self.state != HuntState::Idle {
            return Err(EncounterError::InvalidTransition {
                action: "start",
                state: self.state,
            });
        }
        self.reset_counters();
        self.state = HuntState::Running;
        Ok(())
    }

    /// Resume after a rare find; counters start over.
    pub fn continue_hunt(&mut self) -> Result<(), EncounterError> {
        if self.state != HuntState::RareFound {
            return Err(EncounterError::InvalidTransition {
                action: "continue",
                state: self.state,
            });
        }
        self.reset_counters();
        self.state = HuntState::Running;
        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.state = HuntState::Idle;
    }

    /// Counts one encounter and returns its sequence number.
    pub(crate) fn record_encounter(&mut self) -> Result<u64, EncounterError> {
        if self.state != HuntState::Running {
            return Err(EncounterError::InvalidTransition {
                action: "step",
                state: self.state,
            });
        }
        self.encounters += 1;
        Ok(self.encounters)
    }

    pub(crate) fn mark_rare_found(&mut self) {
        self.state = HuntState::RareFound;
    }

    fn reset_counters(&mut self) {
        self.encounters = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let mut session = HuntSession::new();
        assert_eq!(session.state(), HuntState::Idle);

        session.start().unwrap();
        assert_eq!(session.record_encounter(), Ok(1));
        assert_eq!(session.record_encounter(), Ok(2));

        session.mark_rare_found();
        assert_eq!(session.state(), HuntState::RareFound);
        assert_eq!(session.encounters(), 2);

        session.continue_hunt().unwrap();
        assert!(session.is_running());
        assert_eq!(session.encounters(), 0);

        session.shutdown();
        assert_eq!(session.state(), HuntState::Idle);
    }

    #[test]
    fn test_cannot_step_unless_running() {
        let mut session = HuntSession::new();
        assert!(matches!(
            session.record_encounter(),
            Err(EncounterError::InvalidTransition { action: "step", .. })
        ));

        session.start().unwrap();
        session.mark_rare_found();
        assert!(session.record_encounter().is_err());
    }

    #[test]
    fn test_continue_only_after_rare_find() {
        let mut session = HuntSession::new();
        assert!(session.continue_hunt().is_err());
        session.start().unwrap();
        assert!(session.continue_hunt().is_err());
        assert!(session.start().is_err());
    }

    #[test]
    fn test_shutdown_from_any_state() {
        let mut session = HuntSession::new();
        session.shutdown();
        assert_eq!(session.state(), HuntState::Idle);

        session.start().unwrap();
        session.mark_rare_found();
        session.shutdown();
        assert_eq!(session.state(), HuntState::Idle);
        // A fresh start is allowed again
        session.start().unwrap();
    }
}
