//! Production line state transitions.
//!
//! Idle ↔ Running → Maintenance → Running, Running → Error (terminal).
//!
//! The table is the only place `MachineState` changes. `ProductionLine`
//! drives it while holding the line lock.

use prodline_common::state::MachineState;

/// Result of a transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition succeeded, carrying the new state.
    Ok(MachineState),
    /// Transition rejected, with the reason.
    Rejected(&'static str),
}

impl TransitionResult {
    /// True if the transition was applied.
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

/// Event that can trigger a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    /// Control command: begin production.
    Start,
    /// Control command: end production.
    Stop,
    /// Uptime since last maintenance reached the configured interval.
    MaintenanceDue,
    /// Maintenance routine finished.
    MaintenanceComplete,
    /// Error count exceeded the fault threshold.
    CycleFault,
}

/// Holder of the current state.
#[derive(Debug, Clone)]
pub struct LineStateMachine {
    state: MachineState,
}

impl LineStateMachine {
    /// Create a new state machine in Idle state.
    pub const fn new() -> Self {
        Self {
            state: MachineState::Idle,
        }
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> MachineState {
        self.state
    }

    /// Attempt a transition given an event.
    pub fn handle_event(&mut self, event: LineEvent) -> TransitionResult {
        use LineEvent::*;
        use MachineState::*;

        let next = match (self.state, event) {
            (Idle, Start) => Running,
            (Running, Stop) => Idle,
            (Running, MaintenanceDue) => Maintenance,
            (Maintenance, MaintenanceComplete) => Running,
            (Running, CycleFault) => Error,
            _ => return TransitionResult::Rejected(invalid_transition_reason(self.state, event)),
        };

        self.state = next;
        TransitionResult::Ok(next)
    }

    /// True if production cycles may execute.
    #[inline]
    pub const fn allows_production(&self) -> bool {
        matches!(self.state, MachineState::Running)
    }
}

impl Default for LineStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid_transition_reason(state: MachineState, event: LineEvent) -> &'static str {
    use LineEvent::*;
    use MachineState::*;
    match (state, event) {
        (Error, _) => "Error: terminal, line must be rebuilt",
        (_, Start) => "Start: line not Idle",
        (_, Stop) => "Stop: line not Running",
        (_, MaintenanceDue) => "MaintenanceDue: line not Running",
        (_, MaintenanceComplete) => "MaintenanceComplete: line not in Maintenance",
        (_, CycleFault) => "CycleFault: line not Running",
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use LineEvent::*;
    use MachineState::*;
    use proptest::prelude::*;

    #[test]
    fn initial_state_is_idle() {
        let sm = LineStateMachine::new();
        assert_eq!(sm.state(), Idle);
    }

    #[test]
    fn start_stop_cycle() {
        let mut sm = LineStateMachine::new();
        assert_eq!(sm.handle_event(Start), TransitionResult::Ok(Running));
        assert_eq!(sm.handle_event(Stop), TransitionResult::Ok(Idle));
        assert_eq!(sm.handle_event(Start), TransitionResult::Ok(Running));
    }

    #[test]
    fn double_start_rejected() {
        let mut sm = LineStateMachine::new();
        sm.handle_event(Start);
        assert!(matches!(sm.handle_event(Start), TransitionResult::Rejected(_)));
        assert_eq!(sm.state(), Running);
    }

    #[test]
    fn stop_from_idle_rejected() {
        let mut sm = LineStateMachine::new();
        assert!(matches!(sm.handle_event(Stop), TransitionResult::Rejected(_)));
        assert_eq!(sm.state(), Idle);
    }

    #[test]
    fn maintenance_round_trip() {
        let mut sm = LineStateMachine { state: Running };
        assert_eq!(sm.handle_event(MaintenanceDue), TransitionResult::Ok(Maintenance));
        assert!(!sm.allows_production());
        assert!(matches!(sm.handle_event(Stop), TransitionResult::Rejected(_)));
        assert_eq!(
            sm.handle_event(MaintenanceComplete),
            TransitionResult::Ok(Running)
        );
        assert!(sm.allows_production());
    }

    #[test]
    fn fault_only_from_running() {
        let mut sm = LineStateMachine { state: Idle };
        assert!(matches!(sm.handle_event(CycleFault), TransitionResult::Rejected(_)));

        sm.state = Running;
        assert_eq!(sm.handle_event(CycleFault), TransitionResult::Ok(Error));
    }

    #[test]
    fn error_is_terminal() {
        for event in [Start, Stop, MaintenanceDue, MaintenanceComplete, CycleFault] {
            let mut sm = LineStateMachine { state: Error };
            assert_eq!(
                sm.handle_event(event),
                TransitionResult::Rejected("Error: terminal, line must be rebuilt"),
                "{event:?} must not leave Error"
            );
            assert_eq!(sm.state(), Error);
        }
    }

    proptest! {
        #[test]
        fn start_stop_sequences_follow_table(commands in prop::collection::vec(any::<bool>(), 0..64)) {
            let mut sm = LineStateMachine::new();
            for is_start in commands {
                let before = sm.state();
                let event = if is_start { Start } else { Stop };
                let result = sm.handle_event(event);
                let after = sm.state();

                prop_assert!(matches!(after, Idle | Running));
                match (before, event) {
                    (Idle, Start) => prop_assert_eq!(result, TransitionResult::Ok(Running)),
                    (Running, Stop) => prop_assert_eq!(result, TransitionResult::Ok(Idle)),
                    _ => {
                        prop_assert!(!result.is_ok());
                        prop_assert_eq!(before, after);
                    }
                }
            }
        }
    }
}
