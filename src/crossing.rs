//! Core crossing controller - coordinates the gate arm, warning lights, and
//! occupancy state.
//!
//! The controller is a two-state machine: **Idle** (gate up, lights off) and
//! **Crossing** (gate down, lights flashing). [`activate`] and
//! [`deactivate`] are the only mutations, triggered by either the polled
//! occupancy sensor or a decoded DCC function edge. Both entry points are
//! safe to call redundantly: the `occupied` flag guards the light commands
//! and the position flags guard the (blocking) motion commands, so a second
//! trigger from a stale observer is absorbed without duplicate hardware
//! commands.
//!
//! [`activate`]: CrossingController::activate
//! [`deactivate`]: CrossingController::deactivate
//!
//! # Example
//!
//! ```rust
//! use rs_crossing::CrossingController;
//! use rs_crossing::hal::MockGate;
//!
//! let mut crossing = CrossingController::new(MockGate::new());
//! assert!(crossing.is_up());
//!
//! crossing.activate().unwrap();
//! assert!(crossing.occupied());
//! assert!(crossing.is_down());
//!
//! crossing.deactivate().unwrap();
//! assert!(crossing.is_up());
//! ```

use log::{debug, info};

use crate::config::{HEARTBEAT_FAST_PERIOD_MS, HEARTBEAT_SLOW_PERIOD_MS};
use crate::traits::GateActuator;

/// Outcome of an [`activate`]/[`deactivate`] call.
///
/// Makes the idempotency contract observable: a redundant call reports
/// [`AlreadyInPosition`](Self::AlreadyInPosition) instead of silently doing
/// nothing.
///
/// [`activate`]: CrossingController::activate
/// [`deactivate`]: CrossingController::deactivate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CrossingTransition {
    /// Gate motion was commanded and ran to completion.
    Completed,
    /// The arm had already finished travelling in that direction; no motion
    /// was issued.
    AlreadyInPosition,
}

/// Read-only snapshot of the crossing state for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossingSnapshot {
    /// A train is in the crossing block.
    pub occupied: bool,
    /// Up motion has fully completed.
    pub gate_up: bool,
    /// Down motion has fully completed.
    pub gate_down: bool,
    /// Current heartbeat toggle period in milliseconds.
    pub heartbeat_period_ms: u32,
}

/// The gate state machine.
///
/// Owns the actuator hardware and the occupancy/position flags. `gate_up`
/// and `gate_down` mean "motion sequence fully completed in that
/// direction"; exactly one is set at any time. A failed motion leaves the
/// previous position latched, so the retry re-issues the missing command.
#[derive(Debug)]
pub struct CrossingController<G: GateActuator> {
    gate: G,
    occupied: bool,
    gate_up: bool,
    gate_down: bool,
    heartbeat_period_ms: u32,
    heartbeat_slow_ms: u32,
    heartbeat_fast_ms: u32,
}

impl<G: GateActuator> CrossingController<G> {
    /// Creates a controller in the boot state: idle, gate up, slow
    /// heartbeat. The hardware is not touched; call [`park`](Self::park)
    /// to drive it to a known position.
    pub fn new(gate: G) -> Self {
        Self {
            gate,
            occupied: false,
            gate_up: true,
            gate_down: false,
            heartbeat_period_ms: HEARTBEAT_SLOW_PERIOD_MS,
            heartbeat_slow_ms: HEARTBEAT_SLOW_PERIOD_MS,
            heartbeat_fast_ms: HEARTBEAT_FAST_PERIOD_MS,
        }
    }

    /// Overrides the slow/fast heartbeat toggle periods.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_crossing::CrossingController;
    /// use rs_crossing::hal::MockGate;
    ///
    /// let crossing = CrossingController::new(MockGate::new())
    ///     .with_heartbeat_rates(1000, 100);
    /// assert_eq!(crossing.heartbeat_period_ms(), 1000);
    /// ```
    pub fn with_heartbeat_rates(mut self, slow_ms: u32, fast_ms: u32) -> Self {
        self.heartbeat_slow_ms = slow_ms;
        self.heartbeat_fast_ms = fast_ms;
        if !self.occupied {
            self.heartbeat_period_ms = slow_ms;
        } else {
            self.heartbeat_period_ms = fast_ms;
        }
        self
    }

    /// Occupies the crossing: lights on, gate down, fast heartbeat.
    ///
    /// The light command is issued once per occupancy episode (guarded on
    /// `occupied`); the down motion is skipped when `gate_down` is already
    /// set. The motion call blocks until the arm reaches its stop; the
    /// position flags update only after it returns.
    pub fn activate(&mut self) -> Result<CrossingTransition, G::Error> {
        if !self.occupied {
            self.gate.lights_on()?;
            self.occupied = true;
            info!("crossing occupied: warning lights on");
        }

        let transition = if self.gate_down {
            debug!("gate already down");
            CrossingTransition::AlreadyInPosition
        } else {
            self.gate.lower()?;
            self.gate_down = true;
            self.gate_up = false;
            info!("gate lowered");
            CrossingTransition::Completed
        };

        self.heartbeat_period_ms = self.heartbeat_fast_ms;
        Ok(transition)
    }

    /// Clears the crossing: lights off, gate up, slow heartbeat.
    ///
    /// Symmetric to [`activate`](Self::activate): one light command per
    /// episode, up motion skipped when `gate_up` is already set.
    pub fn deactivate(&mut self) -> Result<CrossingTransition, G::Error> {
        if self.occupied {
            self.gate.lights_off()?;
            self.occupied = false;
            info!("crossing cleared: warning lights off");
        }

        let transition = if self.gate_up {
            debug!("gate already up");
            CrossingTransition::AlreadyInPosition
        } else {
            self.gate.raise()?;
            self.gate_up = true;
            self.gate_down = false;
            info!("gate raised");
            CrossingTransition::Completed
        };

        self.heartbeat_period_ms = self.heartbeat_slow_ms;
        Ok(transition)
    }

    /// Services the warning-light drivers; called every refresh tick.
    ///
    /// Does nothing while the crossing is idle, so a spurious tick after
    /// deactivation is harmless.
    pub fn refresh(&mut self) -> Result<(), G::Error> {
        if self.occupied {
            self.gate.refresh_lights()?;
        }
        Ok(())
    }

    /// Drives the hardware to the known boot position: lights off, arm up.
    ///
    /// Issued unconditionally at startup regardless of the flag state, then
    /// resets the flags to Idle.
    pub fn park(&mut self) -> Result<(), G::Error> {
        self.gate.park()?;
        self.occupied = false;
        self.gate_up = true;
        self.gate_down = false;
        self.heartbeat_period_ms = self.heartbeat_slow_ms;
        Ok(())
    }

    /// A train is in the crossing block.
    pub fn occupied(&self) -> bool {
        self.occupied
    }

    /// Up motion has fully completed.
    pub fn is_up(&self) -> bool {
        self.gate_up
    }

    /// Down motion has fully completed.
    pub fn is_down(&self) -> bool {
        self.gate_down
    }

    /// Current heartbeat toggle period in milliseconds.
    pub fn heartbeat_period_ms(&self) -> u32 {
        self.heartbeat_period_ms
    }

    /// Read access to the owned actuator (mock inspection in tests).
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Mutable access to the owned actuator (fault injection in tests).
    pub fn gate_mut(&mut self) -> &mut G {
        &mut self.gate
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CrossingSnapshot {
        CrossingSnapshot {
            occupied: self.occupied,
            gate_up: self.gate_up,
            gate_down: self.gate_down,
            heartbeat_period_ms: self.heartbeat_period_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{GateCommand, MockGate};
    use crate::traits::GateFault;

    // =========================================================================
    // Transition Tests
    // =========================================================================

    #[test]
    fn boot_state_is_idle_gate_up() {
        let crossing = CrossingController::new(MockGate::new());

        assert!(!crossing.occupied());
        assert!(crossing.is_up());
        assert!(!crossing.is_down());
        assert_eq!(crossing.heartbeat_period_ms(), HEARTBEAT_SLOW_PERIOD_MS);
    }

    #[test]
    fn activate_lowers_gate_and_starts_lights() {
        let mut crossing = CrossingController::new(MockGate::new());

        let transition = crossing.activate().unwrap();

        assert_eq!(transition, CrossingTransition::Completed);
        assert!(crossing.occupied());
        assert!(crossing.is_down());
        assert!(!crossing.is_up());
        assert_eq!(crossing.gate().count(GateCommand::LightsOn), 1);
        assert_eq!(crossing.gate().count(GateCommand::Lower), 1);
    }

    #[test]
    fn deactivate_raises_gate_and_stops_lights() {
        let mut crossing = CrossingController::new(MockGate::new());
        crossing.activate().unwrap();

        let transition = crossing.deactivate().unwrap();

        assert_eq!(transition, CrossingTransition::Completed);
        assert!(!crossing.occupied());
        assert!(crossing.is_up());
        assert!(!crossing.is_down());
        assert_eq!(crossing.gate().count(GateCommand::LightsOff), 1);
        assert_eq!(crossing.gate().count(GateCommand::Raise), 1);
    }

    #[test]
    fn activate_twice_issues_single_command_set() {
        let mut crossing = CrossingController::new(MockGate::new());

        assert_eq!(crossing.activate().unwrap(), CrossingTransition::Completed);
        assert_eq!(
            crossing.activate().unwrap(),
            CrossingTransition::AlreadyInPosition
        );

        assert_eq!(crossing.gate().count(GateCommand::LightsOn), 1);
        assert_eq!(crossing.gate().count(GateCommand::Lower), 1);
    }

    #[test]
    fn deactivate_when_idle_is_absorbed() {
        let mut crossing = CrossingController::new(MockGate::new());

        assert_eq!(
            crossing.deactivate().unwrap(),
            CrossingTransition::AlreadyInPosition
        );
        assert_eq!(crossing.gate().count(GateCommand::LightsOff), 0);
        assert_eq!(crossing.gate().count(GateCommand::Raise), 0);
    }

    #[test]
    fn gate_flags_never_both_true() {
        let mut crossing = CrossingController::new(MockGate::new());

        let check = |c: &CrossingController<MockGate>| {
            assert!(!(c.is_up() && c.is_down()));
            assert!(c.is_up() || c.is_down());
        };

        check(&crossing);
        crossing.activate().unwrap();
        check(&crossing);
        crossing.activate().unwrap();
        check(&crossing);
        crossing.deactivate().unwrap();
        check(&crossing);
        crossing.deactivate().unwrap();
        check(&crossing);
        crossing.activate().unwrap();
        check(&crossing);
    }

    // =========================================================================
    // Heartbeat Rate Tests
    // =========================================================================

    #[test]
    fn activate_switches_heartbeat_to_fast() {
        let mut crossing = CrossingController::new(MockGate::new());

        crossing.activate().unwrap();
        assert_eq!(crossing.heartbeat_period_ms(), HEARTBEAT_FAST_PERIOD_MS);
    }

    #[test]
    fn deactivate_restores_slow_heartbeat() {
        let mut crossing = CrossingController::new(MockGate::new());
        crossing.activate().unwrap();

        crossing.deactivate().unwrap();
        assert_eq!(crossing.heartbeat_period_ms(), HEARTBEAT_SLOW_PERIOD_MS);
    }

    #[test]
    fn custom_heartbeat_rates_are_applied() {
        let mut crossing = CrossingController::new(MockGate::new()).with_heartbeat_rates(1000, 100);

        assert_eq!(crossing.heartbeat_period_ms(), 1000);
        crossing.activate().unwrap();
        assert_eq!(crossing.heartbeat_period_ms(), 100);
    }

    // =========================================================================
    // Refresh Tests
    // =========================================================================

    #[test]
    fn refresh_drives_lights_only_while_occupied() {
        let mut crossing = CrossingController::new(MockGate::new());

        crossing.refresh().unwrap();
        assert_eq!(crossing.gate().count(GateCommand::RefreshLights), 0);

        crossing.activate().unwrap();
        crossing.refresh().unwrap();
        crossing.refresh().unwrap();
        assert_eq!(crossing.gate().count(GateCommand::RefreshLights), 2);

        crossing.deactivate().unwrap();
        crossing.refresh().unwrap();
        assert_eq!(crossing.gate().count(GateCommand::RefreshLights), 2);
    }

    // =========================================================================
    // Failure Handling Tests
    // =========================================================================

    #[test]
    fn failed_lower_keeps_position_flags_retryable() {
        let mut crossing = CrossingController::new(MockGate::new());
        crossing.gate_mut().fail_next_motion = Some(GateFault::MotionTimeout);

        let err = crossing.activate().unwrap_err();
        assert_eq!(err, GateFault::MotionTimeout);

        // Lights made it out before the motion fault; the arm never moved.
        assert!(crossing.occupied());
        assert!(crossing.is_up());
        assert!(!crossing.is_down());

        // A retry issues only the missing motion command.
        assert_eq!(crossing.activate().unwrap(), CrossingTransition::Completed);
        assert_eq!(crossing.gate().count(GateCommand::LightsOn), 1);
        assert_eq!(crossing.gate().count(GateCommand::Lower), 1);
        assert!(crossing.is_down());
    }

    // =========================================================================
    // Park and Snapshot Tests
    // =========================================================================

    #[test]
    fn park_forces_idle_hardware_state() {
        let mut crossing = CrossingController::new(MockGate::new());
        crossing.activate().unwrap();

        crossing.park().unwrap();

        assert!(!crossing.occupied());
        assert!(crossing.is_up());
        assert_eq!(crossing.heartbeat_period_ms(), HEARTBEAT_SLOW_PERIOD_MS);
        // park always commands the hardware, even from a known state
        assert_eq!(crossing.gate().count(GateCommand::Raise), 1);
        assert_eq!(crossing.gate().count(GateCommand::LightsOff), 1);
    }

    #[test]
    fn snapshot_mirrors_controller_state() {
        let mut crossing = CrossingController::new(MockGate::new());
        crossing.activate().unwrap();

        let state = crossing.state();

        assert!(state.occupied);
        assert!(state.gate_down);
        assert!(!state.gate_up);
        assert_eq!(state.heartbeat_period_ms, HEARTBEAT_FAST_PERIOD_MS);
    }
}
