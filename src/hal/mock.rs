//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware traits, enabling
//! development and testing on desktop without a physical crossing.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockGate`] | [`GateActuator`] | Records gate and light commands |
//! | [`MockIndicator`] | [`IndicatorLed`] | Tracks color history |
//! | [`MockStatusLed`] | [`StatusOutput`] | Counts level writes |
//! | [`MockSensor`] | [`DigitalSensor`] | Controllable active-low input |
//! | [`MockCvStore`] | [`CvStore`] | Records CV writes, injectable faults |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//!
//! # Example
//!
//! ```rust
//! use rs_crossing::{CrossingController, CrossingTransition};
//! use rs_crossing::hal::{GateCommand, MockGate};
//!
//! // Create controller with mock gate
//! let mut crossing = CrossingController::new(MockGate::new());
//!
//! // Activate and verify the issued commands
//! let outcome = crossing.activate().unwrap();
//! assert_eq!(outcome, CrossingTransition::Completed);
//! assert_eq!(crossing.gate().count(GateCommand::LightsOn), 1);
//! assert_eq!(crossing.gate().count(GateCommand::Lower), 1);
//! ```
//!
//! [`GateActuator`]: crate::traits::GateActuator
//! [`IndicatorLed`]: crate::traits::IndicatorLed
//! [`StatusOutput`]: crate::traits::StatusOutput
//! [`DigitalSensor`]: crate::traits::DigitalSensor
//! [`CvStore`]: crate::traits::CvStore
//! [`Clock`]: crate::traits::Clock

use alloc::vec::Vec;

use crate::dcc::CvPair;
use crate::traits::{
    Clock, CvStore, DigitalSensor, GateActuator, GateFault, IndicatorColor, IndicatorLed,
    StatusOutput,
};

// ============================================================================
// Gate Mock
// ============================================================================

/// A single command issued to [`MockGate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateCommand {
    /// `lights_on()` was called.
    LightsOn,
    /// `lights_off()` was called.
    LightsOff,
    /// `raise()` was called.
    Raise,
    /// `lower()` was called.
    Lower,
    /// `refresh_lights()` was called.
    RefreshLights,
}

/// Mock gate actuator for testing.
///
/// Records every command in issue order for verification and can inject a
/// fault into the next motion command. An optional per-motion delay turns
/// `raise()`/`lower()` into genuinely blocking calls, which is useful when
/// testing lock contention.
///
/// # Example
///
/// ```rust
/// use rs_crossing::hal::{GateCommand, MockGate};
/// use rs_crossing::traits::{GateActuator, GateFault};
///
/// let mut gate = MockGate::new();
/// gate.lights_on().unwrap();
/// gate.lower().unwrap();
/// assert_eq!(gate.commands, [GateCommand::LightsOn, GateCommand::Lower]);
///
/// // Inject a fault into the next motion command
/// gate.fail_next_motion = Some(GateFault::MotionTimeout);
/// assert_eq!(gate.raise(), Err(GateFault::MotionTimeout));
/// assert_eq!(gate.raise(), Ok(())); // fault is consumed
/// ```
#[derive(Debug, Default)]
pub struct MockGate {
    /// Every command issued, in order.
    pub commands: Vec<GateCommand>,
    /// Fault returned by the next `raise()` or `lower()` call, then cleared.
    pub fail_next_motion: Option<GateFault>,
    /// How long each motion command blocks. Ignored without `std`.
    pub motion_delay_ms: u64,
}

impl MockGate {
    /// Creates a new mock gate with no recorded commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock gate whose motion commands block for `ms`.
    pub fn with_motion_delay_ms(mut self, ms: u64) -> Self {
        self.motion_delay_ms = ms;
        self
    }

    /// Number of times the given command was issued.
    pub fn count(&self, command: GateCommand) -> usize {
        self.commands.iter().filter(|c| **c == command).count()
    }

    fn block_for_motion(&self) {
        #[cfg(feature = "std")]
        if self.motion_delay_ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(self.motion_delay_ms));
        }
    }
}

impl GateActuator for MockGate {
    type Error = GateFault;

    fn lights_on(&mut self) -> Result<(), GateFault> {
        self.commands.push(GateCommand::LightsOn);
        Ok(())
    }

    fn lights_off(&mut self) -> Result<(), GateFault> {
        self.commands.push(GateCommand::LightsOff);
        Ok(())
    }

    fn raise(&mut self) -> Result<(), GateFault> {
        if let Some(fault) = self.fail_next_motion.take() {
            return Err(fault);
        }
        self.block_for_motion();
        self.commands.push(GateCommand::Raise);
        Ok(())
    }

    fn lower(&mut self) -> Result<(), GateFault> {
        if let Some(fault) = self.fail_next_motion.take() {
            return Err(fault);
        }
        self.block_for_motion();
        self.commands.push(GateCommand::Lower);
        Ok(())
    }

    fn refresh_lights(&mut self) -> Result<(), GateFault> {
        self.commands.push(GateCommand::RefreshLights);
        Ok(())
    }
}

// ============================================================================
// Indicator Mock
// ============================================================================

/// Mock indicator LED for testing.
///
/// Stores the current color and the full history of commanded colors.
///
/// # Example
///
/// ```rust
/// use rs_crossing::hal::MockIndicator;
/// use rs_crossing::traits::{IndicatorColor, IndicatorLed};
///
/// let mut led = MockIndicator::new();
/// led.set_color(IndicatorColor::Green).unwrap();
/// led.set_color(IndicatorColor::Yellow).unwrap();
///
/// assert_eq!(led.color, IndicatorColor::Yellow);
/// assert_eq!(led.history.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockIndicator {
    /// Currently shown color.
    pub color: IndicatorColor,
    /// Every color commanded, in order.
    pub history: Vec<IndicatorColor>,
}

impl MockIndicator {
    /// Creates a new mock indicator showing [`IndicatorColor::Off`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndicatorLed for MockIndicator {
    type Error = ();

    fn set_color(&mut self, color: IndicatorColor) -> Result<(), ()> {
        self.color = color;
        self.history.push(color);
        Ok(())
    }
}

// ============================================================================
// Status LED Mock
// ============================================================================

/// Mock status output for testing.
///
/// Tracks the output level and how many writes were issued. The heartbeat
/// only writes when it toggles, so `toggles` doubles as a toggle counter.
///
/// # Example
///
/// ```rust
/// use rs_crossing::hal::MockStatusLed;
/// use rs_crossing::traits::StatusOutput;
///
/// let mut led = MockStatusLed::new();
/// led.set(true).unwrap();
/// assert!(led.on);
/// assert_eq!(led.toggles, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockStatusLed {
    /// Current output level.
    pub on: bool,
    /// Number of times `set` was called.
    pub toggles: usize,
}

impl MockStatusLed {
    /// Creates a new mock status LED, off.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusOutput for MockStatusLed {
    type Error = ();

    fn set(&mut self, on: bool) -> Result<(), ()> {
        self.on = on;
        self.toggles += 1;
        Ok(())
    }
}

// ============================================================================
// Sensor Mock
// ============================================================================

/// Mock active-low digital input for testing.
///
/// Starts idle (reading active, as active-low inputs do). Pull the level
/// low with [`set_active(false)`](Self::set_active) to simulate a pressed
/// button or an occupied approach block.
///
/// # Example
///
/// ```rust
/// use rs_crossing::hal::MockSensor;
/// use rs_crossing::traits::DigitalSensor;
///
/// let mut sensor = MockSensor::new();
/// assert!(sensor.is_active()); // idle
///
/// sensor.set_active(false); // train on the approach block
/// assert!(!sensor.is_active());
/// ```
#[derive(Debug)]
pub struct MockSensor {
    /// Debounced level; `true` while idle.
    pub active: bool,
}

impl MockSensor {
    /// Creates a new mock sensor in the idle state.
    pub fn new() -> Self {
        Self { active: true }
    }

    /// Set the debounced level.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Default for MockSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitalSensor for MockSensor {
    fn is_active(&self) -> bool {
        self.active
    }
}

// ============================================================================
// CV Store Mock
// ============================================================================

/// Mock configuration-variable store for testing.
///
/// Records every write, serves reads from the written (or preloaded)
/// values, and exposes the reset-request and readiness signals as plain
/// fields.
///
/// # Example
///
/// ```rust
/// use rs_crossing::hal::MockCvStore;
/// use rs_crossing::traits::CvStore;
///
/// let mut store = MockCvStore::new();
/// store.set_value(29, 0x02);
/// assert_eq!(store.cv(29), 0x02);
/// assert_eq!(store.cv(1), 0); // unwritten CVs read zero
///
/// store.request_reset();
/// assert!(store.take_reset_request()); // once
/// assert!(!store.take_reset_request()); // consumed
/// ```
#[derive(Debug)]
pub struct MockCvStore {
    /// Every `apply()` call, in order.
    pub writes: Vec<CvPair>,
    /// Whether the store accepts a write this iteration.
    pub ready: bool,
    /// When set, the next `apply()` fails and clears the flag.
    pub fail_next_write: bool,
    /// Pending factory-reset request.
    pub reset_requested: bool,
    values: Vec<CvPair>,
}

impl MockCvStore {
    /// Creates a new mock store, ready and with all CVs reading zero.
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            ready: true,
            fail_next_write: false,
            reset_requested: false,
            values: Vec::new(),
        }
    }

    /// Preload a CV value without recording a write.
    pub fn set_value(&mut self, id: u16, value: u8) {
        self.store_value(id, value);
    }

    /// Raise the factory-reset request flag.
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    fn store_value(&mut self, id: u16, value: u8) {
        if let Some(existing) = self.values.iter_mut().find(|pair| pair.id == id) {
            existing.value = value;
        } else {
            self.values.push(CvPair::new(id, value));
        }
    }
}

impl Default for MockCvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CvStore for MockCvStore {
    type Error = ();

    fn take_reset_request(&mut self) -> bool {
        core::mem::take(&mut self.reset_requested)
    }

    fn write_ready(&self) -> bool {
        self.ready
    }

    fn apply(&mut self, id: u16, value: u8) -> Result<(), ()> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(());
        }
        self.writes.push(CvPair::new(id, value));
        self.store_value(id, value);
        Ok(())
    }

    fn cv(&self, id: u16) -> u8 {
        self.values
            .iter()
            .find(|pair| pair.id == id)
            .map(|pair| pair.value)
            .unwrap_or(0)
    }
}

// ============================================================================
// Clock Mock
// ============================================================================

/// Mock clock for testing.
///
/// Provides a controllable time source for testing time-dependent behavior.
///
/// # Example
///
/// ```rust
/// use rs_crossing::hal::MockClock;
/// use rs_crossing::traits::Clock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Debug)]
pub struct MockClock {
    current_ms: u64,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self { current_ms: 0 }
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u64) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&mut self, ms: u64) {
        self.current_ms += ms;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms
    }
}

// ============================================================================
// Tests
// ============================================================================
