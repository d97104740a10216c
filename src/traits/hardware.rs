//! Hardware abstraction traits for the gate actuator, sensors, and indicators.
//!
//! This module defines the hardware boundary that lets rs-crossing run
//! against real drivers (servo gate arm, strobe lights, debounced inputs)
//! or against the mock implementations used for testing and simulation.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`GateActuator`] | Gate arm motion and warning-light control |
//! | [`IndicatorLed`] | Auxiliary 4-color indicator LED |
//! | [`StatusOutput`] | Binary heartbeat/liveness output |
//! | [`DigitalSensor`] | Debounced active-low digital input |
//! | [`Clock`] | Time source for `no_std` environments |
//!
//! # Implementation
//!
//! For testing and desktop simulation, use the mock implementations from
//! [`crate::hal::mock`]. Production implementations wrap the actual servo,
//! light-driver, and GPIO primitives and live outside this crate.
//!
//! # Example
//!
//! ```rust
//! use rs_crossing::traits::{GateActuator, IndicatorLed, IndicatorColor};
//! use rs_crossing::hal::{MockGate, MockIndicator};
//!
//! let mut gate = MockGate::new();
//! gate.lights_on().unwrap();
//! gate.lower().unwrap();
//!
//! let mut led = MockIndicator::new();
//! led.set_color(IndicatorColor::Green).unwrap();
//! assert_eq!(led.color, IndicatorColor::Green);
//! ```

/// Color shown on the auxiliary indicator LED.
///
/// The light-mode button cycles through these in index order; index 0 is
/// dark. The concrete hues match a typical addressable-LED signal head.
///
/// # Default
///
/// Defaults to [`Off`](Self::Off), the boot state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IndicatorColor {
    /// LED dark.
    #[default]
    Off,
    /// Proceed aspect.
    Green,
    /// Approach aspect.
    Yellow,
    /// Stop aspect.
    Red,
}

impl IndicatorColor {
    /// Number of entries in the color cycle.
    pub const COUNT: u8 = 4;

    /// Returns the color as a lowercase string.
    ///
    /// Used for log lines and serialized snapshots.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_crossing::IndicatorColor;
    ///
    /// assert_eq!(IndicatorColor::Off.as_str(), "off");
    /// assert_eq!(IndicatorColor::Green.as_str(), "green");
    /// assert_eq!(IndicatorColor::Yellow.as_str(), "yellow");
    /// assert_eq!(IndicatorColor::Red.as_str(), "red");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IndicatorColor::Off => "off",
            IndicatorColor::Green => "green",
            IndicatorColor::Yellow => "yellow",
            IndicatorColor::Red => "red",
        }
    }

    /// Maps a cycle index to its color, wrapping modulo [`COUNT`](Self::COUNT).
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_crossing::IndicatorColor;
    ///
    /// assert_eq!(IndicatorColor::from_index(0), IndicatorColor::Off);
    /// assert_eq!(IndicatorColor::from_index(1), IndicatorColor::Green);
    /// assert_eq!(IndicatorColor::from_index(2), IndicatorColor::Yellow);
    /// assert_eq!(IndicatorColor::from_index(3), IndicatorColor::Red);
    /// assert_eq!(IndicatorColor::from_index(5), IndicatorColor::Green);
    /// ```
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        match index % Self::COUNT {
            1 => IndicatorColor::Green,
            2 => IndicatorColor::Yellow,
            3 => IndicatorColor::Red,
            _ => IndicatorColor::Off,
        }
    }

    /// Returns this color's position in the cycle.
    #[inline]
    pub const fn index(&self) -> u8 {
        match self {
            IndicatorColor::Off => 0,
            IndicatorColor::Green => 1,
            IndicatorColor::Yellow => 2,
            IndicatorColor::Red => 3,
        }
    }
}

/// Gate actuator trait - abstracts the crossing's arm and warning lights.
///
/// Implement this trait for the physical gate hardware. Motion commands
/// block until the arm has finished travelling; the crossing controller
/// updates its position flags only after a motion call returns.
///
/// # Implementation Notes
///
/// - `raise()` and `lower()` must be no-ops when the arm is already at the
///   commanded end of travel
/// - `lights_on()` and `lights_off()` must be idempotent
/// - `refresh_lights()` is called every refresh tick while the crossing is
///   active and should advance flasher/strobe animation by one step
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_crossing::traits::GateActuator;
///
/// struct ServoGate { /* servo + light-driver handles */ }
///
/// impl GateActuator for ServoGate {
///     type Error = ();
///
///     fn lights_on(&mut self) -> Result<(), ()> {
///         // Start the alternating strobe pattern...
///         Ok(())
///     }
///
///     fn lights_off(&mut self) -> Result<(), ()> {
///         Ok(())
///     }
///
///     fn raise(&mut self) -> Result<(), ()> {
///         // Step the servo to the raised stop, then settle...
///         Ok(())
///     }
///
///     fn lower(&mut self) -> Result<(), ()> {
///         Ok(())
///     }
///
///     fn refresh_lights(&mut self) -> Result<(), ()> {
///         // Advance the strobe animation one frame...
///         Ok(())
///     }
/// }
/// ```
pub trait GateActuator {
    /// Error type for actuator operations.
    type Error;

    /// Start the alternating warning lights.
    ///
    /// Idempotent; calling while the lights already run is harmless.
    fn lights_on(&mut self) -> Result<(), Self::Error>;

    /// Stop the warning lights.
    fn lights_off(&mut self) -> Result<(), Self::Error>;

    /// Move the arm to the raised position.
    ///
    /// Blocks until motion completes. No-op if already raised.
    fn raise(&mut self) -> Result<(), Self::Error>;

    /// Move the arm to the lowered position.
    ///
    /// Blocks until motion completes. No-op if already lowered.
    fn lower(&mut self) -> Result<(), Self::Error>;

    /// Advance the warning-light animation by one step.
    ///
    /// Invoked on every refresh tick while the crossing is active so that
    /// flasher/buck-style drivers keep strobing.
    fn refresh_lights(&mut self) -> Result<(), Self::Error>;

    /// Convenience method to drive the hardware to the idle state.
    ///
    /// Stops the lights and raises the arm.
    fn park(&mut self) -> Result<(), Self::Error> {
        self.lights_off()?;
        self.raise()
    }
}

/// Auxiliary indicator LED trait.
///
/// A single addressable LED showing the current light mode. The write is
/// non-blocking; there is no animation to service.
pub trait IndicatorLed {
    /// Error type for indicator operations.
    type Error;

    /// Show the given color.
    fn set_color(&mut self, color: IndicatorColor) -> Result<(), Self::Error>;
}

/// Binary status output trait.
///
/// Drives the heartbeat LED (or any other liveness indicator). An external
/// observer reads system mode from the toggle rate: slow while idle, fast
/// while a crossing is active.
pub trait StatusOutput {
    /// Error type for status writes.
    type Error;

    /// Set the output level.
    fn set(&mut self, on: bool) -> Result<(), Self::Error>;
}

/// Debounced digital input trait.
///
/// Covers both the track-occupancy sensor and the light-mode button. The
/// inputs are wired active-low through their debouncing front end: an idle
/// input reads active, a pressed or occupied input reads inactive. Edge
/// detection on top of the polled level lives in
/// [`SensorEdge`](crate::sensors::SensorEdge).
pub trait DigitalSensor {
    /// Returns the debounced level; `true` while the input is idle.
    fn is_active(&self) -> bool;
}

/// Ready-made error kind for [`GateActuator`] implementations.
///
/// The trait leaves `Error` open; implementations that want a conventional
/// taxonomy (the mock included) can use this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GateFault {
    /// A motion command did not reach its end stop in time.
    MotionTimeout,
    /// The actuator stopped acknowledging commands.
    Unresponsive,
}

impl core::fmt::Display for GateFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GateFault::MotionTimeout => write!(f, "gate motion timed out"),
            GateFault::Unresponsive => write!(f, "gate actuator unresponsive"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GateFault {}

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in milliseconds for the run loop. On desktop,
/// this can wrap `std::time::Instant`. On embedded, use a hardware timer.
///
/// # Example
///
/// ```rust
/// use rs_crossing::traits::Clock;
/// use rs_crossing::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}
