//! Edge detection for the polled digital inputs.
//!
//! The occupancy sensor and the light-mode button are debounced, active-low
//! inputs polled on fixed periods. A "press" is the active-to-inactive
//! transition of the level; holding an input produces exactly one press
//! until it is released and pressed again.

use crate::traits::DigitalSensor;

/// Active-low edge detector for one polled input.
///
/// Remembers the previous poll's level and reports a press when the level
/// drops from active (idle) to inactive (pressed or occupied).
///
/// # Example
///
/// ```rust
/// use rs_crossing::sensors::SensorEdge;
///
/// let mut edge = SensorEdge::new();
/// assert!(!edge.update(true)); // idle
/// assert!(edge.update(false)); // press fires on the falling level
/// assert!(!edge.update(false)); // held: no repeat
/// assert!(!edge.update(true)); // release: no event
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SensorEdge {
    was_active: bool,
}

impl SensorEdge {
    /// Creates a detector assuming the input starts idle (active level).
    pub const fn new() -> Self {
        Self { was_active: true }
    }

    /// Feeds one polled level; returns `true` when a press occurred.
    pub fn update(&mut self, is_active: bool) -> bool {
        let pressed = self.was_active && !is_active;
        self.was_active = is_active;
        pressed
    }

    /// Polls a sensor and runs edge detection in one step.
    pub fn poll<S: DigitalSensor>(&mut self, sensor: &S) -> bool {
        self.update(sensor.is_active())
    }
}

impl Default for SensorEdge {
    fn default() -> Self {
        Self::new()
    }
}
