//! System heartbeat: a binary status output toggled at a mode-dependent rate.
//!
//! The heartbeat task polls [`Heartbeat::poll`] on a fixed period; the
//! toggle period itself lives in
//! [`CrossingController`](crate::CrossingController) state and switches
//! between slow (idle) and fast (crossing active). An external observer can
//! read the system mode off the blink rate alone.

use crate::traits::StatusOutput;

/// Elapsed-time toggle driver for the status output.
///
/// Owns the output and the last-toggle timestamp; the period is passed in
/// on every poll so a mode switch takes effect at the very next check
/// without glitching.
///
/// # Example
///
/// ```rust
/// use rs_crossing::heartbeat::Heartbeat;
/// use rs_crossing::hal::MockStatusLed;
///
/// let mut heartbeat = Heartbeat::new(MockStatusLed::new());
///
/// assert!(!heartbeat.poll(1999, 2000).unwrap());
/// assert!(heartbeat.poll(2000, 2000).unwrap());
/// assert!(heartbeat.level());
/// ```
#[derive(Debug)]
pub struct Heartbeat<S: StatusOutput> {
    output: S,
    last_toggle_ms: u64,
    level: bool,
}

impl<S: StatusOutput> Heartbeat<S> {
    /// Creates a heartbeat around the given output, starting low.
    pub fn new(output: S) -> Self {
        Self {
            output,
            last_toggle_ms: 0,
            level: false,
        }
    }

    /// Toggles the output if `period_ms` has elapsed since the last toggle.
    ///
    /// Returns `Ok(true)` when a toggle fired. A toggle never fires early:
    /// the elapsed check always uses the period passed to this call, so the
    /// gate state machine can retune the rate between polls.
    pub fn poll(&mut self, now_ms: u64, period_ms: u32) -> Result<bool, S::Error> {
        if now_ms < self.last_toggle_ms + u64::from(period_ms) {
            return Ok(false);
        }
        let next = !self.level;
        self.output.set(next)?;
        self.level = next;
        self.last_toggle_ms = now_ms;
        Ok(true)
    }

    /// Current output level.
    pub fn level(&self) -> bool {
        self.level
    }

    /// Timestamp of the most recent toggle.
    pub fn last_toggle_ms(&self) -> u64 {
        self.last_toggle_ms
    }

    /// Read access to the owned output (mock inspection in tests).
    pub fn output(&self) -> &S {
        &self.output
    }
}
