//! Thread-safe wrapper serializing the run loop and DCC event delivery.
//!
//! The protocol engine delivers function-group events from its own context
//! while the cooperative loop runs tasks in another. [`SharedCrossing`] owns
//! the whole [`CrossingApp`] behind one `Mutex`, so an event always
//! serializes before or after a complete loop iteration, never inside one.
//! An event arriving while a blocking gate motion is in progress simply
//! waits for that iteration to finish.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rs_crossing::app::CrossingApp;
//! use rs_crossing::config::CrossingConfig;
//! use rs_crossing::hal::{MockCvStore, MockGate, MockIndicator, MockSensor, MockStatusLed};
//! use rs_crossing::shared::SharedCrossing;
//!
//! let app = CrossingApp::new(
//!     CrossingConfig::default(),
//!     MockGate::new(),
//!     MockIndicator::new(),
//!     MockStatusLed::new(),
//!     MockSensor::new(),
//!     MockSensor::new(),
//!     MockCvStore::new(),
//! );
//! let shared = Arc::new(SharedCrossing::new(app));
//!
//! shared.with_app(|app| app.boot()).unwrap();
//! shared.tick();
//!
//! let snapshot = shared.state();
//! assert!(!snapshot.occupied);
//! assert!(snapshot.gate_up);
//! ```

use std::fmt::Debug;
use std::sync::Mutex;
use std::time::Instant;

use crate::app::CrossingApp;
use crate::crossing::CrossingSnapshot;
use crate::dcc::FunctionGroupEvent;
use crate::traits::{CvStore, DigitalSensor, GateActuator, IndicatorLed, StatusOutput};

/// Mutex-owned application context with a shared wall-clock time base.
///
/// # Thread Safety
///
/// A single `Mutex` covers the entire context. The loop's tick and a
/// delivered event each hold the lock for one full iteration/event, which
/// is exactly the run-to-completion guarantee the state machine assumes.
/// The lock is uncontended in steady state; the only long hold is a
/// blocking gate motion.
pub struct SharedCrossing<G, L, S, O, B, C>
where
    G: GateActuator,
    L: IndicatorLed,
    S: StatusOutput,
    O: DigitalSensor,
    B: DigitalSensor,
    C: CvStore,
{
    app: Mutex<CrossingApp<G, L, S, O, B, C>>,

    /// Time base for `now_ms()`; every context sees the same clock.
    start_time: Instant,
}

impl<G, L, S, O, B, C> SharedCrossing<G, L, S, O, B, C>
where
    G: GateActuator,
    G::Error: Debug,
    L: IndicatorLed,
    L::Error: Debug,
    S: StatusOutput,
    S::Error: Debug,
    O: DigitalSensor,
    B: DigitalSensor,
    C: CvStore,
    C::Error: Debug,
{
    /// Wraps an application context; `now_ms()` counts from this call.
    pub fn new(app: CrossingApp<G, L, S, O, B, C>) -> Self {
        Self {
            app: Mutex::new(app),
            start_time: Instant::now(),
        }
    }

    /// Milliseconds since the wrapper was created.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// The shared time base.
    #[inline]
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Runs a closure with exclusive access to the application context.
    pub fn with_app<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut CrossingApp<G, L, S, O, B, C>) -> R,
    {
        let mut guard = self.app.lock().unwrap();
        f(&mut *guard)
    }

    /// One loop iteration at the current time.
    ///
    /// The timestamp is read after the lock is acquired, so a task delayed
    /// by contention is rescheduled from when it actually ran.
    pub fn tick(&self) {
        let mut app = self.app.lock().unwrap();
        app.tick(self.now_ms());
    }

    /// Delivers a decoded function-group event under the lock.
    pub fn on_function_event(&self, event: &FunctionGroupEvent) {
        let mut app = self.app.lock().unwrap();
        app.on_function_event(event);
    }

    /// Read-only snapshot of the crossing state.
    pub fn state(&self) -> CrossingSnapshot {
        let app = self.app.lock().unwrap();
        app.controller().state()
    }
}
