//! # rs-crossing
//!
//! A DCC model-railroad grade-crossing controller: gate arm, alternating
//! warning lights, status-LED heartbeat, track-occupancy sensing, and
//! decoder function handling, built around a deterministic cooperative
//! task table.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for the gate actuator, indicator LED,
//!   status output, debounced sensors, and the DCC engine's CV store
//! - **Two control paths, one state machine**: the polled occupancy sensor
//!   and asynchronous DCC function events drive the same idempotent
//!   activate/deactivate transitions
//! - **Edge-triggered inputs**: active-low level polling with per-input
//!   edge latches, so a held button acts exactly once
//! - **Deterministic scheduling**: fixed-period tasks in a closed enum,
//!   registration-order dispatch, missed deadlines collapse
//! - **Paced factory reset**: CV defaults restored one write per loop
//!   iteration, gated on the store's readiness
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and DCC boundary abstractions
//! - `crossing` - Gate state machine (occupied flag, lights, arm position)
//! - `lights` / `heartbeat` / `sensors` - Indicator cycler, liveness
//!   toggle, edge detection
//! - `dcc` - Function-group decoding and the factory-reset queue
//! - `scheduler` - Cooperative periodic task table
//! - `app` / `shared` - Composition root and the `Mutex` wrapper that
//!   serializes loop and event contexts
//! - `hal` - Mock implementations for testing and simulation
//!
//! ## Example
//!
//! ```rust
//! use rs_crossing::app::CrossingApp;
//! use rs_crossing::config::CrossingConfig;
//! use rs_crossing::hal::{MockCvStore, MockGate, MockIndicator, MockSensor, MockStatusLed};
//!
//! // Wire the application context to mock hardware
//! let mut app = CrossingApp::new(
//!     CrossingConfig::default(),
//!     MockGate::new(),
//!     MockIndicator::new(),
//!     MockStatusLed::new(),
//!     MockSensor::new(), // occupancy sensor
//!     MockSensor::new(), // light-mode button
//!     MockCvStore::new(),
//! );
//! app.boot().unwrap();
//!
//! // Run the loop; a train on the approach block engages the crossing
//! app.occupancy_mut().set_active(false);
//! app.tick(500);
//!
//! let state = app.controller().state();
//! assert!(state.occupied);
//! assert!(state.gate_down);
//! assert_eq!(state.heartbeat_period_ms, 200);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Application context owning all components; run-loop and event entry points.
pub mod app;
/// Gate state machine coordinating lights, arm motion, and heartbeat rate.
pub mod crossing;
/// DCC function-group decoding, CV constants, and the factory-reset queue.
pub mod dcc;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Status-LED heartbeat with mode-dependent toggle rate.
pub mod heartbeat;
/// Four-color indicator cycler for the light-mode button.
pub mod lights;
/// Cooperative periodic task table.
pub mod scheduler;
/// Edge detection over polled active-low inputs.
pub mod sensors;
/// Boundary traits for hardware and the DCC engine.
pub mod traits;

/// Timing, decoder, and device configuration.
pub mod config;

/// Thread-safe wrapper serializing the run loop and DCC event delivery.
#[cfg(feature = "std")]
pub mod shared;

// Re-exports for convenience
pub use app::CrossingApp;
pub use crossing::{CrossingController, CrossingSnapshot, CrossingTransition};
pub use dcc::{
    CvPair, DccAddressType, DecodedFunctions, FactoryResetQueue, FunctionDecoder, FunctionGroup,
    FunctionGroupEvent,
};
pub use heartbeat::Heartbeat;
pub use lights::LightCycler;
pub use scheduler::{Scheduler, SchedulerError, TaskId};
pub use sensors::SensorEdge;
pub use traits::{
    // Hardware
    Clock,
    // DCC engine
    CvStore,
    DigitalSensor,
    GateActuator,
    GateFault,
    IndicatorColor,
    IndicatorLed,
    StatusOutput,
};

// Config re-exports
pub use config::{CrossingConfig, DecoderConfig, DeviceConfig, TimingConfig};

#[cfg(feature = "std")]
pub use shared::SharedCrossing;
