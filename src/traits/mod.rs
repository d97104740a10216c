//! Trait definitions for the hardware and protocol-engine boundaries.
//!
//! This module defines the abstractions that allow rs-crossing to:
//! - Run against real gate/light/sensor drivers or desktop mocks
//! - Consume any DCC engine that exposes a configuration-variable store
//!
//! # Submodules
//!
//! - `hardware`: Gate actuator, indicator LED, status output, sensors, clock
//! - `dcc`: Configuration-variable store exposed by the protocol engine
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`GateActuator`]: Arm motion and warning-light control
//! - [`IndicatorLed`]: Auxiliary 4-color indicator
//! - [`StatusOutput`]: Heartbeat/liveness output
//! - [`DigitalSensor`]: Debounced active-low inputs
//! - [`Clock`]: Time source for `no_std` environments

pub mod dcc;
pub mod hardware;

pub use dcc::*;
pub use hardware::*;
