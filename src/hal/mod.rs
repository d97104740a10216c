//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development and simulation
//!
//! Production implementations (servo gate arm, strobe driver, GPIO inputs,
//! EEPROM-backed CV storage) live in board support crates outside this
//! repository and implement the same traits.

pub mod mock;

pub use mock::*;
