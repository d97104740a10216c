//! Protocol-engine boundary trait for the configuration-variable store.
//!
//! The DCC engine owns the decoder's configuration variables (CVs): the
//! address, the CV29 mode byte, and everything else a programming track can
//! write. This crate never stores CVs itself; it reads the few it needs and
//! drains factory defaults back into the engine's store when a reset is
//! requested.

/// Configuration-variable store exposed by the DCC engine.
///
/// # Implementation Notes
///
/// - `take_reset_request()` is a one-shot trigger: it must return `true`
///   exactly once per reset request (typically a service-mode write to the
///   manufacturer-reset CV) and then `false` until the next request
/// - `write_ready()` gates each individual write; engines that persist CVs
///   to flash are not always ready to accept one
/// - `apply()` stores one CV value; persistence is the engine's concern
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_crossing::traits::CvStore;
///
/// struct EngineStore { /* engine handle */ }
///
/// impl CvStore for EngineStore {
///     type Error = ();
///
///     fn take_reset_request(&mut self) -> bool {
///         // Consume the engine's reset-pending flag...
///         false
///     }
///
///     fn write_ready(&self) -> bool {
///         true
///     }
///
///     fn apply(&mut self, id: u16, value: u8) -> Result<(), ()> {
///         // Forward to the engine's CV write...
///         Ok(())
///     }
///
///     fn cv(&self, id: u16) -> u8 {
///         0
///     }
/// }
/// ```
pub trait CvStore {
    /// Error type for CV writes.
    type Error;

    /// Consumes and returns the pending factory-reset request, if any.
    ///
    /// Returns `true` at most once per request.
    fn take_reset_request(&mut self) -> bool;

    /// Returns `true` when the store can accept a CV write right now.
    fn write_ready(&self) -> bool;

    /// Stores one configuration variable.
    fn apply(&mut self, id: u16, value: u8) -> Result<(), Self::Error>;

    /// Reads a configuration variable; unprogrammed CVs read as 0.
    fn cv(&self, id: u16) -> u8;
}
