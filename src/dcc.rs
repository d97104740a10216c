//! DCC protocol types: function-group events, the function decoder, and
//! configuration-variable plumbing.
//!
//! The protocol engine (outside this crate) demodulates the rail signal,
//! filters for this decoder's address, and delivers one
//! [`FunctionGroupEvent`] per received function packet. This module turns
//! those events into edge-triggered actions and owns the factory-default
//! restore sequence for the engine's CV store.
//!
//! # Function mapping
//!
//! | Bit | Action on edge |
//! |-----|----------------|
//! | F0  | reserved (read, never acted on) |
//! | F1  | toggle the crossing, branching on current gate position |
//! | F3  | advance the indicator color cycle |
//!
//! Only the F0-F4 group is decoded; the other banks are accepted and
//! ignored so future functions can be assigned without protocol changes.

use log::trace;

use crate::traits::CvStore;

/// Standard configuration-variable identifiers and CV29 mode bits.
pub mod cv {
    /// Primary (short) decoder address.
    pub const PRIMARY_ADDRESS: u16 = 1;
    /// Extended address, high byte.
    pub const EXTENDED_ADDRESS_MSB: u16 = 17;
    /// Extended address, low byte.
    pub const EXTENDED_ADDRESS_LSB: u16 = 18;
    /// Decoder configuration byte.
    pub const CONFIG: u16 = 29;

    /// CV29 bit: F0 is carried in the F0-F4 function group.
    pub const CV29_F0_LOCATION: u8 = 0b0000_0010;
    /// CV29 bit: extended (14-bit) addressing enabled.
    pub const CV29_EXT_ADDRESSING: u8 = 0b0010_0000;
}

/// F0 position in the F0-F4 state byte.
pub const FN_BIT_F0: u8 = 0x10;
/// F1 position in the F0-F4 state byte.
pub const FN_BIT_F1: u8 = 0x01;
/// F2 position in the F0-F4 state byte.
pub const FN_BIT_F2: u8 = 0x02;
/// F3 position in the F0-F4 state byte.
pub const FN_BIT_F3: u8 = 0x04;
/// F4 position in the F0-F4 state byte.
pub const FN_BIT_F4: u8 = 0x08;

/// Addressing mode of a received packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DccAddressType {
    /// 7-bit primary address (CV1).
    #[default]
    Short,
    /// 14-bit extended address (CV17/CV18).
    Long,
}

/// Function bank carried by a function packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FunctionGroup {
    /// F0 through F4 (the only group this decoder acts on).
    Fn0To4,
    /// F5 through F8.
    Fn5To8,
    /// F9 through F12.
    Fn9To12,
    /// F13 through F20.
    Fn13To20,
    /// F21 through F28.
    Fn21To28,
}

/// One decoded function packet, as delivered by the protocol engine.
///
/// The engine has already validated the packet and filtered it to this
/// decoder's address; the address fields are carried for diagnostics only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionGroupEvent {
    /// Decoder address the packet was sent to.
    pub address: u16,
    /// Addressing mode of the packet.
    pub address_type: DccAddressType,
    /// Function bank this state byte belongs to.
    pub group: FunctionGroup,
    /// Raw function bits (layout per the `FN_BIT_*` constants for
    /// [`Fn0To4`](FunctionGroup::Fn0To4)).
    pub state: u8,
}

impl FunctionGroupEvent {
    /// Builds an event.
    pub const fn new(
        address: u16,
        address_type: DccAddressType,
        group: FunctionGroup,
        state: u8,
    ) -> Self {
        Self {
            address,
            address_type,
            group,
            state,
        }
    }

    /// F0/headlight bit (only meaningful for the F0-F4 group).
    #[inline]
    pub const fn f0(&self) -> bool {
        self.state & FN_BIT_F0 != 0
    }

    /// F1 bit.
    #[inline]
    pub const fn f1(&self) -> bool {
        self.state & FN_BIT_F1 != 0
    }

    /// F3 bit.
    #[inline]
    pub const fn f3(&self) -> bool {
        self.state & FN_BIT_F3 != 0
    }
}

/// Edge decisions produced by one decoded event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodedFunctions {
    /// F1 changed state: toggle the crossing (the caller branches on gate
    /// position, never on the bit's value).
    pub crossing_edge: bool,
    /// F3 changed state: advance the indicator color cycle.
    pub indicator_edge: bool,
}

/// Edge detector over the F1/F3 function bits.
///
/// Latches the last observed state of each bit and reports a change as an
/// edge. The decoder is pure and non-blocking: it runs inside the protocol
/// engine's delivery context and leaves all hardware effects to the caller.
///
/// # Example
///
/// ```rust
/// use rs_crossing::dcc::{
///     DccAddressType, FunctionDecoder, FunctionGroup, FunctionGroupEvent, FN_BIT_F1,
/// };
///
/// let mut decoder = FunctionDecoder::new();
/// let event = FunctionGroupEvent::new(24, DccAddressType::Short, FunctionGroup::Fn0To4, FN_BIT_F1);
///
/// let decoded = decoder.decode(&event, 0);
/// assert!(decoded.crossing_edge);
///
/// // Same state again: the latch absorbs it.
/// let decoded = decoder.decode(&event, 0);
/// assert!(!decoded.crossing_edge);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FunctionDecoder {
    fn1_latch: bool,
    fn3_latch: bool,
}

impl FunctionDecoder {
    /// Creates a decoder with both latches clear (all functions off).
    pub const fn new() -> Self {
        Self {
            fn1_latch: false,
            fn3_latch: false,
        }
    }

    /// Feeds one event; returns which edges fired.
    ///
    /// `cv29` is the current decoder configuration byte, used to decide
    /// whether the F0 bit is carried in this group at all.
    pub fn decode(&mut self, event: &FunctionGroupEvent, cv29: u8) -> DecodedFunctions {
        let mut decoded = DecodedFunctions::default();

        if event.group != FunctionGroup::Fn0To4 {
            // Other banks are reserved for future assignments.
            return decoded;
        }

        trace!(
            "function packet: addr={} ({:?}) state={:#07b}",
            event.address,
            event.address_type,
            event.state
        );

        // F0 is reserved: read when CV29 routes the headlight into this
        // group, never acted on.
        let _headlight = cv29 & cv::CV29_F0_LOCATION != 0 && event.f0();

        if event.f1() != self.fn1_latch {
            self.fn1_latch = event.f1();
            decoded.crossing_edge = true;
        }

        if event.f3() != self.fn3_latch {
            self.fn3_latch = event.f3();
            decoded.indicator_edge = true;
        }

        decoded
    }

    /// Last observed F1 state.
    pub fn fn1_latch(&self) -> bool {
        self.fn1_latch
    }

    /// Last observed F3 state.
    pub fn fn3_latch(&self) -> bool {
        self.fn3_latch
    }
}

/// One (configuration variable, default value) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CvPair {
    /// Configuration-variable identifier.
    pub id: u16,
    /// Value to store on factory reset.
    pub value: u8,
}

impl CvPair {
    /// Builds a pair.
    pub const fn new(id: u16, value: u8) -> Self {
        Self { id, value }
    }
}

/// Capacity of the factory-default list.
pub const MAX_FACTORY_DEFAULTS: usize = 8;

/// Paced restore of the factory-default CV list.
///
/// Once a reset is requested the queue applies one pair per run-loop
/// iteration, gated on the store's per-write readiness, until the list is
/// exhausted. Entries are applied in reverse declaration order
/// (last-declared first); the declaration order of
/// [`DecoderConfig::factory_defaults`](crate::config::DecoderConfig) is
/// forward.
///
/// # Example
///
/// ```rust
/// use rs_crossing::dcc::{CvPair, FactoryResetQueue};
/// use rs_crossing::hal::MockCvStore;
///
/// let defaults = [CvPair::new(1, 24), CvPair::new(29, 2)];
/// let mut queue = FactoryResetQueue::new(&defaults);
/// let mut store = MockCvStore::new();
///
/// queue.request();
/// assert_eq!(queue.drain_one(&mut store).unwrap(), Some(CvPair::new(29, 2)));
/// assert_eq!(queue.drain_one(&mut store).unwrap(), Some(CvPair::new(1, 24)));
/// assert_eq!(queue.drain_one(&mut store).unwrap(), None);
/// ```
#[derive(Clone, Debug)]
pub struct FactoryResetQueue {
    defaults: heapless::Vec<CvPair, MAX_FACTORY_DEFAULTS>,
    remaining: usize,
}

impl FactoryResetQueue {
    /// Creates an idle queue over the given default list.
    ///
    /// Entries beyond [`MAX_FACTORY_DEFAULTS`] are ignored.
    pub fn new(defaults: &[CvPair]) -> Self {
        let mut list = heapless::Vec::new();
        for pair in defaults.iter().take(MAX_FACTORY_DEFAULTS) {
            // Capacity is pre-checked by the take() above.
            let _ = list.push(*pair);
        }
        Self {
            defaults: list,
            remaining: 0,
        }
    }

    /// Arms the drain: every entry will be re-applied.
    ///
    /// A request during an in-progress drain restarts it from the top.
    pub fn request(&mut self) {
        self.remaining = self.defaults.len();
    }

    /// Number of entries still to apply.
    pub fn pending(&self) -> usize {
        self.remaining
    }

    /// Applies at most one pending entry to the store.
    ///
    /// Returns the pair that was applied, or `None` when the queue is idle
    /// or the store is not ready for a write. A failed write leaves the
    /// cursor untouched so the same entry is retried next iteration.
    pub fn drain_one<C: CvStore>(&mut self, store: &mut C) -> Result<Option<CvPair>, C::Error> {
        if self.remaining == 0 || !store.write_ready() {
            return Ok(None);
        }

        let pair = self.defaults[self.remaining - 1];
        store.apply(pair.id, pair.value)?;
        self.remaining -= 1;
        Ok(Some(pair))
    }
}
