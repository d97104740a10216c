//! Configuration for timing, the DCC decoder identity, and the device.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`. Defaults reproduce the stock
//! crossing timing: slow 2 s heartbeat, half-second occupancy polling, 20 ms
//! light refresh, decoder address 24.
//!
//! # Example
//!
//! ```rust
//! use rs_crossing::config::{CrossingConfig, DecoderConfig, TimingConfig};
//!
//! // Use defaults
//! let config = CrossingConfig::default();
//!
//! // Or customize
//! let config = CrossingConfig::default()
//!     .with_decoder(DecoderConfig::default().with_address(412))
//!     .with_timing(TimingConfig::default().with_heartbeat_rates(1000, 100));
//! ```

use heapless::String as HString;

use crate::dcc::{cv, CvPair, MAX_FACTORY_DEFAULTS};

/// Heartbeat task poll period.
pub const HEARTBEAT_TASK_PERIOD_MS: u32 = 300;
/// Occupancy sensor poll period.
pub const OCCUPANCY_POLL_PERIOD_MS: u32 = 500;
/// Light-mode button poll period.
pub const LIGHT_BUTTON_POLL_PERIOD_MS: u32 = 1000;
/// Warning-light refresh period while the crossing is active.
pub const GATE_REFRESH_PERIOD_MS: u32 = 20;
/// Heartbeat toggle period while idle.
pub const HEARTBEAT_SLOW_PERIOD_MS: u32 = 2000;
/// Heartbeat toggle period while a crossing is active.
pub const HEARTBEAT_FAST_PERIOD_MS: u32 = 200;
/// Stock decoder address.
pub const DEFAULT_DECODER_ADDRESS: u16 = 24;

/// Maximum length for short config strings (device names)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    // Last char boundary at or before the capacity
    let valid_end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|end| *end <= MAX_SHORT_STRING)
        .last()
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete crossing configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossingConfig {
    /// Task periods and heartbeat rates
    pub timing: TimingConfig,
    /// DCC decoder identity and factory defaults
    pub decoder: DecoderConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl CrossingConfig {
    /// Set timing configuration
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set decoder configuration
    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// Timing Config
// ============================================================================

/// Task periods and heartbeat toggle rates, all in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// Heartbeat task poll period
    pub heartbeat_task_ms: u32,
    /// Occupancy sensor poll period
    pub occupancy_poll_ms: u32,
    /// Light-mode button poll period
    pub light_button_poll_ms: u32,
    /// Warning-light refresh period
    pub refresh_ms: u32,
    /// Heartbeat toggle period while idle
    pub heartbeat_slow_ms: u32,
    /// Heartbeat toggle period while active
    pub heartbeat_fast_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            heartbeat_task_ms: HEARTBEAT_TASK_PERIOD_MS,
            occupancy_poll_ms: OCCUPANCY_POLL_PERIOD_MS,
            light_button_poll_ms: LIGHT_BUTTON_POLL_PERIOD_MS,
            refresh_ms: GATE_REFRESH_PERIOD_MS,
            heartbeat_slow_ms: HEARTBEAT_SLOW_PERIOD_MS,
            heartbeat_fast_ms: HEARTBEAT_FAST_PERIOD_MS,
        }
    }
}

impl TimingConfig {
    /// Set the heartbeat task poll period
    pub fn with_heartbeat_task_ms(mut self, ms: u32) -> Self {
        self.heartbeat_task_ms = ms;
        self
    }

    /// Set the occupancy sensor poll period
    pub fn with_occupancy_poll_ms(mut self, ms: u32) -> Self {
        self.occupancy_poll_ms = ms;
        self
    }

    /// Set the light-mode button poll period
    pub fn with_light_button_poll_ms(mut self, ms: u32) -> Self {
        self.light_button_poll_ms = ms;
        self
    }

    /// Set the warning-light refresh period
    pub fn with_refresh_ms(mut self, ms: u32) -> Self {
        self.refresh_ms = ms;
        self
    }

    /// Set both heartbeat toggle periods
    pub fn with_heartbeat_rates(mut self, slow_ms: u32, fast_ms: u32) -> Self {
        self.heartbeat_slow_ms = slow_ms;
        self.heartbeat_fast_ms = fast_ms;
        self
    }
}

// ============================================================================
// Decoder Config
// ============================================================================

/// DCC decoder identity and factory-default CV list
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Decoder address the engine filters for
    pub address: u16,
    /// Factory-default CV list in declaration order (applied last-first)
    pub factory_defaults: heapless::Vec<CvPair, MAX_FACTORY_DEFAULTS>,
    /// Restore the factory defaults during startup
    pub apply_defaults_on_boot: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_DECODER_ADDRESS,
            factory_defaults: Self::defaults_for(DEFAULT_DECODER_ADDRESS),
            apply_defaults_on_boot: true,
        }
    }
}

impl DecoderConfig {
    /// Set the decoder address and regenerate the matching CV defaults
    pub fn with_address(mut self, address: u16) -> Self {
        self.address = address;
        self.factory_defaults = Self::defaults_for(address);
        self
    }

    /// Replace the factory-default CV list
    ///
    /// Entries beyond [`MAX_FACTORY_DEFAULTS`] are dropped.
    pub fn with_factory_defaults(mut self, defaults: &[CvPair]) -> Self {
        self.factory_defaults.clear();
        for pair in defaults.iter().take(MAX_FACTORY_DEFAULTS) {
            let _ = self.factory_defaults.push(*pair);
        }
        self
    }

    /// Set whether startup restores the factory defaults
    pub fn with_apply_defaults_on_boot(mut self, apply: bool) -> Self {
        self.apply_defaults_on_boot = apply;
        self
    }

    /// Standard CV defaults for an address: primary address, extended
    /// address bytes, and CV29 with the F0-location bit.
    fn defaults_for(address: u16) -> heapless::Vec<CvPair, MAX_FACTORY_DEFAULTS> {
        let mut defaults = heapless::Vec::new();
        let pairs = [
            CvPair::new(cv::PRIMARY_ADDRESS, (address & 0x7F) as u8),
            CvPair::new(cv::EXTENDED_ADDRESS_MSB, (address >> 8) as u8),
            CvPair::new(cv::EXTENDED_ADDRESS_LSB, (address & 0xFF) as u8),
            CvPair::new(cv::CONFIG, cv::CV29_F0_LOCATION),
        ];
        for pair in pairs {
            let _ = defaults.push(pair);
        }
        defaults
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Friendly name used in log lines
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-crossing"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}
