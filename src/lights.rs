//! Light-mode cycler for the auxiliary indicator LED.
//!
//! One press of the light-mode button (or one edge of DCC function 3)
//! advances a 4-entry color cycle: off, green, yellow, red. The cycler is
//! the single owner of the indicator hardware; both input paths call
//! [`LightCycler::advance`].

use log::debug;

use crate::traits::{IndicatorColor, IndicatorLed};

/// Owns the indicator LED and the position in the color cycle.
///
/// # Example
///
/// ```rust
/// use rs_crossing::lights::LightCycler;
/// use rs_crossing::hal::MockIndicator;
/// use rs_crossing::IndicatorColor;
///
/// let mut cycler = LightCycler::new(MockIndicator::new());
/// assert_eq!(cycler.color(), IndicatorColor::Off);
///
/// assert_eq!(cycler.advance().unwrap(), IndicatorColor::Green);
/// assert_eq!(cycler.advance().unwrap(), IndicatorColor::Yellow);
/// assert_eq!(cycler.color_index(), 2);
/// ```
#[derive(Debug)]
pub struct LightCycler<L: IndicatorLed> {
    led: L,
    color_index: u8,
}

impl<L: IndicatorLed> LightCycler<L> {
    /// Creates a cycler at index 0 (dark) without touching the LED.
    pub fn new(led: L) -> Self {
        Self {
            led,
            color_index: 0,
        }
    }

    /// Advances one step through the cycle and shows the new color.
    ///
    /// Exactly one "set color" command is issued per call. The index only
    /// moves once the LED write succeeds.
    pub fn advance(&mut self) -> Result<IndicatorColor, L::Error> {
        let next = (self.color_index + 1) % IndicatorColor::COUNT;
        let color = IndicatorColor::from_index(next);
        self.led.set_color(color)?;
        self.color_index = next;
        debug!("indicator color -> {}", color.as_str());
        Ok(color)
    }

    /// Current position in the cycle, 0 through 3.
    pub fn color_index(&self) -> u8 {
        self.color_index
    }

    /// Color for the current position.
    pub fn color(&self) -> IndicatorColor {
        IndicatorColor::from_index(self.color_index)
    }

    /// Read access to the owned LED (mock inspection in tests).
    pub fn led(&self) -> &L {
        &self.led
    }
}
