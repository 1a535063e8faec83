//! ADC channel management
//!
//! RP2040 has a single 12-bit ADC with 5 channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29
//! - ADC4: Internal temperature sensor

use embassy_rp::adc::{Adc, Blocking, Channel};
use scopeline_hal::{AdcError, AnalogInput};

/// Largest raw reading of the 12-bit converter
pub const FULL_SCALE: u16 = 4095;

/// ADC channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// ADC0 on GPIO26
    Adc0,
    /// ADC1 on GPIO27
    Adc1,
    /// ADC2 on GPIO28
    Adc2,
    /// ADC3 on GPIO29
    Adc3,
}

impl AdcChannel {
    /// GPIO pin wired to this channel
    pub fn gpio(&self) -> u8 {
        match self {
            AdcChannel::Adc0 => 26,
            AdcChannel::Adc1 => 27,
            AdcChannel::Adc2 => 28,
            AdcChannel::Adc3 => 29,
        }
    }

    /// Channel for a GPIO pin, if the pin has one
    pub fn from_gpio(gpio: u8) -> Option<Self> {
        match gpio {
            26 => Some(AdcChannel::Adc0),
            27 => Some(AdcChannel::Adc1),
            28 => Some(AdcChannel::Adc2),
            29 => Some(AdcChannel::Adc3),
            _ => None,
        }
    }

    /// Channel number (0..=3)
    pub fn index(&self) -> u8 {
        self.gpio() - 26
    }
}

/// One ADC channel read with blocking conversions
///
/// A conversion takes about 2 µs, short enough to run inline in the
/// sampling task.
pub struct RpAnalogInput<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
    id: AdcChannel,
}

impl<'d> RpAnalogInput<'d> {
    pub fn new(adc: Adc<'d, Blocking>, channel: Channel<'d>, id: AdcChannel) -> Self {
        Self { adc, channel, id }
    }

    pub fn channel(&self) -> AdcChannel {
        self.id
    }
}

impl AnalogInput for RpAnalogInput<'_> {
    fn full_scale(&self) -> u16 {
        FULL_SCALE
    }

    fn read_raw(&mut self) -> Result<u16, AdcError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(|_| AdcError::ConversionFailed)
    }
}
