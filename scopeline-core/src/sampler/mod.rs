//! Sample sources
//!
//! A [`VoltageSource`] produces one reading per tick, already clamped to
//! the display range:
//! - [`AdcSampler`] converts raw counts from an [`AnalogInput`]
//! - [`SimulatedSignal`] synthesises a composite sine wave

pub mod adc;
pub mod simulated;

pub use adc::AdcSampler;
pub use simulated::SimulatedSignal;

use scopeline_hal::AnalogInput;

use crate::config::{ScopeConfig, SignalSource};
use crate::error::ScopeError;
use crate::sample::Millivolts;

/// Trait for anything that yields one voltage per tick
pub trait VoltageSource {
    /// Take one reading
    ///
    /// Fails with [`ScopeError::HardwareUnavailable`] when the underlying
    /// input cannot be read.
    fn read_voltage(&mut self) -> Result<Millivolts, ScopeError>;
}

impl<T: VoltageSource + ?Sized> VoltageSource for &mut T {
    fn read_voltage(&mut self) -> Result<Millivolts, ScopeError> {
        (**self).read_voltage()
    }
}

/// Source selected by configuration
pub enum Sampler<A> {
    Adc(AdcSampler<A>),
    Simulated(SimulatedSignal),
}

impl<A: AnalogInput> Sampler<A> {
    /// Build the configured source
    ///
    /// The ADC is dropped unused when the simulated source is selected.
    pub fn from_config(config: &ScopeConfig, adc: A) -> Self {
        match config.sampler.source {
            SignalSource::Adc => Sampler::Adc(AdcSampler::from_config(adc, config)),
            SignalSource::Simulated => {
                Sampler::Simulated(SimulatedSignal::new(config.display.scale()))
            }
        }
    }

    pub fn source(&self) -> SignalSource {
        match self {
            Sampler::Adc(_) => SignalSource::Adc,
            Sampler::Simulated(_) => SignalSource::Simulated,
        }
    }
}

impl<A: AnalogInput> VoltageSource for Sampler<A> {
    fn read_voltage(&mut self) -> Result<Millivolts, ScopeError> {
        match self {
            Sampler::Adc(adc) => adc.read_voltage(),
            Sampler::Simulated(sim) => sim.read_voltage(),
        }
    }
}

/// Fake analog input for tests
#[cfg(test)]
pub struct DummyAdc {
    pub raw: u16,
    pub full_scale: u16,
    pub fail: bool,
}

#[cfg(test)]
impl DummyAdc {
    pub fn new(raw: u16) -> Self {
        Self {
            raw,
            full_scale: 4095,
            fail: false,
        }
    }
}

#[cfg(test)]
impl AnalogInput for DummyAdc {
    fn full_scale(&self) -> u16 {
        self.full_scale
    }

    fn read_raw(&mut self) -> Result<u16, scopeline_hal::AdcError> {
        if self.fail {
            Err(scopeline_hal::AdcError::ConversionFailed)
        } else {
            Ok(self.raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_picks_source() {
        let mut config = ScopeConfig::default();
        let sampler = Sampler::from_config(&config, DummyAdc::new(0));
        assert_eq!(sampler.source(), SignalSource::Simulated);

        config.sampler.source = SignalSource::Adc;
        let mut sampler = Sampler::from_config(&config, DummyAdc::new(4095));
        assert_eq!(sampler.source(), SignalSource::Adc);
        assert_eq!(sampler.read_voltage(), Ok(Millivolts(5000)));
    }
}
