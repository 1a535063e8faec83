//! ADC-backed voltage source
//!
//! The full ADC range is stretched over the display range: a full-scale
//! count shows as the top of the scale, zero as 0 V. With a 3.3 V
//! reference and a 0-5 V display the trace therefore reads as if the
//! input were divided down from 5 V.

use scopeline_hal::AnalogInput;

use crate::config::ScopeConfig;
use crate::error::ScopeError;
use crate::sample::Millivolts;
use crate::scale::VoltageScale;

use super::VoltageSource;

/// Converts raw ADC counts to display millivolts
pub struct AdcSampler<A> {
    adc: A,
    /// ADC reference voltage in mV
    vref_mv: u16,
    /// Display range the reading is mapped onto and clamped to
    scale: VoltageScale,
}

impl<A: AnalogInput> AdcSampler<A> {
    /// Create a sampler
    ///
    /// # Arguments
    /// - `adc`: analog input to read
    /// - `vref_mv`: converter reference voltage (typically 3300)
    /// - `scale`: display range
    pub fn new(adc: A, vref_mv: u16, scale: VoltageScale) -> Self {
        Self {
            adc,
            vref_mv,
            scale,
        }
    }

    pub fn from_config(adc: A, config: &ScopeConfig) -> Self {
        Self::new(adc, config.sampler.adc_vref_mv, config.display.scale())
    }

    /// Voltage actually present at the pin for a raw count
    pub fn pin_millivolts(&self, raw: u16) -> Millivolts {
        let full = self.adc.full_scale().max(1) as u32;
        let raw = (raw as u32).min(full);
        Millivolts(((raw * self.vref_mv as u32 + full / 2) / full) as u16)
    }

    /// Display voltage for a raw count, clamped to the scale
    pub fn convert(&self, raw: u16) -> Millivolts {
        let full = self.adc.full_scale().max(1) as u32;
        let raw = (raw as u32).min(full);
        let mv = (raw * self.scale.max().0 as u32 + full / 2) / full;
        Millivolts(mv as u16).clamp_to(self.scale.min(), self.scale.max())
    }

    /// Release the analog input
    pub fn into_inner(self) -> A {
        self.adc
    }
}

impl<A: AnalogInput> VoltageSource for AdcSampler<A> {
    fn read_voltage(&mut self) -> Result<Millivolts, ScopeError> {
        let raw = self.adc.read_raw()?;
        Ok(self.convert(raw))
    }
}
