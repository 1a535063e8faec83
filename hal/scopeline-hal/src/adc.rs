//! Analog input abstractions
//!
//! Provides a trait for single-channel analog-to-digital conversion that can
//! be implemented by chip-specific HALs.

/// Errors that can occur during an analog conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// The converter reported a failed or invalid conversion
    ConversionFailed,
    /// The input channel is not available (not configured, or in use)
    Unavailable,
}

/// Single-channel analog input
///
/// Implementations own both the converter and the channel, so a read needs
/// no further arguments.
pub trait AnalogInput {
    /// Largest raw value the converter can return (4095 for 12-bit)
    fn full_scale(&self) -> u16;

    /// Perform one blocking conversion and return the raw count
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_raw(&mut self) -> Result<u16, AdcError>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn full_scale(&self) -> u16 {
        (**self).full_scale()
    }

    fn read_raw(&mut self) -> Result<u16, AdcError> {
        (**self).read_raw()
    }
}
