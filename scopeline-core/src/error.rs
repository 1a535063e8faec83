//! Runtime error taxonomy for the tick pipeline

use scopeline_hal::AdcError;

/// Errors raised while producing or delivering a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScopeError {
    /// Analog input could not be read
    HardwareUnavailable(AdcError),
    /// Serial write failed (host gone, cable unplugged)
    TransportUnavailable,
    /// Encoded frame does not fit the output buffer
    FrameOverflow,
}

impl ScopeError {
    /// Fatal errors stop the tick loop; the rest drop one frame
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScopeError::HardwareUnavailable(_))
    }
}

impl From<AdcError> for ScopeError {
    fn from(e: AdcError) -> Self {
        ScopeError::HardwareUnavailable(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_hardware_is_fatal() {
        assert!(ScopeError::HardwareUnavailable(AdcError::ConversionFailed).is_fatal());
        assert!(!ScopeError::TransportUnavailable.is_fatal());
        assert!(!ScopeError::FrameOverflow.is_fatal());
    }
}
