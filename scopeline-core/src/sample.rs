//! Voltage sample type
//!
//! Samples are carried as integer millivolts so the whole pipeline runs
//! without floating point on the target.

use core::fmt::{self, Write};

use heapless::String;

/// One voltage reading in millivolts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millivolts(pub u16);

impl Millivolts {
    pub const ZERO: Self = Self(0);

    /// Create a sample from a millivolt value
    pub const fn new(mv: u16) -> Self {
        Self(mv)
    }

    /// Raw millivolt value
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Convert from volts, rounding to the nearest millivolt
    ///
    /// Negative inputs and NaN become zero, values above 65.535 V saturate.
    pub fn from_volts(volts: f32) -> Self {
        // float-to-int `as` saturates and maps NaN to 0
        Self((volts * 1000.0 + 0.5) as u16)
    }

    /// Clamp into `[min, max]`
    pub fn clamp_to(self, min: Millivolts, max: Millivolts) -> Self {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }

    /// Value in tenths of a volt, rounded to nearest
    pub const fn tenths(self) -> u32 {
        (self.0 as u32 + 50) / 100
    }
}

impl From<u16> for Millivolts {
    fn from(mv: u16) -> Self {
        Self(mv)
    }
}

/// Formats as volts with one decimal place (`2500` -> `2.5`)
///
/// Honours width and alignment, so `{:>6}` right-aligns the label.
impl fmt::Display for Millivolts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = self.tenths();
        let mut buf: String<8> = String::new();
        write!(buf, "{}.{}", tenths / 10, tenths % 10)?;
        f.pad(&buf)
    }
}
