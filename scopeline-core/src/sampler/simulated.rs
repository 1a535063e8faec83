//! Simulated input signal
//!
//! Composite wave centred on the middle of the display range:
//!
//! ```text
//! v(t) = mid + 0.35 * span * sin(2t) + 0.15 * span * sin(0.17t + 1.2)
//! ```
//!
//! with `t` advancing 0.12 per tick. Phases are 16-bit turn fractions
//! (65536 = one full turn) and sine comes from a quarter-wave lookup table,
//! so no floating point is needed.

use crate::error::ScopeError;
use crate::sample::Millivolts;
use crate::scale::VoltageScale;

use super::VoltageSource;

/// sin(k * 90° / 16) * 1000 for k = 0..=16
const SINE_TABLE: [i16; 17] = [
    0, 98, 195, 290, 383, 471, 556, 634, 707, 773, 831, 882, 924, 957, 981, 995, 1000,
];

/// Fast component phase step: 2 rad/unit * 0.12 units per tick
const FAST_STEP: u16 = 2503;

/// Slow component phase step: 0.17 rad/unit * 0.12 units per tick
const SLOW_STEP: u16 = 213;

/// Slow component phase offset: 1.2 rad
const SLOW_OFFSET: u16 = 12516;

/// Sine of a 16-bit turn fraction, scaled by 1000
///
/// Linear interpolation between table entries keeps the error within a
/// few thousandths.
pub fn sin_x1000(phase: u16) -> i32 {
    let quadrant = phase >> 14;
    let pos = (phase & 0x3FFF) as u32;

    // Mirror the second and fourth quadrants onto the first
    let pos = if quadrant & 1 == 1 { 0x4000 - pos } else { pos };

    let idx = (pos >> 10) as usize;
    let value = if idx >= SINE_TABLE.len() - 1 {
        SINE_TABLE[SINE_TABLE.len() - 1] as i32
    } else {
        let lo = SINE_TABLE[idx] as i32;
        let hi = SINE_TABLE[idx + 1] as i32;
        let frac = (pos & 0x3FF) as i32;
        lo + (hi - lo) * frac / 1024
    };

    if quadrant >= 2 {
        -value
    } else {
        value
    }
}

/// Synthetic signal generator
#[derive(Debug, Clone)]
pub struct SimulatedSignal {
    scale: VoltageScale,
    fast_phase: u16,
    slow_phase: u16,
}

impl SimulatedSignal {
    /// Start a signal at t = 0 over the given display range
    pub fn new(scale: VoltageScale) -> Self {
        Self {
            scale,
            fast_phase: 0,
            slow_phase: SLOW_OFFSET,
        }
    }

    /// Produce the sample for the current tick and advance time
    pub fn next_sample(&mut self) -> Millivolts {
        let min = self.scale.min().0 as i32;
        let span = self.scale.max().0 as i32 - min;
        let mid = min + span / 2;

        let fast = span * 35 / 100 * sin_x1000(self.fast_phase) / 1000;
        let slow = span * 15 / 100 * sin_x1000(self.slow_phase) / 1000;

        self.fast_phase = self.fast_phase.wrapping_add(FAST_STEP);
        self.slow_phase = self.slow_phase.wrapping_add(SLOW_STEP);

        let v = (mid + fast + slow).clamp(min, self.scale.max().0 as i32);
        Millivolts(v as u16)
    }
}

impl VoltageSource for SimulatedSignal {
    fn read_voltage(&mut self) -> Result<Millivolts, ScopeError> {
        Ok(self.next_sample())
    }
}
