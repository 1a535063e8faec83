//! Voltage to display row mapping
//!
//! The display range is cut into `rows` equal voltage bands. Row 0 at the
//! top shows the highest band, the last row the lowest. Band `b` (0 =
//! lowest) covers `[min + b*span/rows, min + (b+1)*span/rows)`; the top band
//! also takes `max` itself. A sample exactly on a boundary therefore lands
//! in the higher band (smaller row index). All arithmetic is integer so the
//! mapping is exact and repeatable.

use crate::config::MAX_ROWS;
use crate::sample::Millivolts;

/// Linear voltage scale over a fixed number of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VoltageScale {
    min: Millivolts,
    max: Millivolts,
    rows: u16,
}

impl VoltageScale {
    /// Create a scale from `min` (bottom row) to `max` (top row)
    ///
    /// The row count is kept within `1..=MAX_ROWS`, the most a frame holds.
    pub const fn new(min: Millivolts, max: Millivolts, rows: u16) -> Self {
        let rows = if rows == 0 {
            1
        } else if rows as usize > MAX_ROWS {
            MAX_ROWS as u16
        } else {
            rows
        };
        Self { min, max, rows }
    }

    pub fn min(&self) -> Millivolts {
        self.min
    }

    pub fn max(&self) -> Millivolts {
        self.max
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    fn span(&self) -> u32 {
        self.max.0.saturating_sub(self.min.0) as u32
    }

    /// Row index (0 = top) whose band holds the sample; out-of-range
    /// samples clamp to the top or bottom row
    pub fn row_for(&self, sample: Millivolts) -> usize {
        let span = self.span();
        let rows = self.rows as u32;
        if span == 0 {
            return 0;
        }

        let v = sample.clamp_to(self.min, self.max);
        let band = ((v.0 - self.min.0) as u32 * rows / span).min(rows - 1);
        (rows - 1 - band) as usize
    }

    /// Lowest millivolt value that still maps to `row`
    ///
    /// Rows past the bottom are treated as the bottom row.
    pub fn row_floor(&self, row: usize) -> Millivolts {
        let rows = self.rows as u32;
        let band = rows - 1 - (row as u32).min(rows - 1);
        // Boundaries fall between millivolts when span/rows is fractional,
        // round up so the value is inside the band
        let offset = (band * self.span() + rows - 1) / rows;
        Millivolts(self.min.0 + offset as u16)
    }

    /// Voltage printed next to `row`
    ///
    /// The top row shows the top of the range, every other row the bottom
    /// of its band, so the labels read like a ruler from `max` down to `min`.
    pub fn label_level(&self, row: usize) -> Millivolts {
        if row == 0 {
            self.max
        } else {
            self.row_floor(row)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scale_0_5v(rows: u16) -> VoltageScale {
        VoltageScale::new(Millivolts(0), Millivolts(5000), rows)
    }

    #[test]
    fn test_five_rows_one_per_band() {
        let scale = scale_0_5v(5);
        assert_eq!(scale.row_for(Millivolts(4900)), 0);
        assert_eq!(scale.row_for(Millivolts(3800)), 1);
        assert_eq!(scale.row_for(Millivolts(2600)), 2);
        assert_eq!(scale.row_for(Millivolts(1400)), 3);
        assert_eq!(scale.row_for(Millivolts(200)), 4);
    }

    #[test]
    fn test_samples_anywhere_in_band() {
        // One value per 1 V band, away from the band centres
        let scale = scale_0_5v(5);
        let rows: std::vec::Vec<usize> = [4300, 3200, 2200, 1200, 700]
            .iter()
            .map(|&mv| scale.row_for(Millivolts(mv)))
            .collect();
        assert_eq!(rows, vec![0, 1, 2, 3, 4]);

        // Band edges
        assert_eq!(scale.row_for(Millivolts(5000)), 0);
        assert_eq!(scale.row_for(Millivolts(4001)), 0);
        assert_eq!(scale.row_for(Millivolts(999)), 4);
        assert_eq!(scale.row_for(Millivolts(0)), 4);
    }

    #[test]
    fn test_boundary_goes_to_higher_band() {
        let scale = scale_0_5v(5);
        assert_eq!(scale.row_for(Millivolts(4000)), 0);
        assert_eq!(scale.row_for(Millivolts(3999)), 1);
        assert_eq!(scale.row_for(Millivolts(1000)), 3);

        // Same answer on every call
        for _ in 0..10 {
            assert_eq!(scale.row_for(Millivolts(4000)), 0);
        }
    }

    #[test]
    fn test_fractional_band_edges() {
        // Edges at 333.3 and 666.7 mV
        let scale = VoltageScale::new(Millivolts(0), Millivolts(1000), 3);
        assert_eq!(scale.row_for(Millivolts(333)), 2);
        assert_eq!(scale.row_for(Millivolts(334)), 1);
        assert_eq!(scale.row_for(Millivolts(666)), 1);
        assert_eq!(scale.row_for(Millivolts(667)), 0);
        assert_eq!(scale.row_floor(1), Millivolts(334));
        assert_eq!(scale.row_floor(0), Millivolts(667));
    }

    #[test]
    fn test_out_of_range_clamps() {
        let scale = VoltageScale::new(Millivolts(1000), Millivolts(4000), 10);
        assert_eq!(scale.row_for(Millivolts(0)), 9);
        assert_eq!(scale.row_for(Millivolts(9000)), 0);
    }

    #[test]
    fn test_labels() {
        let scale = scale_0_5v(5);
        assert_eq!(scale.label_level(0), Millivolts(5000));
        assert_eq!(scale.label_level(1), Millivolts(3000));
        assert_eq!(scale.label_level(4), Millivolts(0));

        let scale = scale_0_5v(20);
        // Row 10 is band 9 of 20: 9 * 250 mV
        assert_eq!(scale.label_level(10), Millivolts(2250));
        assert_eq!(scale.label_level(19), Millivolts(0));
        assert_eq!(scale.label_level(99), Millivolts(0));
    }

    #[test]
    fn test_row_count_limits() {
        assert_eq!(scale_0_5v(0).rows(), 1);
        assert_eq!(scale_0_5v(40).rows(), MAX_ROWS);
        // Bottom of the range still lands on the last drawable row
        assert_eq!(scale_0_5v(40).row_for(Millivolts(0)), MAX_ROWS - 1);
    }

    #[test]
    fn test_degenerate_scales() {
        let single = scale_0_5v(1);
        assert_eq!(single.row_for(Millivolts(0)), 0);
        assert_eq!(single.row_for(Millivolts(5000)), 0);
        assert_eq!(single.label_level(0), Millivolts(5000));

        let flat = VoltageScale::new(Millivolts(3000), Millivolts(3000), 8);
        assert_eq!(flat.row_for(Millivolts(100)), 0);
    }

    proptest! {
        #[test]
        fn prop_row_in_bounds(sample in any::<u16>(), rows in 1u16..=32) {
            let scale = scale_0_5v(rows);
            prop_assert!(scale.row_for(Millivolts(sample)) < rows as usize);
        }

        #[test]
        fn prop_higher_voltage_never_lower_row(a in 0u16..=5000, b in 0u16..=5000, rows in 2u16..=32) {
            let scale = scale_0_5v(rows);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scale.row_for(Millivolts(hi)) <= scale.row_for(Millivolts(lo)));
        }

        #[test]
        fn prop_floor_is_band_edge(min in 0u16..3000, extra in 32u16..3000, rows in 1u16..=32, row in 0usize..32) {
            let scale = VoltageScale::new(Millivolts(min), Millivolts(min + extra), rows);
            let row = row.min(rows as usize - 1);
            let floor = scale.row_floor(row);
            prop_assert_eq!(scale.row_for(floor), row);
            if row + 1 < rows as usize {
                prop_assert_eq!(scale.row_for(Millivolts(floor.0 - 1)), row + 1);
            }
        }
    }
}
