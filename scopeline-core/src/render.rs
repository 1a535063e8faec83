//! ASCII waveform rendering
//!
//! Turns the sample history into a character grid:
//!
//! ```text
//!    5.0|----------------------------------------
//!       |          **
//!       |         *  *
//!    2.3|........*....*..........................
//!       |       *      *
//!    0.0|----------------------------------------
//! ```
//!
//! Rows are voltage bands (top = highest), columns are samples oldest to
//! newest starting at the left edge of the plot. Columns without a sample
//! yet stay blank.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{DisplayConfig, LabelMode, LineEnding, MAX_LINE_LEN, MAX_ROWS};
use crate::error::ScopeError;
use crate::history::HistoryBuffer;
use crate::sample::Millivolts;
use crate::scale::VoltageScale;
use crate::terminal::CURSOR_HOME;

/// Trace cell
pub const TRACE: u8 = b'*';
/// Axis bar between labels and plot
pub const AXIS: u8 = b'|';
/// Top and bottom grid line
pub const GRID_EDGE: u8 = b'-';
/// Middle grid line
pub const GRID_MID: u8 = b'.';
/// Empty cell
pub const BLANK: u8 = b' ';

/// One rendered frame: a fixed grid of ASCII bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    rows: Vec<Vec<u8, MAX_LINE_LEN>, MAX_ROWS>,
    /// Column where the plot starts
    plot_start: usize,
}

impl Frame {
    /// Blank grid of `rows` x `line_len`, clipped to the frame limits
    fn blank(rows: usize, line_len: usize, plot_start: usize) -> Self {
        let mut grid = Vec::new();
        for _ in 0..rows.min(MAX_ROWS) {
            let mut line = Vec::new();
            let _ = line.resize(line_len.min(MAX_LINE_LEN), BLANK);
            let _ = grid.push(line);
        }

        Self {
            rows: grid,
            plot_start,
        }
    }

    fn set(&mut self, row: usize, col: usize, cell: u8) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|line| line.get_mut(col)) {
            *slot = cell;
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Length of every row in bytes
    pub fn line_len(&self) -> usize {
        self.rows.first().map_or(0, |line| line.len())
    }

    /// Column where the plot starts (label margin width)
    pub fn plot_start(&self) -> usize {
        self.plot_start
    }

    /// Text of one row
    pub fn line(&self, row: usize) -> Option<&str> {
        self.rows
            .get(row)
            .map(|line| core::str::from_utf8(line).unwrap_or(""))
    }

    /// All rows, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(|line| core::str::from_utf8(line).unwrap_or(""))
    }

    /// Byte at an absolute position
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        self.rows.get(row).and_then(|line| line.get(col)).copied()
    }

    /// Byte at a plot position (column 0 = first sample slot)
    pub fn plot_cell(&self, row: usize, col: usize) -> Option<u8> {
        self.cell(row, self.plot_start + col)
    }

    /// Bytes [`encode`](Self::encode) will produce
    pub fn encoded_len(&self, encoding: &Encoding) -> usize {
        let prefix = if encoding.home_cursor {
            CURSOR_HOME.len()
        } else {
            0
        };
        prefix + self.rows() * (self.line_len() + encoding.line_ending.as_bytes().len())
    }

    /// Serialise into `buf`, returning the number of bytes written
    ///
    /// Fails with [`ScopeError::FrameOverflow`] if `buf` is too small;
    /// nothing useful is left in `buf` in that case.
    pub fn encode(&self, buf: &mut [u8], encoding: &Encoding) -> Result<usize, ScopeError> {
        if buf.len() < self.encoded_len(encoding) {
            return Err(ScopeError::FrameOverflow);
        }

        let mut pos = 0;
        let mut put = |bytes: &[u8]| {
            buf[pos..pos + bytes.len()].copy_from_slice(bytes);
            pos += bytes.len();
        };

        if encoding.home_cursor {
            put(CURSOR_HOME);
        }
        for line in &self.rows {
            put(line);
            put(encoding.line_ending.as_bytes());
        }

        Ok(pos)
    }
}

/// How frames are serialised for the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Encoding {
    pub line_ending: LineEnding,
    pub home_cursor: bool,
}

impl From<&DisplayConfig> for Encoding {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            line_ending: config.line_ending,
            home_cursor: config.home_cursor,
        }
    }
}

/// Owns the sample history and draws it
#[derive(Debug, Clone)]
pub struct Renderer<const MAX: usize> {
    history: HistoryBuffer<MAX>,
    scale: VoltageScale,
    margin: usize,
    width: usize,
    grid: bool,
    connect: bool,
    labels: LabelMode,
}

impl<const MAX: usize> Renderer<MAX> {
    /// Create a renderer with an empty history of `config.width` samples
    pub fn new(config: &DisplayConfig) -> Self {
        let width = (config.width as usize).min(MAX);
        Self {
            history: HistoryBuffer::with_capacity(width),
            scale: config.scale(),
            margin: config.left_margin as usize,
            width,
            grid: config.grid,
            connect: config.connect,
            labels: config.labels,
        }
    }

    /// Append a sample, evicting the oldest when the plot is full
    pub fn push_sample(&mut self, sample: Millivolts) {
        self.history.push_sample(sample);
    }

    pub fn history(&self) -> &HistoryBuffer<MAX> {
        &self.history
    }

    pub fn scale(&self) -> &VoltageScale {
        &self.scale
    }

    /// Draw the current history
    ///
    /// Pure function of the history and configuration.
    pub fn render(&self) -> Frame {
        let rows = self.scale.rows();
        let mut frame = Frame::blank(rows, self.margin + self.width, self.margin);

        for row in 0..rows {
            self.draw_axis(&mut frame, row);
            if self.grid {
                self.draw_grid(&mut frame, row);
            }
        }
        self.draw_trace(&mut frame);

        frame
    }

    fn is_labelled(&self, row: usize) -> bool {
        let rows = self.scale.rows();
        match self.labels {
            LabelMode::Every => true,
            LabelMode::Sparse => row == 0 || row == rows / 2 || row + 1 == rows,
        }
    }

    /// Voltage label right-aligned against the axis bar
    fn draw_axis(&self, frame: &mut Frame, row: usize) {
        let bar = self.margin.saturating_sub(1);
        frame.set(row, bar, AXIS);

        if !self.is_labelled(row) {
            return;
        }

        let mut label: String<8> = String::new();
        if write!(label, "{}", self.scale.label_level(row)).is_err() {
            return;
        }

        let bytes = label.as_bytes();
        // Keep the rightmost digits if the margin is too narrow
        let len = bytes.len().min(bar);
        let start = bar - len;
        for (i, &b) in bytes[bytes.len() - len..].iter().enumerate() {
            frame.set(row, start + i, b);
        }
    }

    fn draw_grid(&self, frame: &mut Frame, row: usize) {
        let rows = self.scale.rows();
        let plot = self.margin..self.margin + self.width;

        if row == 0 || row + 1 == rows {
            for col in plot.clone() {
                frame.set(row, col, GRID_EDGE);
            }
        }
        if row == rows / 2 {
            for col in plot {
                if frame.cell(row, col) == Some(BLANK) {
                    frame.set(row, col, GRID_MID);
                }
            }
        }
    }

    fn draw_trace(&self, frame: &mut Frame) {
        let mut prev_row: Option<usize> = None;

        for (i, sample) in self.history.iter().enumerate() {
            let col = self.margin + i;
            let row = self.scale.row_for(sample);
            frame.set(row, col, TRACE);

            // Vertical connector in the previous column, from the previous
            // row toward this one (this row excluded)
            if let Some(prev) = prev_row.filter(|_| self.connect) {
                let span = if prev < row { prev..row } else { row + 1..prev + 1 };
                for r in span {
                    frame.set(r, col - 1, TRACE);
                }
            }

            prev_row = Some(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5 columns, 5 rows over 0-5 V, no decorations
    fn bare_config() -> DisplayConfig {
        DisplayConfig {
            width: 5,
            height: 5,
            left_margin: 6,
            min_mv: 0,
            max_mv: 5000,
            grid: false,
            connect: false,
            labels: LabelMode::Sparse,
            line_ending: LineEnding::Lf,
            home_cursor: false,
            banner: false,
        }
    }

    fn push_volts<const MAX: usize>(renderer: &mut Renderer<MAX>, volts: &[f32]) {
        for &v in volts {
            renderer.push_sample(Millivolts::from_volts(v));
        }
    }

    fn trace_cells(frame: &Frame) -> std::vec::Vec<(usize, usize)> {
        let mut cells = std::vec::Vec::new();
        for row in 0..frame.rows() {
            for col in 0..frame.line_len() - frame.plot_start() {
                if frame.plot_cell(row, col) == Some(TRACE) {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    #[test]
    fn test_one_mark_per_band_oldest_left() {
        let mut renderer: Renderer<5> = Renderer::new(&bare_config());
        push_volts(&mut renderer, &[0.2, 1.4, 2.6, 3.8, 4.9]);

        let frame = renderer.render();
        assert_eq!(
            trace_cells(&frame),
            vec![(0, 4), (1, 3), (2, 2), (3, 1), (4, 0)]
        );
    }

    #[test]
    fn test_samples_off_band_centre_fill_every_row() {
        let mut renderer: Renderer<5> = Renderer::new(&bare_config());
        push_volts(&mut renderer, &[4.3, 3.2, 2.2, 1.2, 0.7]);

        let frame = renderer.render();
        assert_eq!(
            trace_cells(&frame),
            vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]
        );
        assert_eq!(frame.line(0), Some("  5.0|*    "));
        assert_eq!(frame.line(4), Some("  0.0|    *"));
    }

    #[test]
    fn test_height_beyond_frame_limit_is_clamped() {
        let mut renderer: Renderer<5> = Renderer::new(&DisplayConfig {
            height: MAX_ROWS as u16 + 8,
            ..bare_config()
        });
        push_volts(&mut renderer, &[0.0, 5.0]);

        let frame = renderer.render();
        assert_eq!(frame.rows(), MAX_ROWS);
        assert_eq!(renderer.scale().rows(), MAX_ROWS);
        assert_eq!(trace_cells(&frame), vec![(0, 1), (MAX_ROWS - 1, 0)]);
    }

    #[test]
    fn test_partial_history_leaves_blank_columns() {
        let mut renderer: Renderer<5> = Renderer::new(&bare_config());
        push_volts(&mut renderer, &[2.5, 2.5]);

        let frame = renderer.render();
        assert_eq!(trace_cells(&frame), vec![(2, 0), (2, 1)]);
        for row in 0..frame.rows() {
            for col in 2..5 {
                assert_eq!(frame.plot_cell(row, col), Some(BLANK));
            }
        }
    }

    #[test]
    fn test_empty_history_has_no_trace() {
        let renderer: Renderer<5> = Renderer::new(&bare_config());
        assert!(trace_cells(&renderer.render()).is_empty());
    }

    #[test]
    fn test_scrolls_after_capacity() {
        let mut renderer: Renderer<5> = Renderer::new(&bare_config());
        push_volts(&mut renderer, &[0.2, 1.4, 2.6, 3.8, 4.9, 0.0]);

        let frame = renderer.render();
        // 0.2 evicted, everything shifted one column left
        assert_eq!(
            trace_cells(&frame),
            vec![(0, 3), (1, 2), (2, 1), (3, 0), (4, 4)]
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut renderer: Renderer<5> = Renderer::new(&DisplayConfig {
            grid: true,
            connect: true,
            ..bare_config()
        });
        push_volts(&mut renderer, &[1.0, 3.75, 2.5, 0.0, 5.0]);

        let first = renderer.render();
        for _ in 0..5 {
            assert_eq!(renderer.render(), first);
        }
    }

    #[test]
    fn test_sparse_labels_and_axis() {
        let renderer: Renderer<5> = Renderer::new(&bare_config());
        let frame = renderer.render();

        assert_eq!(frame.line(0), Some("  5.0|     "));
        assert_eq!(frame.line(1), Some("     |     "));
        assert_eq!(frame.line(2), Some("  2.0|     "));
        assert_eq!(frame.line(3), Some("     |     "));
        assert_eq!(frame.line(4), Some("  0.0|     "));
    }

    #[test]
    fn test_every_row_labelled() {
        let renderer: Renderer<5> = Renderer::new(&DisplayConfig {
            labels: LabelMode::Every,
            ..bare_config()
        });
        let frame = renderer.render();

        assert_eq!(frame.line(1), Some("  3.0|     "));
        assert_eq!(frame.line(3), Some("  1.0|     "));
    }

    #[test]
    fn test_grid_lines_under_trace() {
        let mut renderer: Renderer<5> = Renderer::new(&DisplayConfig {
            grid: true,
            ..bare_config()
        });
        push_volts(&mut renderer, &[2.5, 5.0]);

        let frame = renderer.render();
        assert_eq!(frame.line(0), Some("  5.0|-*---"));
        assert_eq!(frame.line(2), Some("  2.0|*...."));
        assert_eq!(frame.line(4), Some("  0.0|-----"));
    }

    #[test]
    fn test_connectors_fill_previous_column() {
        let mut renderer: Renderer<5> = Renderer::new(&DisplayConfig {
            connect: true,
            ..bare_config()
        });
        // row 4, then row 0, then row 2
        push_volts(&mut renderer, &[0.0, 5.0, 2.5]);

        let frame = renderer.render();
        let column = |col: usize| -> std::vec::Vec<u8> {
            (0..5).map(|row| frame.plot_cell(row, col).unwrap()).collect()
        };

        // Rising 4 -> 0: connector on rows 1..=4 of column 0
        assert_eq!(column(0), b" ****".to_vec());
        // Falling 0 -> 2: connector on rows 0..2 of column 1
        assert_eq!(column(1), b"**   ".to_vec());
        assert_eq!(column(2), b"  *  ".to_vec());
    }

    #[test]
    fn test_encode_with_prefix_and_crlf() {
        let mut renderer: Renderer<5> = Renderer::new(&DisplayConfig {
            height: 2,
            width: 2,
            ..bare_config()
        });
        push_volts(&mut renderer, &[5.0, 0.0]);

        let frame = renderer.render();
        let encoding = Encoding {
            line_ending: LineEnding::CrLf,
            home_cursor: true,
        };
        let mut buf = [0u8; 64];
        let len = frame.encode(&mut buf, &encoding).unwrap();

        assert_eq!(len, frame.encoded_len(&encoding));
        assert_eq!(&buf[..len], b"\x1b[H  5.0|* \r\n  0.0| *\r\n");
    }

    #[test]
    fn test_encode_overflow() {
        let renderer: Renderer<5> = Renderer::new(&bare_config());
        let frame = renderer.render();
        let mut buf = [0u8; 8];
        assert_eq!(
            frame.encode(&mut buf, &Encoding::from(&bare_config())),
            Err(ScopeError::FrameOverflow)
        );
    }
}
