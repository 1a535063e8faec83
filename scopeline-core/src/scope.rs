//! Per-tick pipeline: sample, record, render, write
//!
//! ```text
//! VoltageSource ──► HistoryBuffer ──► Renderer ──► Frame ──► encode ──► serial
//! ```
//!
//! One [`Scope`] owns the only history buffer. Hardware failures surface as
//! errors and end the loop; output problems only cost the current frame.

use embedded_io_async::Write;

use crate::config::{ScopeConfig, MAX_LINE_LEN, MAX_ROWS};
use crate::error::ScopeError;
use crate::render::{Encoding, Frame, Renderer};
use crate::sample::Millivolts;
use crate::sampler::VoltageSource;
use crate::terminal::{banner, CLEAR_SCREEN, CURSOR_HOME};

/// Output buffer size that fits any valid frame
pub const FRAME_BUF_LEN: usize = CURSOR_HOME.len() + MAX_ROWS * (MAX_LINE_LEN + 2);

/// Result of a streamed tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Frame written, carrying its size in bytes
    Delivered(usize),
    /// Frame discarded; the sample is still recorded
    Dropped(ScopeError),
}

/// The oscilloscope state machine
pub struct Scope<const MAX: usize> {
    config: ScopeConfig,
    renderer: Renderer<MAX>,
    encoding: Encoding,
}

impl<const MAX: usize> Scope<MAX> {
    /// Create a scope with an empty history
    ///
    /// The configuration is expected to be validated; widths above `MAX`
    /// are truncated to `MAX` columns.
    pub fn new(config: ScopeConfig) -> Self {
        Self {
            renderer: Renderer::new(&config.display),
            encoding: Encoding::from(&config.display),
            config,
        }
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn renderer(&self) -> &Renderer<MAX> {
        &self.renderer
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Take one sample and record it
    pub fn sample<S: VoltageSource>(&mut self, source: &mut S) -> Result<Millivolts, ScopeError> {
        let sample = source.read_voltage()?;
        self.renderer.push_sample(sample);
        Ok(sample)
    }

    /// One tick without output: read, push, render
    pub fn tick<S: VoltageSource>(&mut self, source: &mut S) -> Result<Frame, ScopeError> {
        self.sample(source)?;
        Ok(self.renderer.render())
    }

    /// One tick with output
    ///
    /// Only hardware failures are returned as `Err`. Encoding or write
    /// failures give [`TickOutcome::Dropped`] and leave the history intact
    /// so the next tick redraws everything.
    pub async fn stream<S, W>(
        &mut self,
        source: &mut S,
        out: &mut W,
        buf: &mut [u8],
    ) -> Result<TickOutcome, ScopeError>
    where
        S: VoltageSource,
        W: Write,
    {
        let frame = self.tick(source)?;

        let len = match frame.encode(buf, &self.encoding) {
            Ok(len) => len,
            Err(e) => return Ok(TickOutcome::Dropped(e)),
        };

        match write_bytes(out, &buf[..len]).await {
            Ok(()) => Ok(TickOutcome::Delivered(len)),
            Err(e) => Ok(TickOutcome::Dropped(e)),
        }
    }

    /// Clear the terminal and print the banner line
    ///
    /// Sent once per host connection. The banner is skipped when disabled
    /// in the display config.
    pub async fn greet<W: Write>(&self, out: &mut W) -> Result<(), ScopeError> {
        write_bytes(out, CLEAR_SCREEN).await?;
        write_bytes(out, CURSOR_HOME).await?;

        if self.config.display.banner {
            let line = banner(&self.config);
            write_bytes(out, line.as_bytes()).await?;
            write_bytes(out, self.encoding.line_ending.as_bytes()).await?;
        }

        Ok(())
    }
}

async fn write_bytes<W: Write>(out: &mut W, bytes: &[u8]) -> Result<(), ScopeError> {
    out.write_all(bytes)
        .await
        .map_err(|_| ScopeError::TransportUnavailable)?;
    out.flush()
        .await
        .map_err(|_| ScopeError::TransportUnavailable)
}
