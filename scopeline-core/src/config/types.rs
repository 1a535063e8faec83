//! Configuration type definitions
//!
//! Defaults reproduce the stock scope: 64 x 20 plot, 0-5 V scale, 25 fps,
//! simulated input.

use crate::sample::Millivolts;
use crate::scale::VoltageScale;

/// Maximum plot width (history capacity) in columns
pub const MAX_WIDTH: usize = 128;

/// Maximum plot height in rows
pub const MAX_ROWS: usize = 32;

/// Maximum rendered line length, label margin included
pub const MAX_LINE_LEN: usize = 160;

/// Narrowest label margin: room for `x.y` and the axis bar
pub const MIN_LEFT_MARGIN: u8 = 5;

/// Highest supported frame rate
pub const MAX_FPS: u8 = 100;

/// Where samples come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalSource {
    /// Read the configured ADC input
    Adc,
    /// Synthetic composite sine wave, no hardware needed
    #[default]
    Simulated,
}

/// Which rows carry a voltage label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LabelMode {
    /// Top, middle and bottom rows
    #[default]
    Sparse,
    /// Every row
    Every,
}

/// Line terminator written after each frame row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEnding {
    /// `\r\n`, what most serial terminals expect
    #[default]
    CrLf,
    /// `\n` only
    Lf,
}

impl LineEnding {
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::CrLf => b"\r\n",
            LineEnding::Lf => b"\n",
        }
    }
}

/// Sampling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    /// Signal source
    pub source: SignalSource,
    /// GPIO pin of the analog input (26-29)
    pub adc_pin: u8,
    /// ADC reference voltage in millivolts
    pub adc_vref_mv: u16,
    /// Ticks per second
    pub fps: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            source: SignalSource::Simulated,
            adc_pin: 26,
            adc_vref_mv: 3300,
            fps: 25,
        }
    }
}

impl SamplerConfig {
    /// Tick period in milliseconds
    pub fn period_ms(&self) -> u32 {
        1000 / self.fps.max(1) as u32
    }
}

/// Frame layout and output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Plot width in columns, also the history capacity
    pub width: u16,
    /// Plot height in rows
    pub height: u16,
    /// Columns reserved for labels, the last one holds the axis bar
    pub left_margin: u8,
    /// Voltage shown on the bottom row
    pub min_mv: u16,
    /// Voltage shown on the top row
    pub max_mv: u16,
    /// Draw top/bottom/middle grid lines
    pub grid: bool,
    /// Join consecutive samples with vertical connectors
    pub connect: bool,
    /// Label placement
    pub labels: LabelMode,
    /// Row terminator
    pub line_ending: LineEnding,
    /// Prefix each frame with ANSI cursor-home
    pub home_cursor: bool,
    /// Send the banner line when a terminal connects
    pub banner: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 20,
            left_margin: 7,
            min_mv: 0,
            max_mv: 5000,
            grid: true,
            connect: true,
            labels: LabelMode::Sparse,
            line_ending: LineEnding::CrLf,
            home_cursor: true,
            banner: true,
        }
    }
}

impl DisplayConfig {
    /// Voltage scale spanning the configured rows
    pub fn scale(&self) -> VoltageScale {
        VoltageScale::new(Millivolts(self.min_mv), Millivolts(self.max_mv), self.height)
    }

    /// Length of one rendered row in bytes
    pub fn line_len(&self) -> usize {
        self.left_margin as usize + self.width as usize
    }
}

/// Complete scope configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScopeConfig {
    pub sampler: SamplerConfig,
    pub display: DisplayConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width is zero or above [`MAX_WIDTH`]
    InvalidWidth,
    /// Height is below 2 or above [`MAX_ROWS`]
    InvalidHeight,
    /// Margin narrower than [`MIN_LEFT_MARGIN`]
    InvalidMargin,
    /// Margin plus width exceeds [`MAX_LINE_LEN`]
    LineTooLong,
    /// `max_mv` is not above `min_mv`
    InvalidRange,
    /// ADC reference is zero
    InvalidVref,
    /// Frame rate is zero or above [`MAX_FPS`]
    InvalidFps,
    /// Pin is not an ADC input
    InvalidAdcPin,
}

impl ScopeConfig {
    /// Check every field against the supported limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        let display = &self.display;
        let sampler = &self.sampler;

        if display.width == 0 || display.width as usize > MAX_WIDTH {
            return Err(ConfigError::InvalidWidth);
        }
        if display.height < 2 || display.height as usize > MAX_ROWS {
            return Err(ConfigError::InvalidHeight);
        }
        if display.left_margin < MIN_LEFT_MARGIN {
            return Err(ConfigError::InvalidMargin);
        }
        if display.line_len() > MAX_LINE_LEN {
            return Err(ConfigError::LineTooLong);
        }
        if display.max_mv <= display.min_mv {
            return Err(ConfigError::InvalidRange);
        }
        if sampler.adc_vref_mv == 0 {
            return Err(ConfigError::InvalidVref);
        }
        if sampler.fps == 0 || sampler.fps > MAX_FPS {
            return Err(ConfigError::InvalidFps);
        }
        if !(26..=29).contains(&sampler.adc_pin) {
            return Err(ConfigError::InvalidAdcPin);
        }

        Ok(())
    }
}
