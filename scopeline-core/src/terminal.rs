//! Terminal control sequences and the connection banner

use core::fmt::Write;

use heapless::String;

use crate::config::{ScopeConfig, SignalSource};
use crate::sample::Millivolts;

/// ANSI erase display
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";

/// ANSI cursor to row 1, column 1
pub const CURSOR_HOME: &[u8] = b"\x1b[H";

/// Maximum banner length
pub const BANNER_LEN: usize = 96;

/// One-line summary shown when a terminal connects, e.g.
/// `ASCII OSC | Mode: ADC0 GP26 | Scale: 0.0..5.0V | W=64 H=20 FPS=25`
pub fn banner(config: &ScopeConfig) -> String<BANNER_LEN> {
    let mut line = String::new();
    let display = &config.display;
    let sampler = &config.sampler;

    let _ = line.push_str("ASCII OSC | Mode: ");
    let _ = match sampler.source {
        SignalSource::Adc => write!(
            line,
            "ADC{} GP{}",
            sampler.adc_pin.saturating_sub(26),
            sampler.adc_pin
        ),
        SignalSource::Simulated => write!(line, "SIM"),
    };
    let _ = write!(
        line,
        " | Scale: {}..{}V | W={} H={} FPS={}",
        Millivolts(display.min_mv),
        Millivolts(display.max_mv),
        display.width,
        display.height,
        sampler.fps
    );

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_banner() {
        let config = ScopeConfig::default();
        assert_eq!(
            banner(&config).as_str(),
            "ASCII OSC | Mode: SIM | Scale: 0.0..5.0V | W=64 H=20 FPS=25"
        );
    }

    #[test]
    fn test_adc_banner() {
        let mut config = ScopeConfig::default();
        config.sampler.source = SignalSource::Adc;
        config.sampler.adc_pin = 27;
        config.display.max_mv = 3300;
        assert_eq!(
            banner(&config).as_str(),
            "ASCII OSC | Mode: ADC1 GP27 | Scale: 0.0..3.3V | W=64 H=20 FPS=25"
        );
    }
}
