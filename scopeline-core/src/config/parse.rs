//! Minimal TOML parser for the scope configuration
//!
//! Handles only the subset `scope.toml` needs, without allocation:
//! - `[section]` headers (`sampler`, `display`)
//! - `key = value` pairs (string, integer, boolean)
//! - Comments (`# ...`), including trailing ones
//!
//! Keys that are not present keep their default value. The parsed result
//! is validated before it is returned.

use super::types::{
    ConfigError, DisplayConfig, LabelMode, LineEnding, SamplerConfig, ScopeConfig, SignalSource,
};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Key not recognised in the current section
    UnknownKey,
    /// Value has the wrong type or is out of range for its field
    InvalidValue,
    /// Parsed values failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Sampler,
    Display,
}

/// Parse TOML configuration into a validated [`ScopeConfig`]
pub fn parse_config(input: &str) -> Result<ScopeConfig, ParseError> {
    let mut config = ScopeConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        match section {
            Section::Root => return Err(ParseError::UnknownKey),
            Section::Sampler => apply_sampler(&mut config.sampler, key, value)?,
            Section::Display => apply_display(&mut config.display, key, value)?,
        }
    }

    config.validate()?;
    Ok(config)
}

/// Parse a `[name]` header line
fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let line = strip_comment(line);
    let name = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?
        .trim();

    match name {
        "sampler" => Ok(Section::Sampler),
        "display" => Ok(Section::Display),
        _ => Err(ParseError::InvalidSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Remove a trailing `# comment` that is not inside a string
fn strip_comment(value: &str) -> &str {
    match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    }
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_source(value: &str) -> Result<SignalSource, ParseError> {
    match parse_string(value) {
        "adc" => Ok(SignalSource::Adc),
        "simulated" | "sim" => Ok(SignalSource::Simulated),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_labels(value: &str) -> Result<LabelMode, ParseError> {
    match parse_string(value) {
        "sparse" => Ok(LabelMode::Sparse),
        "every" => Ok(LabelMode::Every),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_line_ending(value: &str) -> Result<LineEnding, ParseError> {
    match parse_string(value) {
        "crlf" => Ok(LineEnding::CrLf),
        "lf" => Ok(LineEnding::Lf),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_sampler(sampler: &mut SamplerConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "source" => sampler.source = parse_source(value)?,
        "adc_pin" => sampler.adc_pin = parse_int(value)?,
        "adc_vref_mv" => sampler.adc_vref_mv = parse_int(value)?,
        "fps" => sampler.fps = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_display(display: &mut DisplayConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "width" => display.width = parse_int(value)?,
        "height" => display.height = parse_int(value)?,
        "left_margin" => display.left_margin = parse_int(value)?,
        "min_mv" => display.min_mv = parse_int(value)?,
        "max_mv" => display.max_mv = parse_int(value)?,
        "grid" => display.grid = parse_bool(value)?,
        "connect" => display.connect = parse_bool(value)?,
        "labels" => display.labels = parse_labels(value)?,
        "line_ending" => display.line_ending = parse_line_ending(value)?,
        "home_cursor" => display.home_cursor = parse_bool(value)?,
        "banner" => display.banner = parse_bool(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}
