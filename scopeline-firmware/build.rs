//! Build script for scopeline-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates scope.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys allowed in each section, with their expected kind
const SAMPLER_KEYS: &[(&str, Kind)] = &[
    ("source", Kind::Choice(&["adc", "simulated", "sim"])),
    ("adc_pin", Kind::Int(26, 29)),
    ("adc_vref_mv", Kind::Int(1, 65535)),
    ("fps", Kind::Int(1, 100)),
];

const DISPLAY_KEYS: &[(&str, Kind)] = &[
    ("width", Kind::Int(1, 128)),
    ("height", Kind::Int(2, 32)),
    ("left_margin", Kind::Int(5, 155)),
    ("min_mv", Kind::Int(0, 65535)),
    ("max_mv", Kind::Int(0, 65535)),
    ("grid", Kind::Bool),
    ("connect", Kind::Bool),
    ("labels", Kind::Choice(&["sparse", "every"])),
    ("line_ending", Kind::Choice(&["crlf", "lf"])),
    ("home_cursor", Kind::Bool),
    ("banner", Kind::Bool),
];

/// Longest rendered line (label margin + plot)
const MAX_LINE_LEN: i64 = 160;

#[derive(Clone, Copy)]
enum Kind {
    Int(i64, i64),
    Bool,
    Choice(&'static [&'static str]),
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate scope.toml before it is embedded
fn validate_config() {
    println!("cargo:rerun-if-changed=scope.toml");

    let config_path = Path::new("scope.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail(
            "scope.toml could not be read",
            &[
                format!("{}", e),
                "The firmware embeds scope.toml from the crate directory.".into(),
            ],
        ),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in scope.toml",
            &e.to_string().lines().map(String::from).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();

    if let Some(root) = config.as_table() {
        for (name, _) in root {
            if name != "sampler" && name != "display" {
                errors.push(format!("unknown section [{}]", name));
            }
        }
    }

    check_section(&config, "sampler", SAMPLER_KEYS, &mut errors);
    check_section(&config, "display", DISPLAY_KEYS, &mut errors);
    check_cross_fields(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid configuration in scope.toml", &errors);
    }

    println!("cargo:warning=scope.toml validated successfully");
}

/// Check types and ranges of every key in one section
fn check_section(
    config: &toml::Value,
    section: &str,
    keys: &[(&str, Kind)],
    errors: &mut Vec<String>,
) {
    let table = match config.get(section) {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push(format!("[{}] must be a table", section));
            return;
        }
        // Missing sections fall back to defaults
        None => return,
    };

    for (key, value) in table {
        let kind = match keys.iter().find(|(name, _)| name == key) {
            Some((_, kind)) => *kind,
            None => {
                errors.push(format!("[{}] unknown key '{}'", section, key));
                continue;
            }
        };

        match (kind, value) {
            (Kind::Int(lo, hi), toml::Value::Integer(n)) => {
                if *n < lo || *n > hi {
                    errors.push(format!("[{}] {} must be {}-{}", section, key, lo, hi));
                }
            }
            (Kind::Bool, toml::Value::Boolean(_)) => {}
            (Kind::Choice(options), toml::Value::String(s)) => {
                if !options.contains(&s.as_str()) {
                    errors.push(format!(
                        "[{}] {} must be one of {}",
                        section,
                        key,
                        options.join(", ")
                    ));
                }
            }
            (Kind::Int(..), _) => errors.push(format!("[{}] {} must be an integer", section, key)),
            (Kind::Bool, _) => errors.push(format!("[{}] {} must be true or false", section, key)),
            (Kind::Choice(_), _) => errors.push(format!("[{}] {} must be a string", section, key)),
        }
    }
}

/// Rules spanning more than one key
fn check_cross_fields(config: &toml::Value, errors: &mut Vec<String>) {
    let display_int = |key: &str, default: i64| {
        config
            .get("display")
            .and_then(|d| d.get(key))
            .and_then(|v| v.as_integer())
            .unwrap_or(default)
    };

    let min_mv = display_int("min_mv", 0);
    let max_mv = display_int("max_mv", 5000);
    if max_mv <= min_mv {
        errors.push(format!(
            "[display] max_mv ({}) must be above min_mv ({})",
            max_mv, min_mv
        ));
    }

    let line_len = display_int("left_margin", 7) + display_int("width", 64);
    if line_len > MAX_LINE_LEN {
        errors.push(format!(
            "[display] left_margin + width is {} (max {})",
            line_len, MAX_LINE_LEN
        ));
    }
}

/// Abort the build with a boxed diagnostic
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| {
                let line = if line.chars().count() > 62 {
                    format!("{}...", line.chars().take(59).collect::<String>())
                } else {
                    line.clone()
                };
                format!("║  • {:<62} ║", line)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}
