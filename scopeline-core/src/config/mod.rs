//! Configuration types
//!
//! Configuration is fixed at build time: the firmware embeds `scope.toml`
//! and parses it at startup with [`parse_config`].

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
