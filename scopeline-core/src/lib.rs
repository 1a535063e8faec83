//! Board-agnostic core logic for the Scopeline ASCII oscilloscope
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Voltage sample type and display scale
//! - Rolling history buffer
//! - ASCII waveform renderer and frame encoding
//! - Sample sources (ADC conversion, simulated signal)
//! - Configuration types and the embedded config parser
//! - The per-tick sample/render/output pipeline

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod history;
pub mod render;
pub mod sample;
pub mod sampler;
pub mod scale;
pub mod scope;
pub mod terminal;

pub use error::ScopeError;
pub use history::HistoryBuffer;
pub use render::{Frame, Renderer};
pub use sample::Millivolts;
pub use scale::VoltageScale;
pub use scope::{Scope, TickOutcome};
