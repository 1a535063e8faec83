//! RP2040-specific HAL for Scopeline
//!
//! Implements the shared `scopeline-hal` traits on top of `embassy-rp`:
//!
//! - ADC channel map (GPIO26..29)
//! - Blocking single-channel analog input

#![no_std]

pub mod adc;

pub use adc::{AdcChannel, RpAnalogInput};
