//! Scopeline - ASCII oscilloscope firmware
//!
//! Samples one analog input (or a simulated test wave), keeps a rolling
//! history and streams it as an ASCII waveform over USB CDC serial.
//! Open the port in any terminal emulator to watch the trace.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use {defmt_rtt as _, panic_probe as _};

use scopeline_core::config::{parse_config, ScopeConfig};
use scopeline_core::sampler::Sampler;
use scopeline_hal_rp2040::{AdcChannel, RpAnalogInput};

/// Embedded configuration (compiled into firmware)
/// Edit scope.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../scope.toml");

mod tasks;
mod usb;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Scopeline firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Config: source={}, {}x{} @ {} fps, {}..{} mV",
        config.sampler.source,
        config.display.width,
        config.display.height,
        config.sampler.fps,
        config.display.min_mv,
        config.display.max_mv
    );

    // Pin is validated to 26..=29, fall back to ADC0 regardless
    let adc_channel = AdcChannel::from_gpio(config.sampler.adc_pin).unwrap_or(AdcChannel::Adc0);
    let channel = match adc_channel {
        AdcChannel::Adc0 => Channel::new_pin(p.PIN_26, Pull::None),
        AdcChannel::Adc1 => Channel::new_pin(p.PIN_27, Pull::None),
        AdcChannel::Adc2 => Channel::new_pin(p.PIN_28, Pull::None),
        AdcChannel::Adc3 => Channel::new_pin(p.PIN_29, Pull::None),
    };
    let adc = Adc::new_blocking(p.ADC, embassy_rp::adc::Config::default());
    let input = RpAnalogInput::new(adc, channel, adc_channel);
    let sampler = Sampler::from_config(&config, input);
    info!("ADC initialized on GPIO{}", adc_channel.gpio());

    let driver = Driver::new(p.USB, Irqs);
    let serial = usb::init(&spawner, driver);
    info!("USB CDC initialized");

    spawner
        .spawn(tasks::scope_task(config, sampler, serial))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded configuration
///
/// An invalid file leaves the built-in defaults in place. build.rs rejects
/// most mistakes before they get this far.
fn load_config() -> ScopeConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded configuration");
            config
        }
        Err(e) => {
            error!("Invalid embedded configuration ({}), using defaults", e);
            ScopeConfig::default()
        }
    }
}
