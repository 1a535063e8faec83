//! Scope task: sample, render and stream one frame per tick
//!
//! Sampling continues while no terminal is attached so the first frame
//! after connecting already shows a full history. A frame that cannot be
//! written within one tick period is dropped.

use defmt::*;
use embassy_time::{with_timeout, Duration, Ticker};
use static_cell::StaticCell;

use scopeline_core::config::{ScopeConfig, MAX_WIDTH};
use scopeline_core::sampler::Sampler;
use scopeline_core::scope::FRAME_BUF_LEN;
use scopeline_core::{Scope, ScopeError, TickOutcome};
use scopeline_hal_rp2040::RpAnalogInput;

use crate::usb::SerialPort;

/// Encoded frame buffer, kept off the task stack
static FRAME_BUF: StaticCell<[u8; FRAME_BUF_LEN]> = StaticCell::new();

/// Log dropped frames once every this many
const DROP_LOG_INTERVAL: u32 = 100;

#[embassy_executor::task]
pub async fn scope_task(
    config: ScopeConfig,
    mut sampler: Sampler<RpAnalogInput<'static>>,
    mut serial: SerialPort,
) {
    info!("Scope task started");

    let mut scope: Scope<MAX_WIDTH> = Scope::new(config);
    let buf = FRAME_BUF.init([0; FRAME_BUF_LEN]);

    let period = Duration::from_millis(config.sampler.period_ms() as u64);
    let mut ticker = Ticker::every(period);
    let mut connected = false;
    let mut dropped: u32 = 0;

    loop {
        ticker.next().await;

        if !serial.is_open() {
            if connected {
                info!("Terminal disconnected");
                connected = false;
            }
            if let Err(e) = scope.sample(&mut sampler) {
                halt(e);
                return;
            }
            continue;
        }

        if !connected {
            info!("Terminal connected");
            connected = true;
            match with_timeout(period, scope.greet(&mut serial)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Banner not sent: {}", e),
                Err(_) => warn!("Banner not sent: write timed out"),
            }
        }

        match with_timeout(period, scope.stream(&mut sampler, &mut serial, buf)).await {
            Ok(Ok(TickOutcome::Delivered(len))) => {
                trace!("Frame sent ({} bytes)", len);
            }
            Ok(Ok(TickOutcome::Dropped(e))) => {
                dropped = dropped.wrapping_add(1);
                if dropped % DROP_LOG_INTERVAL == 1 {
                    debug!("Frame dropped: {} ({} total)", e, dropped);
                }
            }
            Ok(Err(e)) => {
                halt(e);
                return;
            }
            Err(_) => {
                // Sample was recorded before the write stalled
                dropped = dropped.wrapping_add(1);
                if dropped % DROP_LOG_INTERVAL == 1 {
                    debug!("Frame dropped: write timed out ({} total)", dropped);
                }
            }
        }
    }
}

/// Report a fatal sampling failure; the task ends after this
fn halt(e: ScopeError) {
    error!("Sampling failed: {}, scope stopped", e);
}
