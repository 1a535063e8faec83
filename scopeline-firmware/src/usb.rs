//! USB CDC ACM serial port
//!
//! The device enumerates as a single CDC ACM interface. Frames are written
//! as 64-byte bulk packets; a transfer ending on a full packet is closed
//! with a zero-length packet so the host flushes it to the terminal.

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config, UsbDevice};
use embedded_io_async::{ErrorKind, ErrorType, Write};
use static_cell::StaticCell;

/// Maximum for full speed USB
pub const MAX_PACKET_SIZE: u16 = 64;

pub type UsbDriver = Driver<'static, USB>;

/// Build the USB device, start its task and return the serial port
pub fn init(spawner: &Spawner, driver: UsbDriver) -> SerialPort {
    let mut config = Config::new(0x2e8a, 0x000a);
    config.manufacturer = Some("Scopeline");
    config.product = Some("ASCII oscilloscope");
    config.serial_number = Some("00000001");
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    // IAD descriptors so Windows binds the CDC driver
    config.device_class = 0xEF;
    config.device_sub_class = 0x02;
    config.device_protocol = 0x01;
    config.composite_with_iads = true;

    static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    static CDC_STATE: StaticCell<State> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        MSOS_DESCRIPTOR.init([0; 256]),
        CONTROL_BUF.init([0; 64]),
    );

    let class = CdcAcmClass::new(&mut builder, CDC_STATE.init(State::new()), MAX_PACKET_SIZE);
    let device = builder.build();

    spawner.spawn(usb_device_task(device)).unwrap();

    SerialPort::new(class)
}

#[embassy_executor::task]
async fn usb_device_task(mut device: UsbDevice<'static, UsbDriver>) {
    info!("USB device task started");

    device.run().await
}

/// Serial write failed: host detached or port closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub struct Disconnected;

impl embedded_io_async::Error for Disconnected {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NotConnected
    }
}

impl From<EndpointError> for Disconnected {
    fn from(_: EndpointError) -> Self {
        Disconnected
    }
}

/// Output side of the CDC interface as an `embedded_io_async` sink
pub struct SerialPort {
    class: CdcAcmClass<'static, UsbDriver>,
    /// Last packet was full, so the transfer still needs terminating
    needs_zlp: bool,
}

impl SerialPort {
    fn new(class: CdcAcmClass<'static, UsbDriver>) -> Self {
        Self {
            class,
            needs_zlp: false,
        }
    }

    /// A terminal has the port open (DTR asserted)
    pub fn is_open(&self) -> bool {
        self.class.dtr()
    }
}

impl ErrorType for SerialPort {
    type Error = Disconnected;
}

impl Write for SerialPort {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Disconnected> {
        if buf.is_empty() {
            return Ok(0);
        }

        let len = buf.len().min(MAX_PACKET_SIZE as usize);
        self.class.write_packet(&buf[..len]).await?;
        self.needs_zlp = len == MAX_PACKET_SIZE as usize;
        Ok(len)
    }

    async fn flush(&mut self) -> Result<(), Disconnected> {
        if self.needs_zlp {
            self.class.write_packet(&[]).await?;
            self.needs_zlp = false;
        }
        Ok(())
    }
}
