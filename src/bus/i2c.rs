//! Addressed transport built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::{Error as _, I2c};

use super::{Bus, Link, Opener, MAX_SEQUENCE_LEN, check_sequence_len};
use crate::error::{BusError, Error, Result};
use crate::log;

/// Parameters of an addressed transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// 7-bit device address.
    pub address: u8,
    /// Bus number (`/dev/i2c-N` on Linux).
    pub bus: u8,
}

impl I2cConfig {
    /// Creates bus parameters for the device at `address` on bus `bus`.
    pub const fn new(address: u8, bus: u8) -> Self {
        Self { address, bus }
    }
}

/// Device handles that know how to open themselves from [`I2cConfig`].
pub trait OpenI2c: Sized {
    /// Opens the device node for the configured bus.
    fn open(config: &I2cConfig) -> Result<Self>;
}

/// I2C-based register bus.
pub struct I2cBus<I2C> {
    config: I2cConfig,
    link: Link<I2C>,
    opener: Option<Opener<I2C, I2cConfig>>,
}

impl<I2C> I2cBus<I2C> {
    /// Wraps a device handle that is already available.
    ///
    /// [`Bus::start`] only marks the link open; no device node is opened.
    pub fn attach(i2c: I2C, config: I2cConfig) -> Self {
        Self {
            config,
            link: Link::Unopened(Some(i2c)),
            opener: None,
        }
    }

    /// Returns the transport parameters.
    pub fn config(&self) -> &I2cConfig {
        &self.config
    }

    /// Consumes the bus and returns the device handle if the link is open or attached.
    pub fn release(self) -> Option<I2C> {
        match self.link {
            Link::Open(i2c) | Link::Unopened(Some(i2c)) => Some(i2c),
            _ => None,
        }
    }
}

impl<I2C: OpenI2c> I2cBus<I2C> {
    /// Creates a bus that opens its device lazily on first use.
    pub fn new(config: I2cConfig) -> Self {
        Self {
            config,
            link: Link::Unopened(None),
            opener: Some(I2C::open),
        }
    }
}

impl<I2C: I2c> I2cBus<I2C> {
    fn device(&mut self) -> Result<&mut I2C> {
        self.link.open(&self.config, self.opener)
    }
}

fn transport(err: impl embedded_hal::i2c::Error) -> Error {
    BusError::I2c(err.kind()).into()
}

impl<I2C: I2c> Bus for I2cBus<I2C> {
    fn start(&mut self) -> Result<()> {
        self.device().map(|_| ())
    }

    fn stop(&mut self) -> Result<()> {
        self.link.close()
    }

    fn is_open(&self) -> bool {
        self.link.is_open()
    }

    fn read_register(&mut self, register: u8) -> Result<u8> {
        let mut value = [0u8; 1];
        self.read_register_sequence(register, &mut value)?;
        Ok(value[0])
    }

    fn read_register_sequence(&mut self, register: u8, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        check_sequence_len(buf.len())?;

        let address = self.config.address;
        self.device()?
            .write_read(address, &[register], buf)
            .map_err(transport)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.write_register_sequence(register, core::slice::from_ref(&value))
    }

    fn write_register_sequence(&mut self, register: u8, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        check_sequence_len(data.len())?;

        let mut frame = [0u8; MAX_SEQUENCE_LEN + 1];
        frame[0] = register;
        frame[1..=data.len()].copy_from_slice(data);

        log::trace!("i2c write {:#x} ({} bytes)", register, data.len());
        let address = self.config.address;
        self.device()?
            .write(address, &frame[..=data.len()])
            .map_err(transport)
    }
}
