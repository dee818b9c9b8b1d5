//! Bus abstraction over the register-oriented transports the sensors sit on.
//!
//! Both transports follow the same link lifecycle: a bus starts out unopened, opens on
//! [`Bus::start`] or lazily on the first register access, and is closed exactly once by
//! [`Bus::stop`]. A closed bus cannot be reopened.

pub mod i2c;
pub mod spi;

pub use i2c::{I2cBus, I2cConfig, OpenI2c};
pub use spi::{OpenSpi, SpiBus, SpiConfig, SpiMode};

use crate::error::{BusError, LifecycleError, Result};

/// Largest payload accepted by the sequence operations.
pub const MAX_SEQUENCE_LEN: usize = 16;

/// Register-level access required by the sensor drivers.
pub trait Bus {
    /// Opens the transport. Does nothing if the link is already open.
    fn start(&mut self) -> Result<()>;

    /// Closes the transport.
    fn stop(&mut self) -> Result<()>;

    /// Returns `true` while the link is open.
    fn is_open(&self) -> bool;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> Result<u8>;

    /// Reads consecutive registers into the provided buffer.
    fn read_register_sequence(&mut self, register: u8, buf: &mut [u8]) -> Result<()>;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> Result<()>;

    /// Writes consecutive registers from the provided buffer.
    fn write_register_sequence(&mut self, register: u8, data: &[u8]) -> Result<()>;
}

/// Produces an open device handle from bus parameters.
pub(crate) type Opener<D, P> = fn(&P) -> Result<D>;

/// Link state shared by every transport.
pub(crate) enum Link<D> {
    /// Not opened yet; may hold a device handle supplied up front.
    Unopened(Option<D>),
    Open(D),
    Closed,
}

impl<D> Link<D> {
    pub(crate) fn is_open(&self) -> bool {
        matches!(self, Link::Open(_))
    }

    /// Opens the link, using the attached handle or the opener.
    pub(crate) fn open<P>(&mut self, params: &P, opener: Option<Opener<D, P>>) -> Result<&mut D> {
        if let Link::Unopened(attached) = self {
            let device = match attached.take() {
                Some(device) => device,
                None => match opener {
                    Some(open) => open(params)?,
                    None => return Err(BusError::NoDevice.into()),
                },
            };
            *self = Link::Open(device);
        }

        match self {
            Link::Open(device) => Ok(device),
            Link::Closed => Err(LifecycleError::Stopped.into()),
            Link::Unopened(_) => Err(BusError::NoDevice.into()),
        }
    }

    /// Closes the link, dropping the device handle.
    pub(crate) fn close(&mut self) -> Result<()> {
        match self {
            Link::Open(_) => {
                *self = Link::Closed;
                Ok(())
            }
            Link::Unopened(_) => Err(LifecycleError::NotStarted.into()),
            Link::Closed => Err(LifecycleError::Stopped.into()),
        }
    }
}

pub(crate) fn check_sequence_len(len: usize) -> Result<()> {
    if len > MAX_SEQUENCE_LEN {
        return Err(BusError::SequenceTooLong(len).into());
    }
    Ok(())
}
