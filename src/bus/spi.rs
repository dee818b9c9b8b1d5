//! Framed transport built on top of `embedded-hal` `SpiDevice`.

use embedded_hal::spi::{Error as _, SpiDevice};

use super::{Bus, Link, Opener, MAX_SEQUENCE_LEN, check_sequence_len};
use crate::error::{BusError, ConfigError, Error, Result};
use crate::log;

/// Read/write discriminator carried in the address byte.
pub const READ_FLAG: u8 = 0x80;
/// Address auto-increment flag for multi-byte frames.
pub const AUTO_INCREMENT_FLAG: u8 = 0x40;

/// Default clock for the bare bus layer.
pub const DEFAULT_MAX_SPEED_HZ: u32 = 1_000_000;

/// SPI clock polarity/phase selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// CPOL = 0, CPHA = 0.
    Mode0,
    /// CPOL = 0, CPHA = 1.
    Mode1,
    /// CPOL = 1, CPHA = 0.
    Mode2,
    /// CPOL = 1, CPHA = 1.
    Mode3,
}

impl TryFrom<u8> for SpiMode {
    type Error = ConfigError;

    fn try_from(mode: u8) -> core::result::Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::Mode0),
            1 => Ok(Self::Mode1),
            2 => Ok(Self::Mode2),
            3 => Ok(Self::Mode3),
            other => Err(ConfigError::InvalidSpiMode(other)),
        }
    }
}

/// Parameters of a framed transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Bus number.
    pub bus: u8,
    /// Chip-select line.
    pub chip_select: u8,
    /// Maximum clock frequency in hertz.
    pub max_speed_hz: u32,
    /// Clock mode.
    pub mode: SpiMode,
}

impl SpiConfig {
    /// Creates parameters with the default clock (1 MHz) and mode 3.
    pub const fn new(bus: u8, chip_select: u8) -> Self {
        Self {
            bus,
            chip_select,
            max_speed_hz: DEFAULT_MAX_SPEED_HZ,
            mode: SpiMode::Mode3,
        }
    }

    /// Overrides the maximum clock frequency.
    pub const fn with_max_speed_hz(mut self, max_speed_hz: u32) -> Self {
        self.max_speed_hz = max_speed_hz;
        self
    }

    /// Overrides the clock mode.
    pub const fn with_mode(mut self, mode: SpiMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Device handles that know how to open themselves from [`SpiConfig`].
pub trait OpenSpi: Sized {
    /// Opens and configures the device node for the configured chip select.
    fn open(config: &SpiConfig) -> Result<Self>;
}

/// SPI-based register bus.
pub struct SpiBus<SPI> {
    config: SpiConfig,
    link: Link<SPI>,
    opener: Option<Opener<SPI, SpiConfig>>,
}

impl<SPI> SpiBus<SPI> {
    /// Wraps a device handle that is already available.
    pub fn attach(spi: SPI, config: SpiConfig) -> Self {
        Self {
            config,
            link: Link::Unopened(Some(spi)),
            opener: None,
        }
    }

    /// Returns the transport parameters.
    pub fn config(&self) -> &SpiConfig {
        &self.config
    }

    /// Consumes the bus and returns the device handle if the link is open or attached.
    pub fn release(self) -> Option<SPI> {
        match self.link {
            Link::Open(spi) | Link::Unopened(Some(spi)) => Some(spi),
            _ => None,
        }
    }
}

impl<SPI: OpenSpi> SpiBus<SPI> {
    /// Creates a bus that opens its device lazily on first use.
    pub fn new(config: SpiConfig) -> Self {
        Self {
            config,
            link: Link::Unopened(None),
            opener: Some(SPI::open),
        }
    }
}

impl<SPI: SpiDevice> SpiBus<SPI> {
    fn device(&mut self) -> Result<&mut SPI> {
        self.link.open(&self.config, self.opener)
    }

    /// Full-duplex frame: address byte followed by `buf.len()` dummy bytes.
    fn read_frame(&mut self, command: u8, buf: &mut [u8]) -> Result<()> {
        check_sequence_len(buf.len())?;

        let mut frame = [0u8; MAX_SEQUENCE_LEN + 1];
        frame[0] = command;
        let frame = &mut frame[..=buf.len()];
        self.device()?.transfer_in_place(frame).map_err(transport)?;

        buf.copy_from_slice(&frame[1..]);
        Ok(())
    }

    fn write_frame(&mut self, command: u8, data: &[u8]) -> Result<()> {
        check_sequence_len(data.len())?;

        let mut frame = [0u8; MAX_SEQUENCE_LEN + 1];
        frame[0] = command;
        frame[1..=data.len()].copy_from_slice(data);

        log::trace!("spi write {:#x} ({} bytes)", command, data.len());
        self.device()?
            .write(&frame[..=data.len()])
            .map_err(transport)
    }
}

fn transport(err: impl embedded_hal::spi::Error) -> Error {
    BusError::Spi(err.kind()).into()
}

impl<SPI: SpiDevice> Bus for SpiBus<SPI> {
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
        self.read_frame(register | READ_FLAG, &mut value)?;
        Ok(value[0])
    }

    fn read_register_sequence(&mut self, register: u8, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        self.read_frame(register | READ_FLAG | AUTO_INCREMENT_FLAG, buf)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.write_frame(register, core::slice::from_ref(&value))
    }

    fn write_register_sequence(&mut self, register: u8, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.write_frame(register | AUTO_INCREMENT_FLAG, data)
    }
}

#[cfg(test)]
mod tests {
    use super::{SpiBus, SpiConfig, SpiMode};
    use crate::bus::Bus;
    use crate::error::{BusError, ConfigError, Error};
    use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};

    struct MockDevice<'a> {
        expectations: &'a [Expectation<'a>],
        index: usize,
    }

    impl<'a> MockDevice<'a> {
        fn new(expectations: &'a [Expectation<'a>]) -> Self {
            Self { expectations, index: 0 }
        }
    }

    impl<'a> Drop for MockDevice<'a> {
        fn drop(&mut self) {
            if !std::thread::panicking() {
                assert_eq!(
                    self.index,
                    self.expectations.len(),
                    "not all SPI expectations consumed"
                );
            }
        }
    }

    impl<'a> ErrorType for MockDevice<'a> {
        type Error = ErrorKind;
    }

    impl<'a> SpiDevice for MockDevice<'a> {
        fn transaction<'b>(
            &mut self,
            operations: &mut [Operation<'b, u8>],
        ) -> Result<(), Self::Error> {
            let expected = self
                .expectations
                .get(self.index)
                .expect("unexpected SPI transaction");
            self.index += 1;

            assert_eq!(operations.len(), 1, "expected a single operation per frame");
            match (expected, &mut operations[0]) {
                (Expectation::Transfer { sent, response }, Operation::TransferInPlace(buf)) => {
                    assert_eq!(&buf[..], *sent, "frame mismatch");
                    buf.copy_from_slice(response);
                    Ok(())
                }
                (Expectation::Write { sent }, Operation::Write(data)) => {
                    assert_eq!(*data, *sent, "frame mismatch");
                    Ok(())
                }
                (Expectation::Fail, _) => Err(ErrorKind::ModeFault),
                _ => panic!("operation kind mismatch"),
            }
        }
    }

    enum Expectation<'a> {
        Transfer { sent: &'a [u8], response: &'a [u8] },
        Write { sent: &'a [u8] },
        Fail,
    }

    fn config() -> SpiConfig {
        SpiConfig::new(0, 0)
    }

    #[test]
    fn read_sets_high_flag_and_returns_second_byte() {
        let expectations = [Expectation::Transfer {
            sent: &[0xA7, 0x00],
            response: &[0xFF, 0x08],
        }];
        let mut bus = SpiBus::attach(MockDevice::new(&expectations), config());

        assert_eq!(bus.read_register(0x27).unwrap(), 0x08);
    }

    #[test]
    fn write_frames_address_and_value() {
        let expectations = [Expectation::Write { sent: &[0x20, 0x97] }];
        let mut bus = SpiBus::attach(MockDevice::new(&expectations), config());

        bus.write_register(0x20, 0x97).unwrap();
    }

    #[test]
    fn sequences_use_auto_increment() {
        let expectations = [
            Expectation::Transfer {
                sent: &[0xE8, 0x00, 0x00],
                response: &[0x00, 0x40, 0x12],
            },
            Expectation::Write { sent: &[0x60, 0x01, 0x02] },
        ];
        let mut bus = SpiBus::attach(MockDevice::new(&expectations), config());

        let mut buf = [0u8; 2];
        bus.read_register_sequence(0x28, &mut buf).unwrap();
        assert_eq!(buf, [0x40, 0x12]);
        bus.write_register_sequence(0x20, &[0x01, 0x02]).unwrap();
    }

    #[test]
    fn empty_sequences_skip_the_bus() {
        let expectations: [Expectation; 0] = [];
        let mut bus = SpiBus::attach(MockDevice::new(&expectations), config());

        bus.read_register_sequence(0x28, &mut []).unwrap();
        bus.write_register_sequence(0x28, &[]).unwrap();
    }

    #[test]
    fn transport_errors_map_to_bus_errors() {
        let expectations = [Expectation::Fail];
        let mut bus = SpiBus::attach(MockDevice::new(&expectations), config());

        assert_eq!(
            bus.read_register(0x0F),
            Err(Error::Bus(BusError::Spi(ErrorKind::ModeFault)))
        );
    }

    #[test]
    fn config_defaults_match_bus_layer() {
        let config = SpiConfig::new(1, 0);
        assert_eq!(config.max_speed_hz, 1_000_000);
        assert_eq!(config.mode, SpiMode::Mode3);
        assert_eq!(SpiMode::try_from(4), Err(ConfigError::InvalidSpiMode(4)));
    }
}
