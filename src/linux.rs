//! Linux transports: `/dev/i2c-N` and `/dev/spidevB.C` through `linux-embedded-hal`.

use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{I2cdev, SpidevDevice};

use crate::ads1015::{Ads1015, Ads1015Config};
use crate::bus::{I2cBus, I2cConfig, OpenI2c, OpenSpi, SpiBus, SpiConfig, SpiMode};
use crate::error::{BusError, Result};
use crate::lis3dh::{Lis3dh, Lis3dhConfig, SPI_MAX_SPEED_HZ};

/// I2C bus backed by the Linux `i2c-dev` interface.
pub type LinuxI2cBus = I2cBus<I2cdev>;
/// SPI bus backed by the Linux `spidev` interface.
pub type LinuxSpiBus = SpiBus<SpidevDevice>;

impl OpenI2c for I2cdev {
    fn open(config: &I2cConfig) -> Result<Self> {
        let path = format!("/dev/i2c-{}", config.bus);
        I2cdev::new(&path).map_err(|err| {
            BusError::Open {
                path,
                reason: format!("{err:?}"),
            }
            .into()
        })
    }
}

impl OpenSpi for SpidevDevice {
    fn open(config: &SpiConfig) -> Result<Self> {
        let path = format!("/dev/spidev{}.{}", config.bus, config.chip_select);
        let open_error = |reason: String| BusError::Open {
            path: path.clone(),
            reason,
        };

        let mut spi = SpidevDevice::open(&path).map_err(|err| open_error(format!("{err:?}")))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(config.max_speed_hz)
            .mode(mode_flags(config.mode))
            .build();
        spi.0
            .configure(&options)
            .map_err(|err| open_error(format!("{err:?}")))?;
        Ok(spi)
    }
}

fn mode_flags(mode: SpiMode) -> SpiModeFlags {
    match mode {
        SpiMode::Mode0 => SpiModeFlags::SPI_MODE_0,
        SpiMode::Mode1 => SpiModeFlags::SPI_MODE_1,
        SpiMode::Mode2 => SpiModeFlags::SPI_MODE_2,
        SpiMode::Mode3 => SpiModeFlags::SPI_MODE_3,
    }
}

impl Lis3dh<LinuxI2cBus> {
    /// LIS3DH on `/dev/i2c-{bus}` with the default configuration. Opens lazily.
    pub fn i2c(address: u8, bus: u8) -> Self {
        Self::new(I2cBus::new(I2cConfig::new(address, bus)), Lis3dhConfig::default())
    }
}

impl Lis3dh<LinuxSpiBus> {
    /// LIS3DH on `/dev/spidev{bus}.{chip_select}` at 10 MHz, mode 3.
    pub fn spi(bus: u8, chip_select: u8) -> Self {
        let config = SpiConfig::new(bus, chip_select).with_max_speed_hz(SPI_MAX_SPEED_HZ);
        Self::new(SpiBus::new(config), Lis3dhConfig::default())
    }
}

impl Ads1015<LinuxI2cBus> {
    /// ADS1015 on `/dev/i2c-{bus}` with the default configuration. Opens lazily.
    pub fn i2c(address: u8, bus: u8) -> Self {
        Self::new(I2cBus::new(I2cConfig::new(address, bus)), Ads1015Config::default())
    }
}
