use super::Controller;
use crate::bus::Bus;
use crate::lis3dh::{Axes, DataRate, Lis3dh, Lis3dhConfig, Range, Resolution, SelfTest};

impl<B: Bus + Send + 'static> Controller<Lis3dh<B>> {
    /// Controller for a LIS3DH on `bus`, staged with the default configuration.
    pub fn with_bus(bus: B) -> Self {
        Self::new("lis3dh", Lis3dhConfig::default(), move |config| {
            Ok(Lis3dh::new(bus, config))
        })
    }

    /// Stages the output resolution. Checked against the data rate on start.
    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.stage(|config| config.resolution = resolution);
    }

    /// Stages the output data rate. Checked against the resolution on start.
    pub fn set_data_rate(&mut self, data_rate: DataRate) {
        self.stage(|config| config.data_rate = data_rate);
    }

    pub fn set_range(&mut self, range: Range) {
        self.stage(|config| config.range = range);
    }

    pub fn set_self_test(&mut self, self_test: SelfTest) {
        self.stage(|config| config.self_test = self_test);
    }

    pub fn enable_high_pass(&mut self, enabled: bool) {
        self.stage(|config| config.high_pass = enabled);
    }

    /// Stages axis enables. On the chip enabling is additive, so axes that are already
    /// on stay on.
    pub fn enable_axes(&mut self, axes: Axes) {
        self.stage(|config| config.axes = axes);
    }
}

#[cfg(feature = "linux")]
mod linux {
    use crate::bus::{I2cBus, I2cConfig, SpiBus, SpiConfig};
    use crate::controller::Controller;
    use crate::lis3dh::{Lis3dh, SPI_MAX_SPEED_HZ};
    use crate::linux::{LinuxI2cBus, LinuxSpiBus};

    impl Controller<Lis3dh<LinuxI2cBus>> {
        /// Controller for a LIS3DH on `/dev/i2c-{bus}`.
        pub fn i2c(address: u8, bus: u8) -> Self {
            Self::with_bus(I2cBus::new(I2cConfig::new(address, bus)))
        }
    }

    impl Controller<Lis3dh<LinuxSpiBus>> {
        /// Controller for a LIS3DH on `/dev/spidev{bus}.{chip_select}` at 10 MHz, mode 3.
        pub fn spi(bus: u8, chip_select: u8) -> Self {
            Self::spi_with(SpiConfig::new(bus, chip_select).with_max_speed_hz(SPI_MAX_SPEED_HZ))
        }

        /// Controller for a LIS3DH with explicit SPI parameters.
        pub fn spi_with(config: SpiConfig) -> Self {
            Self::with_bus(SpiBus::new(config))
        }
    }
}
