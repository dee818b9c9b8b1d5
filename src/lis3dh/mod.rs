//! Driver for the ST LIS3DH 3-axis accelerometer.

pub mod config;
pub mod params;
pub mod registers;

pub use config::{Lis3dhConfig, Lis3dhConfigBuilder};
pub use params::{Axes, DataRate, Range, Resolution, SelfTest};

use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;

use crate::bus::{Bus, I2cBus, I2cConfig, SpiBus, SpiConfig};
use crate::error::{Error, Result};
use crate::log;
use crate::registers::{Register, RegisterAccess};
use crate::sensor::{Sensor, combine_bytes, twos_complement};
use registers::{
    CtrlReg1, CtrlReg2, CtrlReg4, Status, EXPECTED_WHO_AM_I, REG_OUT_X_H, REG_OUT_X_L,
    REG_OUT_Y_H, REG_OUT_Y_L, REG_OUT_Z_H, REG_OUT_Z_L, REG_STATUS, REG_WHO_AM_I,
};

/// I2C address with the `SDO/SA0` pin pulled low.
pub const I2C_ADDRESS_SA0_LOW: u8 = 0x18;
/// I2C address with the `SDO/SA0` pin pulled high.
pub const I2C_ADDRESS_SA0_HIGH: u8 = 0x19;
/// SPI clock used by the sensor-level convenience constructors.
pub const SPI_MAX_SPEED_HZ: u32 = 10_000_000;

const HIGH_REGISTERS: [u8; 3] = [REG_OUT_X_H, REG_OUT_Y_H, REG_OUT_Z_H];
const LOW_REGISTERS: [u8; 3] = [REG_OUT_X_L, REG_OUT_Y_L, REG_OUT_Z_L];

/// Converts a signed raw reading to g for the given resolution and range.
pub fn raw_to_gravity(raw: i16, resolution: Resolution, range: Range) -> f32 {
    let half_scale = (1u32 << resolution.bits()) as f32 / 2.0;
    raw as f32 / (half_scale / range.g() as f32)
}

/// High-level synchronous driver for the LIS3DH accelerometer.
pub struct Lis3dh<B> {
    bus: B,
    config: Lis3dhConfig,
}

impl<B> Lis3dh<B> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus.
    ///
    /// Nothing is written until [`Lis3dh::init`] or [`Lis3dh::configure`] runs.
    pub fn new(bus: B, config: Lis3dhConfig) -> Self {
        Self { bus, config }
    }

    /// Consumes the driver and returns the owned bus.
    pub fn release(self) -> (B, Lis3dhConfig) {
        (self.bus, self.config)
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Lis3dhConfig {
        &self.config
    }
}

impl<I2C: I2c> Lis3dh<I2cBus<I2C>> {
    /// Convenience constructor for I2C transports.
    pub fn new_i2c(i2c: I2C, address: u8, config: Lis3dhConfig) -> Self {
        Self::new(I2cBus::attach(i2c, I2cConfig::new(address, 0)), config)
    }
}

impl<SPI: SpiDevice> Lis3dh<SpiBus<SPI>> {
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, config: Lis3dhConfig) -> Self {
        let bus_config = SpiConfig::new(0, 0).with_max_speed_hz(SPI_MAX_SPEED_HZ);
        Self::new(SpiBus::attach(spi, bus_config), config)
    }
}

impl<B: Bus> Lis3dh<B> {
    // ==================================================================
    // == Lifecycle & Identification ====================================
    // ==================================================================
    /// Opens the bus.
    pub fn start(&mut self) -> Result<()> {
        self.bus.start()
    }

    /// Closes the bus.
    pub fn stop(&mut self) -> Result<()> {
        self.bus.stop()
    }

    /// Opens the bus, checks the chip identity and applies the stored configuration.
    pub fn init(&mut self) -> Result<()> {
        self.start()?;
        self.check_id()?;
        self.configure(self.config)
    }

    /// Verifies `WHO_AM_I` against the LIS3DH identifier.
    pub fn check_id(&mut self) -> Result<()> {
        let id = self.bus.read_register(REG_WHO_AM_I)?;
        if id != EXPECTED_WHO_AM_I {
            log::warn!("lis3dh WHO_AM_I mismatch: {:#x}", id);
            return Err(Error::DeviceIdMismatch(id));
        }
        Ok(())
    }

    // ==================================================================
    // == Configuration =================================================
    // ==================================================================
    /// Validates and programs a complete configuration.
    ///
    /// Axis enables are additive here as well: axes missing from `config` keep
    /// whatever state the chip already has.
    pub fn configure(&mut self, config: Lis3dhConfig) -> Result<()> {
        config.validate()?;

        let ctrl1 = self.modify::<CtrlReg1>(|reg| {
            reg.set_odr(config.data_rate.code());
            reg.set_low_power(config.resolution == Resolution::Low);
            enable_axes(reg, config.axes);
        })?;
        self.modify::<CtrlReg4>(|reg| {
            reg.set_range(config.range);
            reg.set_high_resolution(config.resolution == Resolution::High);
            reg.set_self_test(config.self_test);
        })?;
        self.modify::<CtrlReg2>(|reg| set_high_pass(reg, config.high_pass))?;

        self.config = config;
        self.config.axes = enabled_axes(ctrl1);
        log::debug!(
            "lis3dh configured: {} Hz, +/-{} g, {} bit",
            config.data_rate.hz(),
            config.range.g(),
            config.resolution.bits()
        );
        Ok(())
    }

    /// Switches between 8-, 10- and 12-bit output.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        self.config.data_rate.check(resolution)?;

        self.modify::<CtrlReg1>(|reg| reg.set_low_power(resolution == Resolution::Low))?;
        self.modify::<CtrlReg4>(|reg| {
            reg.set_high_resolution(resolution == Resolution::High)
        })?;
        self.config.resolution = resolution;
        Ok(())
    }

    /// Sets the output data rate.
    pub fn set_data_rate(&mut self, data_rate: DataRate) -> Result<()> {
        data_rate.check(self.config.resolution)?;

        self.modify::<CtrlReg1>(|reg| reg.set_odr(data_rate.code()))?;
        self.config.data_rate = data_rate;
        Ok(())
    }

    /// Sets the full-scale measurement range.
    pub fn set_range(&mut self, range: Range) -> Result<()> {
        self.modify::<CtrlReg4>(|reg| reg.set_range(range))?;
        self.config.range = range;
        Ok(())
    }

    /// Selects the self-test mode.
    pub fn set_self_test(&mut self, self_test: SelfTest) -> Result<()> {
        self.modify::<CtrlReg4>(|reg| reg.set_self_test(self_test))?;
        self.config.self_test = self_test;
        Ok(())
    }

    /// Enables or disables the high-pass filter on the output path.
    pub fn enable_high_pass(&mut self, enabled: bool) -> Result<()> {
        self.modify::<CtrlReg2>(|reg| set_high_pass(reg, enabled))?;
        self.config.high_pass = enabled;
        Ok(())
    }

    /// Enables the requested axes.
    ///
    /// Enabling is additive: passing `false` for an axis leaves it as it was, so an axis
    /// that is already on stays on.
    pub fn enable_axes(&mut self, axes: Axes) -> Result<()> {
        let reg = self.modify::<CtrlReg1>(|reg| enable_axes(reg, axes))?;
        self.config.axes = enabled_axes(reg);
        Ok(())
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reports whether a new X/Y/Z sample set is available.
    pub fn new_data_available(&mut self) -> Result<bool> {
        let status = Status::from(self.bus.read_register(REG_STATUS)?);
        Ok(status.xyz_available())
    }

    /// Reads a signed raw acceleration triplet at the configured resolution.
    pub fn read_raw(&mut self) -> Result<[i16; 3]> {
        let bits = self.config.resolution.bits();

        let mut high = [0u8; 3];
        for (byte, register) in high.iter_mut().zip(HIGH_REGISTERS) {
            *byte = self.bus.read_register(register)?;
        }

        let mut low = [0u8; 3];
        if self.config.resolution != Resolution::Low {
            for (byte, register) in low.iter_mut().zip(LOW_REGISTERS) {
                *byte = self.bus.read_register(register)?;
            }
        }

        Ok(core::array::from_fn(|axis| {
            twos_complement(combine_bytes(high[axis], low[axis], bits), bits)
        }))
    }

    /// Reads an acceleration triplet in g.
    pub fn read(&mut self) -> Result<[f32; 3]> {
        let raw = self.read_raw()?;
        let Lis3dhConfig { resolution, range, .. } = self.config;
        Ok(raw.map(|value| raw_to_gravity(value, resolution, range)))
    }

    // ==================================================================
    // == Internal Configuration Helpers ================================
    // ==================================================================
    fn modify<R>(&mut self, mutate: impl FnOnce(&mut R)) -> Result<R>
    where
        R: Register<Raw = u8> + From<u8> + Copy,
        u8: From<R>,
    {
        debug_assert_eq!(R::ACCESS, RegisterAccess::ReadWrite);

        let current = self.bus.read_register(R::ADDRESS)?;
        let mut reg = R::from(current);
        mutate(&mut reg);

        let updated = u8::from(reg);
        if updated != current {
            log::trace!("lis3dh {:#x}: {:#x} -> {:#x}", R::ADDRESS, current, updated);
            self.bus.write_register(R::ADDRESS, updated)?;
        }
        Ok(reg)
    }
}

fn enable_axes(reg: &mut CtrlReg1, axes: Axes) {
    if axes.x {
        reg.set_x_enable(true);
    }
    if axes.y {
        reg.set_y_enable(true);
    }
    if axes.z {
        reg.set_z_enable(true);
    }
}

fn enabled_axes(reg: CtrlReg1) -> Axes {
    Axes::new(reg.x_enable(), reg.y_enable(), reg.z_enable())
}

fn set_high_pass(reg: &mut CtrlReg2, enabled: bool) {
    if enabled {
        reg.set_hpm(0b10);
        reg.set_fds(true);
    } else {
        reg.set_hpm(0);
        reg.set_hpcf(0);
        reg.set_fds(false);
    }
}

impl<B: Bus> Sensor for Lis3dh<B> {
    type Config = Lis3dhConfig;
    type Sample = [f32; 3];

    fn start(&mut self) -> Result<()> {
        Lis3dh::start(self)
    }

    fn stop(&mut self) -> Result<()> {
        Lis3dh::stop(self)
    }

    fn configure(&mut self, config: Lis3dhConfig) -> Result<()> {
        Lis3dh::configure(self, config)
    }

    fn config(&self) -> &Lis3dhConfig {
        &self.config
    }

    fn read(&mut self) -> Result<[f32; 3]> {
        Lis3dh::read(self)
    }

    fn new_data_available(&mut self) -> Result<bool> {
        Lis3dh::new_data_available(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{raw_to_gravity, Range, Resolution};

    const RESOLUTIONS: [Resolution; 3] = [Resolution::Low, Resolution::Normal, Resolution::High];
    const RANGES: [Range; 4] = [Range::G2, Range::G4, Range::G8, Range::G16];

    #[test]
    fn conversion_hits_range_extremes() {
        for resolution in RESOLUTIONS {
            for range in RANGES {
                let half = 1i32 << (resolution.bits() - 1);
                let g = range.g() as f32;

                assert_eq!(raw_to_gravity(-half as i16, resolution, range), -g);
                let top = raw_to_gravity((half - 1) as i16, resolution, range);
                assert!(top < g && top > g * (1.0 - 2.0 / half as f32));
            }
        }
    }

    #[test]
    fn conversion_is_monotonic() {
        for resolution in RESOLUTIONS {
            for range in RANGES {
                let half = 1i32 << (resolution.bits() - 1);
                let mut previous = f32::NEG_INFINITY;
                for raw in -half..half {
                    let g = raw_to_gravity(raw as i16, resolution, range);
                    assert!(g > previous);
                    previous = g;
                }
            }
        }
    }
}
