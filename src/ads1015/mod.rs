//! Driver for the TI ADS1015 4-channel 12-bit ADC.

pub mod config;
pub mod params;
pub mod registers;

pub use config::{Ads1015Config, Ads1015ConfigBuilder};
pub use params::{
    ComparatorMode, ComparatorPolarity, ComparatorQueue, ConversionMode, FullScaleRange, Input,
    SampleRate,
};

use embedded_hal::i2c::I2c;

use crate::bus::{Bus, I2cBus, I2cConfig};
use crate::error::Result;
use crate::log;
use crate::registers::Register;
use crate::sensor::{Sensor, combine_bytes, twos_complement};
use registers::{
    CONFIG_DEFAULT, ConfigRegister, REG_CONVERSION, REG_HI_THRESH, REG_LO_THRESH,
    START_CONTINUOUS, START_SINGLE_SHOT,
};

/// I2C address with `ADDR` tied to GND.
pub const DEFAULT_ADDRESS: u8 = 0x48;

const RESULT_BITS: u32 = 12;

/// Converts a signed 12-bit conversion result to volts over the fixed ±4.096 V span.
pub fn raw_to_volts(raw: i16) -> f32 {
    raw as f32 * 4.096 / 2048.0
}

/// High-level synchronous driver for the ADS1015.
pub struct Ads1015<B> {
    bus: B,
    config: Ads1015Config,
}

impl<B> Ads1015<B> {
    /// Creates a new driver instance. Nothing is written until [`Ads1015::init`].
    pub fn new(bus: B, config: Ads1015Config) -> Self {
        Self { bus, config }
    }

    /// Consumes the driver and returns the owned bus.
    pub fn release(self) -> (B, Ads1015Config) {
        (self.bus, self.config)
    }

    pub fn config(&self) -> &Ads1015Config {
        &self.config
    }
}

impl<I2C: I2c> Ads1015<I2cBus<I2C>> {
    /// Convenience constructor for an already opened I2C peripheral.
    pub fn new_i2c(i2c: I2C, address: u8, config: Ads1015Config) -> Self {
        Self::new(I2cBus::attach(i2c, I2cConfig::new(address, 0)), config)
    }
}

impl<B: Bus> Ads1015<B> {
    // ==================================================================
    // == Lifecycle =====================================================
    // ==================================================================
    /// Opens the bus.
    pub fn start(&mut self) -> Result<()> {
        self.bus.start()
    }

    /// Restores the factory config register, which stops continuous conversion, and
    /// closes the bus.
    pub fn stop(&mut self) -> Result<()> {
        if !self.bus.is_open() {
            // Reports NotStarted or Stopped without touching the chip.
            return self.bus.stop();
        }
        self.bus.write_register_sequence(ConfigRegister::ADDRESS, &CONFIG_DEFAULT)?;
        self.bus.stop()
    }

    /// Opens the bus and applies the stored configuration.
    pub fn init(&mut self) -> Result<()> {
        self.start()?;
        self.configure(self.config)
    }

    // ==================================================================
    // == Configuration =================================================
    // ==================================================================
    /// Programs every config register field and both thresholds, then starts
    /// conversion in the configured mode.
    pub fn configure(&mut self, config: Ads1015Config) -> Result<()> {
        config.validate()?;

        self.modify_config(|reg| {
            reg.set_input(config.input);
            reg.set_range(config.range);
            reg.set_mode(config.conversion);
            reg.set_data_rate(config.data_rate);
            reg.set_comparator_mode(config.comparator_mode);
            reg.set_comparator_polarity(config.comparator_polarity);
            reg.set_latching(config.latching);
            reg.set_comparator_queue(config.queue);
        })?;
        self.set_lo_threshold(config.lo_threshold)?;
        self.set_hi_threshold(config.hi_threshold)?;

        self.config = config;
        log::debug!(
            "ads1015 configured: {} SPS, {} mV full scale",
            config.data_rate.sps(),
            config.range.millivolts()
        );
        self.start_conversion()
    }

    /// Selects the multiplexer input.
    pub fn set_input(&mut self, input: Input) -> Result<()> {
        self.modify_config(|reg| reg.set_input(input))?;
        self.config.input = input;
        Ok(())
    }

    /// Measures `positive` against `negative`. Only (0,1), (0,3), (1,3) and (2,3) exist.
    pub fn set_differential_mode(&mut self, positive: u8, negative: u8) -> Result<()> {
        self.set_input(Input::differential(positive, negative)?)
    }

    /// Measures `channel` against ground.
    pub fn set_single_channel(&mut self, channel: u8) -> Result<()> {
        self.set_input(Input::single(channel)?)
    }

    pub fn set_range(&mut self, range: FullScaleRange) -> Result<()> {
        self.modify_config(|reg| reg.set_range(range))?;
        self.config.range = range;
        Ok(())
    }

    /// Chooses continuous (`true`) or single-shot (`false`) conversion.
    pub fn set_continuous(&mut self, continuous: bool) -> Result<()> {
        let mode = if continuous {
            ConversionMode::Continuous
        } else {
            ConversionMode::SingleShot
        };
        self.modify_config(|reg| reg.set_mode(mode))?;
        self.config.conversion = mode;
        Ok(())
    }

    pub fn set_data_rate(&mut self, data_rate: SampleRate) -> Result<()> {
        self.modify_config(|reg| reg.set_data_rate(data_rate))?;
        self.config.data_rate = data_rate;
        Ok(())
    }

    pub fn set_comparator_mode(&mut self, mode: ComparatorMode) -> Result<()> {
        self.modify_config(|reg| reg.set_comparator_mode(mode))?;
        self.config.comparator_mode = mode;
        Ok(())
    }

    pub fn set_comparator_polarity(&mut self, polarity: ComparatorPolarity) -> Result<()> {
        self.modify_config(|reg| reg.set_comparator_polarity(polarity))?;
        self.config.comparator_polarity = polarity;
        Ok(())
    }

    pub fn enable_latching_comparator(&mut self, latching: bool) -> Result<()> {
        self.modify_config(|reg| reg.set_latching(latching))?;
        self.config.latching = latching;
        Ok(())
    }

    /// Sets how many out-of-threshold conversions assert ALERT/RDY.
    pub fn set_comparator_queue(&mut self, queue: ComparatorQueue) -> Result<()> {
        self.modify_config(|reg| reg.set_comparator_queue(queue))?;
        self.config.queue = queue;
        Ok(())
    }

    /// Writes the raw low threshold register.
    pub fn set_lo_threshold(&mut self, value: u16) -> Result<()> {
        self.bus.write_register_sequence(REG_LO_THRESH, &value.to_be_bytes())?;
        self.config.lo_threshold = value;
        Ok(())
    }

    /// Writes the raw high threshold register.
    pub fn set_hi_threshold(&mut self, value: u16) -> Result<()> {
        self.bus.write_register_sequence(REG_HI_THRESH, &value.to_be_bytes())?;
        self.config.hi_threshold = value;
        Ok(())
    }

    // ==================================================================
    // == Conversion Control ============================================
    // ==================================================================
    pub fn start_continuous(&mut self) -> Result<()> {
        self.set_high_flags(START_CONTINUOUS)
    }

    pub fn start_single_shot(&mut self) -> Result<()> {
        self.set_high_flags(START_SINGLE_SHOT)
    }

    /// Starts conversion according to the configured mode.
    pub fn start_conversion(&mut self) -> Result<()> {
        match self.config.conversion {
            ConversionMode::Continuous => self.start_continuous(),
            ConversionMode::SingleShot => self.start_single_shot(),
        }
    }

    /// Reports the `OS` bit: set once no conversion is in progress.
    pub fn new_data_available(&mut self) -> Result<bool> {
        let mut cfg = [0u8; 2];
        self.bus.read_register_sequence(ConfigRegister::ADDRESS, &mut cfg)?;
        Ok(cfg[0] & 0x80 != 0)
    }

    /// Reads the signed 12-bit conversion result.
    pub fn read_raw(&mut self) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.bus.read_register_sequence(REG_CONVERSION, &mut buf)?;
        let raw = combine_bytes(buf[0], buf[1], RESULT_BITS);
        Ok(twos_complement(raw, RESULT_BITS))
    }

    /// Reads the conversion result in volts.
    pub fn read(&mut self) -> Result<f32> {
        Ok(raw_to_volts(self.read_raw()?))
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    fn modify_config(&mut self, mutate: impl FnOnce(&mut ConfigRegister)) -> Result<()> {
        let mut current = [0u8; 2];
        self.bus.read_register_sequence(ConfigRegister::ADDRESS, &mut current)?;

        let mut reg = ConfigRegister::from_wire(current);
        mutate(&mut reg);

        let updated = reg.to_wire();
        if updated != current {
            log::trace!(
                "ads1015 config: {:#x} -> {:#x}",
                u16::from_be_bytes(current),
                u16::from_be_bytes(updated)
            );
            self.bus.write_register_sequence(ConfigRegister::ADDRESS, &updated)?;
        }
        Ok(())
    }

    fn set_high_flags(&mut self, flags: u8) -> Result<()> {
        let mut cfg = [0u8; 2];
        self.bus.read_register_sequence(ConfigRegister::ADDRESS, &mut cfg)?;
        cfg[0] |= flags;
        self.bus.write_register_sequence(ConfigRegister::ADDRESS, &cfg)
    }
}

impl<B: Bus> Sensor for Ads1015<B> {
    type Config = Ads1015Config;
    type Sample = f32;

    fn start(&mut self) -> Result<()> {
        Ads1015::start(self)
    }

    fn stop(&mut self) -> Result<()> {
        Ads1015::stop(self)
    }

    fn configure(&mut self, config: Ads1015Config) -> Result<()> {
        Ads1015::configure(self, config)
    }

    fn config(&self) -> &Ads1015Config {
        &self.config
    }

    fn read(&mut self) -> Result<f32> {
        Ads1015::read(self)
    }

    fn new_data_available(&mut self) -> Result<bool> {
        Ads1015::new_data_available(self)
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};

    use super::*;

    const ADDR: u8 = DEFAULT_ADDRESS;

    #[test]
    fn conversion_extremes() {
        assert!((raw_to_volts(2047) - 4.094).abs() < 1e-3);
        assert_eq!(raw_to_volts(-2048), -4.096);
        assert_eq!(raw_to_volts(0), 0.0);
    }

    #[test]
    fn read_assembles_left_justified_result() {
        let expectations = [
            Transaction::write_read(ADDR, vec![REG_CONVERSION], vec![0x7F, 0xF0]),
            Transaction::write_read(ADDR, vec![REG_CONVERSION], vec![0x80, 0x00]),
        ];
        let mut i2c = Mock::new(&expectations);
        let mut adc = Ads1015::new_i2c(i2c.clone(), ADDR, Ads1015Config::default());

        assert_eq!(adc.read_raw().unwrap(), 2047);
        assert_eq!(adc.read_raw().unwrap(), -2048);
        i2c.done();
    }

    #[test]
    fn setter_touches_only_its_field() {
        let expectations = [
            Transaction::write_read(ADDR, vec![0x01], vec![0x85, 0x83]),
            Transaction::write(ADDR, vec![0x01, 0x85, 0xA3]),
        ];
        let mut i2c = Mock::new(&expectations);
        let mut adc = Ads1015::new_i2c(i2c.clone(), ADDR, Ads1015Config::default());

        adc.set_data_rate(SampleRate::Sps2400).unwrap();
        assert_eq!(adc.config().data_rate, SampleRate::Sps2400);
        i2c.done();
    }

    #[test]
    fn invalid_channel_pair_writes_nothing() {
        let mut i2c = Mock::new(&[]);
        let mut adc = Ads1015::new_i2c(i2c.clone(), ADDR, Ads1015Config::default());

        assert!(adc.set_differential_mode(1, 2).is_err());
        assert!(adc.set_single_channel(7).is_err());
        i2c.done();
    }
}
