use super::Controller;
use crate::ads1015::{
    Ads1015, Ads1015Config, ComparatorMode, ComparatorPolarity, ComparatorQueue, ConversionMode,
    FullScaleRange, Input, SampleRate,
};
use crate::bus::Bus;
use crate::error::Result;

impl<B: Bus + Send + 'static> Controller<Ads1015<B>> {
    /// Controller for an ADS1015 on `bus`, staged with the default configuration.
    pub fn with_bus(bus: B) -> Self {
        Self::new("ads1015", Ads1015Config::default(), move |config| {
            Ok(Ads1015::new(bus, config))
        })
    }

    pub fn set_input(&mut self, input: Input) {
        self.stage(|config| config.input = input);
    }

    /// Stages a differential pair; rejects pairs the multiplexer does not offer.
    pub fn set_differential_mode(&mut self, positive: u8, negative: u8) -> Result<()> {
        let input = Input::differential(positive, negative)?;
        self.set_input(input);
        Ok(())
    }

    /// Stages a single-ended channel; rejects channels outside 0..=3.
    pub fn set_single_channel(&mut self, channel: u8) -> Result<()> {
        let input = Input::single(channel)?;
        self.set_input(input);
        Ok(())
    }

    pub fn set_range(&mut self, range: FullScaleRange) {
        self.stage(|config| config.range = range);
    }

    pub fn set_continuous(&mut self, continuous: bool) {
        let mode = if continuous {
            ConversionMode::Continuous
        } else {
            ConversionMode::SingleShot
        };
        self.stage(|config| config.conversion = mode);
    }

    pub fn set_data_rate(&mut self, data_rate: SampleRate) {
        self.stage(|config| config.data_rate = data_rate);
    }

    pub fn set_comparator_mode(&mut self, mode: ComparatorMode) {
        self.stage(|config| config.comparator_mode = mode);
    }

    pub fn set_comparator_polarity(&mut self, polarity: ComparatorPolarity) {
        self.stage(|config| config.comparator_polarity = polarity);
    }

    pub fn enable_latching_comparator(&mut self, latching: bool) {
        self.stage(|config| config.latching = latching);
    }

    pub fn set_comparator_queue(&mut self, queue: ComparatorQueue) {
        self.stage(|config| config.queue = queue);
    }

    pub fn set_lo_threshold(&mut self, value: u16) {
        self.stage(|config| config.lo_threshold = value);
    }

    pub fn set_hi_threshold(&mut self, value: u16) {
        self.stage(|config| config.hi_threshold = value);
    }
}

#[cfg(feature = "linux")]
impl Controller<Ads1015<crate::linux::LinuxI2cBus>> {
    /// Controller for an ADS1015 on `/dev/i2c-{bus}`. The ADS1015 default address is
    /// [`DEFAULT_ADDRESS`](crate::ads1015::DEFAULT_ADDRESS).
    pub fn i2c(address: u8, bus: u8) -> Self {
        use crate::bus::{I2cBus, I2cConfig};

        Self::with_bus(I2cBus::new(I2cConfig::new(address, bus)))
    }
}
