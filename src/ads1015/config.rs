//! Configuration primitives for the ADS1015 driver.

use super::params::{
    ComparatorMode, ComparatorPolarity, ComparatorQueue, ConversionMode, FullScaleRange, Input,
    SampleRate,
};
use crate::error::ConfigError;
use crate::sensor::SensorConfig;

/// Power-on low comparator threshold.
pub const DEFAULT_LO_THRESHOLD: u16 = 0x0800;
/// Power-on high comparator threshold.
pub const DEFAULT_HI_THRESHOLD: u16 = 0x07FF;

/// User-facing configuration for the ADS1015 ADC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ads1015Config {
    /// Multiplexer input selection.
    pub input: Input,
    /// Programmable gain setting.
    pub range: FullScaleRange,
    /// Continuous or single-shot conversion.
    pub conversion: ConversionMode,
    /// Conversion rate.
    pub data_rate: SampleRate,
    pub comparator_mode: ComparatorMode,
    pub comparator_polarity: ComparatorPolarity,
    /// Latch the ALERT/RDY pin until the conversion register is read.
    pub latching: bool,
    pub queue: ComparatorQueue,
    /// Raw low threshold register value.
    pub lo_threshold: u16,
    /// Raw high threshold register value.
    pub hi_threshold: u16,
}

impl Ads1015Config {
    /// Begins building an [`Ads1015Config`].
    pub fn new() -> Ads1015ConfigBuilder {
        Ads1015ConfigBuilder::new()
    }

    /// Every field is a closed enumeration or a raw register value, so there is nothing
    /// left to reject once the configuration exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

impl SensorConfig for Ads1015Config {
    fn validate(&self) -> Result<(), ConfigError> {
        Ads1015Config::validate(self)
    }
}

impl Default for Ads1015Config {
    fn default() -> Self {
        Self {
            input: Input::Ain0Ain1,
            range: FullScaleRange::V2_048,
            conversion: ConversionMode::Continuous,
            data_rate: SampleRate::Sps1600,
            comparator_mode: ComparatorMode::Traditional,
            comparator_polarity: ComparatorPolarity::ActiveLow,
            latching: false,
            queue: ComparatorQueue::Disabled,
            lo_threshold: DEFAULT_LO_THRESHOLD,
            hi_threshold: DEFAULT_HI_THRESHOLD,
        }
    }
}

/// Builder for [`Ads1015Config`].
#[derive(Debug, Clone, Copy)]
pub struct Ads1015ConfigBuilder {
    config: Ads1015Config,
}

impl Ads1015ConfigBuilder {
    /// Creates a new builder seeded with [`Ads1015Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Ads1015Config::default(),
        }
    }

    pub fn input(mut self, input: Input) -> Self {
        self.config.input = input;
        self
    }

    pub fn range(mut self, range: FullScaleRange) -> Self {
        self.config.range = range;
        self
    }

    pub fn conversion(mut self, conversion: ConversionMode) -> Self {
        self.config.conversion = conversion;
        self
    }

    pub fn data_rate(mut self, data_rate: SampleRate) -> Self {
        self.config.data_rate = data_rate;
        self
    }

    pub fn comparator_mode(mut self, mode: ComparatorMode) -> Self {
        self.config.comparator_mode = mode;
        self
    }

    pub fn comparator_polarity(mut self, polarity: ComparatorPolarity) -> Self {
        self.config.comparator_polarity = polarity;
        self
    }

    pub fn latching(mut self, latching: bool) -> Self {
        self.config.latching = latching;
        self
    }

    pub fn queue(mut self, queue: ComparatorQueue) -> Self {
        self.config.queue = queue;
        self
    }

    /// Sets both comparator thresholds.
    pub fn thresholds(mut self, lo: u16, hi: u16) -> Self {
        self.config.lo_threshold = lo;
        self.config.hi_threshold = hi;
        self
    }

    pub fn build(self) -> Result<Ads1015Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for Ads1015ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_only_requested_fields() {
        let config = Ads1015Config::new()
            .input(Input::Ain2)
            .queue(ComparatorQueue::Four)
            .thresholds(0x100, 0x200)
            .build()
            .unwrap();

        assert_eq!(config.input, Input::Ain2);
        assert_eq!(config.queue, ComparatorQueue::Four);
        assert_eq!((config.lo_threshold, config.hi_threshold), (0x100, 0x200));
        assert_eq!(config.data_rate, Ads1015Config::default().data_rate);
    }
}
