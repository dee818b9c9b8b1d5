//! Configuration primitives for the LIS3DH driver.

use super::params::{Axes, DataRate, Range, Resolution, SelfTest};
use crate::error::ConfigError;
use crate::sensor::SensorConfig;

/// User-facing configuration for the LIS3DH sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lis3dhConfig {
    /// Output resolution.
    pub resolution: Resolution,
    /// Full-scale measurement range.
    pub range: Range,
    /// Output data rate.
    pub data_rate: DataRate,
    /// Self-test selection.
    pub self_test: SelfTest,
    /// High-pass filter on the output data path.
    pub high_pass: bool,
    /// Axes to enable.
    pub axes: Axes,
}

impl Lis3dhConfig {
    /// Begins building a [`Lis3dhConfig`] using the builder pattern.
    pub fn new() -> Lis3dhConfigBuilder {
        Lis3dhConfigBuilder::new()
    }

    /// Checks the data rate against the resolution it runs with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.data_rate.check(self.resolution)
    }
}

impl SensorConfig for Lis3dhConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        Lis3dhConfig::validate(self)
    }
}

/// Builder for [`Lis3dhConfig`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct Lis3dhConfigBuilder {
    config: Lis3dhConfig,
}

impl Lis3dhConfigBuilder {
    /// Creates a new builder seeded with [`Lis3dhConfig::default()`].
    pub fn new() -> Self {
        Self {
            config: Lis3dhConfig::default(),
        }
    }

    /// Overrides the output resolution.
    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.config.resolution = resolution;
        self
    }

    /// Overrides the measurement range.
    pub fn range(mut self, range: Range) -> Self {
        self.config.range = range;
        self
    }

    /// Overrides the output data rate.
    pub fn data_rate(mut self, data_rate: DataRate) -> Self {
        self.config.data_rate = data_rate;
        self
    }

    /// Sets the self-test selection.
    pub fn self_test(mut self, self_test: SelfTest) -> Self {
        self.config.self_test = self_test;
        self
    }

    /// Enables or disables the high-pass filter.
    pub fn high_pass(mut self, enabled: bool) -> Self {
        self.config.high_pass = enabled;
        self
    }

    /// Selects the axes to enable.
    pub fn axes(mut self, axes: Axes) -> Self {
        self.config.axes = axes;
        self
    }

    /// Finalizes the builder, rejecting data rates the resolution cannot reach.
    pub fn build(self) -> Result<Lis3dhConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for Lis3dhConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Lis3dhConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Low,
            range: Range::G2,
            data_rate: DataRate::Hz5376,
            self_test: SelfTest::Off,
            high_pass: false,
            axes: Axes::ALL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Lis3dhConfig::default().validate(), Ok(()));
    }

    #[test]
    fn builder_rejects_incompatible_rate() {
        let result = Lis3dhConfig::new()
            .resolution(Resolution::High)
            .data_rate(DataRate::Hz5376)
            .build();
        assert_eq!(result, Err(ConfigError::DataRateRequiresLowPower(5376)));

        let config = Lis3dhConfig::new()
            .resolution(Resolution::High)
            .data_rate(DataRate::Hz1344)
            .range(Range::G4)
            .build()
            .unwrap();
        assert_eq!(config.range, Range::G4);
    }
}
