//! Capability interface shared by the sensor drivers, plus raw-value helpers.

use core::fmt::Debug;

use crate::error::{ConfigError, Result};

/// Configuration that can be staged ahead of time and applied later.
pub trait SensorConfig: Copy + Debug + Send + 'static {
    /// Checks cross-field rules without touching hardware.
    fn validate(&self) -> core::result::Result<(), ConfigError>;
}

/// A chip driver that owns its bus and produces physical-unit samples.
pub trait Sensor {
    /// Full driver configuration.
    type Config: SensorConfig;
    /// One reading in physical units.
    type Sample: Copy + Debug + Send + 'static;

    /// Opens the underlying bus.
    fn start(&mut self) -> Result<()>;

    /// Shuts the chip down and closes the underlying bus.
    fn stop(&mut self) -> Result<()>;

    /// Programs every configuration field.
    fn configure(&mut self, config: Self::Config) -> Result<()>;

    /// Returns the active configuration.
    fn config(&self) -> &Self::Config;

    /// Reads one sample.
    fn read(&mut self) -> Result<Self::Sample>;

    /// Reports whether a fresh sample is waiting.
    fn new_data_available(&mut self) -> Result<bool>;
}

/// Reassembles a left-justified reading spread over a high and a low byte register.
#[inline]
pub const fn combine_bytes(high: u8, low: u8, bits: u32) -> u16 {
    (((high as u16) << 8) | low as u16) >> (16 - bits)
}

/// Interprets the low `bits` bits of `raw` as a two's-complement value.
#[inline]
pub const fn twos_complement(raw: u16, bits: u32) -> i16 {
    let span = 1i32 << bits;
    let value = raw as i32 & (span - 1);
    if value >= span / 2 {
        (value - span) as i16
    } else {
        value as i16
    }
}

#[cfg(test)]
mod tests {
    use super::{combine_bytes, twos_complement};

    #[test]
    fn combine_drops_unused_low_bits() {
        assert_eq!(combine_bytes(0x7F, 0xF0, 12), 0x7FF);
        assert_eq!(combine_bytes(0x80, 0x40, 10), 0x201);
        assert_eq!(combine_bytes(0x12, 0x34, 16), 0x1234);
    }

    #[test]
    fn twos_complement_splits_at_half_range() {
        assert_eq!(twos_complement(0x7F, 8), 127);
        assert_eq!(twos_complement(0x80, 8), -128);
        assert_eq!(twos_complement(0xFF, 8), -1);
        assert_eq!(twos_complement(0x7FF, 12), 2047);
        assert_eq!(twos_complement(0x800, 12), -2048);
        assert_eq!(twos_complement(0x200, 10), -512);
    }
}
