//! Strongly typed parameter enumerations for the LIS3DH driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Lis3dhConfig`](super::config::Lis3dhConfig) and the driver setters. Raw numbers
//! and names coming from outside (configuration files, command lines) convert through
//! `TryFrom` / `FromStr` and are rejected with a [`ConfigError`].
//!
//! # Examples
//!
//! ```rust
//! use edge_sensors::lis3dh::params::{DataRate, Range, Resolution};
//!
//! let rate = DataRate::try_from(400u16).unwrap();
//! let range = Range::try_from(8u8).unwrap();
//! let resolution: Resolution = "high".parse().unwrap();
//! assert_eq!((rate.hz(), range.g(), resolution.bits()), (400, 8, 12));
//! ```

use core::str::FromStr;

use modular_bitfield::prelude::Specifier;

use crate::error::ConfigError;

/// Output resolution, selected through the `LPen` and `HR` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 8-bit low-power mode (`LPen` set).
    Low,
    /// 10-bit normal mode (both bits cleared).
    Normal,
    /// 12-bit high-resolution mode (`HR` set).
    High,
}

impl Resolution {
    /// Returns the number of significant output bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Low => 8,
            Self::Normal => 10,
            Self::High => 12,
        }
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(ConfigError::UnknownResolution),
        }
    }
}

/// Full-scale measurement range encoded in `CTRL_REG4.FS[1:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Range {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl Range {
    /// Returns the positive full-scale value in g.
    pub const fn g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }
}

impl TryFrom<u8> for Range {
    type Error = ConfigError;

    fn try_from(g: u8) -> Result<Self, Self::Error> {
        match g {
            2 => Ok(Self::G2),
            4 => Ok(Self::G4),
            8 => Ok(Self::G8),
            16 => Ok(Self::G16),
            other => Err(ConfigError::UnsupportedRange(other)),
        }
    }
}

/// Output data rate selections.
///
/// Not a plain bitfield: 1344 Hz and 5376 Hz share the `ODR` code `0b1001` and are told
/// apart by the resolution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    /// 1 Hz.
    Hz1,
    /// 10 Hz.
    Hz10,
    /// 25 Hz.
    Hz25,
    /// 50 Hz.
    Hz50,
    /// 100 Hz.
    Hz100,
    /// 200 Hz.
    Hz200,
    /// 400 Hz.
    Hz400,
    /// 1344 Hz, normal and high resolution only.
    Hz1344,
    /// 1620 Hz, low resolution only.
    Hz1620,
    /// 5376 Hz, low resolution only.
    Hz5376,
}

impl DataRate {
    /// Every supported rate, slowest first.
    pub const ALL: [DataRate; 10] = [
        Self::Hz1,
        Self::Hz10,
        Self::Hz25,
        Self::Hz50,
        Self::Hz100,
        Self::Hz200,
        Self::Hz400,
        Self::Hz1344,
        Self::Hz1620,
        Self::Hz5376,
    ];

    /// Returns the rate in hertz.
    pub const fn hz(self) -> u16 {
        match self {
            Self::Hz1 => 1,
            Self::Hz10 => 10,
            Self::Hz25 => 25,
            Self::Hz50 => 50,
            Self::Hz100 => 100,
            Self::Hz200 => 200,
            Self::Hz400 => 400,
            Self::Hz1344 => 1_344,
            Self::Hz1620 => 1_620,
            Self::Hz5376 => 5_376,
        }
    }

    /// Returns the 4-bit `CTRL_REG1.ODR` code.
    pub const fn code(self) -> u8 {
        match self {
            Self::Hz1 => 0b0001,
            Self::Hz10 => 0b0010,
            Self::Hz25 => 0b0011,
            Self::Hz50 => 0b0100,
            Self::Hz100 => 0b0101,
            Self::Hz200 => 0b0110,
            Self::Hz400 => 0b0111,
            Self::Hz1620 => 0b1000,
            Self::Hz1344 | Self::Hz5376 => 0b1001,
        }
    }

    /// Checks this rate against the resolution it would run with.
    pub const fn check(self, resolution: Resolution) -> Result<(), ConfigError> {
        match (self, resolution) {
            (Self::Hz1620 | Self::Hz5376, Resolution::Normal | Resolution::High) => {
                Err(ConfigError::DataRateRequiresLowPower(self.hz()))
            }
            (Self::Hz1344, Resolution::Low) => {
                Err(ConfigError::DataRateUnavailableInLowPower(self.hz()))
            }
            _ => Ok(()),
        }
    }
}

impl TryFrom<u16> for DataRate {
    type Error = ConfigError;

    fn try_from(hz: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.hz() == hz)
            .ok_or(ConfigError::UnsupportedDataRate(hz))
    }
}

/// Self-test selection encoded in `CTRL_REG4.ST[1:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum SelfTest {
    /// Normal operation.
    Off = 0b00,
    /// Self test 0.
    Low = 0b01,
    /// Self test 1.
    High = 0b10,
}

impl FromStr for SelfTest {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            _ => Err(ConfigError::UnknownSelfTest),
        }
    }
}

/// Per-axis enable flags (`CTRL_REG1.Xen/Yen/Zen`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Axes {
    /// X axis enabled.
    pub x: bool,
    /// Y axis enabled.
    pub y: bool,
    /// Z axis enabled.
    pub z: bool,
}

impl Axes {
    /// All three axes enabled.
    pub const ALL: Axes = Axes::new(true, true, true);

    /// Creates a set of axis flags.
    pub const fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }
}

impl Default for Axes {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fastest_rates_require_low_power() {
        for resolution in [Resolution::Normal, Resolution::High] {
            assert_eq!(
                DataRate::Hz5376.check(resolution),
                Err(ConfigError::DataRateRequiresLowPower(5376))
            );
            assert_eq!(
                DataRate::Hz1620.check(resolution),
                Err(ConfigError::DataRateRequiresLowPower(1620))
            );
            assert_eq!(DataRate::Hz1344.check(resolution), Ok(()));
        }
        assert_eq!(
            DataRate::Hz1344.check(Resolution::Low),
            Err(ConfigError::DataRateUnavailableInLowPower(1344))
        );
    }

    #[test]
    fn shared_odr_code_for_1344_and_5376() {
        assert_eq!(DataRate::Hz1344.code(), DataRate::Hz5376.code());
        assert_eq!(DataRate::Hz1620.code(), 0b1000);
    }

    #[test]
    fn numeric_inputs_outside_domain_are_rejected() {
        assert_eq!(DataRate::try_from(800), Err(ConfigError::UnsupportedDataRate(800)));
        assert_eq!(Range::try_from(3), Err(ConfigError::UnsupportedRange(3)));
        assert_eq!("medium".parse::<Resolution>(), Err(ConfigError::UnknownResolution));
        assert_eq!("on".parse::<SelfTest>(), Err(ConfigError::UnknownSelfTest));
    }
}
