//! Parameter enumerations for the ADS1015 config register fields.
//!
//! Numeric inputs convert through `TryFrom`; the full-scale range is given in
//! millivolts so no floating point comparison is involved.
//!
//! ```rust
//! use edge_sensors::ads1015::params::{ComparatorQueue, FullScaleRange, Input, SampleRate};
//!
//! assert_eq!(Input::differential(2, 3).unwrap(), Input::Ain2Ain3);
//! assert_eq!(FullScaleRange::try_from(4096u16).unwrap(), FullScaleRange::V4_096);
//! assert_eq!(SampleRate::try_from(3300u16).unwrap().sps(), 3300);
//! assert_eq!(ComparatorQueue::try_from(0u8).unwrap(), ComparatorQueue::Disabled);
//! ```

use modular_bitfield::prelude::Specifier;

use crate::error::ConfigError;

/// Input multiplexer selection (`MUX[14:12]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum Input {
    /// AIN0 against AIN1.
    Ain0Ain1 = 0b000,
    /// AIN0 against AIN3.
    Ain0Ain3 = 0b001,
    /// AIN1 against AIN3.
    Ain1Ain3 = 0b010,
    /// AIN2 against AIN3.
    Ain2Ain3 = 0b011,
    /// AIN0 against GND.
    Ain0 = 0b100,
    /// AIN1 against GND.
    Ain1 = 0b101,
    /// AIN2 against GND.
    Ain2 = 0b110,
    /// AIN3 against GND.
    Ain3 = 0b111,
}

impl Input {
    /// Selects a differential pair. Only the pairs the multiplexer offers are accepted.
    pub const fn differential(positive: u8, negative: u8) -> Result<Self, ConfigError> {
        match (positive, negative) {
            (0, 1) => Ok(Self::Ain0Ain1),
            (0, 3) => Ok(Self::Ain0Ain3),
            (1, 3) => Ok(Self::Ain1Ain3),
            (2, 3) => Ok(Self::Ain2Ain3),
            _ => Err(ConfigError::InvalidChannelPair(positive, negative)),
        }
    }

    /// Selects a single-ended channel measured against ground.
    pub const fn single(channel: u8) -> Result<Self, ConfigError> {
        match channel {
            0 => Ok(Self::Ain0),
            1 => Ok(Self::Ain1),
            2 => Ok(Self::Ain2),
            3 => Ok(Self::Ain3),
            _ => Err(ConfigError::InvalidChannel(channel)),
        }
    }

    /// Returns `true` for the single-ended selections.
    pub const fn is_single_ended(self) -> bool {
        (self as u8) & 0b100 != 0
    }
}

/// Programmable gain amplifier setting (`PGA[11:9]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum FullScaleRange {
    /// ±6.144 V.
    V6_144 = 0b000,
    /// ±4.096 V.
    V4_096 = 0b001,
    /// ±2.048 V.
    V2_048 = 0b010,
    /// ±1.024 V.
    V1_024 = 0b011,
    /// ±0.512 V.
    V0_512 = 0b100,
    /// ±0.256 V.
    V0_256 = 0b101,
}

impl FullScaleRange {
    /// Returns the full-scale value in millivolts.
    pub const fn millivolts(self) -> u16 {
        match self {
            Self::V6_144 => 6_144,
            Self::V4_096 => 4_096,
            Self::V2_048 => 2_048,
            Self::V1_024 => 1_024,
            Self::V0_512 => 512,
            Self::V0_256 => 256,
        }
    }
}

impl TryFrom<u16> for FullScaleRange {
    type Error = ConfigError;

    fn try_from(millivolts: u16) -> Result<Self, Self::Error> {
        match millivolts {
            6_144 => Ok(Self::V6_144),
            4_096 => Ok(Self::V4_096),
            2_048 => Ok(Self::V2_048),
            1_024 => Ok(Self::V1_024),
            512 => Ok(Self::V0_512),
            256 => Ok(Self::V0_256),
            _ => Err(ConfigError::UnsupportedFullScale),
        }
    }
}

/// Operating mode (`MODE[8]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum ConversionMode {
    /// Convert continuously.
    Continuous = 0,
    /// Convert once per start request, then power down.
    SingleShot = 1,
}

/// Data rate (`DR[7:5]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum SampleRate {
    /// 128 SPS.
    Sps128 = 0b000,
    /// 250 SPS.
    Sps250 = 0b001,
    /// 490 SPS.
    Sps490 = 0b010,
    /// 920 SPS.
    Sps920 = 0b011,
    /// 1600 SPS.
    Sps1600 = 0b100,
    /// 2400 SPS.
    Sps2400 = 0b101,
    /// 3300 SPS.
    Sps3300 = 0b110,
}

impl SampleRate {
    /// Returns the rate in samples per second.
    pub const fn sps(self) -> u16 {
        match self {
            Self::Sps128 => 128,
            Self::Sps250 => 250,
            Self::Sps490 => 490,
            Self::Sps920 => 920,
            Self::Sps1600 => 1_600,
            Self::Sps2400 => 2_400,
            Self::Sps3300 => 3_300,
        }
    }
}

impl TryFrom<u16> for SampleRate {
    type Error = ConfigError;

    fn try_from(sps: u16) -> Result<Self, Self::Error> {
        match sps {
            128 => Ok(Self::Sps128),
            250 => Ok(Self::Sps250),
            490 => Ok(Self::Sps490),
            920 => Ok(Self::Sps920),
            1_600 => Ok(Self::Sps1600),
            2_400 => Ok(Self::Sps2400),
            3_300 => Ok(Self::Sps3300),
            other => Err(ConfigError::UnsupportedSampleRate(other)),
        }
    }
}

/// Comparator mode (`COMP_MODE[4]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum ComparatorMode {
    /// Hysteresis comparator between the two thresholds.
    Traditional = 0,
    /// Window comparator.
    Window = 1,
}

/// ALERT/RDY pin polarity (`COMP_POL[3]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum ComparatorPolarity {
    /// Pin driven low when asserted.
    ActiveLow = 0,
    /// Pin driven high when asserted.
    ActiveHigh = 1,
}

/// Comparator queue (`COMP_QUE[1:0]`): conversions past threshold before ALERT asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum ComparatorQueue {
    /// Assert after one conversion.
    One = 0b00,
    /// Assert after two conversions.
    Two = 0b01,
    /// Assert after four conversions.
    Four = 0b10,
    /// Comparator disabled, pin high-impedance.
    Disabled = 0b11,
}

impl ComparatorQueue {
    /// Queue length, `0` meaning disabled.
    pub const fn length(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Disabled => 0,
        }
    }
}

impl TryFrom<u8> for ComparatorQueue {
    type Error = ConfigError;

    fn try_from(length: u8) -> Result<Self, Self::Error> {
        match length {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            other => Err(ConfigError::InvalidQueueLength(other)),
        }
    }
}
