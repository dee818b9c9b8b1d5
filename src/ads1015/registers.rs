//! Register map definitions for the ADS1015 ADC.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use super::params::{
    ComparatorMode, ComparatorPolarity, ComparatorQueue, ConversionMode, FullScaleRange, Input,
    SampleRate,
};
use crate::registers::{Register, RegisterAccess};

/// Register address of the conversion result.
pub const REG_CONVERSION: u8 = 0x00;
/// Register address of the config register.
pub const REG_CONFIG: u8 = 0x01;
/// Register address of the low comparator threshold.
pub const REG_LO_THRESH: u8 = 0x02;
/// Register address of the high comparator threshold.
pub const REG_HI_THRESH: u8 = 0x03;

/// Power-on value of the config register as transmitted (MSB first).
pub const CONFIG_DEFAULT: [u8; 2] = [0x85, 0x83];

/// High-byte flag that starts a conversion (`OS`).
pub const START_CONTINUOUS: u8 = 0x80;
/// High-byte flags that start a single-shot conversion (`OS` and `MODE`).
pub const START_SINGLE_SHOT: u8 = 0x81;

/// Bitfield view of the 16-bit config register (address `0x01`).
///
/// Fields are listed from bit 0 upwards. Use [`ConfigRegister::from_wire`] and
/// [`ConfigRegister::to_wire`] to move between the register and the big-endian bus bytes.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRegister {
    // Comparator queue (bits 1:0).
    pub comparator_queue: ComparatorQueue,
    // Latching comparator (bit 2).
    pub latching: bool,
    // ALERT/RDY polarity (bit 3).
    pub comparator_polarity: ComparatorPolarity,
    // Comparator mode (bit 4).
    pub comparator_mode: ComparatorMode,
    // Data rate (bits 7:5).
    pub data_rate: SampleRate,
    // Operating mode (bit 8).
    pub mode: ConversionMode,
    // Programmable gain (bits 11:9).
    pub range: FullScaleRange,
    // Input multiplexer (bits 14:12).
    pub input: Input,
    // Operational status / single-shot start (bit 15).
    pub os: bool,
}

impl ConfigRegister {
    /// Decodes the register from its bus representation.
    pub fn from_wire(bytes: [u8; 2]) -> Self {
        Self::from(u16::from_be_bytes(bytes))
    }

    /// Encodes the register for the bus.
    pub fn to_wire(self) -> [u8; 2] {
        u16::from(self).to_be_bytes()
    }
}

impl From<u16> for ConfigRegister {
    fn from(value: u16) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }
}

impl From<ConfigRegister> for u16 {
    fn from(value: ConfigRegister) -> Self {
        u16::from_le_bytes(value.into_bytes())
    }
}

impl Register for ConfigRegister {
    type Raw = u16;
    const ADDRESS: u8 = REG_CONFIG;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x8583);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reset_value() {
        let reset = ConfigRegister::RESET_VALUE.unwrap();
        assert_eq!(reset.to_be_bytes(), CONFIG_DEFAULT);

        let reg = ConfigRegister::from_wire(CONFIG_DEFAULT);
        assert!(reg.os());
        assert_eq!(reg.input(), Input::Ain0Ain1);
        assert_eq!(reg.range(), FullScaleRange::V2_048);
        assert_eq!(reg.mode(), ConversionMode::SingleShot);
        assert_eq!(reg.data_rate(), SampleRate::Sps1600);
        assert_eq!(reg.comparator_queue(), ComparatorQueue::Disabled);
    }

    #[test]
    fn fields_land_on_datasheet_bits() {
        let reg = ConfigRegister::new()
            .with_input(Input::Ain3)
            .with_range(FullScaleRange::V0_256)
            .with_data_rate(SampleRate::Sps3300)
            .with_comparator_mode(ComparatorMode::Window)
            .with_comparator_queue(ComparatorQueue::Two);

        assert_eq!(reg.to_wire(), [0b0111_1010, 0b1101_0001]);
    }
}
