//! Register map definitions for the LIS3DH accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use super::params::{Range, SelfTest};
use crate::registers::{Register, RegisterAccess};

/// Register address of `WHO_AM_I`.
pub const REG_WHO_AM_I: u8 = 0x0F;
/// Register address of `CTRL_REG0`.
pub const REG_CTRL_REG0: u8 = 0x1E;
/// Register address of `CTRL_REG1`.
pub const REG_CTRL_REG1: u8 = 0x20;
/// Register address of `CTRL_REG2`.
pub const REG_CTRL_REG2: u8 = 0x21;
/// Register address of `CTRL_REG3`.
pub const REG_CTRL_REG3: u8 = 0x22;
/// Register address of `CTRL_REG4`.
pub const REG_CTRL_REG4: u8 = 0x23;
/// Register address of `CTRL_REG5`.
pub const REG_CTRL_REG5: u8 = 0x24;
/// Register address of `CTRL_REG6`.
pub const REG_CTRL_REG6: u8 = 0x25;
/// Register address of `REFERENCE`.
pub const REG_REFERENCE: u8 = 0x26;
/// Register address of `STATUS_REG`.
pub const REG_STATUS: u8 = 0x27;
/// Register address of `OUT_X_L`.
pub const REG_OUT_X_L: u8 = 0x28;
/// Register address of `OUT_X_H`.
pub const REG_OUT_X_H: u8 = 0x29;
/// Register address of `OUT_Y_L`.
pub const REG_OUT_Y_L: u8 = 0x2A;
/// Register address of `OUT_Y_H`.
pub const REG_OUT_Y_H: u8 = 0x2B;
/// Register address of `OUT_Z_L`.
pub const REG_OUT_Z_L: u8 = 0x2C;
/// Register address of `OUT_Z_H`.
pub const REG_OUT_Z_H: u8 = 0x2D;

/// Value held by `WHO_AM_I`.
pub const EXPECTED_WHO_AM_I: u8 = 0x33;

/// `CTRL_REG2` bits set when the high-pass filter is enabled (`HPM = 10`, `FDS = 1`).
pub const HIGH_PASS_MASK: u8 = 0b1000_1000;

/// Bitfield representation of `CTRL_REG1` (address `0x20`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg1 {
    // X axis enable (bit 0).
    pub x_enable: bool,
    // Y axis enable (bit 1).
    pub y_enable: bool,
    // Z axis enable (bit 2).
    pub z_enable: bool,
    // Low-power mode enable (bit 3).
    pub low_power: bool,
    // Output data rate code (bits 7:4).
    pub odr: B4,
}

impl From<u8> for CtrlReg1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg1> for u8 {
    fn from(value: CtrlReg1) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `CTRL_REG2` (address `0x21`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg2 {
    // High-pass filter on interrupt 1 (bit 0).
    pub hp_ia1: bool,
    // High-pass filter on interrupt 2 (bit 1).
    pub hp_ia2: bool,
    // High-pass filter on click (bit 2).
    pub hp_click: bool,
    // Filtered data selection (bit 3).
    pub fds: bool,
    // High-pass cut-off selection (bits 5:4).
    pub hpcf: B2,
    // High-pass filter mode (bits 7:6).
    pub hpm: B2,
}

impl From<u8> for CtrlReg2 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg2> for u8 {
    fn from(value: CtrlReg2) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `CTRL_REG4` (address `0x23`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg4 {
    // SPI serial interface mode (bit 0).
    pub sim: bool,
    // Self-test selection (bits 2:1).
    pub self_test: SelfTest,
    // High-resolution output mode (bit 3).
    pub high_resolution: bool,
    // Full-scale selection (bits 5:4).
    pub range: Range,
    // Big/little endian data selection (bit 6).
    pub ble: bool,
    // Block data update (bit 7).
    pub bdu: bool,
}

impl From<u8> for CtrlReg4 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg4> for u8 {
    fn from(value: CtrlReg4) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `STATUS_REG` (address `0x27`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // New X data available (bit 0).
    pub x_available: bool,
    // New Y data available (bit 1).
    pub y_available: bool,
    // New Z data available (bit 2).
    pub z_available: bool,
    // New data on all axes (bit 3).
    pub xyz_available: bool,
    // X overrun (bit 4).
    pub x_overrun: bool,
    // Y overrun (bit 5).
    pub y_overrun: bool,
    // Z overrun (bit 6).
    pub z_overrun: bool,
    // Overrun on any axis (bit 7).
    pub xyz_overrun: bool,
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for CtrlReg1 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CTRL_REG1;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x07);
}

impl Register for CtrlReg2 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CTRL_REG2;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for CtrlReg4 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CTRL_REG4;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for Status {
    type Raw = u8;
    const ADDRESS: u8 = REG_STATUS;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
    const RESET_VALUE: Option<Self::Raw> = None;
}
