//! Drivers for the ST LIS3DH accelerometer and the TI ADS1015 ADC over I2C or SPI.
//!
//! The drivers are `no_std` and work on any `embedded-hal` 1.0 implementation. With the
//! `std` feature a [`Controller`](controller::Controller) runs a driver in its own worker
//! thread; the `linux` feature adds `/dev/i2c-N` and `/dev/spidevB.C` transports.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod error;
mod log;

pub mod ads1015;
pub mod bus;
#[cfg(feature = "std")]
pub mod controller;
pub mod lis3dh;
#[cfg(feature = "linux")]
pub mod linux;
pub mod registers;
pub mod sensor;

pub use crate::ads1015::Ads1015;
pub use crate::bus::Bus;
#[cfg(feature = "std")]
pub use crate::error::WorkerFault;
pub use crate::error::{BusError, ConfigError, Error, LifecycleError, Result};
pub use crate::lis3dh::Lis3dh;
pub use crate::sensor::{Sensor, SensorConfig};
