//! Logging shim: forwards to `defmt` when that feature is enabled, `log` otherwise.
//!
//! Only primitive arguments are passed through these macros so both backends accept
//! the same format strings.

#[cfg(feature = "defmt")]
macro_rules! trace {
    ($($arg:tt)*) => { defmt::trace!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($arg:tt)*) => { ::log::trace!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => { ::log::debug!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! warn_ {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn_ {
    ($($arg:tt)*) => { ::log::warn!($($arg)*) };
}

pub(crate) use {debug, trace};
pub(crate) use warn_ as warn;
