//! Error handling primitives shared by buses, sensor drivers and controllers.

/// Crate-wide result type alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Error variants produced by the crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Any error reported by the underlying bus transport.
    #[error(transparent)]
    Bus(#[from] BusError),
    /// The provided configuration parameters are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The operation was invoked in the wrong lifecycle state.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// The identification register did not hold the expected value.
    #[error("unexpected device id 0x{0:02x}")]
    DeviceIdMismatch(u8),
    /// The isolated worker of a controller failed.
    #[cfg(feature = "std")]
    #[error(transparent)]
    Worker(#[from] WorkerFault),
}

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BusError {
    /// I2C transaction failed.
    #[error("i2c transfer failed: {0}")]
    I2c(embedded_hal::i2c::ErrorKind),
    /// SPI transaction failed.
    #[error("spi transfer failed: {0}")]
    Spi(embedded_hal::spi::ErrorKind),
    /// The requested register sequence does not fit in a single frame.
    #[error("register sequence of {0} bytes exceeds the frame limit")]
    SequenceTooLong(usize),
    /// The bus has no device handle and no way to open one.
    #[error("bus has no device to open")]
    NoDevice,
    /// Opening the OS device node failed.
    #[cfg(feature = "std")]
    #[error("failed to open {path}: {reason}")]
    Open {
        /// Device node path.
        path: String,
        /// Description of the underlying failure.
        reason: String,
    },
}

/// Illegal configuration values, rejected before any register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Accelerometer output data rate outside the supported set.
    #[error("unsupported data rate {0} Hz")]
    UnsupportedDataRate(u16),
    /// 1620 Hz and 5376 Hz are only reachable in low-power (8-bit) mode.
    #[error("{0} Hz requires low resolution")]
    DataRateRequiresLowPower(u16),
    /// 1344 Hz is not reachable in low-power (8-bit) mode.
    #[error("{0} Hz is unavailable at low resolution")]
    DataRateUnavailableInLowPower(u16),
    /// Accelerometer measurement range outside ±2/4/8/16 g.
    #[error("unsupported measurement range {0} g")]
    UnsupportedRange(u8),
    /// Unknown resolution name.
    #[error("resolution must be one of: low, normal, high")]
    UnknownResolution,
    /// Unknown self-test mode name.
    #[error("self-test mode must be one of: off, low, high")]
    UnknownSelfTest,
    /// ADC channel index outside 0..=3.
    #[error("invalid channel {0}")]
    InvalidChannel(u8),
    /// ADC differential pair not supported by the input multiplexer.
    #[error("invalid differential pair ({0}, {1})")]
    InvalidChannelPair(u8, u8),
    /// ADC full-scale range not one of the programmable gain settings.
    #[error("unsupported full-scale range")]
    UnsupportedFullScale,
    /// ADC data rate outside the supported set.
    #[error("unsupported sample rate {0} SPS")]
    UnsupportedSampleRate(u16),
    /// Comparator queue length other than 0, 1, 2 or 4.
    #[error("comparator queue length must be 0, 1, 2 or 4, got {0}")]
    InvalidQueueLength(u8),
    /// SPI mode outside 0..=3.
    #[error("invalid spi mode {0}")]
    InvalidSpiMode(u8),
    /// Timestamp format string is not a valid strftime pattern.
    #[error("invalid timestamp format")]
    TimestampFormat,
}

/// Operations issued in the wrong state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The bus, sensor or controller was never started.
    #[error("not started")]
    NotStarted,
    /// The controller is already running.
    #[error("already started")]
    AlreadyStarted,
    /// The bus or controller has been stopped and cannot be reused.
    #[error("already stopped")]
    Stopped,
}

/// Failures raised inside a controller worker, reported back to the caller.
#[cfg(feature = "std")]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkerFault {
    /// The worker thread could not be spawned.
    #[error("failed to spawn worker: {0}")]
    Spawn(String),
    /// Building, starting or configuring the sensor failed.
    #[error("sensor initialization failed: {0}")]
    Init(Box<Error>),
    /// A request failed while executing against the sensor.
    #[error("request failed: {0}")]
    Command(Box<Error>),
    /// The worker thread panicked.
    #[error("worker panicked: {0}")]
    Panicked(String),
    /// The worker went away without answering.
    #[error("worker exited without responding")]
    Disconnected,
    /// The worker answered with a reply of the wrong kind.
    #[error("worker sent an unexpected reply")]
    UnexpectedReply,
}
