//! Runs a sensor in a dedicated worker thread behind a request/response channel.
//!
//! A [`Controller`] stages a configuration while stopped, then [`start`](Controller::start)s
//! a worker that builds the sensor, applies the staged configuration and serves
//! [`read`](Controller::read), [`read_for`](Controller::read_for) and
//! [`new_data_available`](Controller::new_data_available) requests. The sensor and its
//! bus never leave the worker.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use edge_sensors::controller::{Controller, DEFAULT_TIMESTAMP_FORMAT};
//! use edge_sensors::lis3dh::{DataRate, Lis3dh, Resolution};
//! # fn main() -> edge_sensors::Result<()> {
//! # let bus = edge_sensors::bus::I2cBus::attach(
//! #     embedded_hal_mock::eh1::i2c::Mock::new(&[]),
//! #     edge_sensors::bus::I2cConfig::new(0x18, 1),
//! # );
//! let mut accel = Controller::<Lis3dh<_>>::with_bus(bus);
//! accel.set_resolution(Resolution::High);
//! accel.set_data_rate(DataRate::Hz100);
//! accel.start()?;
//!
//! let samples = accel.read_for(Duration::from_secs(2), DEFAULT_TIMESTAMP_FORMAT)?;
//! for sample in &samples {
//!     println!("{} {:?}", sample.timestamp, sample.value);
//! }
//! accel.stop()
//! # }
//! ```

mod ads1015;
mod lis3dh;
mod worker;

pub use worker::CancelHandle;

use std::mem;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};

use crate::error::{ConfigError, Error, LifecycleError, Result, WorkerFault};
use crate::sensor::{Sensor, SensorConfig};
use worker::{Recipe, Reply, Request, Worker};

/// Timestamp pattern producing e.g. `2024-05-01 12:00:00.123456`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One sample of a timed capture.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSample<T> {
    /// Local time the sample was taken, formatted with the requested pattern.
    pub timestamp: String,
    pub value: T,
}

enum State<T> {
    NotStarted,
    Running(Worker<T>),
    Stopped,
}

/// Owns the recipe of a sensor and drives it from a worker thread.
pub struct Controller<S: Sensor + 'static> {
    name: &'static str,
    config: S::Config,
    recipe: Option<Recipe<S>>,
    state: State<S::Sample>,
    cancel: CancelHandle,
}

impl<S: Sensor + 'static> Controller<S> {
    /// Creates a stopped controller. `recipe` runs inside the worker and receives the
    /// staged configuration.
    pub fn new<F>(name: &'static str, config: S::Config, recipe: F) -> Self
    where
        F: FnOnce(S::Config) -> Result<S> + Send + 'static,
    {
        Self {
            name,
            config,
            recipe: Some(Box::new(recipe)),
            state: State::NotStarted,
            cancel: CancelHandle::default(),
        }
    }

    // ==================================================================
    // == Lifecycle =====================================================
    // ==================================================================
    /// Spawns the worker and blocks until the sensor is configured.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            State::NotStarted => {}
            State::Running(_) => return Err(LifecycleError::AlreadyStarted.into()),
            State::Stopped => return Err(LifecycleError::Stopped.into()),
        }
        if self.cancel.is_cancelled() {
            self.state = State::Stopped;
            return Err(LifecycleError::Stopped.into());
        }
        self.config.validate()?;
        let recipe = self.recipe.take().ok_or(LifecycleError::Stopped)?;

        let (request_tx, request_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let config = self.config;
        let cancel = self.cancel.clone();

        let handle = thread::Builder::new()
            .name(self.name.to_string())
            .spawn(move || worker::run(recipe, config, request_rx, reply_tx, cancel))
            .map_err(|err| {
                self.state = State::Stopped;
                WorkerFault::Spawn(err.to_string())
            })?;
        let worker = Worker::new(request_tx, reply_rx, handle);

        match worker.ready() {
            Some(Ok(Reply::Ready)) => {
                log::info!("{} worker started", self.name);
                self.state = State::Running(worker);
                Ok(())
            }
            Some(Ok(_)) => {
                self.state = State::Running(worker);
                Err(self.shut_down(WorkerFault::UnexpectedReply))
            }
            Some(Err(err)) => {
                self.state = State::Running(worker);
                Err(self.shut_down(WorkerFault::Init(Box::new(err))))
            }
            None => {
                self.state = State::Running(worker);
                Err(self.shut_down(WorkerFault::Disconnected))
            }
        }
    }

    /// Cancels the worker, waits for it to stop its sensor and retires the controller.
    pub fn stop(&mut self) -> Result<()> {
        match mem::replace(&mut self.state, State::Stopped) {
            State::NotStarted => {
                self.state = State::NotStarted;
                Err(LifecycleError::NotStarted.into())
            }
            State::Stopped => Err(LifecycleError::Stopped.into()),
            State::Running(worker) => {
                self.cancel.cancel();
                worker.join().map_err(WorkerFault::Panicked)?;
                log::info!("{} worker stopped", self.name);
                Ok(())
            }
        }
    }

    /// Returns `true` while a worker is serving requests.
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    /// Returns a handle that cancels the worker from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    // ==================================================================
    // == Requests ======================================================
    // ==================================================================
    /// Reads one sample.
    pub fn read(&mut self) -> Result<S::Sample> {
        match self.request(Request::Read)? {
            Reply::Sample(value) => Ok(value),
            _ => Err(WorkerFault::UnexpectedReply.into()),
        }
    }

    /// Collects every fresh sample for `duration`, oldest first, each stamped with the
    /// local time formatted by the strftime pattern `format`.
    pub fn read_for(
        &mut self,
        duration: Duration,
        format: &str,
    ) -> Result<Vec<TimedSample<S::Sample>>> {
        check_timestamp_format(format)?;
        let request = Request::ReadFor {
            duration,
            format: format.to_string(),
        };
        match self.request(request)? {
            Reply::Samples(samples) => Ok(samples),
            _ => Err(WorkerFault::UnexpectedReply.into()),
        }
    }

    /// Asks the sensor whether a fresh sample is waiting.
    pub fn new_data_available(&mut self) -> Result<bool> {
        match self.request(Request::NewDataAvailable)? {
            Reply::Flag(flag) => Ok(flag),
            _ => Err(WorkerFault::UnexpectedReply.into()),
        }
    }

    // ==================================================================
    // == Staged Configuration ==========================================
    // ==================================================================
    /// Returns the staged configuration.
    pub fn config(&self) -> &S::Config {
        &self.config
    }

    /// Replaces the staged configuration. Checked by [`Controller::start`].
    pub fn set_config(&mut self, config: S::Config) {
        self.stage(|staged| *staged = config);
    }

    pub(crate) fn stage(&mut self, update: impl FnOnce(&mut S::Config)) {
        if self.is_running() {
            log::warn!(
                "{} is running; configuration change only takes effect on a new controller",
                self.name
            );
        }
        update(&mut self.config);
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    fn request(&mut self, request: Request) -> Result<Reply<S::Sample>> {
        let outcome = match &self.state {
            State::Running(worker) => worker.exchange(request),
            State::NotStarted => return Err(LifecycleError::NotStarted.into()),
            State::Stopped => return Err(LifecycleError::Stopped.into()),
        };

        match outcome {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(err)) => Err(WorkerFault::Command(Box::new(err)).into()),
            None if self.cancel.is_cancelled() => {
                Err(self.shut_down(LifecycleError::Stopped))
            }
            None => Err(self.shut_down(WorkerFault::Disconnected)),
        }
    }

    /// Retires a running worker and reports `fallback` unless the worker panicked.
    fn shut_down(&mut self, fallback: impl Into<Error>) -> Error {
        self.cancel.cancel();
        if let State::Running(worker) = mem::replace(&mut self.state, State::Stopped) {
            if let Err(message) = worker.join() {
                log::error!("{} worker panicked: {message}", self.name);
                return WorkerFault::Panicked(message).into();
            }
        }
        fallback.into()
    }
}

impl<S: Sensor + 'static> Drop for Controller<S> {
    fn drop(&mut self) {
        if let State::Running(worker) = mem::replace(&mut self.state, State::Stopped) {
            self.cancel.cancel();
            let _ = worker.join();
        }
    }
}

fn check_timestamp_format(format: &str) -> core::result::Result<(), ConfigError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::TimestampFormat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_formats_are_checked() {
        assert_eq!(check_timestamp_format(DEFAULT_TIMESTAMP_FORMAT), Ok(()));
        assert_eq!(check_timestamp_format("%s"), Ok(()));
        assert_eq!(check_timestamp_format("%Q"), Err(ConfigError::TimestampFormat));
    }
}
