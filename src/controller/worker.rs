//! Worker side of a controller: owns the sensor and serves requests until cancelled.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::Local;

use super::TimedSample;
use crate::error::Result;
use crate::sensor::Sensor;

/// How long an idle worker waits for a request before checking for cancellation.
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Builds the sensor inside the worker from the staged configuration.
pub(super) type Recipe<S> = Box<dyn FnOnce(<S as Sensor>::Config) -> Result<S> + Send>;

/// Requests the caller can issue.
#[derive(Debug)]
pub(super) enum Request {
    Read,
    ReadFor { duration: Duration, format: String },
    NewDataAvailable,
}

/// Successful answers from the worker.
#[derive(Debug)]
pub(super) enum Reply<T> {
    Ready,
    Sample(T),
    Samples(Vec<TimedSample<T>>),
    Flag(bool),
}

/// Cooperative cancellation flag shared between a controller and its worker.
///
/// Cloneable and usable from any thread, e.g. a Ctrl-C handler. Cancelling aborts an
/// in-flight [`read_for`](super::Controller::read_for) and ends the worker; the
/// controller reports [`LifecycleError::Stopped`](crate::LifecycleError::Stopped) from
/// then on.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Caller-side handle on a running worker thread.
pub(super) struct Worker<T> {
    requests: Sender<Request>,
    replies: Receiver<Result<Reply<T>>>,
    handle: JoinHandle<()>,
}

impl<T> Worker<T> {
    pub(super) fn new(
        requests: Sender<Request>,
        replies: Receiver<Result<Reply<T>>>,
        handle: JoinHandle<()>,
    ) -> Self {
        Self {
            requests,
            replies,
            handle,
        }
    }

    /// Sends one request and waits for its answer. `None` when the worker is gone.
    pub(super) fn exchange(&self, request: Request) -> Option<Result<Reply<T>>> {
        self.requests.send(request).ok()?;
        self.replies.recv().ok()
    }

    /// Waits for the readiness report sent after the sensor came up.
    pub(super) fn ready(&self) -> Option<Result<Reply<T>>> {
        self.replies.recv().ok()
    }

    /// Closes the request channel and waits for the thread. Returns the panic message
    /// if the worker panicked.
    pub(super) fn join(self) -> core::result::Result<(), String> {
        drop(self.requests);
        self.handle.join().map_err(panic_message)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Worker thread body.
pub(super) fn run<S: Sensor>(
    recipe: Recipe<S>,
    config: S::Config,
    requests: Receiver<Request>,
    replies: Sender<Result<Reply<S::Sample>>>,
    cancel: CancelHandle,
) {
    let mut sensor = match boot(recipe, config) {
        Ok(sensor) => sensor,
        Err(err) => {
            log::error!("sensor initialization failed: {err}");
            let _ = replies.send(Err(err));
            return;
        }
    };

    if replies.send(Ok(Reply::Ready)).is_ok() {
        log::info!("sensor worker ready");
        serve(&mut sensor, &requests, &replies, &cancel);
    }

    if let Err(err) = sensor.stop() {
        log::warn!("failed to stop sensor: {err}");
    }
    log::info!("sensor worker exited");
}

fn boot<S: Sensor>(recipe: Recipe<S>, config: S::Config) -> Result<S> {
    let mut sensor = recipe(config)?;
    sensor.start()?;
    sensor.configure(config)?;
    Ok(sensor)
}

fn serve<S: Sensor>(
    sensor: &mut S,
    requests: &Receiver<Request>,
    replies: &Sender<Result<Reply<S::Sample>>>,
    cancel: &CancelHandle,
) {
    while !cancel.is_cancelled() {
        let request = match requests.recv_timeout(POLL_INTERVAL) {
            Ok(request) => request,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return,
        };

        let reply = match request {
            Request::Read => sensor.read().map(Reply::Sample),
            Request::NewDataAvailable => sensor.new_data_available().map(Reply::Flag),
            Request::ReadFor { duration, format } => {
                match capture(sensor, duration, &format, cancel) {
                    Ok(Some(samples)) => Ok(Reply::Samples(samples)),
                    // Abandoned: the caller learns about it from the closed channel.
                    Ok(None) => return,
                    Err(err) => Err(err),
                }
            }
        };

        if let Err(err) = &reply {
            log::error!("sensor request failed: {err}");
        }
        if replies.send(reply).is_err() {
            return;
        }
    }
    log::warn!("sensor worker cancelled");
}

/// Polls the sensor until `duration` has elapsed. `None` when cancelled midway.
fn capture<S: Sensor>(
    sensor: &mut S,
    duration: Duration,
    format: &str,
    cancel: &CancelHandle,
) -> Result<Option<Vec<TimedSample<S::Sample>>>> {
    let started = Instant::now();
    let mut samples = Vec::new();

    while started.elapsed() < duration {
        if cancel.is_cancelled() {
            log::warn!("timed capture cancelled after {} samples", samples.len());
            return Ok(None);
        }
        if sensor.new_data_available()? {
            let timestamp = Local::now().format(format).to_string();
            let value = sensor.read()?;
            samples.push(TimedSample { timestamp, value });
        } else {
            thread::yield_now();
        }
    }
    Ok(Some(samples))
}
