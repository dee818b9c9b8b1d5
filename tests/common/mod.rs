//! Shared fakes for the integration tests: a register-map bus and a timed sensor.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use edge_sensors::{Bus, BusError, ConfigError, LifecycleError, Result, Sensor, SensorConfig};
use embedded_hal::i2c::ErrorKind;

/// Operations recorded by [`RegisterMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Read { register: u8, len: usize },
    Write { register: u8, data: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LinkState {
    Unopened,
    Open,
    Closed,
}

#[derive(Debug)]
struct MapState {
    /// Register contents keyed by address; multi-byte registers keep all their bytes.
    registers: HashMap<u8, Vec<u8>>,
    operations: Vec<Operation>,
    link: LinkState,
    failure: Option<ErrorKind>,
}

/// In-memory register file implementing [`Bus`].
///
/// Clones share state, so a test can keep a handle after the bus moved into a driver
/// or a controller worker.
#[derive(Debug, Clone)]
pub struct RegisterMap {
    state: Arc<Mutex<MapState>>,
}

impl RegisterMap {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MapState {
                registers: HashMap::new(),
                operations: Vec::new(),
                link: LinkState::Unopened,
                failure: None,
            })),
        }
    }

    /// Presets a register.
    pub fn with(self, register: u8, bytes: &[u8]) -> Self {
        self.set(register, bytes);
        self
    }

    pub fn set(&self, register: u8, bytes: &[u8]) {
        self.lock().registers.insert(register, bytes.to_vec());
    }

    /// Current bytes of a register (zero when never written).
    pub fn get(&self, register: u8, len: usize) -> Vec<u8> {
        let state = self.lock();
        let mut bytes = state.registers.get(&register).cloned().unwrap_or_default();
        bytes.resize(len, 0);
        bytes
    }

    pub fn byte(&self, register: u8) -> u8 {
        self.get(register, 1)[0]
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.lock().operations.clone()
    }

    pub fn writes(&self) -> Vec<Operation> {
        self.operations()
            .into_iter()
            .filter(|op| matches!(op, Operation::Write { .. }))
            .collect()
    }

    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }

    /// Makes every subsequent register access fail with `kind`.
    pub fn fail_with(&self, kind: ErrorKind) {
        self.lock().failure = Some(kind);
    }

    pub fn is_closed(&self) -> bool {
        self.lock().link == LinkState::Closed
    }

    fn lock(&self) -> MutexGuard<'_, MapState> {
        self.state.lock().unwrap()
    }

    fn access(&self) -> Result<MutexGuard<'_, MapState>> {
        let mut state = self.lock();
        match state.link {
            LinkState::Closed => return Err(LifecycleError::Stopped.into()),
            LinkState::Unopened => state.link = LinkState::Open,
            LinkState::Open => {}
        }
        if let Some(kind) = state.failure {
            return Err(BusError::I2c(kind).into());
        }
        Ok(state)
    }
}

impl Bus for RegisterMap {
    fn start(&mut self) -> Result<()> {
        self.access().map(|_| ())
    }

    fn stop(&mut self) -> Result<()> {
        let mut state = self.lock();
        match state.link {
            LinkState::Unopened => Err(LifecycleError::NotStarted.into()),
            LinkState::Closed => Err(LifecycleError::Stopped.into()),
            LinkState::Open => {
                state.link = LinkState::Closed;
                Ok(())
            }
        }
    }

    fn is_open(&self) -> bool {
        self.lock().link == LinkState::Open
    }

    fn read_register(&mut self, register: u8) -> Result<u8> {
        let mut value = [0u8];
        self.read_register_sequence(register, &mut value)?;
        Ok(value[0])
    }

    fn read_register_sequence(&mut self, register: u8, buf: &mut [u8]) -> Result<()> {
        let mut state = self.access()?;
        state.operations.push(Operation::Read {
            register,
            len: buf.len(),
        });
        let stored = state.registers.get(&register).cloned().unwrap_or_default();
        for (slot, byte) in buf.iter_mut().zip(stored.iter().chain(std::iter::repeat(&0))) {
            *slot = *byte;
        }
        Ok(())
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.write_register_sequence(register, &[value])
    }

    fn write_register_sequence(&mut self, register: u8, data: &[u8]) -> Result<()> {
        let mut state = self.access()?;
        state.operations.push(Operation::Write {
            register,
            data: data.to_vec(),
        });
        state.registers.insert(register, data.to_vec());
        Ok(())
    }
}

/// Configuration of [`TickSensor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickConfig {
    /// Time between two fresh samples.
    pub period: Duration,
    /// Panic on the first read.
    pub panic_on_read: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(100),
            panic_on_read: false,
        }
    }
}

impl SensorConfig for TickConfig {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.period.is_zero() {
            return Err(ConfigError::UnsupportedSampleRate(0));
        }
        Ok(())
    }
}

/// Sensor producing a new counter value every `period`.
#[derive(Debug)]
pub struct TickSensor {
    config: TickConfig,
    last: Option<Instant>,
    count: u32,
    started: bool,
}

impl TickSensor {
    pub fn new(config: TickConfig) -> Self {
        Self {
            config,
            last: None,
            count: 0,
            started: false,
        }
    }
}

impl Sensor for TickSensor {
    type Config = TickConfig;
    type Sample = u32;

    fn start(&mut self) -> Result<()> {
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if !self.started {
            return Err(LifecycleError::NotStarted.into());
        }
        self.started = false;
        Ok(())
    }

    fn configure(&mut self, config: TickConfig) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn config(&self) -> &TickConfig {
        &self.config
    }

    fn read(&mut self) -> Result<u32> {
        if self.config.panic_on_read {
            panic!("tick sensor exploded");
        }
        self.last = Some(Instant::now());
        self.count += 1;
        Ok(self.count)
    }

    fn new_data_available(&mut self) -> Result<bool> {
        Ok(self
            .last
            .is_none_or(|last| last.elapsed() >= self.config.period))
    }
}
