//! Test doubles shared by the unit tests.

extern crate std;

use crate::cancel::CancelToken;
use crate::controller::{Controller, ControllerError, DispatchError};
use core::time::Duration;
use embedded_hal_async::delay::DelayNs;
use pico_proto::{Button, Stick};
use std::vec::Vec;

/// Delay that returns immediately and records what it was asked to wait.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub waits_ms: Vec<u32>,
    pub waits_ns: Vec<u32>,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.waits_ms.iter().map(|&ms| u64::from(ms)).sum::<u64>()
            + self.waits_ns.iter().map(|&ns| u64::from(ns) / 1_000_000).sum::<u64>()
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waits_ns.push(ns);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}

/// A controller operation as seen by [`MockController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    Press(Button, Duration),
    Stick(Stick, f32, f32),
    CenterSticks,
}

/// Controller double that records calls and injects faults.
pub struct MockController<'a> {
    pub calls: Vec<Call>,
    pub connected: bool,
    pub connects: usize,
    pub closes: usize,
    connect_error: Option<ControllerError>,
    fail_at: Option<(usize, ControllerError)>,
    cancel_at: Option<(usize, &'a CancelToken)>,
}

impl<'a> MockController<'a> {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            connected: false,
            connects: 0,
            closes: 0,
            connect_error: None,
            fail_at: None,
            cancel_at: None,
        }
    }

    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::new()
        }
    }

    /// Make `connect` fail with `err`.
    pub fn refusing_connect(mut self, err: ControllerError) -> Self {
        self.connect_error = Some(err);
        self
    }

    /// Make the `call`-th operation (0-based) fail with `err`.
    pub fn failing_at(mut self, call: usize, err: ControllerError) -> Self {
        self.fail_at = Some((call, err));
        self
    }

    /// Set `token` while handling the `call`-th operation.
    pub fn cancelling_at(mut self, call: usize, token: &'a CancelToken) -> Self {
        self.cancel_at = Some((call, token));
        self
    }

    fn record(&mut self, call: Call) -> Result<(), ControllerError> {
        if !self.connected {
            return Err(DispatchError::NotConnected.into());
        }
        let n = self.calls.len();
        self.calls.push(call);
        if let Some((at, token)) = self.cancel_at {
            if at == n {
                token.cancel();
            }
        }
        match self.fail_at {
            Some((at, err)) if at == n => Err(err),
            _ => Ok(()),
        }
    }
}

impl Controller for MockController<'_> {
    async fn connect(&mut self) -> Result<(), ControllerError> {
        self.connects += 1;
        if let Some(err) = self.connect_error {
            return Err(err);
        }
        self.connected = true;
        Ok(())
    }

    async fn press(&mut self, button: Button, hold: Duration) -> Result<(), ControllerError> {
        self.record(Call::Press(button, hold))
    }

    async fn stick(&mut self, stick: Stick, x: f32, y: f32) -> Result<(), ControllerError> {
        self.record(Call::Stick(stick, x, y))
    }

    async fn center_sticks(&mut self) -> Result<(), ControllerError> {
        self.record(Call::CenterSticks)
    }

    async fn close(&mut self) {
        self.closes += 1;
        self.connected = false;
    }
}
