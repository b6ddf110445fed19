//! In-memory controller for dry runs and tests.

use crate::action::{axis_in_range, duration_to_millis};
use crate::controller::{Controller, ControllerError, DispatchError};
use core::time::Duration;
use embedded_hal_async::delay::DelayNs;
use pico_proto::{Button, Stick, SwitchReport};

/// Controller that applies operations to a [`SwitchReport`] instead of a
/// device.
///
/// Holds are waited out on `delay`, so a run against a simulated controller
/// takes as long as the real one. Every successful operation is counted.
pub struct SimulatedController<D> {
    report: SwitchReport,
    delay: D,
    connected: bool,
    dispatched: usize,
}

impl<D: DelayNs> SimulatedController<D> {
    pub fn new(delay: D) -> Self {
        Self {
            report: SwitchReport::neutral(),
            delay,
            connected: false,
            dispatched: 0,
        }
    }

    /// Current report state.
    #[inline]
    #[must_use]
    pub fn report(&self) -> &SwitchReport {
        &self.report
    }

    /// Number of operations carried out since creation.
    #[inline]
    #[must_use]
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Get a reference to the delay provider.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    #[inline]
    fn ensure_connected(&self) -> Result<(), DispatchError> {
        if self.connected {
            Ok(())
        } else {
            Err(DispatchError::NotConnected)
        }
    }
}

impl<D: DelayNs> Controller for SimulatedController<D> {
    async fn connect(&mut self) -> Result<(), ControllerError> {
        self.report = SwitchReport::neutral();
        self.connected = true;
        Ok(())
    }

    async fn press(&mut self, button: Button, hold: Duration) -> Result<(), ControllerError> {
        self.ensure_connected()?;
        self.report.press(button);
        self.delay.delay_ms(duration_to_millis(hold)).await;
        self.report.release(button);
        self.dispatched += 1;
        Ok(())
    }

    async fn stick(&mut self, stick: Stick, x: f32, y: f32) -> Result<(), ControllerError> {
        self.ensure_connected()?;
        if !(axis_in_range(x) && axis_in_range(y)) {
            return Err(DispatchError::OutOfRange.into());
        }
        self.report.set_stick(stick, x, y);
        self.dispatched += 1;
        Ok(())
    }

    async fn center_sticks(&mut self) -> Result<(), ControllerError> {
        self.ensure_connected()?;
        self.report.center_sticks();
        self.dispatched += 1;
        Ok(())
    }

    async fn close(&mut self) {
        self.report.release_all();
        self.connected = false;
    }
}
