//! Controller backed by the adapter's text protocol over a byte link.

use crate::action::{axis_in_range, duration_to_millis};
use crate::controller::{Controller, ControllerError, DispatchError};
use core::time::Duration;
use embedded_hal_async::delay::DelayNs;
use embedded_io_async::Write;
use pico_proto::{Button, Command, Serialize, SerializeError, Stick, MAX_COMMAND_SIZE};

/// Controller that drives a Pico W adapter over a serial link.
///
/// Each operation is written as one protocol line (see [`pico_proto`]) and
/// flushed before returning. A press writes `PRESS`, waits out the hold on
/// `delay`, then writes `RELEASE`; the adapter itself never auto-releases.
///
/// # Example
///
/// ```ignore
/// let (tx, _rx) = uart.split();
/// let mut controller = SerialController::new(UartLink::new(tx), Delay);
/// controller.connect().await?;
/// ```
pub struct SerialController<W, D> {
    link: W,
    delay: D,
    connected: bool,
}

impl<W: Write, D: DelayNs> SerialController<W, D> {
    /// Create an unconnected controller on `link`.
    pub fn new(link: W, delay: D) -> Self {
        Self {
            link,
            delay,
            connected: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Get a reference to the link.
    pub fn link(&self) -> &W {
        &self.link
    }

    /// Decompose into link and delay.
    pub fn into_inner(self) -> (W, D) {
        (self.link, self.delay)
    }

    /// Write one command line and flush it.
    async fn send(&mut self, command: Command) -> Result<(), DispatchError> {
        let mut buf = [0u8; MAX_COMMAND_SIZE];
        let len = command.serialize(&mut buf).map_err(|e| match e {
            SerializeError::NonFinite => DispatchError::OutOfRange,
            _ => DispatchError::Io,
        })?;

        trace!("-> {}", command.keyword());
        self.link
            .write_all(&buf[..len])
            .await
            .map_err(|_| DispatchError::Io)?;
        self.link.flush().await.map_err(|_| DispatchError::Io)
    }

    /// Put the adapter in a neutral state: nothing pressed, sticks centered.
    async fn neutralize(&mut self) -> Result<(), DispatchError> {
        self.send(Command::ReleaseAll).await?;
        self.send(Command::CenterSticks).await
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

impl<W: Write, D: DelayNs> Controller for SerialController<W, D> {
    async fn connect(&mut self) -> Result<(), ControllerError> {
        if let Err(e) = self.neutralize().await {
            warn!("Adapter did not accept reset: {:?}", e);
            return Err(ControllerError::Connection);
        }
        self.connected = true;
        debug!("Serial controller connected");
        Ok(())
    }

    async fn press(&mut self, button: Button, hold: Duration) -> Result<(), ControllerError> {
        self.ensure_connected()?;
        self.send(Command::Press(button)).await?;
        self.delay.delay_ms(duration_to_millis(hold)).await;
        self.send(Command::Release(button)).await?;
        Ok(())
    }

    async fn stick(&mut self, stick: Stick, x: f32, y: f32) -> Result<(), ControllerError> {
        self.ensure_connected()?;
        if !(axis_in_range(x) && axis_in_range(y)) {
            return Err(DispatchError::OutOfRange.into());
        }
        self.send(Command::Stick { stick, x, y }).await?;
        Ok(())
    }

    async fn center_sticks(&mut self) -> Result<(), ControllerError> {
        self.ensure_connected()?;
        self.send(Command::CenterSticks).await?;
        Ok(())
    }

    async fn close(&mut self) {
        if !self.connected {
            return;
        }
        if let Err(e) = self.neutralize().await {
            warn!("Adapter reset on close failed: {:?}", e);
        }
        self.connected = false;
        debug!("Serial controller closed");
    }
}
