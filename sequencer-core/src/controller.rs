//! Controller trait and error types.

use core::future::Future;
use core::time::Duration;
use pico_proto::{Button, Stick};

/// Why a single controller operation could not be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// The controller has not been connected, or has been closed.
    NotConnected,
    /// The controller does not support the addressed button or stick.
    InvalidTarget,
    /// A stick value is outside the accepted range.
    OutOfRange,
    /// The underlying link failed.
    Io,
}

impl core::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "controller not connected"),
            Self::InvalidTarget => write!(f, "invalid button or stick"),
            Self::OutOfRange => write!(f, "value out of range"),
            Self::Io => write!(f, "link I/O error"),
        }
    }
}

/// Error type for controller operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// The transport could not be established.
    Connection,
    /// A dispatched operation failed.
    Dispatch(DispatchError),
}

impl From<DispatchError> for ControllerError {
    fn from(err: DispatchError) -> Self {
        ControllerError::Dispatch(err)
    }
}

impl core::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Connection => write!(f, "could not connect to controller"),
            Self::Dispatch(e) => write!(f, "dispatch failed: {e}"),
        }
    }
}

/// Async trait for controllers that accept scripted input.
///
/// This trait abstracts the device that turns button and stick operations
/// into controller input: the Pico W adapter over a serial link, an in-memory
/// simulation, or a test double. Operations inherit whatever timeout policy
/// the implementation enforces.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait Controller {
    /// Establish the transport to the device.
    fn connect(&mut self) -> impl Future<Output = Result<(), ControllerError>>;

    /// Press `button`, hold it for `hold`, then release it.
    fn press(
        &mut self,
        button: Button,
        hold: Duration,
    ) -> impl Future<Output = Result<(), ControllerError>>;

    /// Move `stick` to (`x`, `y`), each axis in [-1.0, 1.0].
    fn stick(
        &mut self,
        stick: Stick,
        x: f32,
        y: f32,
    ) -> impl Future<Output = Result<(), ControllerError>>;

    /// Return both sticks to neutral.
    fn center_sticks(&mut self) -> impl Future<Output = Result<(), ControllerError>>;

    /// Release the device. Never fails; calling it again has no effect.
    fn close(&mut self) -> impl Future<Output = ()>;
}
