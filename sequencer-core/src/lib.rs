//! Timed controller-input sequences for the Pico W adapter.
//!
//! A [`Sequence`] is an ordered list of [`Action`]s: press a button, move a
//! stick, or center both sticks, each followed by a wait. A [`Sequencer`]
//! plays a sequence against any [`Controller`], one action at a time, and
//! stops at the first failure with the index of the action that failed.
//!
//! # Overview
//!
//! - [`action`]: [`Action`], its steps, and validation
//! - [`sequence`]: fixed-capacity [`Sequence`]
//! - [`controller`]: the [`Controller`] trait and its errors
//! - [`sequencer`]: [`Sequencer`], [`RunState`], [`RunError`]
//! - [`session`]: [`run_session`], connect → run → close
//! - [`serial`]: [`SerialController`] over any `embedded-io-async` link
//! - [`simulated`]: [`SimulatedController`] backed by a report model
//! - [`script`]: [`parse_script`] for text sequences
//!
//! # Example
//!
//! ```
//! use embassy_futures::block_on;
//! use embedded_hal_async::delay::DelayNs;
//! use sequencer_core::{
//!     run_session, Action, Button, CancelToken, Sequence, Sequencer, SimulatedController, Stick,
//! };
//!
//! struct NoDelay;
//! impl DelayNs for NoDelay {
//!     async fn delay_ns(&mut self, _ns: u32) {}
//! }
//!
//! let seq: Sequence = Sequence::from_actions(&[
//!     Action::press(Button::A, 0.1).then_wait(0.5),
//!     Action::stick(Stick::Left, 1.0, 0.0).then_wait(1.0),
//!     Action::center_sticks(),
//! ])
//! .unwrap();
//!
//! let mut controller = SimulatedController::new(NoDelay);
//! let mut sequencer = Sequencer::new(NoDelay);
//! let summary = block_on(run_session(
//!     &mut controller,
//!     &mut sequencer,
//!     &seq,
//!     &CancelToken::new(),
//! ))
//! .unwrap();
//! assert_eq!(summary.executed, 3);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log and format through defmt (for embedded logging)
//! - **`log`**: Log through the `log` facade
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the logging macros are visible to later modules
#[macro_use]
mod fmt;

pub mod action;
pub mod cancel;
pub mod controller;
pub mod script;
pub mod sequence;
pub mod sequencer;
pub mod serial;
pub mod session;
pub mod simulated;

#[cfg(test)]
mod testing;

pub use action::{Action, ActionKind, Step, ValidAction, ValidStep, ValidationError, DEFAULT_HOLD_SECS};
pub use cancel::CancelToken;
pub use controller::{Controller, ControllerError, DispatchError};
pub use pico_proto::{Button, Stick};
pub use script::{parse_script, ScriptError, ScriptErrorKind};
pub use sequence::{InvalidAction, Sequence, SequenceFull, DEFAULT_CAPACITY};
pub use sequencer::{FailureCause, RunError, RunState, RunSummary, Sequencer};
pub use serial::SerialController;
pub use session::{run_session, SessionError};
pub use simulated::SimulatedController;
