//! Scripted controller input for the Pico W adapter, from an RP2040.
//!
//! This crate provides the embedded side of the sequencer: a UART link to
//! the adapter and a runner that plays a text script through it.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Parses the bundled script into a sequence of actions
//! 2. Resets the adapter (`RELEASE_ALL`, `CENTER_STICKS`)
//! 3. Sends each action as protocol lines over UART (115200 baud, 8N1),
//!    waiting out holds and post-action delays
//! 4. Resets the adapter again and reports the outcome on the LED
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | Serial transmit (to adapter RX) |
//! | UART1 RX | 9    | Unused |
//! | Button   | 15   | Cancel, active low with pull-up |
//! | LED      | 25   | On after a run, blinking on failure |
//!
//! # Modules
//!
//! - [`link`]: UART byte link ([`UartLink`])
//! - [`runner`]: script loading and session ([`run_script`])
//! - [`config`]: compile-time settings ([`RunnerConfig`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe`; a failed run blinks for
//!   [`RunnerConfig::failure_blink_ms`], then panics so the probe runner exits non-zero
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they select conflicting panic handlers");

// Re-export core types for convenience
pub use sequencer_core::{
    parse_script, run_session, Action, Button, CancelToken, RunError, RunSummary, ScriptError,
    Sequence, Sequencer, SerialController, SessionError, Stick,
};

pub mod config;
pub mod link;
pub mod runner;

pub use config::RunnerConfig;
pub use link::{LinkError, UartLink};
pub use runner::{run_script, RunnerError};
