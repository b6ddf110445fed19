//! Command protocol for the Pico W controller adapter.
//!
//! The adapter firmware emulates a Switch Pro Controller over Bluetooth and
//! takes its inputs as ASCII commands, one per line, over a serial link.
//! This crate provides everything needed to speak that protocol:
//!
//! - **Types**: [`Button`], [`Stick`], and [`Command`]
//! - **Serialization**: [`Serialize`] writes a command as one canonical line
//! - **Parsing**: [`parse_command`] and the reusable [`Tokens`] lexer
//! - **Report model**: [`SwitchReport`] applies commands to the same report
//!   state the adapter keeps, for host-side checks
//!
//! # Protocol Format
//!
//! ```text
//! PRESS <button>          hold a button
//! RELEASE <button>        release a button
//! STICK <stick> <h> <v>   set a stick, h/v in [-1.0, 1.0]
//! SLEEP <seconds>         adapter-side pause
//! CENTER_STICKS           both sticks to neutral
//! RELEASE_ALL             release every button
//! # comment               ignored
//! ```
//!
//! Buttons: `a b x y l r zl zr plus minus home capture l_stick r_stick
//! dpad_up dpad_down dpad_left dpad_right`. Sticks: `l_stick r_stick`.
//!
//! # Example
//!
//! ```
//! use pico_proto::{parse_command, Command, Serialize, Stick, SwitchReport};
//!
//! let cmd = Command::Stick { stick: Stick::Left, x: 1.0, y: 0.0 };
//! let mut buf = [0u8; 64];
//! let len = cmd.serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"STICK l_stick 1.000 0.000\n");
//!
//! let parsed = parse_command(&buf[..len]).unwrap().unwrap();
//! let mut report = SwitchReport::neutral();
//! report.apply(&parsed);
//! assert_eq!(report.stick_raw(Stick::Left), (0xFFE, 0x7FF));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

mod fmt;
pub mod parser;
pub mod report;
pub mod serialize;
pub mod types;

pub use parser::{parse_command, ParseError, Tokens, MAX_LINE_LENGTH};
pub use report::{SwitchReport, STICK_CENTER, STICK_MAX, STICK_MIN};
pub use serialize::{Serialize, SerializeError, MAX_COMMAND_SIZE};
pub use types::{Button, Command, Stick};
