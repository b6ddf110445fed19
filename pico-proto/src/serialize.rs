//! Command serialization.
//!
//! Every [`Command`] serializes to one canonical line: upper-case keyword,
//! lower-case names, three-decimal numbers, `\n` terminator.
//!
//! ```text
//! PRESS home\n
//! STICK l_stick -1.000 0.500\n
//! SLEEP 0.250\n
//! CENTER_STICKS\n
//! ```
//!
//! # Example
//!
//! ```
//! use pico_proto::{Button, Command, Serialize};
//!
//! let mut buf = [0u8; 64];
//! let len = Command::Press(Button::A).serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"PRESS a\n");
//! ```

use crate::fmt::{to_milli, write_fixed3, write_unsigned_fixed3, MAX_FIXED3_LEN};
use crate::types::Command;

/// Maximum size of a serialized command.
///
/// Breakdown for the longest command, STICK: keyword(5) + space(1) +
/// stick(7) + space(1) + x(12) + space(1) + y(12) + \n(1) = 40.
pub const MAX_COMMAND_SIZE: usize = 40;

/// Cursor over the output buffer.
struct SerializeBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SerializeBuf<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn write(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos += 1;
    }

    #[inline]
    fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    /// Write a signed three-decimal value.
    #[inline]
    fn write_fixed3(&mut self, milli: i32) {
        let mut tmp = [0u8; MAX_FIXED3_LEN];
        let len = write_fixed3(&mut tmp, milli);
        self.buf[self.pos..self.pos + len].copy_from_slice(&tmp[..len]);
        self.pos += len;
    }

    /// Write milliseconds as three-decimal seconds.
    #[inline]
    fn write_seconds(&mut self, millis: u32) {
        let mut tmp = [0u8; MAX_FIXED3_LEN];
        let len = write_unsigned_fixed3(&mut tmp, millis);
        self.buf[self.pos..self.pos + len].copy_from_slice(&tmp[..len]);
        self.pos += len;
    }

    /// Terminate the line and return its length.
    #[inline]
    fn finalize(mut self) -> usize {
        self.write(b'\n');
        self.pos
    }
}

/// Error type for serialization operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// The output buffer is too small to hold the serialized command.
    BufferTooSmall,
    /// A stick axis is NaN, infinite, or too large to encode.
    NonFinite,
    /// The writer rejected the output.
    WriteError,
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::NonFinite => write!(f, "value cannot be encoded"),
            Self::WriteError => write!(f, "write error"),
        }
    }
}

/// Extension trait for serializing protocol commands.
pub trait Serialize {
    /// Serialize to the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the buffer is shorter than
    /// [`MAX_COMMAND_SIZE`], or [`SerializeError::NonFinite`] for stick
    /// axes that cannot be encoded.
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError>;

    /// Serialize to a `core::fmt::Write` implementation.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::WriteError`] if the write fails.
    fn serialize_fmt<W: core::fmt::Write>(&self, writer: &mut W) -> Result<(), SerializeError> {
        let mut buf = [0u8; MAX_COMMAND_SIZE];
        let len = self.serialize(&mut buf)?;
        let s = core::str::from_utf8(&buf[..len]).map_err(|_| SerializeError::WriteError)?;
        writer.write_str(s).map_err(|_| SerializeError::WriteError)
    }
}

impl Serialize for Command {
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        if buf.len() < MAX_COMMAND_SIZE {
            return Err(SerializeError::BufferTooSmall);
        }

        let mut sb = SerializeBuf::new(buf);
        sb.write_str(self.keyword());

        match *self {
            Command::Press(button) | Command::Release(button) => {
                sb.write(b' ');
                sb.write_str(button.name());
            }
            Command::Stick { stick, x, y } => {
                let x = to_milli(x).ok_or(SerializeError::NonFinite)?;
                let y = to_milli(y).ok_or(SerializeError::NonFinite)?;
                sb.write(b' ');
                sb.write_str(stick.name());
                sb.write(b' ');
                sb.write_fixed3(x);
                sb.write(b' ');
                sb.write_fixed3(y);
            }
            Command::Sleep { millis } => {
                sb.write(b' ');
                sb.write_seconds(millis);
            }
            Command::CenterSticks | Command::ReleaseAll => {}
        }

        Ok(sb.finalize())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::parser::parse_command;
    use crate::types::{Button, Stick};

    fn line(cmd: Command) -> std::string::String {
        let mut s = std::string::String::new();
        cmd.serialize_fmt(&mut s).unwrap();
        s
    }

    #[test]
    fn test_serialize_press_and_release() {
        assert_eq!(line(Command::Press(Button::A)), "PRESS a\n");
        assert_eq!(line(Command::Release(Button::DpadRight)), "RELEASE dpad_right\n");
    }

    #[test]
    fn test_serialize_stick() {
        let cmd = Command::Stick {
            stick: Stick::Left,
            x: -1.0,
            y: 0.5,
        };
        assert_eq!(line(cmd), "STICK l_stick -1.000 0.500\n");
    }

    #[test]
    fn test_serialize_stick_rounds_to_thousandths() {
        let cmd = Command::Stick {
            stick: Stick::Right,
            x: 0.12345,
            y: -0.0004,
        };
        assert_eq!(line(cmd), "STICK r_stick 0.123 0.000\n");
    }

    #[test]
    fn test_serialize_sleep() {
        assert_eq!(line(Command::Sleep { millis: 250 }), "SLEEP 0.250\n");
        assert_eq!(line(Command::Sleep { millis: 1500 }), "SLEEP 1.500\n");
    }

    #[test]
    fn test_serialize_bare_commands() {
        assert_eq!(line(Command::CenterSticks), "CENTER_STICKS\n");
        assert_eq!(line(Command::ReleaseAll), "RELEASE_ALL\n");
    }

    #[test]
    fn test_serialize_rejects_nan_axis() {
        let cmd = Command::Stick {
            stick: Stick::Left,
            x: f32::NAN,
            y: 0.0,
        };
        let mut buf = [0u8; MAX_COMMAND_SIZE];
        assert_eq!(cmd.serialize(&mut buf), Err(SerializeError::NonFinite));
    }

    #[test]
    fn test_serialize_buffer_too_small() {
        let mut buf = [0u8; 8];
        let result = Command::CenterSticks.serialize(&mut buf);
        assert_eq!(result, Err(SerializeError::BufferTooSmall));
    }

    #[test]
    fn test_longest_command_fits() {
        let cmd = Command::Stick {
            stick: Stick::Right,
            x: -2_000_000.0,
            y: -2_000_000.0,
        };
        let mut buf = [0u8; MAX_COMMAND_SIZE];
        let len = cmd.serialize(&mut buf).unwrap();
        assert!(len <= MAX_COMMAND_SIZE);
        assert_eq!(buf[len - 1], b'\n');
    }

    #[test]
    fn test_serialized_stick_parses_back() {
        let cmd = Command::Stick {
            stick: Stick::Left,
            x: 0.75,
            y: -0.25,
        };
        let mut buf = [0u8; MAX_COMMAND_SIZE];
        let len = cmd.serialize(&mut buf).unwrap();
        assert_eq!(parse_command(&buf[..len]), Ok(Some(cmd)));
    }
}
