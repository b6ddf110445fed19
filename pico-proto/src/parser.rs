//! Command line parsing.
//!
//! Accepts exactly what the adapter firmware accepts, with two tightenings:
//! numbers must be finite (and non-negative for `SLEEP`), and extra
//! arguments are rejected instead of ignored.
//!
//! ```text
//! PRESS <button>
//! RELEASE <button>
//! STICK <stick> <h> <v>
//! SLEEP <seconds>
//! CENTER_STICKS
//! RELEASE_ALL
//! # comment
//! ```
//!
//! Keywords and names are case-insensitive. Blank lines and comments parse
//! to `None`.

use crate::fmt::to_milli;
use crate::types::{Button, Command, Stick};

/// Maximum line length accepted by the adapter (excluding the line ending).
pub const MAX_LINE_LENGTH: usize = 128;

/// Error type for parse operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line exceeds [`MAX_LINE_LENGTH`].
    LineTooLong,
    /// First word is not a known command.
    UnknownCommand,
    /// A required argument is missing.
    MissingArgument,
    /// Argument is not a known button name.
    InvalidButton,
    /// Argument is not a known stick name.
    InvalidStick,
    /// Argument is not a finite number, or is negative where a duration is
    /// expected.
    InvalidNumber,
    /// More arguments than the command takes.
    UnexpectedArgument,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LineTooLong => write!(f, "line too long"),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::MissingArgument => write!(f, "missing argument"),
            Self::InvalidButton => write!(f, "invalid button name"),
            Self::InvalidStick => write!(f, "invalid stick name"),
            Self::InvalidNumber => write!(f, "invalid number"),
            Self::UnexpectedArgument => write!(f, "unexpected argument"),
        }
    }
}

/// Parse one protocol line.
///
/// Returns `Ok(None)` for blank lines and `#` comments.
///
/// # Example
///
/// ```
/// use pico_proto::{parse_command, Button, Command};
///
/// assert_eq!(parse_command(b"press A\r\n"), Ok(Some(Command::Press(Button::A))));
/// assert_eq!(parse_command(b"  # warm-up"), Ok(None));
/// ```
pub fn parse_command(line: &[u8]) -> Result<Option<Command>, ParseError> {
    let line = strip_line_ending(line);
    if line.len() > MAX_LINE_LENGTH {
        return Err(ParseError::LineTooLong);
    }

    let mut tokens = Tokens::new(line);
    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };
    if keyword.first() == Some(&b'#') {
        return Ok(None);
    }

    let command = if keyword.eq_ignore_ascii_case(b"PRESS") {
        Command::Press(tokens.button()?)
    } else if keyword.eq_ignore_ascii_case(b"RELEASE") {
        Command::Release(tokens.button()?)
    } else if keyword.eq_ignore_ascii_case(b"STICK") {
        let stick = tokens.stick()?;
        let x = tokens.number()?;
        let y = tokens.number()?;
        Command::Stick { stick, x, y }
    } else if keyword.eq_ignore_ascii_case(b"SLEEP") {
        Command::Sleep {
            millis: tokens.duration_millis()?,
        }
    } else if keyword.eq_ignore_ascii_case(b"CENTER_STICKS") {
        Command::CenterSticks
    } else if keyword.eq_ignore_ascii_case(b"RELEASE_ALL") {
        Command::ReleaseAll
    } else {
        return Err(ParseError::UnknownCommand);
    };

    tokens.finish()?;
    Ok(Some(command))
}

/// Whitespace-separated words of a single line, with typed accessors.
///
/// Shared by the command parser and by higher-level script formats that
/// extend the command grammar.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    rest: &'a [u8],
}

impl<'a> Tokens<'a> {
    /// Tokenize a line. Line endings are treated as whitespace.
    #[must_use]
    pub fn new(line: &'a [u8]) -> Self {
        Self { rest: line }
    }

    /// Next word parsed as a button name.
    ///
    /// # Errors
    ///
    /// [`ParseError::MissingArgument`] at end of line,
    /// [`ParseError::InvalidButton`] for unknown names.
    pub fn button(&mut self) -> Result<Button, ParseError> {
        let word = self.next().ok_or(ParseError::MissingArgument)?;
        Button::from_name(word).ok_or(ParseError::InvalidButton)
    }

    /// Next word parsed as a stick name.
    ///
    /// # Errors
    ///
    /// [`ParseError::MissingArgument`] at end of line,
    /// [`ParseError::InvalidStick`] for unknown names.
    pub fn stick(&mut self) -> Result<Stick, ParseError> {
        let word = self.next().ok_or(ParseError::MissingArgument)?;
        Stick::from_name(word).ok_or(ParseError::InvalidStick)
    }

    /// Next word parsed as a finite decimal number.
    ///
    /// # Errors
    ///
    /// [`ParseError::MissingArgument`] at end of line,
    /// [`ParseError::InvalidNumber`] if the word is not a finite float.
    pub fn number(&mut self) -> Result<f32, ParseError> {
        let word = self.next().ok_or(ParseError::MissingArgument)?;
        parse_f32(word)
    }

    /// Next word parsed as a number of seconds, converted to milliseconds.
    ///
    /// # Errors
    ///
    /// As [`Tokens::number`], plus [`ParseError::InvalidNumber`] for negative
    /// durations.
    pub fn duration_millis(&mut self) -> Result<u32, ParseError> {
        let seconds = self.number()?;
        if seconds < 0.0 {
            return Err(ParseError::InvalidNumber);
        }
        let millis = to_milli(seconds).ok_or(ParseError::InvalidNumber)?;
        u32::try_from(millis).map_err(|_| ParseError::InvalidNumber)
    }

    /// Whether any words remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clone().next().is_none()
    }

    /// Require that the line has been fully consumed.
    ///
    /// # Errors
    ///
    /// [`ParseError::UnexpectedArgument`] if words remain.
    pub fn finish(mut self) -> Result<(), ParseError> {
        match self.next() {
            Some(_) => Err(ParseError::UnexpectedArgument),
            None => Ok(()),
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.rest.iter().position(|b| !b.is_ascii_whitespace())?;
        let rest = &self.rest[start..];
        let end = rest
            .iter()
            .position(|b| b.is_ascii_whitespace())
            .unwrap_or(rest.len());
        self.rest = &rest[end..];
        Some(&rest[..end])
    }
}

/// Parse a decimal float, rejecting NaN and infinities.
#[inline]
fn parse_f32(word: &[u8]) -> Result<f32, ParseError> {
    let s = core::str::from_utf8(word).map_err(|_| ParseError::InvalidNumber)?;
    let value: f32 = s.parse().map_err(|_| ParseError::InvalidNumber)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::InvalidNumber)
    }
}

/// Strip trailing CR and/or LF from a line.
#[inline]
fn strip_line_ending(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    if end > 0 && line[end - 1] == b'\n' {
        end -= 1;
    }
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    &line[..end]
}
