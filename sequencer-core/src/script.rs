//! Text scripts: sequences written in the adapter's command language.
//!
//! A script is the adapter protocol with two changes: `PRESS` takes an
//! optional hold time and releases on its own, and `SLEEP` becomes the
//! post-delay of the action before it.
//!
//! ```text
//! PRESS <button> [hold_seconds]    hold defaults to 0.1
//! STICK <stick> <x> <y>
//! CENTER_STICKS
//! SLEEP <seconds>
//! # comment
//! ```
//!
//! Consecutive `SLEEP` lines add up, so a negative `SLEEP` is rejected here
//! rather than left to shorten an earlier wait. Other values are not
//! range-checked; the sequencer validates each action before dispatching it.

use crate::action::{Action, DEFAULT_HOLD_SECS};
use crate::sequence::Sequence;
use pico_proto::{ParseError, Tokens, MAX_LINE_LENGTH};

/// What went wrong on a script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScriptErrorKind {
    /// The line is not valid command syntax.
    Parse(ParseError),
    /// `SLEEP` appears before any action.
    SleepWithoutAction,
    /// More actions than the sequence can hold.
    SequenceFull,
    /// A protocol command with no script meaning (`RELEASE`, `RELEASE_ALL`).
    Unsupported,
}

impl core::fmt::Display for ScriptErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::SleepWithoutAction => write!(f, "SLEEP before any action"),
            Self::SequenceFull => write!(f, "too many actions"),
            Self::Unsupported => write!(f, "command not supported in scripts"),
        }
    }
}

/// Error type for script parsing, with the 1-based line it occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScriptError {
    pub line: usize,
    pub kind: ScriptErrorKind,
}

impl core::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl From<ParseError> for ScriptErrorKind {
    fn from(err: ParseError) -> Self {
        ScriptErrorKind::Parse(err)
    }
}

/// Parse a script into a sequence of at most `N` actions.
///
/// # Example
///
/// ```
/// use sequencer_core::{parse_script, Sequence};
///
/// let seq: Sequence = parse_script("PRESS a\nSLEEP 0.5\nCENTER_STICKS\n").unwrap();
/// assert_eq!(seq.len(), 2);
/// assert_eq!(seq.actions()[0].post_delay, 0.5);
/// ```
///
/// # Errors
///
/// The first offending line, see [`ScriptErrorKind`].
pub fn parse_script<const N: usize>(script: &str) -> Result<Sequence<N>, ScriptError> {
    let mut sequence = Sequence::new();
    for (index, line) in script.lines().enumerate() {
        parse_line(&mut sequence, line.as_bytes()).map_err(|kind| ScriptError {
            line: index + 1,
            kind,
        })?;
    }
    debug!("Parsed script: {} actions", sequence.len());
    Ok(sequence)
}

fn parse_line<const N: usize>(
    sequence: &mut Sequence<N>,
    line: &[u8],
) -> Result<(), ScriptErrorKind> {
    if line.len() > MAX_LINE_LENGTH {
        return Err(ParseError::LineTooLong.into());
    }

    let mut tokens = Tokens::new(line);
    let Some(keyword) = tokens.next() else {
        return Ok(());
    };
    if keyword.first() == Some(&b'#') {
        return Ok(());
    }

    let action = if keyword.eq_ignore_ascii_case(b"PRESS") {
        let button = tokens.button()?;
        let hold = if tokens.is_empty() {
            DEFAULT_HOLD_SECS
        } else {
            tokens.number()?
        };
        Action::press(button, hold)
    } else if keyword.eq_ignore_ascii_case(b"STICK") {
        let stick = tokens.stick()?;
        let x = tokens.number()?;
        let y = tokens.number()?;
        Action::stick(stick, x, y)
    } else if keyword.eq_ignore_ascii_case(b"CENTER_STICKS") {
        Action::center_sticks()
    } else if keyword.eq_ignore_ascii_case(b"SLEEP") {
        let seconds = tokens.number()?;
        if seconds < 0.0 {
            return Err(ParseError::InvalidNumber.into());
        }
        tokens.finish()?;
        return if sequence.extend_last_delay(seconds) {
            Ok(())
        } else {
            Err(ScriptErrorKind::SleepWithoutAction)
        };
    } else if keyword.eq_ignore_ascii_case(b"RELEASE")
        || keyword.eq_ignore_ascii_case(b"RELEASE_ALL")
    {
        return Err(ScriptErrorKind::Unsupported);
    } else {
        return Err(ParseError::UnknownCommand.into());
    };

    tokens.finish()?;
    sequence
        .push(action)
        .map_err(|_| ScriptErrorKind::SequenceFull)
}
