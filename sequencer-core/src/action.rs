//! Actions: single scripted steps and their validation.

use core::time::Duration;
use pico_proto::{Button, Stick};

/// Hold time used when a press does not specify one.
pub const DEFAULT_HOLD_SECS: f32 = 0.1;

/// What an action does to the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Press and hold a button for `hold` seconds, then release it.
    Press { button: Button, hold: f32 },
    /// Move a stick to (`x`, `y`), each axis in [-1.0, 1.0].
    Stick { stick: Stick, x: f32, y: f32 },
    /// Return both sticks to neutral.
    CenterSticks,
}

/// Discriminant of a [`Step`], used to tag failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionKind {
    PressButton,
    MoveStick,
    CenterSticks,
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PressButton => write!(f, "press"),
            Self::MoveStick => write!(f, "stick"),
            Self::CenterSticks => write!(f, "center sticks"),
        }
    }
}

/// Why an action was rejected before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Press hold time is zero, negative, or not finite.
    HoldNotPositive,
    /// A stick axis is outside [-1.0, 1.0] or NaN.
    AxisOutOfRange,
    /// Post-action delay is negative or not finite.
    NegativeDelay,
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::HoldNotPositive => write!(f, "hold duration must be positive"),
            Self::AxisOutOfRange => write!(f, "stick axis outside [-1.0, 1.0]"),
            Self::NegativeDelay => write!(f, "delay must not be negative"),
        }
    }
}

/// One scripted step plus the time to wait after it.
///
/// Actions can be built with any values; [`Action::validate`] enforces the
/// ranges, and the sequencer validates every action right before dispatching
/// it.
///
/// # Example
///
/// ```
/// use sequencer_core::{Action, Button};
///
/// let action = Action::press(Button::A, 0.1).then_wait(0.5);
/// assert!(action.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Action {
    pub step: Step,
    /// Seconds to wait after dispatching the step.
    pub post_delay: f32,
}

impl Action {
    /// Press `button` for `hold` seconds.
    pub const fn press(button: Button, hold: f32) -> Self {
        Self {
            step: Step::Press { button, hold },
            post_delay: 0.0,
        }
    }

    /// Move `stick` to (`x`, `y`).
    pub const fn stick(stick: Stick, x: f32, y: f32) -> Self {
        Self {
            step: Step::Stick { stick, x, y },
            post_delay: 0.0,
        }
    }

    /// Center both sticks.
    pub const fn center_sticks() -> Self {
        Self {
            step: Step::CenterSticks,
            post_delay: 0.0,
        }
    }

    /// Set the post-action delay in seconds.
    #[must_use]
    pub const fn then_wait(mut self, seconds: f32) -> Self {
        self.post_delay = seconds;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self.step {
            Step::Press { .. } => ActionKind::PressButton,
            Step::Stick { .. } => ActionKind::MoveStick,
            Step::CenterSticks => ActionKind::CenterSticks,
        }
    }

    /// Check every range constraint and convert seconds to durations.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: step values before the delay.
    pub fn validate(&self) -> Result<ValidAction, ValidationError> {
        let step = match self.step {
            Step::Press { button, hold } => {
                if !(hold.is_finite() && hold > 0.0) {
                    return Err(ValidationError::HoldNotPositive);
                }
                // A positive hold never rounds down to nothing
                let hold = secs_to_duration(hold).max(Duration::from_millis(1));
                ValidStep::Press { button, hold }
            }
            Step::Stick { stick, x, y } => {
                if !(axis_in_range(x) && axis_in_range(y)) {
                    return Err(ValidationError::AxisOutOfRange);
                }
                ValidStep::Stick { stick, x, y }
            }
            Step::CenterSticks => ValidStep::CenterSticks,
        };

        if !(self.post_delay.is_finite() && self.post_delay >= 0.0) {
            return Err(ValidationError::NegativeDelay);
        }

        Ok(ValidAction {
            step,
            post_delay: secs_to_duration(self.post_delay),
        })
    }
}

/// A step whose values passed validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ValidStep {
    Press { button: Button, hold: Duration },
    Stick { stick: Stick, x: f32, y: f32 },
    CenterSticks,
}

/// An action whose values passed validation, with delays as durations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidAction {
    pub step: ValidStep,
    pub post_delay: Duration,
}

/// Whether a stick axis lies in [-1.0, 1.0]. NaN does not.
#[inline]
#[must_use]
pub fn axis_in_range(value: f32) -> bool {
    (-1.0..=1.0).contains(&value)
}

/// Convert non-negative finite seconds to a millisecond-resolution duration.
#[inline]
fn secs_to_duration(secs: f32) -> Duration {
    // Saturating cast; callers have already rejected NaN and negatives
    let millis = (secs * 1000.0 + 0.5) as u64;
    Duration::from_millis(millis)
}

/// Clamp a duration to whole milliseconds that fit a `u32`.
#[inline]
#[must_use]
pub fn duration_to_millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_step() {
        assert_eq!(Action::press(Button::A, 0.1).kind(), ActionKind::PressButton);
        assert_eq!(
            Action::stick(Stick::Left, 0.0, 0.0).kind(),
            ActionKind::MoveStick
        );
        assert_eq!(Action::center_sticks().kind(), ActionKind::CenterSticks);
    }

    #[test]
    fn test_validate_press() {
        let valid = Action::press(Button::B, 0.1).then_wait(0.5).validate().unwrap();
        assert_eq!(
            valid.step,
            ValidStep::Press {
                button: Button::B,
                hold: Duration::from_millis(100),
            }
        );
        assert_eq!(valid.post_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_tiny_hold_rounds_up_to_one_millisecond() {
        let valid = Action::press(Button::A, 0.0001).validate().unwrap();
        assert_eq!(
            valid.step,
            ValidStep::Press {
                button: Button::A,
                hold: Duration::from_millis(1),
            }
        );
    }

    #[test]
    fn test_hold_must_be_positive() {
        for hold in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            assert_eq!(
                Action::press(Button::A, hold).validate(),
                Err(ValidationError::HoldNotPositive)
            );
        }
    }

    #[test]
    fn test_axis_range_is_inclusive() {
        for (x, y) in [(1.0, 0.0), (-1.0, 1.0), (0.0, -1.0), (0.5, -0.5)] {
            assert!(Action::stick(Stick::Left, x, y).validate().is_ok());
        }
    }

    #[test]
    fn test_axis_out_of_range_rejected() {
        let out_of_range = [
            (2.0, 0.0),
            (0.0, -1.0001),
            (1.0001, 1.0),
            (f32::NAN, 0.0),
            (0.0, f32::NEG_INFINITY),
        ];
        for (x, y) in out_of_range {
            assert_eq!(
                Action::stick(Stick::Right, x, y).validate(),
                Err(ValidationError::AxisOutOfRange)
            );
        }
    }

    #[test]
    fn test_delay_must_not_be_negative() {
        assert_eq!(
            Action::center_sticks().then_wait(-0.5).validate(),
            Err(ValidationError::NegativeDelay)
        );
        assert_eq!(
            Action::center_sticks().then_wait(f32::NAN).validate(),
            Err(ValidationError::NegativeDelay)
        );
        let valid = Action::center_sticks().validate().unwrap();
        assert_eq!(valid.post_delay, Duration::ZERO);
    }

    #[test]
    fn test_step_errors_reported_before_delay_errors() {
        let action = Action::stick(Stick::Left, 3.0, 0.0).then_wait(-1.0);
        assert_eq!(action.validate(), Err(ValidationError::AxisOutOfRange));
    }

    #[test]
    fn test_duration_to_millis_saturates() {
        assert_eq!(duration_to_millis(Duration::from_millis(250)), 250);
        assert_eq!(duration_to_millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }
}
