//! Sequencer: executes a sequence of actions against a controller.

use crate::action::{duration_to_millis, ActionKind, ValidStep, ValidationError};
use crate::cancel::CancelToken;
use crate::controller::{Controller, ControllerError};
use crate::sequence::Sequence;
use embedded_hal_async::delay::DelayNs;

/// Where a run currently is.
///
/// Transitions only move forward: `Idle → Dispatching(0) → Waiting(0) →
/// Dispatching(1) → … → Completed`. Any `Dispatching(i)` may end in
/// `Failed(i)`, and the run may stop as `Cancelled(i)` before action `i`
/// starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    Idle,
    Dispatching(usize),
    Waiting(usize),
    Completed,
    Failed(usize),
    Cancelled(usize),
}

/// Result of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunSummary {
    /// Number of actions dispatched.
    pub executed: usize,
    /// Whether the run stopped early on request.
    pub cancelled: bool,
}

/// Why an action failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailureCause {
    /// The action was rejected before reaching the controller.
    Validation(ValidationError),
    /// The controller reported a fault.
    Dispatch(ControllerError),
}

impl core::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "invalid action: {e}"),
            Self::Dispatch(e) => write!(f, "{e}"),
        }
    }
}

/// Error type for sequencer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunError {
    /// The sequence holds no actions.
    EmptySequence,
    /// An action failed; later actions were not attempted.
    Action {
        index: usize,
        kind: ActionKind,
        cause: FailureCause,
    },
}

impl RunError {
    /// Index of the failing action, if any.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::EmptySequence => None,
            Self::Action { index, .. } => Some(*index),
        }
    }
}

impl core::fmt::Display for RunError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptySequence => write!(f, "sequence is empty"),
            Self::Action { index, kind, cause } => {
                write!(f, "action {index} ({kind}) failed: {cause}")
            }
        }
    }
}

/// Runs sequences against a controller, one action at a time.
///
/// Each action is validated, dispatched, and followed by its post-delay.
/// The delay is awaited through [`DelayNs`], so other tasks keep running
/// while a sequence waits. The first failure stops the run; nothing is
/// retried or undone.
///
/// The sequencer keeps no state between runs beyond [`Sequencer::state`],
/// which is reset at the start of each run.
pub struct Sequencer<D> {
    delay: D,
    state: RunState,
}

impl<D: DelayNs> Sequencer<D> {
    /// Create a sequencer that waits using `delay`.
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            state: RunState::Idle,
        }
    }

    /// Run every action in `sequence`.
    ///
    /// # Errors
    ///
    /// [`RunError::EmptySequence`] without touching the controller, or
    /// [`RunError::Action`] for the first action that failed validation or
    /// dispatch.
    pub async fn run<C: Controller, const N: usize>(
        &mut self,
        sequence: &Sequence<N>,
        controller: &mut C,
    ) -> Result<RunSummary, RunError> {
        let never = CancelToken::new();
        self.run_until_cancelled(sequence, controller, &never).await
    }

    /// Run `sequence`, stopping before the next action once `cancel` is set.
    ///
    /// A cancelled run is not an error: it returns the number of actions
    /// that were dispatched with `cancelled: true`.
    ///
    /// # Errors
    ///
    /// As [`Sequencer::run`].
    pub async fn run_until_cancelled<C: Controller, const N: usize>(
        &mut self,
        sequence: &Sequence<N>,
        controller: &mut C,
        cancel: &CancelToken,
    ) -> Result<RunSummary, RunError> {
        self.state = RunState::Idle;

        if sequence.is_empty() {
            warn!("Refusing to run an empty sequence");
            return Err(RunError::EmptySequence);
        }

        info!("Running sequence of {} actions", sequence.len());

        for (index, action) in sequence.iter().enumerate() {
            if cancel.is_cancelled() {
                self.state = RunState::Cancelled(index);
                warn!("Sequence cancelled after {} actions", index);
                return Ok(RunSummary {
                    executed: index,
                    cancelled: true,
                });
            }

            self.state = RunState::Dispatching(index);
            let kind = action.kind();

            let valid = match action.validate() {
                Ok(valid) => valid,
                Err(e) => return Err(self.fail(index, kind, FailureCause::Validation(e))),
            };

            info!("Action {}/{}: {:?}", index + 1, sequence.len(), kind);
            if let Err(e) = dispatch(controller, valid.step).await {
                return Err(self.fail(index, kind, FailureCause::Dispatch(e)));
            }

            self.state = RunState::Waiting(index);
            let millis = duration_to_millis(valid.post_delay);
            if millis > 0 {
                trace!("Waiting {} ms", millis);
                self.delay.delay_ms(millis).await;
            }
        }

        self.state = RunState::Completed;
        info!("Sequence completed: {} actions", sequence.len());
        Ok(RunSummary {
            executed: sequence.len(),
            cancelled: false,
        })
    }

    /// State of the current or most recent run.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Get a reference to the delay provider.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Get a mutable reference to the delay provider.
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Decompose the sequencer into its delay provider.
    pub fn into_inner(self) -> D {
        self.delay
    }

    fn fail(&mut self, index: usize, kind: ActionKind, cause: FailureCause) -> RunError {
        self.state = RunState::Failed(index);
        error!("Action {} ({:?}) failed: {:?}", index, kind, cause);
        RunError::Action { index, kind, cause }
    }
}

/// Send one validated step to the matching controller operation.
async fn dispatch<C: Controller>(controller: &mut C, step: ValidStep) -> Result<(), ControllerError> {
    match step {
        ValidStep::Press { button, hold } => controller.press(button, hold).await,
        ValidStep::Stick { stick, x, y } => controller.stick(stick, x, y).await,
        ValidStep::CenterSticks => controller.center_sticks().await,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::action::{Action, ValidationError};
    use crate::controller::DispatchError;
    use crate::testing::{Call, MockController, RecordingDelay};
    use core::time::Duration;
    use embassy_futures::block_on;
    use pico_proto::{Button, Stick};
    use std::vec;

    fn demo_actions() -> Sequence<8> {
        Sequence::from_actions(&[
            Action::press(Button::A, 0.1).then_wait(0.5),
            Action::press(Button::B, 0.1).then_wait(0.5),
            Action::stick(Stick::Left, 1.0, 0.0).then_wait(1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_runs_all_actions_in_order() {
        let seq = demo_actions();
        let mut controller = MockController::connected();
        let mut sequencer = Sequencer::new(RecordingDelay::default());

        let summary = block_on(sequencer.run(&seq, &mut controller)).unwrap();

        assert_eq!(
            summary,
            RunSummary {
                executed: 3,
                cancelled: false
            }
        );
        assert_eq!(
            controller.calls,
            vec![
                Call::Press(Button::A, Duration::from_millis(100)),
                Call::Press(Button::B, Duration::from_millis(100)),
                Call::Stick(Stick::Left, 1.0, 0.0),
            ]
        );
        assert_eq!(sequencer.state(), RunState::Completed);
    }

    #[test]
    fn test_waits_post_delay_after_each_action() {
        let seq = demo_actions();
        let mut controller = MockController::connected();
        let mut sequencer = Sequencer::new(RecordingDelay::default());

        block_on(sequencer.run(&seq, &mut controller)).unwrap();

        assert_eq!(sequencer.delay().waits_ms, vec![500, 500, 1000]);
        assert_eq!(sequencer.delay().total_ms(), 2000);
    }

    #[test]
    fn test_zero_delay_skips_wait() {
        let seq: Sequence<2> = Sequence::from_actions(&[
            Action::center_sticks(),
            Action::center_sticks().then_wait(0.2),
        ])
        .unwrap();
        let mut controller = MockController::connected();
        let mut sequencer = Sequencer::new(RecordingDelay::default());

        block_on(sequencer.run(&seq, &mut controller)).unwrap();

        assert_eq!(sequencer.delay().waits_ms, vec![200]);
    }

    #[test]
    fn test_dispatch_failure_stops_run() {
        let seq: Sequence<4> = Sequence::from_actions(&[
            Action::press(Button::A, 0.1),
            Action::press(Button::B, 0.1),
            Action::press(Button::X, 0.1),
            Action::press(Button::Y, 0.1),
        ])
        .unwrap();
        let mut controller = MockController::connected()
            .failing_at(2, ControllerError::Dispatch(DispatchError::Io));
        let mut sequencer = Sequencer::new(RecordingDelay::default());

        let err = block_on(sequencer.run(&seq, &mut controller)).unwrap_err();

        assert_eq!(
            err,
            RunError::Action {
                index: 2,
                kind: ActionKind::PressButton,
                cause: FailureCause::Dispatch(ControllerError::Dispatch(DispatchError::Io)),
            }
        );
        assert_eq!(err.index(), Some(2));
        // The failing call was attempted; nothing after it was
        assert_eq!(controller.calls.len(), 3);
        assert!(!controller
            .calls
            .contains(&Call::Press(Button::Y, Duration::from_millis(100))));
        assert_eq!(sequencer.state(), RunState::Failed(2));
    }

    #[test]
    fn test_validation_failure_after_earlier_dispatch() {
        let seq: Sequence<2> = Sequence::from_actions(&[
            Action::press(Button::A, 0.1),
            Action::stick(Stick::Left, 2.0, 0.0),
        ])
        .unwrap();
        let mut controller = MockController::connected();
        let mut sequencer = Sequencer::new(RecordingDelay::default());

        let err = block_on(sequencer.run(&seq, &mut controller)).unwrap_err();

        assert_eq!(
            err,
            RunError::Action {
                index: 1,
                kind: ActionKind::MoveStick,
                cause: FailureCause::Validation(ValidationError::AxisOutOfRange),
            }
        );
        // Press A went out; the bad stick move never reached the controller
        assert_eq!(
            controller.calls,
            vec![Call::Press(Button::A, Duration::from_millis(100))]
        );
    }

    #[test]
    fn test_out_of_range_axes_never_reach_controller() {
        for (x, y) in [(1.5, 0.0), (-1.01, 0.0), (0.0, 7.0), (f32::NAN, 0.0)] {
            let seq: Sequence<1> =
                Sequence::from_actions(&[Action::stick(Stick::Right, x, y)]).unwrap();
            let mut controller = MockController::connected();
            let mut sequencer = Sequencer::new(RecordingDelay::default());

            let err = block_on(sequencer.run(&seq, &mut controller)).unwrap_err();

            assert_eq!(err.index(), Some(0));
            assert!(controller.calls.is_empty());
        }
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let seq: Sequence<4> = Sequence::new();
        let mut controller = MockController::connected();
        let mut sequencer = Sequencer::new(RecordingDelay::default());

        let err = block_on(sequencer.run(&seq, &mut controller)).unwrap_err();

        assert_eq!(err, RunError::EmptySequence);
        assert_eq!(err.index(), None);
        assert!(controller.calls.is_empty());
    }

    #[test]
    fn test_cancel_before_start() {
        let seq = demo_actions();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut controller = MockController::connected();
        let mut sequencer = Sequencer::new(RecordingDelay::default());

        let summary =
            block_on(sequencer.run_until_cancelled(&seq, &mut controller, &cancel)).unwrap();

        assert_eq!(
            summary,
            RunSummary {
                executed: 0,
                cancelled: true
            }
        );
        assert!(controller.calls.is_empty());
        assert_eq!(sequencer.state(), RunState::Cancelled(0));
    }

    #[test]
    fn test_cancel_between_actions() {
        let seq = demo_actions();
        let cancel = CancelToken::new();
        let mut controller = MockController::connected().cancelling_at(1, &cancel);
        let mut sequencer = Sequencer::new(RecordingDelay::default());

        let summary =
            block_on(sequencer.run_until_cancelled(&seq, &mut controller, &cancel)).unwrap();

        // The in-flight action finishes, including its post-delay
        assert_eq!(
            summary,
            RunSummary {
                executed: 2,
                cancelled: true
            }
        );
        assert_eq!(controller.calls.len(), 2);
        assert_eq!(sequencer.delay().waits_ms, vec![500, 500]);
        assert_eq!(sequencer.state(), RunState::Cancelled(2));
    }

    #[test]
    fn test_state_resets_between_runs() {
        let bad: Sequence<1> =
            Sequence::from_actions(&[Action::press(Button::A, -1.0)]).unwrap();
        let good: Sequence<1> =
            Sequence::from_actions(&[Action::press(Button::A, 0.1)]).unwrap();
        let mut controller = MockController::connected();
        let mut sequencer = Sequencer::new(RecordingDelay::default());

        assert!(block_on(sequencer.run(&bad, &mut controller)).is_err());
        assert_eq!(sequencer.state(), RunState::Failed(0));

        let summary = block_on(sequencer.run(&good, &mut controller)).unwrap();
        assert_eq!(summary.executed, 1);
        assert_eq!(sequencer.state(), RunState::Completed);
    }

    #[test]
    fn test_run_error_display() {
        let err = RunError::Action {
            index: 1,
            kind: ActionKind::MoveStick,
            cause: FailureCause::Validation(ValidationError::AxisOutOfRange),
        };
        assert_eq!(
            std::format!("{err}"),
            "action 1 (stick) failed: invalid action: stick axis outside [-1.0, 1.0]"
        );
    }
}
