//! Connect, run, close.

use crate::cancel::CancelToken;
use crate::controller::{Controller, ControllerError};
use crate::sequence::Sequence;
use crate::sequencer::{RunError, RunSummary, Sequencer};
use embedded_hal_async::delay::DelayNs;

/// Error type for a whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// The controller could not be connected; nothing was run.
    Connect(ControllerError),
    /// The run stopped on a failing action.
    Run(RunError),
}

impl From<RunError> for SessionError {
    fn from(err: RunError) -> Self {
        SessionError::Run(err)
    }
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Connect(e) => write!(f, "connect failed: {e}"),
            Self::Run(e) => write!(f, "{e}"),
        }
    }
}

/// Connect `controller`, run `sequence` on it, and close it again.
///
/// The controller is closed on every path, including a failed connect.
///
/// # Errors
///
/// [`SessionError::Connect`] if connecting fails, [`SessionError::Run`] if
/// the run fails.
pub async fn run_session<C, D, const N: usize>(
    controller: &mut C,
    sequencer: &mut Sequencer<D>,
    sequence: &Sequence<N>,
    cancel: &CancelToken,
) -> Result<RunSummary, SessionError>
where
    C: Controller,
    D: DelayNs,
{
    if let Err(e) = controller.connect().await {
        error!("Controller connect failed: {:?}", e);
        controller.close().await;
        return Err(SessionError::Connect(e));
    }
    info!("Controller connected");

    let result = sequencer
        .run_until_cancelled(sequence, controller, cancel)
        .await;

    controller.close().await;
    info!("Controller closed");

    result.map_err(SessionError::Run)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::action::Action;
    use crate::controller::DispatchError;
    use crate::sequencer::RunState;
    use crate::testing::{MockController, RecordingDelay};
    use embassy_futures::block_on;
    use pico_proto::{Button, Stick};

    fn sequence() -> Sequence<4> {
        Sequence::from_actions(&[
            Action::press(Button::A, 0.1).then_wait(0.5),
            Action::stick(Stick::Left, 0.0, 1.0).then_wait(0.5),
            Action::center_sticks(),
        ])
        .unwrap()
    }

    #[test]
    fn test_session_connects_runs_and_closes() {
        let mut controller = MockController::new();
        let mut sequencer = Sequencer::new(RecordingDelay::default());
        let cancel = CancelToken::new();

        let summary =
            block_on(run_session(&mut controller, &mut sequencer, &sequence(), &cancel)).unwrap();

        assert_eq!(summary.executed, 3);
        assert!(!summary.cancelled);
        assert_eq!(controller.connects, 1);
        assert_eq!(controller.closes, 1);
        assert!(!controller.connected);
    }

    #[test]
    fn test_connect_failure_skips_run_but_closes() {
        let mut controller = MockController::new().refusing_connect(ControllerError::Connection);
        let mut sequencer = Sequencer::new(RecordingDelay::default());
        let cancel = CancelToken::new();

        let err = block_on(run_session(&mut controller, &mut sequencer, &sequence(), &cancel))
            .unwrap_err();

        assert_eq!(err, SessionError::Connect(ControllerError::Connection));
        assert!(controller.calls.is_empty());
        assert_eq!(controller.closes, 1);
        assert_eq!(sequencer.state(), RunState::Idle);
    }

    #[test]
    fn test_run_failure_still_closes() {
        let mut controller =
            MockController::new().failing_at(1, DispatchError::InvalidTarget.into());
        let mut sequencer = Sequencer::new(RecordingDelay::default());
        let cancel = CancelToken::new();

        let err = block_on(run_session(&mut controller, &mut sequencer, &sequence(), &cancel))
            .unwrap_err();

        match err {
            SessionError::Run(run) => assert_eq!(run.index(), Some(1)),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(controller.closes, 1);
    }

    #[test]
    fn test_cancelled_session_closes() {
        let mut controller = MockController::new();
        let mut sequencer = Sequencer::new(RecordingDelay::default());
        let cancel = CancelToken::new();
        cancel.cancel();

        let summary =
            block_on(run_session(&mut controller, &mut sequencer, &sequence(), &cancel)).unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.executed, 0);
        assert_eq!(controller.closes, 1);
    }
}
