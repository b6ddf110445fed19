use embassy_time::Delay;
use embedded_io_async::Write;
use sequencer_core::{
    parse_script, run_session, CancelToken, RunSummary, ScriptError, Sequence, Sequencer,
    SerialController, SessionError,
};

/// Error type for a scripted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum RunnerError {
    /// The bundled script did not parse.
    Script(ScriptError),
    /// Connecting or running failed.
    Session(SessionError),
}

impl From<ScriptError> for RunnerError {
    fn from(e: ScriptError) -> Self {
        RunnerError::Script(e)
    }
}

impl From<SessionError> for RunnerError {
    fn from(e: SessionError) -> Self {
        RunnerError::Session(e)
    }
}

impl core::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Script(e) => write!(f, "script error: {e}"),
            Self::Session(e) => write!(f, "{e}"),
        }
    }
}

/// Parse `script` and play it into the adapter on `link`.
///
/// An invalid action is reported as soon as the script loads; the run still
/// dispatches everything before it and stops there.
pub async fn run_script<W: Write>(
    script: &str,
    link: W,
    cancel: &CancelToken,
) -> Result<RunSummary, RunnerError> {
    let sequence: Sequence = parse_script(script)?;
    if let Err(e) = sequence.validate() {
        defmt::warn!("Script contains an invalid action: {:?}", e);
    }
    defmt::info!("Loaded script: {} actions", sequence.len());

    let mut controller = SerialController::new(link, Delay);
    let mut sequencer = Sequencer::new(Delay);
    let summary = run_session(&mut controller, &mut sequencer, &sequence, cancel).await?;
    Ok(summary)
}
