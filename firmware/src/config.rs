/// Compile-time settings for the sequencer firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct RunnerConfig {
    /// UART1 baud rate, 8N1. Must match the adapter.
    pub baud_rate: u32,
    /// Time the cancel button must stay low to count as a press.
    pub debounce_ms: u64,
    /// Half period of the failure blink.
    pub blink_ms: u64,
    /// Pause after reset before the first command, so the adapter is up.
    pub startup_delay_ms: u64,
    /// How long a failed run blinks before `dev-panic` halts the core.
    pub failure_blink_ms: u64,
}

impl RunnerConfig {
    pub const DEFAULT: Self = Self {
        baud_rate: 115_200,
        debounce_ms: 20,
        blink_ms: 200,
        startup_delay_ms: 1_000,
        failure_blink_ms: 2_000,
    };
}

// A failed dev build must show at least one full on/off blink before it halts
const _: () = assert!(RunnerConfig::DEFAULT.failure_blink_ms >= 2 * RunnerConfig::DEFAULT.blink_ms);

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
