#![no_std]
#![no_main]

use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use pico_sequencer::{run_script, CancelToken, RunnerConfig, UartLink};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
});

/// Script played on every boot.
const SCRIPT: &str = include_str!("../../../scripts/demo.seq");

const CONFIG: RunnerConfig = RunnerConfig::DEFAULT;

/// Set by the cancel button, checked by the sequencer between actions.
static CANCEL: CancelToken = CancelToken::new();

/// What the LED shows.
#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
enum Status {
    Running,
    Done,
    Failed,
}

/// Signal for passing run status to the LED task.
/// Latest value wins; the LED only reflects the current status.
static STATUS_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, Status>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pico sequencer starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let status = STATUS_SIGNAL.init(Signal::new());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = CONFIG.baud_rate;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (tx, _rx) = uart.split();
    let link = UartLink::new(tx);

    // On-board LED for status, GPIO 15 for cancel
    let led = Output::new(p.PIN_25, Level::Low);
    let button = Input::new(p.PIN_15, Pull::Up);

    spawner.spawn(led_task(led, status).unwrap());
    spawner.spawn(cancel_task(button).unwrap());

    // Give the adapter time to boot alongside us
    Timer::after_millis(CONFIG.startup_delay_ms).await;

    info!("Playing script ({} bytes)", SCRIPT.len());
    status.signal(Status::Running);

    match run_script(SCRIPT, link, &CANCEL).await {
        Ok(summary) if summary.cancelled => {
            warn!("Run cancelled after {} actions", summary.executed);
            status.signal(Status::Done);
        }
        Ok(summary) => {
            info!("Run completed: {} actions", summary.executed);
            status.signal(Status::Done);
        }
        Err(e) => {
            error!("Run failed: {:?}", e);
            status.signal(Status::Failed);
            #[cfg(feature = "dev-panic")]
            {
                // Let the LED blink before the probe runner takes over
                Timer::after_millis(CONFIG.failure_blink_ms).await;
                defmt::panic!("sequence failed: {:?}", e);
            }
        }
    }
}

/// LED task - off while running, on when done, blinking on failure.
#[embassy_executor::task]
async fn led_task(
    mut led: Output<'static>,
    status: &'static Signal<CriticalSectionRawMutex, Status>,
) {
    let mut current = Status::Running;
    loop {
        match current {
            Status::Running => {
                led.set_low();
                current = status.wait().await;
            }
            Status::Done => {
                led.set_high();
                current = status.wait().await;
            }
            Status::Failed => {
                led.toggle();
                if let Either::Second(next) =
                    select(Timer::after_millis(CONFIG.blink_ms), status.wait()).await
                {
                    current = next;
                }
            }
        }
    }
}

/// Cancel task - a debounced press on GPIO 15 stops the run before its next action.
#[embassy_executor::task]
async fn cancel_task(mut button: Input<'static>) {
    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(CONFIG.debounce_ms).await;
        if button.is_low() {
            warn!("Cancel requested");
            CANCEL.cancel();
            button.wait_for_high().await;
        }
    }
}
