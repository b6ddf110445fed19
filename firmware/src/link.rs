use embassy_rp::uart::{Async, Error as UartError, UartTx};
use embedded_io_async::{ErrorKind, ErrorType, Write};

/// Error type for the UART link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct LinkError(pub UartError);

impl embedded_io_async::Error for LinkError {
    fn kind(&self) -> ErrorKind {
        // Every UART error is a receive-side condition; the link only transmits
        ErrorKind::Other
    }
}

impl From<UartError> for LinkError {
    fn from(e: UartError) -> Self {
        LinkError(e)
    }
}

/// Byte link to the adapter over the UART transmitter.
///
/// # Pins
///
/// Uses UART1 by default:
/// - GPIO 8: TX (to the adapter's RX)
/// - GPIO 9: RX (unused, the adapter sends nothing back)
pub struct UartLink<'d> {
    tx: UartTx<'d, Async>,
}

impl<'d> UartLink<'d> {
    /// Create a link from the given UART transmitter.
    pub fn new(tx: UartTx<'d, Async>) -> Self {
        Self { tx }
    }
}

impl ErrorType for UartLink<'_> {
    type Error = LinkError;
}

impl Write for UartLink<'_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.write(buf).await?;
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        // DMA writes complete before returning; wait for the FIFO to drain
        self.tx.blocking_flush()?;
        Ok(())
    }
}
