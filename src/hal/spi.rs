//! SPI Hardware Adapter
//!
//! [`SpiAdapter`] implements [`HardwareAdapter`] on top of the `embedded-hal`
//! 1.0 traits, so the driver runs on any HAL that provides an `SpiDevice`
//! with chip-select handling, an input pin for IRQ_N and an output pin for
//! RESET_N.
//!
//! # Example
//!
//! ```ignore
//! use ph_lan865x::hal::SpiAdapter;
//!
//! let spi = ExclusiveDevice::new(bus, cs, delay.clone())?;
//! let hw = SpiAdapter::new(spi, irq_pin, reset_pin, delay);
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use super::reset::pulse_reset;
use super::{HardwareAdapter, Transfer};
use crate::error::{HwError, HwResult};

/// LAN865x board wiring over `embedded-hal`
///
/// Exchanges complete synchronously; [`Transfer::Pending`] is never returned.
///
/// The driver calls [`exchange`](HardwareAdapter::exchange) and
/// [`reset`](HardwareAdapter::reset) from within a registry critical section,
/// so on single-core targets interrupts are masked for the whole transfer or
/// reset pulse. Boards that cannot tolerate that latency should return
/// [`Transfer::Pending`] from their own adapter and finish the transfer from
/// an interrupt through [`Lan865x::complete_spi`](crate::Lan865x::complete_spi).
#[derive(Debug)]
pub struct SpiAdapter<SPI, INT, RST, D> {
    spi: SPI,
    /// IRQ_N, active low
    irq: INT,
    /// RESET_N, active low
    reset: RST,
    delay: D,
}

impl<SPI, INT, RST, D> SpiAdapter<SPI, INT, RST, D>
where
    SPI: SpiDevice,
    INT: InputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create an adapter
    ///
    /// The reset pin is driven high (inactive).
    pub fn new(spi: SPI, irq: INT, mut reset: RST, delay: D) -> Self {
        let _ = reset.set_high();
        Self {
            spi,
            irq,
            reset,
            delay,
        }
    }

    /// Consume the adapter and return its parts
    pub fn release(self) -> (SPI, INT, RST, D) {
        (self.spi, self.irq, self.reset, self.delay)
    }

    /// Get mutable access to the SPI device
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }
}

impl<SPI, INT, RST, D> HardwareAdapter for SpiAdapter<SPI, INT, RST, D>
where
    SPI: SpiDevice,
    INT: InputPin,
    RST: OutputPin,
    D: DelayNs,
{
    fn reset(&mut self) -> HwResult<()> {
        pulse_reset(&mut self.reset, &mut self.delay).map_err(|_| HwError::Reset)
    }

    fn is_interrupt_active(&mut self) -> bool {
        // A pin that cannot be read counts as idle.
        self.irq.is_low().unwrap_or(false)
    }

    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> HwResult<Transfer> {
        let outcome = self.spi.transfer(rx, tx).map_err(|_| HwError::Transfer);
        Ok(Transfer::Done(outcome))
    }
}
