//! Reset Line
//!
//! The LAN865x RESET_N input is active-low. The device needs the line held
//! low for a short pulse and then some time before the SPI interface answers.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::constants::{RESET_PULSE_MS, RESET_RECOVERY_MS};
use crate::error::{HwError, HwResult};

/// Pulse an active-low reset line and wait for the device to recover
///
/// # Timing
/// - Reset pulse: 10 ms
/// - Recovery time: 10 ms
pub fn pulse_reset<RST: OutputPin, D: DelayNs>(pin: &mut RST, delay: &mut D) -> HwResult<()> {
    // Assert reset (low)
    pin.set_low().map_err(|_| HwError::Pin)?;
    delay.delay_ms(RESET_PULSE_MS);

    // Deassert reset (high)
    pin.set_high().map_err(|_| HwError::Pin)?;
    delay.delay_ms(RESET_RECOVERY_MS);

    Ok(())
}
