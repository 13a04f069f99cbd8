//! Hardware Abstraction Layer
//!
//! Capabilities the driver needs from the board: an SPI link to the
//! MAC-PHY, its interrupt line and its reset line, plus a millisecond clock.
//!
//! # Modules
//!
//! - [`clock`]: Millisecond clock source
//! - [`reset`]: Reset-line pulse sequence
//! - [`spi`]: [`SpiAdapter`], a [`HardwareAdapter`] built on `embedded-hal`
//!
//! # Delay Integration
//!
//! All types that require delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod clock;
pub mod reset;
pub mod spi;

pub use clock::Clock;
pub use reset::pulse_reset;
pub use spi::SpiAdapter;

use crate::error::HwResult;

// =============================================================================
// Hardware Adapter
// =============================================================================

/// Status of an SPI exchange accepted by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transfer {
    /// The exchange finished before returning
    Done(HwResult<()>),
    /// The final status arrives later
    ///
    /// `rx` must already hold the received bytes; only the outcome is
    /// deferred. Report it with
    /// [`Lan865x::complete_spi`](crate::driver::Lan865x::complete_spi).
    Pending,
}

/// Board-level access to one LAN865x
pub trait HardwareAdapter {
    /// Pulse the device's reset line
    fn reset(&mut self) -> HwResult<()>;

    /// Sample the interrupt line
    ///
    /// The line is level-sampled, not latched.
    fn is_interrupt_active(&mut self) -> bool;

    /// Full-duplex exchange of `tx.len()` bytes
    ///
    /// `Err` means the exchange was refused and nothing was sent.
    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> HwResult<Transfer>;
}

impl<T: HardwareAdapter + ?Sized> HardwareAdapter for &mut T {
    fn reset(&mut self) -> HwResult<()> {
        (**self).reset()
    }

    fn is_interrupt_active(&mut self) -> bool {
        (**self).is_interrupt_active()
    }

    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> HwResult<Transfer> {
        (**self).exchange(tx, rx)
    }
}
