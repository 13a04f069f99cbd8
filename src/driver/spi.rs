//! SPI Bridge
//!
//! Forwards the engine's SPI transactions to the [`HardwareAdapter`] and
//! routes the outcome back to the engine under the transaction's tag.
//!
//! An adapter either finishes the exchange before returning
//! ([`Transfer::Done`]) or defers the outcome ([`Transfer::Pending`]). A
//! deferred outcome is delivered later through
//! [`Lan865x::complete_spi`](super::Lan865x::complete_spi).

use crate::hal::{HardwareAdapter, Transfer};

/// What happened to a transaction handed to the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiStart {
    /// The adapter refused the exchange
    Rejected,
    /// The exchange finished with the given success flag
    Completed(bool),
    /// The outcome arrives later
    Pending,
}

impl SpiStart {
    /// Whether the engine should treat the transaction as accepted
    #[inline]
    pub const fn accepted(&self) -> bool {
        !matches!(self, SpiStart::Rejected)
    }
}

/// Last transaction tag and whether its outcome is still outstanding
#[derive(Debug, Default)]
pub struct SpiBridge {
    tag: u8,
    pending: bool,
}

impl SpiBridge {
    /// Create an idle bridge
    pub const fn new() -> Self {
        Self {
            tag: 0,
            pending: false,
        }
    }

    /// Tag of the most recent transaction
    pub fn last_tag(&self) -> u8 {
        self.tag
    }

    /// Whether a deferred outcome is outstanding
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Forget any outstanding transaction
    pub fn reset(&mut self) {
        self.pending = false;
    }

    /// Hand one exchange to the adapter
    pub fn start<H: HardwareAdapter>(&mut self, hw: &mut H, tag: u8, tx: &[u8], rx: &mut [u8]) -> SpiStart {
        self.tag = tag;
        match hw.exchange(tx, rx) {
            Err(_) => SpiStart::Rejected,
            Ok(Transfer::Done(outcome)) => SpiStart::Completed(outcome.is_ok()),
            Ok(Transfer::Pending) => {
                self.pending = true;
                SpiStart::Pending
            }
        }
    }

    /// Take the outcome of the outstanding exchange
    ///
    /// Returns the tag to acknowledge, or `None` if nothing was outstanding.
    pub fn complete(&mut self, success: bool) -> Option<(u8, bool)> {
        if !core::mem::replace(&mut self.pending, false) {
            return None;
        }
        Some((self.tag, success))
    }
}
