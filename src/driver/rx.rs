//! Receive Reassembly
//!
//! The engine hands over a received frame as a series of slices, each tagged
//! with its offset in the frame, and then closes it with a packet boundary
//! carrying a success flag and the declared length.
//!
//! [`RxAssembler`] accumulates slices into one MTU-sized buffer:
//!
//! ```text
//!            slice @0                 slice @len
//!   Empty ─────────────▶ Accumulating ◀──────────┐
//!     ▲                    │   └─────────────────┘
//!     │                    │ bad offset / overflow
//!     │                    ▼
//!     └──── boundary ── Invalid (slices ignored)
//! ```
//!
//! Every boundary returns the assembler to Empty, whatever the outcome.

use crate::constants::{MIN_FRAME_SIZE, MTU};
use crate::upper::UpperLayer;

// =============================================================================
// Receive Status
// =============================================================================

/// Classification of a received packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxStatus {
    /// Delivered to the upper layer
    Ok,
    /// The engine flagged the packet as failed
    Bad,
    /// Slices were out of sequence, overflowed the buffer, or never arrived
    Invalid,
    /// Accumulated length differs from the declared length
    WrongLength,
    /// Declared length is below the minimum valid frame size
    TooShort,
    /// The upper layer refused the frame
    Dropped,
}

impl RxStatus {
    /// Returns the status as a short string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RxStatus::Ok => "ok",
            RxStatus::Bad => "bad",
            RxStatus::Invalid => "invalid",
            RxStatus::WrongLength => "wrong length",
            RxStatus::TooShort => "too short",
            RxStatus::Dropped => "dropped",
        }
    }

    /// Whether the frame reached the upper layer
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, RxStatus::Ok)
    }
}

impl core::fmt::Display for RxStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Observable state of the assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxState {
    /// No data for the current packet
    Empty,
    /// Data accepted up to the given length
    Accumulating(usize),
    /// The current packet is poisoned until the next boundary
    Invalid,
}

/// Reassembles one frame at a time from offset-tagged slices
pub struct RxAssembler {
    buf: [u8; MTU],
    len: usize,
    invalid: bool,
}

impl RxAssembler {
    /// Create an empty assembler
    pub const fn new() -> Self {
        Self {
            buf: [0; MTU],
            len: 0,
            invalid: false,
        }
    }

    /// Current state
    pub fn state(&self) -> RxState {
        if self.invalid {
            RxState::Invalid
        } else if self.len == 0 {
            RxState::Empty
        } else {
            RxState::Accumulating(self.len)
        }
    }

    /// Bytes accumulated so far
    pub fn data(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Drop any partial packet
    pub fn reset(&mut self) {
        self.len = 0;
        self.invalid = false;
    }

    /// Accept a slice of the current packet
    pub fn push_slice(&mut self, offset: u16, data: &[u8]) {
        if self.invalid {
            return;
        }

        // Empty requires offset 0; otherwise the slice must continue at the
        // current length.
        let offset = offset as usize;
        if offset != self.len {
            self.invalid = true;
            return;
        }

        let end = offset + data.len();
        if end > self.buf.len() {
            self.invalid = true;
            return;
        }

        self.buf[offset..end].copy_from_slice(data);
        self.len = end;
    }

    /// Close the current packet and hand it to `upper` if it is valid
    ///
    /// The assembler is Empty again when this returns.
    pub fn finish<U: UpperLayer>(&mut self, success: bool, declared_len: u16, upper: &mut U) -> RxStatus {
        let len = core::mem::take(&mut self.len);
        let invalid = core::mem::take(&mut self.invalid);

        if !success {
            return RxStatus::Bad;
        }
        if invalid || len == 0 {
            return RxStatus::Invalid;
        }
        if len != declared_len as usize {
            return RxStatus::WrongLength;
        }
        if (declared_len as usize) < MIN_FRAME_SIZE {
            return RxStatus::TooShort;
        }

        match upper.deliver_frame(&self.buf[..len]) {
            Ok(()) => RxStatus::Ok,
            Err(_) => RxStatus::Dropped,
        }
    }
}

impl Default for RxAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for RxAssembler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RxAssembler")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
