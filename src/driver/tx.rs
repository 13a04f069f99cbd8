//! Transmit Flow Control
//!
//! One frame in flight per instance. The frame is copied into the instance's
//! transmit buffer, which the engine may keep referring to until it reports
//! completion through [`EngineHost::raw_tx_done`](crate::engine::EngineHost::raw_tx_done).
//! The buffer is not touched again until then.

use crate::constants::{MTU, TX_SUBCHANNEL};
use crate::engine::Engine;
use crate::error::{IoError, IoResult};
use crate::upper::UpperLayer;

/// Result of one poll of the upper layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxPoll {
    /// A frame is still in flight; the upper layer was not asked
    Busy,
    /// The upper layer had nothing to send
    Idle,
    /// A frame of this length was handed to the engine
    Sent(usize),
    /// The engine refused a frame of this length; it is dropped
    Rejected(usize),
    /// The upper layer failed
    Failed(IoError),
}

/// Transmit buffer and busy flag
pub struct TxController {
    buf: [u8; MTU],
    busy: bool,
}

impl TxController {
    /// Create an idle controller
    pub const fn new() -> Self {
        Self {
            buf: [0; MTU],
            busy: false,
        }
    }

    /// Whether a frame is in flight
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Forget any frame in flight
    pub fn reset(&mut self) {
        self.busy = false;
    }

    /// Copy `frame` into the transmit buffer and hand it to the engine
    ///
    /// # Errors
    /// - `TxBusy` - a frame is already in flight
    /// - `EmptyFrame` / `FrameTooLarge` - `frame` does not fit
    /// - `SendFailure` - the engine refused the frame
    pub fn send<E: Engine>(&mut self, engine: &E, frame: &[u8]) -> IoResult<()> {
        if self.busy {
            return Err(IoError::TxBusy);
        }
        if frame.is_empty() {
            return Err(IoError::EmptyFrame);
        }
        if frame.len() > self.buf.len() {
            return Err(IoError::FrameTooLarge);
        }

        self.buf[..frame.len()].copy_from_slice(frame);
        self.submit(engine, frame.len())
    }

    /// Ask the upper layer for a frame and send it if one is pending
    ///
    /// A reported length beyond the buffer is a failure; nothing is sent.
    pub fn poll<U: UpperLayer, E: Engine>(&mut self, upper: &mut U, engine: &E) -> TxPoll {
        if self.busy {
            return TxPoll::Busy;
        }

        let len = match upper.next_frame(&mut self.buf) {
            Ok(0) => return TxPoll::Idle,
            Ok(len) if len > self.buf.len() => return TxPoll::Failed(IoError::FrameTooLarge),
            Ok(len) => len,
            Err(e) => return TxPoll::Failed(e),
        };

        match self.submit(engine, len) {
            Ok(()) => TxPoll::Sent(len),
            Err(_) => TxPoll::Rejected(len),
        }
    }

    /// The engine finished with the frame in flight
    ///
    /// Returns whether a frame was in flight.
    pub fn complete(&mut self) -> bool {
        core::mem::replace(&mut self.busy, false)
    }

    fn submit<E: Engine>(&mut self, engine: &E, len: usize) -> IoResult<()> {
        if !engine.send_raw(&self.buf[..len], TX_SUBCHANNEL) {
            return Err(IoError::SendFailure);
        }
        self.busy = true;
        Ok(())
    }
}

impl Default for TxController {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for TxController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TxController")
            .field("busy", &self.busy)
            .finish_non_exhaustive()
    }
}
