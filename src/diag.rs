//! Diagnostics
//!
//! Nothing the driver observes at runtime is fatal after init: malformed
//! frames, engine events and rejected sends are all reported here and the
//! driver keeps going. Each report goes to
//!
//! - the optional [`DiagnosticFn`] installed with
//!   [`DriverConfig::with_diagnostics`](crate::driver::DriverConfig::with_diagnostics),
//! - `defmt` when the `defmt` feature is enabled,
//!
//! and is tallied in the per-instance [`Stats`].

use crate::driver::RxStatus;
use crate::engine::{EngineError, RegsEvent};
use crate::error::IoError;

/// One runtime observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// A receive packet boundary was processed
    RxPacket {
        /// Length declared by the engine
        len: u16,
        /// Classification
        status: RxStatus,
    },
    /// The engine reported a register-layer event
    RegsEvent {
        /// Event code
        event: RegsEvent,
        /// Whether a reinit was requested
        reinit: bool,
    },
    /// The engine reported a protocol error
    EngineError(EngineError),
    /// The engine rejected an outbound frame
    SendFailed {
        /// Frame length
        len: usize,
    },
    /// Polling the upper layer for an outbound frame failed
    PollFailed(IoError),
    /// The hardware adapter refused an SPI exchange
    SpiRejected {
        /// Transaction tag
        tag: u8,
    },
    /// An SPI completion arrived with no exchange pending
    SpiCompletionIgnored,
}

impl Diagnostic {
    /// Whether this report indicates a problem rather than normal traffic
    #[must_use]
    pub const fn is_fault(&self) -> bool {
        match self {
            Diagnostic::RxPacket { status, .. } => !status.is_ok(),
            Diagnostic::RegsEvent { reinit, .. } => *reinit,
            Diagnostic::EngineError(_)
            | Diagnostic::SendFailed { .. }
            | Diagnostic::PollFailed(_)
            | Diagnostic::SpiRejected { .. }
            | Diagnostic::SpiCompletionIgnored => true,
        }
    }
}

/// Diagnostic sink
pub type DiagnosticFn = fn(&Diagnostic);

/// Forward a diagnostic to the sink and to `defmt`
pub(crate) fn emit(sink: Option<DiagnosticFn>, diagnostic: &Diagnostic) {
    #[cfg(feature = "defmt")]
    {
        if diagnostic.is_fault() {
            defmt::warn!("lan865x: {}", diagnostic);
        } else {
            defmt::debug!("lan865x: {}", diagnostic);
        }
    }

    if let Some(sink) = sink {
        sink(diagnostic);
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Per-instance counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    /// Frames delivered to the upper layer
    pub rx_ok: u32,
    /// Frames the engine flagged as failed
    pub rx_bad: u32,
    /// Frames with out-of-sequence, oversized or missing data
    pub rx_invalid: u32,
    /// Frames whose data length did not match the declared length
    pub rx_wrong_length: u32,
    /// Frames shorter than the minimum valid frame
    pub rx_too_short: u32,
    /// Frames the upper layer refused
    pub rx_dropped: u32,
    /// Frames accepted by the engine
    pub tx_sent: u32,
    /// Frames rejected by the engine
    pub tx_rejected: u32,
    /// Completed transmissions
    pub tx_done: u32,
    /// Register-layer reinitializations requested
    pub reinit_requests: u32,
    /// Protocol errors reported by the engine
    pub engine_errors: u32,
}

impl Stats {
    /// Count one receive classification
    pub(crate) fn record_rx(&mut self, status: RxStatus) {
        let counter = match status {
            RxStatus::Ok => &mut self.rx_ok,
            RxStatus::Bad => &mut self.rx_bad,
            RxStatus::Invalid => &mut self.rx_invalid,
            RxStatus::WrongLength => &mut self.rx_wrong_length,
            RxStatus::TooShort => &mut self.rx_too_short,
            RxStatus::Dropped => &mut self.rx_dropped,
        };
        *counter = counter.wrapping_add(1);
    }

    /// Total frames received, whatever their classification
    #[must_use]
    pub const fn rx_total(&self) -> u32 {
        self.rx_ok
            .wrapping_add(self.rx_bad)
            .wrapping_add(self.rx_invalid)
            .wrapping_add(self.rx_wrong_length)
            .wrapping_add(self.rx_too_short)
            .wrapping_add(self.rx_dropped)
    }
}
