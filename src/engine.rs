//! Protocol Engine Interface
//!
//! The LAN865x speaks the OPEN Alliance TC6 protocol over SPI. Chunking,
//! control transactions, register initialization and timer bookkeeping are
//! done by an external protocol engine; this crate only drives it.
//!
//! Two traits describe the boundary:
//!
//! - [`Engine`]: what the driver calls (init, configure, service, send, ...).
//! - [`EngineHost`]: the callbacks the engine makes back into the driver.
//!
//! # Reentrancy
//!
//! The engine may call back into the driver before returning from
//! [`Engine::service`] or [`Engine::check_timers`]. Callbacks may in turn call
//! [`Engine::reinit`] or [`Engine::spi_buffer_done`] on the same engine.
//! Implementations must therefore tolerate being reentered through `&self`.
//!
//! # Context
//!
//! Every callback carries the address-sized `context` value the engine was
//! initialized with. The driver passes a packed registry
//! [`Token`](crate::registry::Token) there and resolves it on each callback.

use crate::driver::config::RegsConfig;

// =============================================================================
// Condition Codes
// =============================================================================

/// Register-layer events reported through [`EngineHost::regs_event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegsEvent {
    /// Unclassified error
    UnknownError,
    /// Transmit protocol error
    TransmitProtocolError,
    /// Transmit buffer overflow
    TransmitBufferOverflow,
    /// Transmit buffer underflow
    TransmitBufferUnderflow,
    /// Receive buffer overflow
    ReceiveBufferOverflow,
    /// SPI framing lost
    LossOfFraming,
    /// Header error
    HeaderError,
    /// Device reset complete
    ResetComplete,
    /// PHY interrupt
    PhyInterrupt,
    /// Transmit timestamp capture available
    TimestampCaptureAvailable,
    /// Frame check sequence error
    FrameCheckSequenceError,
    /// Control data protection error
    ControlDataProtectionError,
    /// Receive path cannot recover
    RxNonRecoverable,
    /// Transmit path cannot recover
    TxNonRecoverable,
    /// Internal state machine error
    FsmStateError,
    /// SRAM ECC error
    SramEccError,
    /// Supply undervoltage
    Undervoltage,
    /// Internal bus error
    InternalBusError,
    /// Timestamp capture overflow
    TimestampCaptureOverflow,
    /// PLCA: unexpected BEACON
    UnexpectedBeacon,
    /// PLCA: BEACON timer expired
    BeaconTimerExpired,
    /// Code not known to this crate
    Other(u8),
}

impl RegsEvent {
    /// Whether the engine's register layer must be reinitialized
    #[must_use]
    pub const fn needs_reinit(&self) -> bool {
        matches!(
            self,
            RegsEvent::LossOfFraming | RegsEvent::RxNonRecoverable | RegsEvent::TxNonRecoverable
        )
    }

    /// Returns a short name for the event
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RegsEvent::UnknownError => "unknown error",
            RegsEvent::TransmitProtocolError => "transmit protocol error",
            RegsEvent::TransmitBufferOverflow => "transmit buffer overflow",
            RegsEvent::TransmitBufferUnderflow => "transmit buffer underflow",
            RegsEvent::ReceiveBufferOverflow => "receive buffer overflow",
            RegsEvent::LossOfFraming => "loss of framing",
            RegsEvent::HeaderError => "header error",
            RegsEvent::ResetComplete => "reset complete",
            RegsEvent::PhyInterrupt => "PHY interrupt",
            RegsEvent::TimestampCaptureAvailable => "timestamp capture available",
            RegsEvent::FrameCheckSequenceError => "frame check sequence error",
            RegsEvent::ControlDataProtectionError => "control data protection error",
            RegsEvent::RxNonRecoverable => "RX non-recoverable",
            RegsEvent::TxNonRecoverable => "TX non-recoverable",
            RegsEvent::FsmStateError => "FSM state error",
            RegsEvent::SramEccError => "SRAM ECC error",
            RegsEvent::Undervoltage => "undervoltage",
            RegsEvent::InternalBusError => "internal bus error",
            RegsEvent::TimestampCaptureOverflow => "timestamp capture overflow",
            RegsEvent::UnexpectedBeacon => "unexpected BEACON",
            RegsEvent::BeaconTimerExpired => "BEACON timer expired",
            RegsEvent::Other(_) => "other",
        }
    }
}

impl core::fmt::Display for RegsEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegsEvent::Other(code) => write!(f, "other ({code})"),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Protocol errors reported through [`EngineHost::error`]
///
/// These are informational; the engine recovers on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// No device answered
    NoHardware,
    /// Unexpected start-valid flag
    UnexpectedSv,
    /// Unexpected data-valid or end-valid flag
    UnexpectedDvEv,
    /// Footer parity mismatch
    BadChecksum,
    /// Unexpected control transaction
    UnexpectedCtrl,
    /// Transmit data rejected by the device
    BadTxData,
    /// Device lost synchronization
    SyncLost,
    /// SPI transfer reported failure
    SpiError,
    /// Control transaction could not be sent
    ControlTxFail,
    /// Code not known to this crate
    Other(u8),
}

impl EngineError {
    /// Returns a short name for the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EngineError::NoHardware => "no hardware",
            EngineError::UnexpectedSv => "unexpected SV",
            EngineError::UnexpectedDvEv => "unexpected DV/EV",
            EngineError::BadChecksum => "bad checksum",
            EngineError::UnexpectedCtrl => "unexpected control",
            EngineError::BadTxData => "bad TX data",
            EngineError::SyncLost => "sync lost",
            EngineError::SpiError => "SPI error",
            EngineError::ControlTxFail => "control TX failed",
            EngineError::Other(_) => "other",
        }
    }
}

impl core::fmt::Display for EngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EngineError::Other(code) => write!(f, "other ({code})"),
            _ => f.write_str(self.as_str()),
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Call surface of the protocol engine
///
/// A value implementing `Engine` is a handle: clones refer to the same engine
/// instance. The driver keeps one clone per instance and hands another to
/// callbacks that need to call back into the engine.
pub trait Engine {
    /// Allocate the engine instance and bind the callback context
    ///
    /// Returns `false` if the engine has no room for another instance.
    fn init(&self, context: usize) -> bool;

    /// Start register initialization with the given MAC/PLCA parameters
    fn configure(&self, context: usize, regs: &RegsConfig) -> bool;

    /// Whether register initialization has completed
    fn init_done(&self) -> bool;

    /// Run the protocol state machine once
    ///
    /// `blocking` allows the engine to spin internally during this call.
    /// Returns `true` when all pending work is drained.
    fn service(&self, host: &dyn EngineHost, blocking: bool) -> bool;

    /// Queue a complete Ethernet frame
    ///
    /// `tsc` selects the transmit timestamp capture; `0` disables it.
    /// Completion is signalled through [`EngineHost::raw_tx_done`].
    fn send_raw(&self, frame: &[u8], tsc: u8) -> bool;

    /// Change PLCA settings in the live register state
    fn set_plca(&self, enable: bool, node_id: u8, node_count: u8) -> bool;

    /// Restart register initialization
    fn reinit(&self);

    /// Advance the engine's internal timers
    fn check_timers(&self, host: &dyn EngineHost);

    /// Report completion of the SPI transaction identified by `tag`
    fn spi_buffer_done(&self, tag: u8, success: bool);
}

impl<E: Engine + ?Sized> Engine for &E {
    fn init(&self, context: usize) -> bool {
        (**self).init(context)
    }

    fn configure(&self, context: usize, regs: &RegsConfig) -> bool {
        (**self).configure(context, regs)
    }

    fn init_done(&self) -> bool {
        (**self).init_done()
    }

    fn service(&self, host: &dyn EngineHost, blocking: bool) -> bool {
        (**self).service(host, blocking)
    }

    fn send_raw(&self, frame: &[u8], tsc: u8) -> bool {
        (**self).send_raw(frame, tsc)
    }

    fn set_plca(&self, enable: bool, node_id: u8, node_count: u8) -> bool {
        (**self).set_plca(enable, node_id, node_count)
    }

    fn reinit(&self) {
        (**self).reinit();
    }

    fn check_timers(&self, host: &dyn EngineHost) {
        (**self).check_timers(host);
    }

    fn spi_buffer_done(&self, tag: u8, success: bool) {
        (**self).spi_buffer_done(tag, success);
    }
}

// =============================================================================
// Engine Host
// =============================================================================

/// Callbacks from the protocol engine into the driver
///
/// All callbacks run synchronously on the caller's stack, nested inside an
/// [`Engine`] call.
pub trait EngineHost {
    /// The engine has work pending and wants to be serviced
    fn need_service(&self, context: usize);

    /// Informational protocol error
    fn error(&self, context: usize, error: EngineError);

    /// A burst of received frame data starting at `offset`
    fn rx_slice(&self, context: usize, offset: u16, data: &[u8]);

    /// End of a received frame of `len` bytes
    fn rx_packet(&self, context: usize, success: bool, len: u16);

    /// Register-layer event
    fn regs_event(&self, context: usize, event: RegsEvent);

    /// Exchange `tx` with the device, filling `rx`
    ///
    /// Returns whether the exchange was accepted. An accepted exchange is
    /// completed with [`Engine::spi_buffer_done`] using the same `tag`.
    fn spi_transaction(&self, context: usize, tag: u8, tx: &[u8], rx: &mut [u8]) -> bool;

    /// The frame handed to [`Engine::send_raw`] has left the engine
    fn raw_tx_done(&self, context: usize);

    /// Milliseconds since an arbitrary epoch, wrapping
    fn ticks_ms(&self) -> u32;
}
