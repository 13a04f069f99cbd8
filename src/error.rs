//! Error types for the LAN865x driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`InitError`]: Instance initialization failures
//! - [`IoError`]: Runtime TX, service and handle-resolution failures
//! - [`RegsError`]: Runtime register-layer reconfiguration failures
//! - [`HwError`]: Failures reported by a hardware adapter
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.
//!
//! Per-frame receive outcomes are not errors; they are reported as
//! [`RxStatus`](crate::driver::RxStatus) diagnostics.

// =============================================================================
// Initialization Errors
// =============================================================================

/// Initialization errors
///
/// Any of these is fatal to the instance being initialized. The instance
/// is removed from the registry before the error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// The engine refused to allocate an instance
    EngineAllocation,
    /// The engine rejected the MAC/PLCA register configuration
    RegsConfiguration,
    /// The engine did not finish register initialization in time
    Timeout,
    /// No free slot in the handle registry
    RegistryFull,
    /// The hardware adapter failed to pulse the reset line
    HardwareReset,
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InitError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            InitError::EngineAllocation => "engine allocation refused",
            InitError::RegsConfiguration => "register configuration rejected",
            InitError::Timeout => "register initialization timed out",
            InitError::RegistryFull => "handle registry full",
            InitError::HardwareReset => "hardware reset failed",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// The engine rejected an outbound frame
    SendFailure,
    /// A frame is already in flight
    TxBusy,
    /// Frame exceeds the driver MTU
    FrameTooLarge,
    /// Zero-length frame
    EmptyFrame,
    /// The instance is already borrowed further up the call stack
    Reentrant,
    /// The token does not resolve to a registered instance
    StaleHandle,
    /// The upper-protocol layer refused or failed an operation
    UpperLayer,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::SendFailure => "engine rejected frame",
            IoError::TxBusy => "transmit in flight",
            IoError::FrameTooLarge => "frame too large",
            IoError::EmptyFrame => "empty frame",
            IoError::Reentrant => "reentrant instance access",
            IoError::StaleHandle => "stale instance handle",
            IoError::UpperLayer => "upper layer failure",
        }
    }
}

// =============================================================================
// Register Layer Errors
// =============================================================================

/// Runtime register-layer errors
///
/// The previous arbitration mode stays in effect when one of these occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegsError {
    /// The engine rejected the request
    Rejected,
}

impl core::fmt::Display for RegsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RegsError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RegsError::Rejected => "register request rejected",
        }
    }
}

// =============================================================================
// Hardware Errors
// =============================================================================

/// Hardware adapter errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HwError {
    /// SPI exchange failed
    Transfer,
    /// Interrupt or reset pin access failed
    Pin,
    /// Reset sequence failed
    Reset,
}

impl core::fmt::Display for HwError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HwError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            HwError::Transfer => "SPI transfer failed",
            HwError::Pin => "pin access failed",
            HwError::Reset => "reset failed",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Init(InitError::Timeout)) => { /* ... */ }
///     Err(Error::Io(IoError::TxBusy)) => { /* ... */ }
///     Err(Error::Regs(RegsError::Rejected)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Initialization error
    Init(InitError),
    /// I/O error
    Io(IoError),
    /// Register layer error
    Regs(RegsError),
    /// Hardware adapter error
    Hw(HwError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Init(e) => write!(f, "init: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
            Error::Regs(e) => write!(f, "regs: {}", e.as_str()),
            Error::Hw(e) => write!(f, "hw: {}", e.as_str()),
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Error::Init(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

impl From<RegsError> for Error {
    fn from(e: RegsError) -> Self {
        Error::Regs(e)
    }
}

impl From<HwError> for Error {
    fn from(e: HwError) -> Self {
        Error::Hw(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for initialization
pub type InitResult<T> = core::result::Result<T, InitError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

/// Result type alias for hardware adapter operations
pub type HwResult<T> = core::result::Result<T, HwError>;

// =============================================================================
// Unit Tests
// =============================================================================
