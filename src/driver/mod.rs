//! Core driver components for the LAN865x MAC-PHY.
//!
//! This module contains the building blocks of one driver instance and the
//! handle that operates it:
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`instance`] - Per-instance state kept in the registry
//! - [`lan865x`] - The driver handle: init, service loop, send
//! - [`plca`] - Runtime PLCA reconfiguration
//! - [`rx`] - Receive reassembly and frame classification
//! - [`tx`] - Single-slot transmit flow control
//! - [`spi`] - SPI transaction bridge
//!
//! # Example
//!
//! ```ignore
//! use ph_lan865x::driver::{DriverConfig, Instance, Lan865x, PlcaConfig};
//!
//! let config = DriverConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01])
//!     .with_plca(PlcaConfig::new(1, 8));
//! ```

// Submodules
pub mod config;
mod events;
mod host;
pub mod instance;
pub mod lan865x;
pub mod plca;
pub mod rx;
pub mod spi;
pub mod tx;

// Re-exports for convenience
pub use config::{DriverConfig, MacConfig, PlcaConfig, RegsConfig};
pub use instance::{Instance, InstanceRegistry};
pub use lan865x::Lan865x;
pub use rx::{RxAssembler, RxState, RxStatus};
pub use spi::{SpiBridge, SpiStart};
pub use tx::{TxController, TxPoll};
