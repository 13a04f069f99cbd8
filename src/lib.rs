//! LAN865x Driver
//!
//! A `no_std`, `no_alloc` driver instance layer for the Microchip LAN865x
//! 10BASE-T1S MAC-PHY.
//!
//! The OPEN Alliance TC6 protocol engine that talks to the chip over SPI is
//! not part of this crate; it plugs in through the [`Engine`] trait. This
//! crate supplies everything around it: the instance the engine calls back
//! into, receive reassembly, transmit flow control, the SPI bridge to the
//! board and the cooperative service loop.
//!
//! # Architecture
//!
//! The driver is organized into four layers:
//!
//! 1. **Driver Layer** ([`driver`]): [`Lan865x`] handle, per-instance state,
//!    RX/TX/SPI building blocks
//! 2. **Engine Layer** ([`engine`]): The protocol engine interface and the
//!    callbacks it makes
//! 3. **HAL Layer** ([`hal`]): SPI, interrupt and reset lines, clock
//! 4. **Upper Layer** ([`upper`]): Where received frames go and outbound
//!    frames come from
//!
//! Instances live in a [`Registry`]. The engine only ever sees an opaque
//! context value (a [`Token`]) and every callback resolves it again, so a
//! released instance can never be reached through a stale context.
//!
//! ## Standard Compliance
//!
//! - **IEEE 802.3cg**: 10BASE-T1S, PLCA and CSMA/CD arbitration
//! - **OPEN Alliance TC6**: MAC-PHY SPI framing (delegated to the engine)
//!
//! # Features
//!
//! - `defmt`: Enable defmt logging and formatting for public types
//! - `smoltcp`: Enable smoltcp network stack integration
//!
//! # Example
//!
//! ```ignore
//! use ph_lan865x::{DriverConfig, Instance, Lan865x, PlcaConfig, SpiAdapter};
//!
//! ph_lan865x::lan865x_registry!(REGISTRY, Board, Stack, Tc6, 1);
//!
//! let hw = SpiAdapter::new(spi, irq_pin, reset_pin, delay);
//! let config = DriverConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56])
//!     .with_plca(PlcaConfig::new(1, 8))
//!     .with_hardware_reset(true);
//!
//! let instance = Instance::new(config, hw, stack, tc6);
//! let mut driver = Lan865x::init(&REGISTRY, || timer.millis(), instance)?;
//!
//! loop {
//!     if driver.service()? {
//!         wait_for_interrupt_or_tick();
//!     }
//! }
//! ```
//!
//! # Memory Requirements
//!
//! Each instance carries one receive and one transmit buffer of
//! [`MTU`](constants::MTU) bytes, about 3 KB in total.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod constants;
pub mod diag;
pub mod driver;
pub mod engine;
pub mod error;
pub mod hal;
pub mod registry;
pub mod sync;
pub mod upper;

#[cfg(feature = "smoltcp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
pub mod integration;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use diag::{Diagnostic, DiagnosticFn, Stats};
pub use driver::config::{DriverConfig, MacConfig, PlcaConfig, RegsConfig};
pub use driver::{Instance, InstanceRegistry, Lan865x, RxStatus};
pub use engine::{Engine, EngineError, EngineHost, RegsEvent};
pub use error::{
    Error, HwError, HwResult, InitError, InitResult, IoError, IoResult, RegsError, Result,
};
pub use hal::{Clock, HardwareAdapter, SpiAdapter, Transfer};
pub use registry::{Registry, Token};
pub use upper::UpperLayer;

#[cfg(feature = "smoltcp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
pub use integration::{FrameBridge, ethernet_address};

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static instance registry.
///
/// The registry is `const`-constructed, so it can live in a `static` and be
/// shared by the service loop and the engine's callbacks.
///
/// # Examples
///
/// ```ignore
/// ph_lan865x::lan865x_registry!(REGISTRY, Board, Stack, Tc6);
///
/// let mut driver = Lan865x::init(&REGISTRY, clock, instance)?;
/// ```
#[macro_export]
macro_rules! lan865x_registry {
    ($name:ident, $hw:ty, $upper:ty, $engine:ty) => {
        $crate::lan865x_registry!($name, $hw, $upper, $engine, 1);
    };
    ($name:ident, $hw:ty, $upper:ty, $engine:ty, $n:expr) => {
        static $name: $crate::InstanceRegistry<$hw, $upper, $engine, $n> =
            $crate::Registry::new();
    };
}
