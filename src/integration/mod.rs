//! External Stack Integrations
//!
//! This module provides integrations with external network stacks:
//!
//! - **smoltcp** (`smoltcp`): Integration with the smoltcp TCP/IP network stack
//!   - [`FrameBridge`] implements both [`UpperLayer`](crate::upper::UpperLayer)
//!     and `smoltcp::phy::Device`
//!   - RX/TX token support
//!   - Requires `smoltcp` feature
//!
//! # Example
//!
//! ```ignore
//! use smoltcp::phy::Device;
//! driver.with_upper_layer(|bridge| iface.poll(now, bridge, &mut sockets))?;
//! ```

#[cfg(feature = "smoltcp")]
pub mod smoltcp;

#[cfg(feature = "smoltcp")]
pub use self::smoltcp::{BridgeRxToken, BridgeTxToken, FrameBridge, ethernet_address};
