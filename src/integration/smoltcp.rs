//! smoltcp Network Stack Integration
#![cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
//!
//! This module connects the driver to the [smoltcp](https://docs.rs/smoltcp)
//! network stack through [`FrameBridge`], a one-frame mailbox in each
//! direction. The bridge is the driver's [`UpperLayer`] and at the same time
//! a `smoltcp::phy::Device`.
//!
//! # Example
//!
//! ```ignore
//! use smoltcp::iface::{Config, Interface, SocketSet};
//! use ph_lan865x::integration::{FrameBridge, ethernet_address};
//!
//! let config = DriverConfig::new().with_plca(PlcaConfig::new(1, 8));
//! let instance = Instance::new(config, hw, FrameBridge::new(), tc6);
//! let mut driver = Lan865x::init(&REGISTRY, clock, instance)?;
//!
//! let mut iface = driver.with_upper_layer(|bridge| {
//!     Interface::new(Config::new(ethernet_address(&config).into()), bridge, now())
//! })?;
//!
//! loop {
//!     driver.service()?;
//!     driver.with_upper_layer(|bridge| iface.poll(now(), bridge, &mut sockets))?;
//! }
//! ```
//!
//! # Features
//!
//! This module is only available when the `smoltcp` feature is enabled in Cargo.toml:
//! ```toml
//! [dependencies]
//! ph-lan865x = { version = "0.1", features = ["smoltcp"] }
//! ```
//!
//! # Flow Control
//!
//! smoltcp hands out its RX and TX tokens together. The bridge lends each
//! token a different slot, so both can exist without aliasing. A full RX slot
//! makes the driver drop the next received frame until smoltcp consumes it;
//! a full TX slot makes `transmit()` return `None` until the service loop
//! picks the frame up.

use crate::constants::MTU;
use crate::driver::config::DriverConfig;
use crate::error::{IoError, IoResult};
use crate::upper::UpperLayer;

use smoltcp::phy::{Checksum, ChecksumCapabilities, Device, DeviceCapabilities, Medium};
use smoltcp::time::Instant;

// =============================================================================
// Frame Slot
// =============================================================================

/// One frame buffer; `len == 0` means empty
#[derive(Debug)]
struct Slot {
    buf: [u8; MTU],
    len: usize,
}

impl Slot {
    const fn new() -> Self {
        Self {
            buf: [0; MTU],
            len: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.len != 0
    }

    fn fill(&mut self, frame: &[u8]) {
        self.buf[..frame.len()].copy_from_slice(frame);
        self.len = frame.len();
    }

    fn take(&mut self) -> &[u8] {
        let len = core::mem::take(&mut self.len);
        &self.buf[..len]
    }
}

// =============================================================================
// Frame Bridge
// =============================================================================

/// One-frame mailbox between the driver and smoltcp
#[derive(Debug)]
pub struct FrameBridge {
    rx: Slot,
    tx: Slot,
}

impl Default for FrameBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBridge {
    /// Create an empty bridge
    pub const fn new() -> Self {
        Self {
            rx: Slot::new(),
            tx: Slot::new(),
        }
    }

    /// A received frame waits for smoltcp
    pub fn rx_pending(&self) -> bool {
        self.rx.is_full()
    }

    /// An outbound frame waits for the driver
    pub fn tx_pending(&self) -> bool {
        self.tx.is_full()
    }
}

impl UpperLayer for FrameBridge {
    fn deliver_frame(&mut self, frame: &[u8]) -> IoResult<()> {
        if frame.len() > MTU {
            return Err(IoError::FrameTooLarge);
        }
        if frame.is_empty() {
            return Err(IoError::EmptyFrame);
        }
        if self.rx.is_full() {
            return Err(IoError::UpperLayer);
        }
        self.rx.fill(frame);
        Ok(())
    }

    fn next_frame(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        if !self.tx.is_full() {
            return Ok(0);
        }
        if buf.len() < self.tx.len {
            return Err(IoError::FrameTooLarge);
        }
        let frame = self.tx.take();
        buf[..frame.len()].copy_from_slice(frame);
        Ok(frame.len())
    }
}

// =============================================================================
// RX Token
// =============================================================================

/// Receive token for smoltcp
///
/// Borrows the bridge's RX slot and empties it when consumed.
pub struct BridgeRxToken<'a> {
    slot: &'a mut Slot,
}

impl smoltcp::phy::RxToken for BridgeRxToken<'_> {
    fn consume<R, F>(self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        f(self.slot.take())
    }
}

// =============================================================================
// TX Token
// =============================================================================

/// Transmit token for smoltcp
///
/// Borrows the bridge's TX slot; the frame is queued for the next service
/// round when consumed. A zero-length frame is not queued.
pub struct BridgeTxToken<'a> {
    slot: &'a mut Slot,
}

impl smoltcp::phy::TxToken for BridgeTxToken<'_> {
    fn consume<R, F>(self, len: usize, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        let len = len.min(MTU);
        let result = f(&mut self.slot.buf[..len]);
        if len == 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!("lan865x: empty smoltcp frame not queued");
            return result;
        }
        self.slot.len = len;
        result
    }
}

// =============================================================================
// Device Implementation
// =============================================================================

impl Device for FrameBridge {
    type RxToken<'a>
        = BridgeRxToken<'a>
    where
        Self: 'a;
    type TxToken<'a>
        = BridgeTxToken<'a>
    where
        Self: 'a;

    fn receive(&mut self, _timestamp: Instant) -> Option<(Self::RxToken<'_>, Self::TxToken<'_>)> {
        if !self.rx.is_full() || self.tx.is_full() {
            return None;
        }
        let Self { rx, tx } = self;
        Some((BridgeRxToken { slot: rx }, BridgeTxToken { slot: tx }))
    }

    fn transmit(&mut self, _timestamp: Instant) -> Option<Self::TxToken<'_>> {
        if self.tx.is_full() {
            return None;
        }
        Some(BridgeTxToken { slot: &mut self.tx })
    }

    fn capabilities(&self) -> DeviceCapabilities {
        let mut caps = DeviceCapabilities::default();
        caps.medium = Medium::Ethernet;
        caps.max_transmission_unit = MTU;
        caps.max_burst_size = Some(1);

        // The MAC-PHY does not offload checksums.
        caps.checksum = ChecksumCapabilities::default();
        caps.checksum.ipv4 = Checksum::Both;
        caps.checksum.udp = Checksum::Both;
        caps.checksum.tcp = Checksum::Both;
        caps.checksum.icmpv4 = Checksum::Both;

        caps
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get the configured MAC address as a smoltcp EthernetAddress
pub fn ethernet_address(config: &DriverConfig) -> smoltcp::wire::EthernetAddress {
    smoltcp::wire::EthernetAddress(config.mac.address)
}
