//! Configuration types for the LAN865x driver
//!
//! MAC and PLCA settings are fixed once an instance is initialized. Live
//! PLCA changes go through [`Lan865x::set_plca`](super::Lan865x::set_plca)
//! and only touch the engine's register state.

use crate::constants::{
    DEFAULT_INIT_TIMEOUT_MS, DEFAULT_MAC_ADDR, DEFAULT_PLCA_BURST_TIMER, DEFAULT_PLCA_NODE_COUNT,
    MAC_ADDR_LEN,
};
use crate::diag::DiagnosticFn;

/// MAC layer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacConfig {
    /// Station MAC address
    pub address: [u8; MAC_ADDR_LEN],
    /// Receive all frames regardless of destination address
    pub copy_all_frames: bool,
    /// Start transmitting before the whole frame is in the device
    pub tx_cut_through: bool,
    /// Start forwarding received data before the whole frame is in the device
    pub rx_cut_through: bool,
}

impl MacConfig {
    /// MAC settings with the given address and all flags cleared
    #[must_use]
    pub const fn new(address: [u8; MAC_ADDR_LEN]) -> Self {
        Self {
            address,
            copy_all_frames: false,
            tx_cut_through: false,
            rx_cut_through: false,
        }
    }
}

impl Default for MacConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAC_ADDR)
    }
}

/// Physical Layer Collision Avoidance settings
///
/// Node 0 is the PLCA coordinator and emits the BEACON. Every node on the
/// segment needs a distinct `node_id` below `node_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlcaConfig {
    /// Local node id
    pub node_id: u8,
    /// Number of nodes on the segment (only meaningful on the coordinator)
    pub node_count: u8,
    /// Additional frames a node may send per transmit opportunity
    pub burst_count: u8,
    /// Wait time for further frames within a burst, in bit times
    pub burst_timer: u8,
}

impl PlcaConfig {
    /// PLCA settings for `node_id` on a segment of `node_count` nodes, no bursts
    #[must_use]
    pub const fn new(node_id: u8, node_count: u8) -> Self {
        Self {
            node_id,
            node_count,
            burst_count: 0,
            burst_timer: DEFAULT_PLCA_BURST_TIMER,
        }
    }

    /// Set burst count and burst timer
    #[must_use]
    pub const fn with_burst(mut self, count: u8, timer: u8) -> Self {
        self.burst_count = count;
        self.burst_timer = timer;
        self
    }

    /// Zero-valued block pushed to the engine when PLCA is disabled
    pub(crate) const fn zeroed() -> Self {
        Self {
            node_id: 0,
            node_count: 0,
            burst_count: 0,
            burst_timer: 0,
        }
    }
}

impl Default for PlcaConfig {
    fn default() -> Self {
        Self::new(0, DEFAULT_PLCA_NODE_COUNT)
    }
}

/// Complete driver configuration
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// MAC settings
    pub mac: MacConfig,
    /// PLCA settings; `None` selects CSMA/CD
    pub plca: Option<PlcaConfig>,
    /// Upper bound on waiting for the engine's register initialization
    pub init_timeout_ms: u32,
    /// Pulse the reset line before initializing the engine
    pub hardware_reset: bool,
    /// Diagnostic sink
    pub diagnostics: Option<DiagnosticFn>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverConfig {
    /// Create a configuration with defaults (CSMA/CD, default MAC address)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mac: MacConfig::new(DEFAULT_MAC_ADDR),
            plca: None,
            init_timeout_ms: DEFAULT_INIT_TIMEOUT_MS,
            hardware_reset: false,
            diagnostics: None,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the MAC address
    #[must_use]
    pub const fn with_mac_address(mut self, addr: [u8; MAC_ADDR_LEN]) -> Self {
        self.mac.address = addr;
        self
    }

    /// Enable or disable reception of all frames
    #[must_use]
    pub const fn with_copy_all_frames(mut self, enable: bool) -> Self {
        self.mac.copy_all_frames = enable;
        self
    }

    /// Set TX and RX cut-through
    #[must_use]
    pub const fn with_cut_through(mut self, tx: bool, rx: bool) -> Self {
        self.mac.tx_cut_through = tx;
        self.mac.rx_cut_through = rx;
        self
    }

    /// Use PLCA arbitration with the given settings
    #[must_use]
    pub const fn with_plca(mut self, plca: PlcaConfig) -> Self {
        self.plca = Some(plca);
        self
    }

    /// Use CSMA/CD arbitration
    #[must_use]
    pub const fn with_csma_cd(mut self) -> Self {
        self.plca = None;
        self
    }

    /// Set the init timeout
    #[must_use]
    pub const fn with_init_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.init_timeout_ms = timeout_ms;
        self
    }

    /// Pulse the reset line during init
    #[must_use]
    pub const fn with_hardware_reset(mut self, enable: bool) -> Self {
        self.hardware_reset = enable;
        self
    }

    /// Install a diagnostic sink
    #[must_use]
    pub const fn with_diagnostics(mut self, sink: DiagnosticFn) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Register-layer parameters derived from this configuration
    #[must_use]
    pub const fn regs(&self) -> RegsConfig {
        RegsConfig::from_driver_config(self)
    }
}

/// Parameters pushed into the engine's register layer during init
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegsConfig {
    /// Station MAC address
    pub mac_address: [u8; MAC_ADDR_LEN],
    /// PLCA enabled (CSMA/CD otherwise)
    pub plca_enable: bool,
    /// PLCA parameters, zeroed when PLCA is disabled
    pub plca: PlcaConfig,
    /// Receive all frames
    pub copy_all_frames: bool,
    /// TX cut-through
    pub tx_cut_through: bool,
    /// RX cut-through
    pub rx_cut_through: bool,
}

impl RegsConfig {
    /// Flatten a driver configuration
    #[must_use]
    pub const fn from_driver_config(config: &DriverConfig) -> Self {
        let (plca_enable, plca) = match config.plca {
            Some(plca) => (true, plca),
            None => (false, PlcaConfig::zeroed()),
        };
        Self {
            mac_address: config.mac.address,
            plca_enable,
            plca,
            copy_all_frames: config.mac.copy_all_frames,
            tx_cut_through: config.mac.tx_cut_through,
            rx_cut_through: config.mac.rx_cut_through,
        }
    }
}
