//! Centralized Constants
//!
//! Single source of truth for the sizes, timings and defaults used by the
//! LAN865x driver.
//!
//! # Organization
//!
//! - **Frame/Buffer sizes**: Ethernet frame dimensions and the driver MTU
//! - **Engine parameters**: values handed to the protocol engine
//! - **Timing**: init timeout and reset pulse lengths
//! - **Defaults**: configuration defaults

// =============================================================================
// Frame and Buffer Sizes
// =============================================================================

/// Driver MTU: capacity of the receive accumulation and transmit buffers
pub const MTU: usize = 1536;

/// Destination MAC address size
pub const ETH_DEST_MAC_SIZE: usize = 6;

/// Source MAC address size
pub const ETH_SRC_MAC_SIZE: usize = 6;

/// Length/EtherType field size
pub const ETH_LENGTH_SIZE: usize = 2;

/// IEEE 802.1Q tag size
pub const VLAN_TAG_SIZE: usize = 4;

/// Minimum IPv4 header size
pub const IP_HEADER_MIN_SIZE: usize = 20;

/// Frame check sequence size
pub const FCS_SIZE: usize = 4;

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HEADER_SIZE: usize = ETH_DEST_MAC_SIZE + ETH_SRC_MAC_SIZE + ETH_LENGTH_SIZE;

/// Smallest frame accepted from the engine (header + minimal IP header + FCS = 38)
pub const MIN_FRAME_SIZE: usize = ETH_HEADER_SIZE + IP_HEADER_MIN_SIZE + FCS_SIZE;

/// MAC address length
pub const MAC_ADDR_LEN: usize = 6;

// =============================================================================
// Engine Parameters
// =============================================================================

/// Timestamp sub-channel used for every outbound frame
pub const TX_SUBCHANNEL: u8 = 0;

// =============================================================================
// Timing Constants
// =============================================================================

/// Default bound on waiting for the engine's register initialization
pub const DEFAULT_INIT_TIMEOUT_MS: u32 = 1000;

/// Reset line low time
pub const RESET_PULSE_MS: u32 = 10;

/// Time after releasing reset before the device is usable
pub const RESET_RECOVERY_MS: u32 = 10;

// =============================================================================
// Default Configuration
// =============================================================================

/// Default MAC address (locally administered)
pub const DEFAULT_MAC_ADDR: [u8; MAC_ADDR_LEN] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

/// Default PLCA node count
pub const DEFAULT_PLCA_NODE_COUNT: u8 = 8;

/// Default PLCA burst timer (bit times)
pub const DEFAULT_PLCA_BURST_TIMER: u8 = 128;
