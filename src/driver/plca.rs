//! Runtime PLCA reconfiguration.
//!
//! This module extends [`Lan865x`] with live changes to the arbitration
//! mode. Changes only reach the engine's register state; the configuration
//! the instance was initialized with stays as it was, so a reinit after a
//! non-recoverable event restores the original mode.
//!
//! # Example
//!
//! ```ignore
//! // Join a PLCA segment of 8 nodes as node 3
//! driver.set_plca(true, 3, 8)?;
//!
//! // Fall back to CSMA/CD
//! driver.set_csma_cd()?;
//! ```

use super::config::PlcaConfig;
use super::lan865x::Lan865x;
use crate::engine::Engine;
use crate::error::{RegsError, Result};
use crate::hal::{Clock, HardwareAdapter};
use crate::upper::UpperLayer;

// =============================================================================
// PLCA Implementation
// =============================================================================

impl<H, U, E, C, const N: usize> Lan865x<'_, H, U, E, C, N>
where
    H: HardwareAdapter,
    U: UpperLayer,
    E: Engine + Clone,
    C: Clock,
{
    /// Push new PLCA parameters to the engine
    ///
    /// With `enable == false` the node uses CSMA/CD and the id and count are
    /// passed through unchanged.
    ///
    /// # Errors
    /// - `Regs(Rejected)` - the engine refused; the previous mode stays active
    pub fn set_plca(&mut self, enable: bool, node_id: u8, node_count: u8) -> Result<()> {
        let engine = self.engine()?;
        if !engine.set_plca(enable, node_id, node_count) {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "lan865x: PLCA update rejected (enable={}, id={}, count={})",
                enable,
                node_id,
                node_count
            );
            return Err(RegsError::Rejected.into());
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "lan865x: PLCA {} (id={}, count={})",
            if enable { "enabled" } else { "disabled" },
            node_id,
            node_count
        );
        Ok(())
    }

    /// Enable PLCA with the node id and count from `plca`
    ///
    /// Burst settings are not changed at runtime.
    pub fn apply_plca(&mut self, plca: &PlcaConfig) -> Result<()> {
        self.set_plca(true, plca.node_id, plca.node_count)
    }

    /// Switch to CSMA/CD
    pub fn set_csma_cd(&mut self) -> Result<()> {
        self.set_plca(false, 0, 0)
    }
}
