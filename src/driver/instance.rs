//! Instance State
//!
//! [`Instance`] is everything one LAN865x needs at runtime: configuration,
//! the board adapter, the upper layer, the engine handle and the receive and
//! transmit buffers. It lives inside a [`Registry`](crate::registry::Registry)
//! once [`Lan865x::init`](super::Lan865x::init) has run, so that engine
//! callbacks can find it again from their context value.

use super::config::DriverConfig;
use super::rx::RxAssembler;
use super::spi::SpiBridge;
use super::tx::{TxController, TxPoll};
use crate::diag::{Diagnostic, Stats, emit};
use crate::engine::Engine;
use crate::registry::Registry;
use crate::upper::UpperLayer;

/// Registry holding up to `N` driver instances
pub type InstanceRegistry<H, U, E, const N: usize> = Registry<Instance<H, U, E>, N>;

/// State of one LAN865x
///
/// # Type Parameters
/// * `H` - Hardware adapter ([`HardwareAdapter`](crate::hal::HardwareAdapter))
/// * `U` - Upper protocol layer ([`UpperLayer`])
/// * `E` - Engine handle ([`Engine`] + `Clone`)
pub struct Instance<H, U, E> {
    pub(crate) config: DriverConfig,
    pub(crate) hw: H,
    pub(crate) upper: U,
    pub(crate) engine: E,
    pub(crate) rx: RxAssembler,
    pub(crate) tx: TxController,
    pub(crate) spi: SpiBridge,
    /// The engine asked to be serviced
    pub(crate) need_service: bool,
    pub(crate) stats: Stats,
}

impl<H, U, E> Instance<H, U, E> {
    /// Create an instance; nothing touches the hardware until init
    pub fn new(config: DriverConfig, hw: H, upper: U, engine: E) -> Self {
        Self {
            config,
            hw,
            upper,
            engine,
            rx: RxAssembler::new(),
            tx: TxController::new(),
            spi: SpiBridge::new(),
            need_service: false,
            stats: Stats::default(),
        }
    }

    /// Configuration the instance was created with
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Runtime counters
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Whether a frame is in flight
    pub fn is_tx_busy(&self) -> bool {
        self.tx.is_busy()
    }

    /// Get mutable access to the hardware adapter
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Get mutable access to the upper layer
    pub fn upper_layer_mut(&mut self) -> &mut U {
        &mut self.upper
    }

    /// Get the engine handle
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Consume the instance and return its collaborators
    pub fn into_parts(self) -> (H, U, E) {
        (self.hw, self.upper, self.engine)
    }

    /// Clear buffers and flags left over from a previous run
    pub(crate) fn reset_runtime(&mut self) {
        self.rx.reset();
        self.tx.reset();
        self.spi.reset();
        self.need_service = false;
    }

    pub(crate) fn report(&self, diagnostic: Diagnostic) {
        emit(self.config.diagnostics, &diagnostic);
    }
}

impl<H, U: UpperLayer, E: Engine> Instance<H, U, E> {
    /// Poll the upper layer for one frame unless a frame is in flight
    pub(crate) fn poll_upper(&mut self) -> TxPoll {
        let poll = self.tx.poll(&mut self.upper, &self.engine);
        match poll {
            TxPoll::Sent(_) => self.stats.tx_sent = self.stats.tx_sent.wrapping_add(1),
            TxPoll::Rejected(len) => {
                self.stats.tx_rejected = self.stats.tx_rejected.wrapping_add(1);
                self.report(Diagnostic::SendFailed { len });
            }
            TxPoll::Failed(e) => self.report(Diagnostic::PollFailed(e)),
            TxPoll::Busy | TxPoll::Idle => {}
        }
        poll
    }
}

impl<H, U, E> core::fmt::Debug for Instance<H, U, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Instance")
            .field("config", &self.config)
            .field("rx", &self.rx)
            .field("tx", &self.tx)
            .field("spi", &self.spi)
            .field("need_service", &self.need_service)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
