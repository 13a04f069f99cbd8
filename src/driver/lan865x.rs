//! Core LAN865x driver implementation.
//!
//! This module contains the [`Lan865x`] handle and its core operations:
//!
//! - Initialization (registration, engine bring-up, bounded init wait)
//! - The service loop
//! - Frame transmission
//! - Deferred SPI completion
//! - Release
//!
//! For runtime PLCA changes, see the [`plca`](super::plca) module.

use super::config::{DriverConfig, RegsConfig};
use super::host::Host;
use super::instance::{Instance, InstanceRegistry};
use crate::diag::{Diagnostic, Stats};
use crate::engine::Engine;
use crate::error::{HwResult, InitError, InitResult, IoError, Result};
use crate::hal::clock::elapsed_ms;
use crate::hal::{Clock, HardwareAdapter};
use crate::registry::Token;
use crate::upper::UpperLayer;

// =============================================================================
// LAN865x Driver
// =============================================================================

/// Initialized LAN865x driver
///
/// The instance itself lives in a [`Registry`](crate::registry::Registry);
/// this handle holds its [`Token`] and the clock. Dropping the handle leaves
/// the instance registered; call [`release`](Self::release) to take it back.
///
/// # Type Parameters
/// * `H` - Hardware adapter
/// * `U` - Upper protocol layer
/// * `E` - Engine handle
/// * `C` - Millisecond clock
/// * `N` - Registry capacity
///
/// # Example
/// ```ignore
/// static REGISTRY: InstanceRegistry<Hw, Stack, Tc6, 1> = Registry::new();
///
/// let config = DriverConfig::new()
///     .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56])
///     .with_plca(PlcaConfig::new(1, 8));
/// let instance = Instance::new(config, hw, stack, tc6);
/// let mut driver = Lan865x::init(&REGISTRY, clock, instance)?;
///
/// loop {
///     if driver.service()? {
///         delay.delay_ms(10);
///     }
/// }
/// ```
///
/// # Concurrency
///
/// Every method runs engine callbacks on the caller's stack. Calling into
/// the same instance from an interrupt while another call is in progress
/// fails with [`IoError::Reentrant`] instead of corrupting state.
pub struct Lan865x<'r, H, U, E, C, const N: usize> {
    registry: &'r InstanceRegistry<H, U, E, N>,
    clock: C,
    token: Token,
}

impl<'r, H, U, E, C, const N: usize> Lan865x<'r, H, U, E, C, N>
where
    H: HardwareAdapter,
    U: UpperLayer,
    E: Engine + Clone,
    C: Clock,
{
    // =========================================================================
    // Initialization
    // =========================================================================

    /// Register `instance` and bring up the engine
    ///
    /// Waits for the engine's register initialization, servicing it in
    /// blocking mode, for at most `init_timeout_ms`. The engine is serviced
    /// at least once, so a timeout of 0 still gives it one round.
    ///
    /// The optional hardware reset is pulsed only once a registry slot is
    /// secured.
    ///
    /// # Errors
    /// - `Init(HardwareReset)` - the reset pulse failed
    /// - `Init(RegistryFull)` - no free registry slot
    /// - `Init(EngineAllocation)` - the engine refused the instance
    /// - `Init(RegsConfiguration)` - the engine rejected the MAC/PLCA setup
    /// - `Init(Timeout)` - register initialization did not finish in time
    ///
    /// On error the instance is no longer registered.
    pub fn init(
        registry: &'r InstanceRegistry<H, U, E, N>,
        clock: C,
        mut instance: Instance<H, U, E>,
    ) -> Result<Self> {
        instance.reset_runtime();

        let engine = instance.engine.clone();
        let regs = instance.config.regs();
        let timeout_ms = instance.config.init_timeout_ms;
        let hardware_reset = instance.config.hardware_reset;

        let token = registry
            .register(instance)
            .map_err(|_| InitError::RegistryFull)?;
        let driver = Self {
            registry,
            clock,
            token,
        };

        match driver.bring_up(&engine, &regs, timeout_ms, hardware_reset) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("lan865x: instance {} ready", token);
                Ok(driver)
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("lan865x: init failed: {}", e);
                let _ = registry.unregister(token);
                Err(e.into())
            }
        }
    }

    fn bring_up(
        &self,
        engine: &E,
        regs: &RegsConfig,
        timeout_ms: u32,
        hardware_reset: bool,
    ) -> InitResult<()> {
        if hardware_reset {
            self.registry
                .with(self.token, |inst| inst.hw.reset())
                .map_err(|_| InitError::HardwareReset)?
                .map_err(|_| InitError::HardwareReset)?;
        }

        let context = self.token.into_raw();

        if !engine.init(context) {
            return Err(InitError::EngineAllocation);
        }
        if !engine.configure(context, regs) {
            return Err(InitError::RegsConfiguration);
        }

        let host = self.host();
        let start = self.clock.now_ms();
        while !engine.init_done() {
            engine.service(&host, true);
            if !engine.init_done() && elapsed_ms(start, self.clock.now_ms()) >= timeout_ms {
                return Err(InitError::Timeout);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Service Loop
    // =========================================================================

    /// Run one round of the service loop
    ///
    /// 1. Sample the interrupt line.
    /// 2. Service the engine if the line is active or the engine asked for
    ///    it (non-blocking when the interrupt triggered the call).
    /// 3. Unless a frame is in flight, poll the upper layer for one frame and
    ///    hand it to the engine.
    /// 4. Advance the engine timers.
    ///
    /// Returns `true` when the engine reported all work drained; callers can
    /// idle until the next interrupt or tick.
    pub fn service(&mut self) -> Result<bool> {
        let (engine, irq, pending) = self.registry.with(self.token, |inst| {
            let irq = inst.hw.is_interrupt_active();
            (inst.engine.clone(), irq, core::mem::take(&mut inst.need_service))
        })?;
        let host = self.host();

        let mut drained = true;
        if irq || pending {
            drained = engine.service(&host, !irq);
            // A request raised by a callback during this call survives.
            self.registry
                .with(self.token, |inst| inst.need_service |= !drained)?;
        }

        self.registry.with(self.token, |inst| inst.poll_upper())?;

        engine.check_timers(&host);
        Ok(drained)
    }

    /// Repeat [`service`](Self::service) until the engine reports drained
    ///
    /// Runs at least one round and at most `max_rounds`. Returns whether the
    /// engine drained.
    pub fn service_until_drained(&mut self, max_rounds: usize) -> Result<bool> {
        for _ in 0..max_rounds.max(1) {
            if self.service()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // =========================================================================
    // Transmit
    // =========================================================================

    /// Send one frame directly, bypassing the upper-layer poll
    ///
    /// # Errors
    /// - `Io(TxBusy)` - a frame is in flight
    /// - `Io(EmptyFrame)` / `Io(FrameTooLarge)` - bad frame length
    /// - `Io(SendFailure)` - the engine rejected the frame
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.registry.with(self.token, |inst| {
            let result = inst.tx.send(&inst.engine, frame);
            match result {
                Ok(()) => inst.stats.tx_sent = inst.stats.tx_sent.wrapping_add(1),
                Err(IoError::SendFailure) => {
                    inst.stats.tx_rejected = inst.stats.tx_rejected.wrapping_add(1);
                    inst.report(Diagnostic::SendFailed { len: frame.len() });
                }
                Err(_) => {}
            }
            result
        })??;
        Ok(())
    }

    /// Whether a frame is in flight
    pub fn is_tx_busy(&self) -> Result<bool> {
        Ok(self.registry.with(self.token, |inst| inst.tx.is_busy())?)
    }

    // =========================================================================
    // SPI Completion
    // =========================================================================

    /// Deliver the outcome of an exchange the adapter reported as pending
    ///
    /// The engine is told under the stored transaction tag and the instance
    /// is marked for service. An outcome with no exchange pending is ignored
    /// and reported.
    pub fn complete_spi(&mut self, outcome: HwResult<()>) -> Result<()> {
        let done = self.registry.with(self.token, |inst| {
            let done = inst.spi.complete(outcome.is_ok());
            match done {
                Some(_) => inst.need_service = true,
                None => inst.report(Diagnostic::SpiCompletionIgnored),
            }
            done.map(|(tag, success)| (tag, success, inst.engine.clone()))
        })?;

        if let Some((tag, success, engine)) = done {
            engine.spi_buffer_done(tag, success);
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Registry token of this instance
    #[inline(always)]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Runtime counters
    pub fn stats(&self) -> Result<Stats> {
        Ok(self.registry.with(self.token, |inst| inst.stats)?)
    }

    /// Configuration the instance was initialized with
    pub fn config(&self) -> Result<DriverConfig> {
        Ok(self.registry.with(self.token, |inst| inst.config)?)
    }

    /// Run `f` with the hardware adapter
    pub fn with_hardware<R>(&mut self, f: impl FnOnce(&mut H) -> R) -> Result<R> {
        Ok(self.registry.with(self.token, |inst| f(&mut inst.hw))?)
    }

    /// Run `f` with the upper layer
    pub fn with_upper_layer<R>(&mut self, f: impl FnOnce(&mut U) -> R) -> Result<R> {
        Ok(self.registry.with(self.token, |inst| f(&mut inst.upper))?)
    }

    /// Unregister the instance and hand it back
    ///
    /// The token stops resolving; late engine callbacks for it are dropped.
    pub fn release(self) -> Result<Instance<H, U, E>> {
        #[cfg(feature = "defmt")]
        defmt::info!("lan865x: releasing instance {}", self.token);
        Ok(self.registry.unregister(self.token)?)
    }

    pub(super) fn engine(&self) -> Result<E> {
        Ok(self.registry.with(self.token, |inst| inst.engine.clone())?)
    }

    fn host(&self) -> Host<'_, H, U, E, C, N> {
        Host::new(self.registry, &self.clock)
    }
}

impl<H, U, E, C, const N: usize> core::fmt::Debug for Lan865x<'_, H, U, E, C, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lan865x")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}
