//! Engine Callback Dispatch
//!
//! [`Host`] is the [`EngineHost`] handed to every engine call. Each callback
//! resolves its context value through the registry before touching instance
//! state. A callback whose context is stale, or whose instance is already
//! borrowed further up the stack, is dropped and logged.
//!
//! Callbacks that need to call back into the engine (reinit, SPI done) clone
//! the engine handle, release the instance, and only then make the call.

use super::events;
use super::instance::{Instance, InstanceRegistry};
use super::spi::SpiStart;
use crate::diag::Diagnostic;
use crate::engine::{Engine, EngineError, EngineHost, RegsEvent};
use crate::hal::{Clock, HardwareAdapter};
use crate::registry::Token;
use crate::upper::UpperLayer;

/// Callback target for one engine call
pub(crate) struct Host<'a, H, U, E, C, const N: usize> {
    registry: &'a InstanceRegistry<H, U, E, N>,
    clock: &'a C,
}

impl<'a, H, U, E, C, const N: usize> Host<'a, H, U, E, C, N> {
    pub(crate) fn new(registry: &'a InstanceRegistry<H, U, E, N>, clock: &'a C) -> Self {
        Self { registry, clock }
    }

    fn resolve<R, F>(&self, context: usize, f: F) -> Option<R>
    where
        F: FnOnce(&mut Instance<H, U, E>) -> R,
    {
        match self.registry.with(Token::from_raw(context), f) {
            Ok(r) => Some(r),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("lan865x: callback for context {:#x} dropped: {}", context, _e);
                None
            }
        }
    }
}

impl<H, U, E, C, const N: usize> EngineHost for Host<'_, H, U, E, C, N>
where
    H: HardwareAdapter,
    U: UpperLayer,
    E: Engine + Clone,
    C: Clock,
{
    fn need_service(&self, context: usize) {
        self.resolve(context, |inst| inst.need_service = true);
    }

    fn error(&self, context: usize, error: EngineError) {
        self.resolve(context, |inst| {
            events::on_engine_error(&mut inst.stats, inst.config.diagnostics, error);
        });
    }

    fn rx_slice(&self, context: usize, offset: u16, data: &[u8]) {
        self.resolve(context, |inst| inst.rx.push_slice(offset, data));
    }

    fn rx_packet(&self, context: usize, success: bool, len: u16) {
        self.resolve(context, |inst| {
            let status = inst.rx.finish(success, len, &mut inst.upper);
            inst.stats.record_rx(status);
            inst.report(Diagnostic::RxPacket { len, status });
        });
    }

    fn regs_event(&self, context: usize, event: RegsEvent) {
        let engine = self.resolve(context, |inst| {
            let reinit = events::on_regs_event(&mut inst.stats, inst.config.diagnostics, event);
            reinit.then(|| inst.engine.clone())
        });
        if let Some(Some(engine)) = engine {
            engine.reinit();
        }
    }

    fn spi_transaction(&self, context: usize, tag: u8, tx: &[u8], rx: &mut [u8]) -> bool {
        let started = self.resolve(context, |inst| {
            let start = inst.spi.start(&mut inst.hw, tag, tx, rx);
            if start == SpiStart::Rejected {
                inst.report(Diagnostic::SpiRejected { tag });
            }
            (start, inst.engine.clone())
        });

        match started {
            Some((SpiStart::Completed(success), engine)) => {
                engine.spi_buffer_done(tag, success);
                true
            }
            Some((start, _)) => start.accepted(),
            None => false,
        }
    }

    fn raw_tx_done(&self, context: usize) {
        self.resolve(context, |inst| {
            if inst.tx.complete() {
                inst.stats.tx_done = inst.stats.tx_done.wrapping_add(1);
            }
        });
    }

    fn ticks_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}
