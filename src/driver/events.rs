//! Event and Error Dispatch
//!
//! The engine reports two kinds of conditions. Register-layer events
//! ([`RegsEvent`]) may require the register layer to be reinitialized;
//! protocol errors ([`EngineError`]) are informational. Both are counted and
//! reported as diagnostics; neither reaches the caller as an error.

use crate::diag::{Diagnostic, DiagnosticFn, Stats, emit};
use crate::engine::{EngineError, RegsEvent};

/// Record a register-layer event
///
/// Returns whether the register layer must be reinitialized. The caller
/// issues the reinit once it no longer holds the instance.
pub(crate) fn on_regs_event(stats: &mut Stats, sink: Option<DiagnosticFn>, event: RegsEvent) -> bool {
    let reinit = event.needs_reinit();
    if reinit {
        stats.reinit_requests = stats.reinit_requests.wrapping_add(1);
    }
    emit(sink, &Diagnostic::RegsEvent { event, reinit });
    reinit
}

/// Record a protocol error
pub(crate) fn on_engine_error(stats: &mut Stats, sink: Option<DiagnosticFn>, error: EngineError) {
    stats.engine_errors = stats.engine_errors.wrapping_add(1);
    emit(sink, &Diagnostic::EngineError(error));
}
