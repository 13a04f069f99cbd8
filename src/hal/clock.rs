//! Millisecond Clock
//!
//! The engine reads time through [`EngineHost::ticks_ms`](crate::engine::EngineHost::ticks_ms)
//! and the driver bounds its init wait with the same source.
//!
//! Values wrap at `u32::MAX` (about 49.7 days). Compare instants with
//! [`elapsed_ms`], never with `<`.

/// Monotonic millisecond counter
///
/// Implemented for any `Fn() -> u32`, so a closure over a HAL timer is enough:
///
/// ```ignore
/// let clock = || (timer.now().ticks() / 1_000) as u32;
/// ```
pub trait Clock {
    /// Milliseconds since an arbitrary epoch
    fn now_ms(&self) -> u32;
}

impl<F: Fn() -> u32> Clock for F {
    fn now_ms(&self) -> u32 {
        self()
    }
}

/// Milliseconds from `start` to `now`, tolerating one wraparound
#[inline]
#[must_use]
pub const fn elapsed_ms(start: u32, now: u32) -> u32 {
    now.wrapping_sub(start)
}
