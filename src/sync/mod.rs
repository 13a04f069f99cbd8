//! Synchronization support
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability, used for the
//!   slots of the [`Registry`](crate::registry::Registry) so that a registry
//!   can be declared as a `static` and reached from foreign callbacks.

mod primitives;

pub use primitives::CriticalSectionCell;
