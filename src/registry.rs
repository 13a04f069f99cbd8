//! Handle Registry
//!
//! The protocol engine only ever hands an opaque, address-sized context value
//! back to its callbacks. [`Registry`] turns that value into a [`Token`]: a
//! slot index plus a generation counter, resolved against a fixed-size arena
//! of instances. No raw addresses cross the engine boundary, and a token of a
//! released instance fails to resolve instead of aliasing whatever occupies
//! the slot next.
//!
//! The arena is `const`-constructible and its slots are
//! [`CriticalSectionCell`]s, so a registry may be placed in a `static` when
//! foreign callbacks need to reach it.
//!
//! # Example
//!
//! ```ignore
//! static REGISTRY: Registry<MyInstance, 2> = Registry::new();
//!
//! let token = REGISTRY.register(instance).ok().unwrap();
//! let raw = token.into_raw(); // hand to the engine as callback context
//!
//! // inside a callback
//! REGISTRY.with(Token::from_raw(raw), |inst| inst.on_event(..))?;
//! ```

use crate::error::{IoError, IoResult};
use crate::sync::CriticalSectionCell;

// =============================================================================
// Token
// =============================================================================

/// Generation-checked handle to a registered instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Token {
    index: u16,
    generation: u16,
}

impl Token {
    /// Pack into an address-sized value suitable as foreign callback context
    #[inline]
    pub const fn into_raw(self) -> usize {
        ((self.generation as usize) << 16) | self.index as usize
    }

    /// Unpack a value produced by [`into_raw`](Self::into_raw)
    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self {
            index: (raw & 0xFFFF) as u16,
            generation: ((raw >> 16) & 0xFFFF) as u16,
        }
    }

    /// Slot index inside the registry
    #[inline]
    pub const fn index(&self) -> usize {
        self.index as usize
    }

    /// Generation of the slot at registration time
    #[inline]
    pub const fn generation(&self) -> u16 {
        self.generation
    }
}

// =============================================================================
// Registry
// =============================================================================

struct Slot<T> {
    /// Generation of the current (or next) occupant; never 0
    generation: u16,
    value: Option<T>,
}

impl<T> Slot<T> {
    const fn vacant() -> Self {
        Self {
            generation: 1,
            value: None,
        }
    }

    /// Move a pending value into this slot if it is vacant
    fn occupy(&mut self, index: usize, state: &mut Result<Token, T>) {
        if self.value.is_some() {
            return;
        }
        let token = Token {
            index: index as u16,
            generation: self.generation,
        };
        match core::mem::replace(state, Ok(token)) {
            Err(value) => self.value = Some(value),
            Ok(issued) => *state = Ok(issued),
        }
    }

    fn matches(&self, token: Token) -> bool {
        self.value.is_some() && self.generation == token.generation
    }
}

/// Fixed-capacity arena of instances addressed by [`Token`]
pub struct Registry<T, const N: usize> {
    slots: [CriticalSectionCell<Slot<T>>; N],
}

impl<T, const N: usize> Registry<T, N> {
    /// Create an empty registry (const, suitable for static initialization)
    pub const fn new() -> Self {
        Self {
            slots: [const { CriticalSectionCell::new(Slot::vacant()) }; N],
        }
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Store `value` in a free slot and return its token
    ///
    /// Hands `value` back when every slot is occupied.
    pub fn register(&self, value: T) -> Result<Token, T> {
        let mut state = Err(value);
        for (index, cell) in self.slots.iter().enumerate() {
            cell.try_with(|slot| slot.occupy(index, &mut state));
            if state.is_ok() {
                break;
            }
        }
        state
    }

    /// Run `f` with exclusive access to the instance behind `token`
    ///
    /// `f` runs inside a critical section. On single-core targets interrupts
    /// stay masked until it returns, including any SPI exchange or frame
    /// delivery it performs.
    ///
    /// # Errors
    /// - `StaleHandle` - the token was never issued or its instance was released
    /// - `Reentrant` - the instance is already borrowed further up the call stack
    pub fn with<R, F>(&self, token: Token, f: F) -> IoResult<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let cell = self.slots.get(token.index()).ok_or(IoError::StaleHandle)?;
        match cell.try_with(|slot| {
            if !slot.matches(token) {
                return Err(IoError::StaleHandle);
            }
            match slot.value.as_mut() {
                Some(value) => Ok(f(value)),
                None => Err(IoError::StaleHandle),
            }
        }) {
            Some(result) => result,
            None => Err(IoError::Reentrant),
        }
    }

    /// Check whether `token` resolves to a live instance
    pub fn contains(&self, token: Token) -> bool {
        self.slots
            .get(token.index())
            .and_then(|cell| cell.try_with(|slot| slot.matches(token)))
            .unwrap_or(false)
    }

    /// Remove the instance behind `token` and return it
    ///
    /// The slot's generation advances, so `token` and every copy of it stop
    /// resolving.
    pub fn unregister(&self, token: Token) -> IoResult<T> {
        let cell = self.slots.get(token.index()).ok_or(IoError::StaleHandle)?;
        cell.try_with(|slot| {
            if !slot.matches(token) {
                return Err(IoError::StaleHandle);
            }
            slot.generation = match slot.generation.wrapping_add(1) {
                0 => 1,
                next => next,
            };
            slot.value.take().ok_or(IoError::StaleHandle)
        })
        .unwrap_or(Err(IoError::Reentrant))
    }

    /// Number of registered instances
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|cell| cell.try_with(|slot| slot.value.is_some()).unwrap_or(true))
            .count()
    }

    /// Check whether no instance is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const N: usize> Default for Registry<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
