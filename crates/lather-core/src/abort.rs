//! Abort signals that bound the lifetime of event listeners.
//!
//! [`AbortController`] owns the switch; [`AbortSignal`] is the cloneable view
//! handed to [`Document::add_event_listener`](crate::dom::Document::add_event_listener).
//! Aborting the controller revokes every listener registered under any of its
//! signals, which is how a container whose content is replaced on each render
//! avoids piling up duplicate handlers.
//!
//! The document is single-threaded, so the flag is a shared `Cell` rather
//! than an atomic.
//!
//! # Example
//!
//! ```
//! use lather_core::abort::AbortController;
//!
//! let controller = AbortController::new();
//! let signal = controller.signal();
//! assert!(!signal.is_aborted());
//!
//! controller.abort();
//! assert!(signal.is_aborted());
//! ```

#![forbid(unsafe_code)]

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A cloneable, read-only view of an abort flag.
#[derive(Clone)]
pub struct AbortSignal {
    inner: Rc<AbortInner>,
}

/// The control handle that triggers abortion.
///
/// Dropping the controller does **not** abort its signals; call
/// [`abort`](Self::abort) explicitly.
pub struct AbortController {
    inner: Rc<AbortInner>,
}

struct AbortInner {
    aborted: Cell<bool>,
}

impl AbortController {
    /// Create a controller whose signals start un-aborted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(AbortInner {
                aborted: Cell::new(false),
            }),
        }
    }

    /// Obtain a signal that observes this controller.
    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Abort. Every signal derived from this controller observes it at once.
    /// Aborting twice is harmless.
    pub fn abort(&self) {
        self.inner.aborted.set(true);
    }

    /// Whether [`abort`](Self::abort) has been called.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.get()
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AbortController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortController")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

impl AbortSignal {
    /// Returns `true` once the owning controller has aborted.
    #[inline]
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.get()
    }

    /// Whether two signals observe the same controller.
    #[must_use]
    pub fn same_controller(&self, other: &AbortSignal) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}
