//! Cooperative cancellation.
//!
//! A `CancellationToken` is a cheap, cloneable handle to a shared flag. The
//! host (a Ctrl-C handler, a UI key binding) calls `request()`; long-running
//! operations poll `is_requested()` between traversal steps and copy blocks.
//!
//! A request is only observed while at least one `CancelScope` obtained from
//! `enable()` is alive, so a stray request outside a cancellable section
//! never aborts work that was not started as cancellable.
//!
//! Notes:
//! - Relaxed atomics are sufficient for a one-way "stop" flag.
//! - `request()` is safe to call from signal handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct Inner {
    requested: AtomicBool,
    live_scopes: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a cooperative stop (idempotent).
    #[inline]
    pub fn request(&self) {
        self.inner.requested.store(true, Ordering::Relaxed);
    }

    /// True once a stop was requested and a cancellable section is running.
    #[inline]
    pub fn is_requested(&self) -> bool {
        self.is_live() && self.inner.requested.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.inner.live_scopes.load(Ordering::Relaxed) > 0
    }

    /// Clear a previous request so the token can drive a retried operation.
    pub fn reset(&self) {
        self.inner.requested.store(false, Ordering::Relaxed);
    }

    /// Mark the start of a cancellable section; the section ends when the
    /// returned guard is dropped. Sections nest.
    #[must_use = "cancellation is only live while the scope is held"]
    pub fn enable(&self) -> CancelScope<'_> {
        self.inner.live_scopes.fetch_add(1, Ordering::Relaxed);
        CancelScope { token: self }
    }
}

/// RAII guard returned by `CancellationToken::enable`.
#[derive(Debug)]
pub struct CancelScope<'a> {
    token: &'a CancellationToken,
}

impl Drop for CancelScope<'_> {
    fn drop(&mut self) {
        self.token.inner.live_scopes.fetch_sub(1, Ordering::Relaxed);
    }
}
