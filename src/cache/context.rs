//! Call Context Module
//!
//! Carries cancellation and deadline information alongside each cache call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// == Context ==
/// Cancellation/deadline envelope passed to every cache operation.
///
/// Clones share cancellation state. Children derived with [`Context::child`],
/// [`Context::with_timeout`] or [`Context::with_deadline`] observe their
/// parent's cancellation, but cancelling a child never reaches the parent.
///
/// The in-memory cache accepts a done context and still completes the call;
/// remote backings are expected to honor it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<Arc<Inner>>,
}

impl Inner {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }

    fn deadline(&self) -> Option<Instant> {
        let inherited = self.parent.as_ref().and_then(|p| p.deadline());
        match (self.deadline, inherited) {
            (Some(own), Some(parent)) => Some(own.min(parent)),
            (own, parent) => own.or(parent),
        }
    }
}

impl Context {
    // == Constructors ==
    /// Root context: never cancelled, no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derives a child that can be cancelled on its own.
    pub fn child(&self) -> Self {
        self.derive(None)
    }

    /// Derives a child that is done at `deadline` (or earlier if the parent is).
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        self.derive(Some(deadline))
    }

    /// Derives a child that is done `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.child(),
        }
    }

    fn derive(&self, deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline,
                parent: Some(Arc::clone(&self.inner)),
            }),
        }
    }

    // == Cancellation ==
    /// Cancels this context and every context derived from it.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    /// Returns true once this context or any ancestor was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Returns the effective deadline, the earliest along the ancestor chain.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline()
    }

    /// Returns true if cancelled or past the deadline.
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.deadline().is_some_and(|d| Instant::now() >= d)
    }
}
