//! Deferred values used as lifecycle signals
//!
//! A [`Deferred`] is settled exactly once, either resolved or abandoned.
//! Consumers hold a read-only [`Promise`] and attach callbacks that run when
//! the deferred settles (or immediately, if it already has).

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use super::types::Outcome;

type Callback = Box<dyn FnOnce(Outcome) + Send>;

#[derive(Default)]
struct Inner {
    settled: Option<Outcome>,
    callbacks: Vec<Callback>,
}

/// Writable side of a one-shot signal
#[derive(Clone, Default)]
pub struct Deferred {
    inner: Arc<Mutex<Inner>>,
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("settled", &self.outcome())
            .finish()
    }
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settle as resolved. Returns false if already settled.
    pub fn resolve(&self) -> bool {
        self.settle(Outcome::Resolved)
    }

    /// Settle as abandoned. Returns false if already settled.
    pub fn reject(&self) -> bool {
        self.settle(Outcome::Abandoned)
    }

    /// Settle with the given outcome and run pending callbacks.
    pub fn settle(&self, outcome: Outcome) -> bool {
        let callbacks = {
            let mut inner = self.inner.lock();
            if inner.settled.is_some() {
                return false;
            }
            inner.settled = Some(outcome);
            std::mem::take(&mut inner.callbacks)
        };
        // Run outside the lock so callbacks may inspect this deferred.
        for callback in callbacks {
            callback(outcome);
        }
        true
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.inner.lock().settled
    }

    pub fn is_pending(&self) -> bool {
        self.outcome().is_none()
    }

    /// Read-only handle for consumers
    pub fn promise(&self) -> Promise {
        Promise {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Read-only side of a [`Deferred`]
#[derive(Clone)]
pub struct Promise {
    inner: Arc<Mutex<Inner>>,
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("settled", &self.outcome())
            .finish()
    }
}

impl Promise {
    pub fn outcome(&self) -> Option<Outcome> {
        self.inner.lock().settled
    }

    pub fn is_pending(&self) -> bool {
        self.outcome().is_none()
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome() == Some(Outcome::Resolved)
    }

    pub fn is_abandoned(&self) -> bool {
        self.outcome() == Some(Outcome::Abandoned)
    }

    /// Run `callback` once settled, whichever way.
    pub fn always<F>(&self, callback: F)
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        let settled = {
            let mut inner = self.inner.lock();
            match inner.settled {
                Some(outcome) => outcome,
                None => {
                    inner.callbacks.push(Box::new(callback));
                    return;
                }
            }
        };
        callback(settled);
    }

    /// Run `callback` only if the deferred resolves.
    pub fn then<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.always(move |outcome| {
            if outcome == Outcome::Resolved {
                callback();
            }
        });
    }

    /// Run `callback` only if the deferred is abandoned.
    pub fn fail<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.always(move |outcome| {
            if outcome == Outcome::Abandoned {
                callback();
            }
        });
    }
}
