//! Single-slot cancellation scopes.
//!
//! Each domain (search, detail) hands out one live [`CancelToken`] at a time.
//! Beginning a new operation cancels the previous token, and a completion is
//! only accepted while its generation is still the live one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
pub struct CancelToken {
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self {
            generation: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[derive(Debug)]
pub struct CancelDomain {
    name: &'static str,
    next_generation: u64,
    live: Option<CancelToken>,
}

impl CancelDomain {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            next_generation: 1,
            live: None,
        }
    }

    pub(crate) fn begin(&mut self) -> CancelToken {
        self.cancel();
        let token = CancelToken {
            generation: self.next_generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        self.next_generation += 1;
        self.live = Some(token.clone());
        tracing::trace!(domain = self.name, generation = token.generation, "token issued");
        token
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(token) = self.live.take() {
            token.cancel();
            tracing::trace!(domain = self.name, generation = token.generation, "token cancelled");
        }
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.live
            .as_ref()
            .is_some_and(|token| token.generation == generation)
    }

    /// Retires the live token if `generation` is current. Returns whether the
    /// completion may be applied.
    pub(crate) fn settle(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(domain = self.name, generation, "discarding stale completion");
            return false;
        }
        self.live = None;
        true
    }

    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> bool {
        self.live.is_some()
    }
}
