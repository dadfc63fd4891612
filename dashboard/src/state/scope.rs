use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Guards a view against results that arrive after it moved on.
///
/// Each fetch started for the view takes a [`Ticket`]. Starting another fetch
/// or disposing the view makes older tickets stale, and a stale ticket refuses
/// to apply its result. The request itself is left to finish.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    generation: Arc<AtomicU64>,
    disposed: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, invalidating every earlier ticket.
    pub fn begin(&self) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            generation,
            scope: self.clone(),
        }
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    scope: ViewScope,
}

impl Ticket {
    pub fn is_live(&self) -> bool {
        !self.scope.is_disposed() && self.scope.generation.load(Ordering::Acquire) == self.generation
    }

    /// Hand `value` to `apply` only if the ticket is still live.
    pub fn apply<V, R, F>(&self, value: V, apply: F) -> Option<R>
    where
        F: FnOnce(V) -> R,
    {
        if self.is_live() {
            Some(apply(value))
        } else {
            log::debug!("Discarding result for stale view (generation {})", self.generation);
            None
        }
    }
}
