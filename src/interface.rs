//! Tickets for in-flight searches.
//!
//! A screen may start a new search before the previous one has answered.
//! Every search takes a [`Ticket`] from the screen's [`SearchInterface`];
//! taking a ticket cancels the one before it, and an outcome is only applied
//! if its ticket is still the current one. Cancellation is cooperative: a
//! running search checks its token between collaborator calls.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Cancellation token shared between the interface and a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);
impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Opaque search identifier, increasing in start order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryId(u64);

impl QueryId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Handle to one started search.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: QueryId,
    cancel: CancelToken,
    started: Instant,
}
impl Ticket {
    pub fn is_superseded(&self) -> bool {
        self.cancel.is_cancelled()
    }
    /// Elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Issues tickets for a single screen; the newest ticket wins.
#[derive(Debug, Default)]
pub struct SearchInterface {
    next_id: AtomicU64,
    active: Mutex<Option<Ticket>>,
}

impl SearchInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search, cancelling whichever one is still pending.
    pub fn begin(&self) -> Ticket {
        let id = QueryId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let ticket = Ticket { id, cancel: CancelToken::new(), started: Instant::now() };
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = active.replace(ticket.clone()) {
            previous.cancel.cancel();
        }
        ticket
    }

    /// Close `ticket`. Returns false when a newer search has taken over, in
    /// which case the outcome must be discarded.
    pub fn finish(&self, ticket: &Ticket) -> bool {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match active.as_ref() {
            Some(current) if current.id == ticket.id && !ticket.is_superseded() => {
                *active = None;
                true
            }
            _ => false,
        }
    }

    /// Cancel the pending search, if any.
    pub fn cancel(&self) -> bool {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match active.take() {
            Some(ticket) => {
                ticket.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}
