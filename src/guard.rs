//! Last-requested-wins bookkeeping for panel fetches
//!
//! A panel calls [`RequestGuard::begin`] before each fetch and applies the
//! response only if its [`Ticket`] is still current. Nothing is cancelled;
//! stale responses are simply dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation counter shared by every fetch of one panel
#[derive(Debug, Default)]
pub struct RequestGuard {
    generation: AtomicU64,
}

/// Proof of which request a response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, invalidating every earlier ticket
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Invalidate any in-flight request without starting a new one
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let guard = RequestGuard::new();
        let first = guard.begin();
        assert!(guard.is_current(first));

        let second = guard.begin();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[test]
    fn test_reset_invalidates() {
        let guard = RequestGuard::new();
        let ticket = guard.begin();
        guard.reset();
        assert!(!guard.is_current(ticket));
    }
}
