//! Ticket-queue mutual exclusion.
//!
//! A FIFO lock for the single-threaded cooperative scheduling model: each
//! waiter takes a numbered ticket and is served strictly in enqueue order.
//! The lock is not reentrant; a holder must not acquire again before
//! releasing.

use std::collections::VecDeque;
use tracing::warn;

/// A claim ticket for one turn on an object's lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw ticket number, for diagnostics.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// FIFO ticket queue guarding one object's image state.
#[derive(Debug, Default)]
pub struct TicketQueue {
    queue: VecDeque<u64>,
    next: u64,
}

impl TicketQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a ticket and joins the queue. The caller holds the lock once
    /// its ticket reaches the head.
    pub fn acquire(&mut self) -> Ticket {
        let ticket = self.next;
        self.next += 1;
        self.queue.push_back(ticket);
        Ticket(ticket)
    }

    /// Whether `ticket` is currently at the head of the queue.
    #[must_use]
    pub fn is_head(&self, ticket: Ticket) -> bool {
        self.queue.front() == Some(&ticket.0)
    }

    /// Releases the lock. Succeeds only for the head ticket; releasing any
    /// other ticket is a protocol violation and leaves the queue untouched.
    pub fn release(&mut self, ticket: Ticket) -> bool {
        if self.is_head(ticket) {
            self.queue.pop_front();
            true
        } else {
            warn!(ticket = ticket.0, "release of a non-head ticket ignored");
            false
        }
    }

    /// Number of tickets waiting, including the holder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no ticket is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_served_in_order() {
        let mut queue = TicketQueue::new();
        let a = queue.acquire();
        let b = queue.acquire();
        let c = queue.acquire();

        assert!(queue.is_head(a));
        assert!(!queue.is_head(b));

        assert!(queue.release(a));
        assert!(queue.is_head(b));
        assert!(queue.release(b));
        assert!(queue.is_head(c));
        assert!(queue.release(c));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_release_non_head_fails_without_corruption() {
        let mut queue = TicketQueue::new();
        let a = queue.acquire();
        let b = queue.acquire();

        assert!(!queue.release(b));
        assert_eq!(queue.len(), 2);
        assert!(queue.is_head(a));
    }

    #[test]
    fn test_release_stale_ticket_fails() {
        let mut queue = TicketQueue::new();
        let a = queue.acquire();
        assert!(queue.release(a));
        assert!(!queue.release(a));
    }

    proptest::proptest! {
        #[test]
        fn prop_only_head_releases(waiters in 1usize..24) {
            let mut queue = TicketQueue::new();
            let tickets: Vec<Ticket> = (0..waiters).map(|_| queue.acquire()).collect();

            // No later ticket can jump the queue.
            for &t in &tickets[1..] {
                proptest::prop_assert!(!queue.release(t));
            }
            // Releasing in acquisition order drains the queue.
            for &t in &tickets {
                proptest::prop_assert!(queue.is_head(t));
                proptest::prop_assert!(queue.release(t));
            }
            proptest::prop_assert!(queue.is_empty());
        }
    }
}
