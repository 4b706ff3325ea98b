//! Observable state shared by the controllers.
//!
//! A [`StateCell`] owns one state value behind a `watch` channel so views can
//! subscribe to every snapshot. Requests are bracketed by [`StateCell::begin`]
//! and [`StateCell::settle`]: `begin` flips the loading flag and hands out a
//! [`Ticket`] carrying the generation current at issue time, and `settle` only
//! applies a response whose ticket still matches. Superseding requests and
//! [`StateCell::close`] bump the generation, which is how stale responses get
//! dropped. All generation reads and writes happen inside the channel's write
//! lock, so test-and-set on the loading flag is atomic.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;

/// State that carries a loading flag.
pub trait Loadable {
    fn loading_mut(&mut self) -> &mut bool;
}

pub struct StateCell<T> {
    tx: watch::Sender<T>,
    generation: AtomicU64,
    closed: AtomicBool,
}

/// Proof that a request was started. Dropping it unsettled (the request
/// future was cancelled) clears the loading flag it set.
#[must_use]
pub struct Ticket<'a, T: Loadable> {
    cell: &'a StateCell<T>,
    generation: u64,
    settled: bool,
}

impl<T: Loadable> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn borrow(&self) -> watch::Ref<'_, T> {
        self.tx.borrow()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Starts a request. `start` may refuse by returning `false`, in which case
    /// nothing changes and no subscriber is notified. A `supersede` request
    /// invalidates every ticket handed out before it.
    pub fn begin(
        &self,
        supersede: bool,
        start: impl FnOnce(&mut T) -> bool,
    ) -> Option<Ticket<'_, T>> {
        let mut issued = None;
        self.tx.send_if_modified(|state| {
            if self.closed.load(Ordering::Acquire) || !start(state) {
                return false;
            }
            let generation = if supersede {
                self.generation.fetch_add(1, Ordering::AcqRel) + 1
            } else {
                self.generation.load(Ordering::Acquire)
            };
            *state.loading_mut() = true;
            issued = Some(generation);
            true
        });
        issued.map(|generation| Ticket {
            cell: self,
            generation,
            settled: false,
        })
    }

    /// Applies a response and clears the loading flag. Returns `false` and
    /// leaves state untouched when the ticket has been superseded.
    pub fn settle(&self, mut ticket: Ticket<'_, T>, apply: impl FnOnce(&mut T)) -> bool {
        ticket.settled = true;
        self.tx.send_if_modified(|state| {
            if self.generation.load(Ordering::Acquire) != ticket.generation {
                return false;
            }
            apply(state);
            *state.loading_mut() = false;
            true
        })
    }

    /// Whether `ticket` would still be applied by `settle`.
    pub fn is_current(&self, ticket: &Ticket<'_, T>) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.generation
    }

    /// Replaces state outright and invalidates in-flight requests.
    pub fn reset(&self, apply: impl FnOnce(&mut T)) {
        self.tx.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::AcqRel);
            apply(state);
            *state.loading_mut() = false;
        });
    }

    /// Tears the cell down: pending responses are discarded and later
    /// `begin` calls are refused.
    pub fn close(&self) {
        self.tx.send_if_modified(|_| {
            self.closed.store(true, Ordering::Release);
            self.generation.fetch_add(1, Ordering::AcqRel);
            false
        });
    }
}

impl<T: Loadable> Drop for Ticket<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let generation = self.generation;
        let cell = self.cell;
        cell.tx.send_if_modified(|state| {
            if cell.generation.load(Ordering::Acquire) != generation || !*state.loading_mut() {
                return false;
            }
            *state.loading_mut() = false;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Counter {
        value: u32,
        loading: bool,
    }

    impl Loadable for Counter {
        fn loading_mut(&mut self) -> &mut bool {
            &mut self.loading
        }
    }

    #[test]
    fn begin_sets_loading_and_settle_clears_it() {
        let cell = StateCell::new(Counter::default());
        let ticket = cell.begin(false, |_| true).unwrap();
        assert!(cell.borrow().loading);
        assert!(cell.settle(ticket, |c| c.value = 7));
        assert_eq!(
            *cell.borrow(),
            Counter {
                value: 7,
                loading: false,
            }
        );
    }

    #[test]
    fn refused_begin_does_not_notify() {
        let cell = StateCell::new(Counter::default());
        let mut rx = cell.subscribe();
        rx.borrow_and_update();
        assert!(cell.begin(false, |_| false).is_none());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn superseded_ticket_is_discarded() {
        let cell = StateCell::new(Counter::default());
        let old = cell.begin(true, |_| true).unwrap();
        let new = cell.begin(true, |_| true).unwrap();
        assert!(!cell.settle(old, |c| c.value = 1));
        assert!(cell.borrow().loading);
        assert!(cell.settle(new, |c| c.value = 2));
        assert_eq!(cell.borrow().value, 2);
    }

    #[test]
    fn is_current_tracks_supersession() {
        let cell = StateCell::new(Counter::default());
        let old = cell.begin(true, |_| true).unwrap();
        assert!(cell.is_current(&old));
        let new = cell.begin(true, |_| true).unwrap();
        assert!(!cell.is_current(&old));
        assert!(cell.is_current(&new));
    }

    #[test]
    fn dropped_ticket_releases_loading() {
        let cell = StateCell::new(Counter::default());
        drop(cell.begin(false, |_| true).unwrap());
        assert!(!cell.borrow().loading);
    }

    #[test]
    fn dropped_stale_ticket_leaves_newer_request_loading() {
        let cell = StateCell::new(Counter::default());
        let old = cell.begin(true, |_| true).unwrap();
        let _new = cell.begin(true, |_| true).unwrap();
        drop(old);
        assert!(cell.borrow().loading);
    }

    #[test]
    fn closed_cell_refuses_and_discards() {
        let cell = StateCell::new(Counter::default());
        let pending = cell.begin(true, |_| true).unwrap();
        cell.close();
        assert!(cell.is_closed());
        assert!(!cell.settle(pending, |c| c.value = 9));
        assert_eq!(cell.borrow().value, 0);
        assert!(cell.begin(true, |_| true).is_none());
    }

    #[test]
    fn reset_invalidates_pending_ticket() {
        let cell = StateCell::new(Counter::default());
        let pending = cell.begin(false, |_| true).unwrap();
        cell.reset(|c| c.value = 0);
        assert!(!cell.borrow().loading);
        assert!(!cell.settle(pending, |c| c.value = 5));
        assert_eq!(cell.borrow().value, 0);
    }
}
