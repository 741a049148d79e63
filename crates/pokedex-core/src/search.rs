//! Debounced name search over the currently loaded page.
//!
//! Keystrokes update [`SearchState::raw_term`] immediately. The term only
//! becomes the filter ([`SearchState::debounced_term`]) once the input has
//! been quiet for the debounce interval. [`Debouncer`] owns the single pending
//! timer: each new keystroke aborts it and schedules a fresh one, and every
//! fired term is stamped with a sequence number so a late delivery from a
//! superseded timer is recognised and dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::model::CatalogEntry;

/// A search term whose quiet period has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebouncedTerm {
    pub seq: u64,
    pub term: String,
}

/// Cancellable scheduled delivery of search terms.
pub struct Debouncer {
    delay: Duration,
    tx: mpsc::UnboundedSender<DebouncedTerm>,
    pending: Option<JoinHandle<()>>,
    seq: u64,
}

impl Debouncer {
    /// Create a debouncer and the receiver its fired terms are delivered on.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<DebouncedTerm>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: None,
            seq: 0,
        };
        (debouncer, rx)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending delivery and schedule `term` after the quiet interval.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, term: String) -> u64 {
        self.cancel();
        self.seq += 1;
        let seq = self.seq;
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the controller was dropped.
            let _ = tx.send(DebouncedTerm { seq, term });
        }));
        seq
    }

    /// Abort the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Cancel and also reject any term that already fired but was not applied yet.
    pub fn invalidate(&mut self) {
        self.cancel();
        self.seq += 1;
    }

    /// Whether `fired` belongs to the most recent `schedule` call.
    pub fn is_current(&self, fired: &DebouncedTerm) -> bool {
        fired.seq == self.seq
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Raw and debounced search input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub raw_term: String,
    pub debounced_term: String,
}

impl SearchState {
    /// True while the input shows a term that has not taken effect yet.
    pub fn is_settling(&self) -> bool {
        self.raw_term != self.debounced_term
    }

    pub fn clear(&mut self) {
        self.raw_term.clear();
        self.debounced_term.clear();
    }
}

/// Case-insensitive substring match; an empty term matches everything.
pub fn name_matches(name: &str, term: &str) -> bool {
    term.is_empty() || name.to_lowercase().contains(&term.to_lowercase())
}

/// Entries of `entries` whose name contains `term`, in page order.
pub fn filter_entries<'a>(entries: &'a [CatalogEntry], term: &str) -> Vec<&'a CatalogEntry> {
    entries
        .iter()
        .filter(|e| name_matches(&e.name, term))
        .collect()
}
