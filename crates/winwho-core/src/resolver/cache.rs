//! Short-lived memoization of resolution outcomes.
//!
//! Bounds backend traffic under a fast polling caller: one answer is reused
//! for the ttl window. Errors are never stored, so a transient IPC failure
//! self-heals on the next call.

use std::time::{Duration, Instant};

use crate::resolver::types::ResolveOutcome;

pub struct ResultCache {
    entry: Option<CacheEntry>,
    ttl: Duration,
}

struct CacheEntry {
    outcome: ResolveOutcome,
    stored_at: Instant,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// Return the cached outcome if it is still within its ttl.
    pub fn lookup(&self, now: Instant) -> Option<ResolveOutcome> {
        let entry = self.entry.as_ref()?;
        if now.duration_since(entry.stored_at) < self.ttl {
            Some(entry.outcome.clone())
        } else {
            None
        }
    }

    /// Record an outcome. Only success and no-answer outcomes reach this
    /// point; the resolver returns errors uncached.
    pub fn store(&mut self, outcome: ResolveOutcome, now: Instant) {
        self.entry = Some(CacheEntry {
            outcome,
            stored_at: now,
        });
    }
}
