//! The resolver: cache in front of strategy dispatch, behind one lock.
//!
//! One exposed operation answers "which process owns the focused window"
//! with a possibly-empty name list; an error comes back only for genuine
//! protocol or tooling breakage on an otherwise reachable backend.

mod cache;
mod dispatch;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use types::ResolveOutcome;

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::WinwhoConfig;
use crate::environment::{SessionIndicators, WindowingEnvironment};
use crate::process::{ProcessNameLookup, SysinfoNameLookup};
use crate::strategies::{FocusStrategy, StrategyError, default_strategies};
use cache::ResultCache;
use dispatch::dispatch_once;

/// Cached, strategy-dispatching focused-window resolver.
///
/// Built for a synchronous polling caller: each call either serves the
/// cached answer or runs one bounded resolution pass. All mutable state
/// (cache, lazily opened backend connections) lives behind one mutex held
/// for the duration of a resolution attempt, so concurrent callers cannot
/// corrupt it — and a caller that blocked on the lock re-checks the cache
/// first, collapsing simultaneous misses into a single computation.
///
/// Backend connections are released when the resolver is dropped.
pub struct Resolver {
    config: WinwhoConfig,
    inner: std::sync::Mutex<ResolverInner>,
}

struct ResolverInner {
    cache: ResultCache,
    strategies: Vec<Box<dyn FocusStrategy>>,
    lookup: Box<dyn ProcessNameLookup>,
}

impl Resolver {
    /// Resolver with the built-in strategies and the real process table.
    pub fn new(config: WinwhoConfig) -> Self {
        let strategies = default_strategies(&config);
        Self::with_parts(config, strategies, Box::new(SysinfoNameLookup))
    }

    /// Resolver over explicit strategies and process table.
    ///
    /// The seam used by tests; `new` is this with the defaults plugged in.
    pub fn with_parts(
        config: WinwhoConfig,
        strategies: Vec<Box<dyn FocusStrategy>>,
        lookup: Box<dyn ProcessNameLookup>,
    ) -> Self {
        let ttl = Duration::from_millis(config.resolver.cache_ttl_ms);
        Self {
            config,
            inner: std::sync::Mutex::new(ResolverInner {
                cache: ResultCache::new(ttl),
                strategies,
                lookup,
            }),
        }
    }

    /// Classify the current session's windowing backend.
    pub fn detect_environment(&self) -> WindowingEnvironment {
        let indicators = SessionIndicators::from_env(&self.config.ipc.socket_env);
        WindowingEnvironment::detect_from(&indicators)
    }

    /// Short process name(s) of the focused window's owner.
    ///
    /// `Ok` with an empty list means "no determinable answer" — headless
    /// session, unsupported compositor, nothing focused, or the owning
    /// process exited mid-lookup. Callers must not log that case as a
    /// failure. `Err` is reserved for a reachable backend that returned
    /// corrupt or unusable data.
    pub fn current_window_process_names(&self) -> Result<Vec<String>, StrategyError> {
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;

        let now = Instant::now();
        if let Some(outcome) = inner.cache.lookup(now) {
            debug!(event = "core.resolver.cache_hit");
            return Ok(outcome.into_names());
        }

        let env = self.detect_environment();
        match dispatch_once(&mut inner.strategies, env, inner.lookup.as_ref()) {
            Ok(outcome) => {
                debug!(
                    event = "core.resolver.resolved",
                    environment = %env,
                    outcome = ?outcome
                );
                inner.cache.store(outcome.clone(), now);
                Ok(outcome.into_names())
            }
            Err(e) => {
                // Never cached: the next call re-attempts cleanly.
                warn!(
                    event = "core.resolver.failed",
                    environment = %env,
                    error = %e
                );
                Err(e)
            }
        }
    }
}
