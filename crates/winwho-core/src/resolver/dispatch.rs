//! Strategy dispatch: one pass over the registered strategies.

use tracing::{debug, warn};

use crate::environment::WindowingEnvironment;
use crate::process::ProcessNameLookup;
use crate::resolver::types::ResolveOutcome;
use crate::strategies::{FocusStrategy, StrategyError};

/// Try each strategy applicable to `env` in registry order.
///
/// Per strategy: no answer moves on to the next; a genuine error also moves
/// on (IPC and tooling hiccups are common and must not block other paths)
/// but is remembered; a pid resolves through the process table and stops
/// the pass, even when the process turns out to have exited already.
///
/// The remembered error surfaces only when the pass ends with no usable
/// answer, meaning every strategy that actually engaged its backend failed
/// — the single route by which an error reaches the caller, keeping noise
/// low without swallowing real protocol breakage.
pub(crate) fn dispatch_once(
    strategies: &mut [Box<dyn FocusStrategy>],
    env: WindowingEnvironment,
    lookup: &dyn ProcessNameLookup,
) -> Result<ResolveOutcome, StrategyError> {
    let mut last_error: Option<StrategyError> = None;

    for strategy in strategies.iter_mut().filter(|s| s.supports(env)) {
        match strategy.try_resolve_pid() {
            Ok(Some(pid)) => {
                debug!(
                    event = "core.resolver.pid_found",
                    strategy = strategy.name(),
                    pid = pid.as_u32()
                );
                // Exactly one strategy's answer counts; never merge paths.
                return match lookup.names_for(pid) {
                    Some(names) => Ok(ResolveOutcome::Resolved(names)),
                    None => Ok(ResolveOutcome::NoAnswer),
                };
            }
            Ok(None) => {
                debug!(
                    event = "core.resolver.strategy_not_applicable",
                    strategy = strategy.name()
                );
            }
            Err(e) => {
                warn!(
                    event = "core.resolver.strategy_failed",
                    strategy = strategy.name(),
                    error = %e
                );
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(error) => Err(error),
        None => Ok(ResolveOutcome::NoAnswer),
    }
}
