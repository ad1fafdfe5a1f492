//! Per-backend focus resolution strategies.
//!
//! Each windowing backend speaks a different private protocol, so each gets
//! one [`FocusStrategy`] implementation. Adding a backend means implementing
//! the trait and registering it in [`default_strategies`]; the dispatcher
//! never changes.

pub mod errors;
mod helper;
mod sway;
#[cfg(target_os = "linux")]
mod x11;

pub use errors::StrategyError;
pub use helper::HelperStrategy;
pub use sway::SwayIpcStrategy;
#[cfg(target_os = "linux")]
pub use x11::X11Strategy;

use crate::config::WinwhoConfig;
use crate::environment::WindowingEnvironment;
use crate::process::Pid;

/// One backend-specific way of finding the focused window's owning pid.
///
/// `Ok(None)` is the explicit "this path has no answer" outcome: backend
/// absent, nothing focused, connection gone. It is never a failure. `Err`
/// is reserved for a reachable backend returning unusable data.
pub trait FocusStrategy: Send {
    /// Short backend name, used in log events and error messages.
    fn name(&self) -> &'static str;

    /// Whether this strategy applies to the detected environment.
    fn supports(&self, env: WindowingEnvironment) -> bool;

    /// Attempt to obtain the focused window's owning pid.
    ///
    /// Takes `&mut self` so strategies can keep a lazily opened connection
    /// across calls; the resolver serializes access.
    fn try_resolve_pid(&mut self) -> Result<Option<Pid>, StrategyError>;
}

/// The built-in strategies in fixed priority order.
///
/// Compositor IPC first (it yields the pid directly), the legacy display
/// protocol second, the introspection helper last. The order is
/// deterministic across calls, so a given environment snapshot always
/// resolves through the same path.
pub fn default_strategies(config: &WinwhoConfig) -> Vec<Box<dyn FocusStrategy>> {
    let mut strategies: Vec<Box<dyn FocusStrategy>> = Vec::new();
    strategies.push(Box::new(SwayIpcStrategy::new(config)));
    #[cfg(target_os = "linux")]
    strategies.push(Box::new(X11Strategy::new(config)));
    strategies.push(Box::new(HelperStrategy::new(config)));
    strategies
}
