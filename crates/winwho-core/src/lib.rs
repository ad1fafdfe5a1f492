//! winwho-core: resolve the process behind the focused window.
//!
//! This library answers one question for a desktop session: which OS process
//! owns the window that currently has input focus? The answer feeds
//! follow-the-focus consumers (per-application volume control and the like)
//! that only need a short process name, not a window handle.
//!
//! There is no universal API for this, so the resolver detects the windowing
//! backend from session indicators and bridges through a backend-specific
//! channel (EWMH property reads, compositor IPC over a unix socket, or a
//! compositor introspection helper) to a PID, then maps the PID to its short
//! command name via the process table.
//!
//! # Main Entry Points
//!
//! - [`Resolver`] - cached, strategy-dispatching resolution
//! - [`environment`] - windowing-backend detection
//! - [`config`] - configuration management
//! - [`strategies`] - per-backend resolution strategies

pub mod config;
pub mod environment;
pub mod errors;
pub mod logging;
pub mod process;
pub mod resolver;
pub mod strategies;

// Re-export commonly used types at crate root for convenience
pub use config::WinwhoConfig;
pub use environment::{SessionIndicators, WindowingEnvironment};
pub use process::{Pid, ProcessNameLookup, SysinfoNameLookup};
pub use resolver::{ResolveOutcome, Resolver};
pub use strategies::{FocusStrategy, StrategyError};

// Re-export logging initialization
pub use logging::init_logging;
