//! Configuration type definitions for winwho.
//!
//! Compositor IPC and helper-tool schemas are backend-version-dependent
//! (field names and argument lists have shifted between compositor
//! releases), so they live in configuration rather than in protocol
//! constants. The defaults match current Sway and Hyprland behavior.
//!
//! # Example Configuration
//!
//! ```toml
//! [resolver]
//! cache_ttl_ms = 350
//! strategy_timeout_ms = 200
//!
//! [ipc]
//! socket_env = "SWAYSOCK"
//! focused_field = "focused"
//! pid_field = "pid"
//!
//! [helper]
//! command = "hyprctl"
//! args = ["activewindow", "-j"]
//! pid_field = "pid"
//! ```

use serde::{Deserialize, Serialize};

/// Main configuration loaded from `~/.winwho/config.toml`.
///
/// Missing file means defaults; a present but malformed file is an error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WinwhoConfig {
    /// Cache and timeout knobs
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Compositor IPC (Sway / i3-compatible) schema
    #[serde(default)]
    pub ipc: IpcConfig,

    /// Compositor helper tool (hyprctl-style) schema
    #[serde(default)]
    pub helper: HelperConfig,
}

/// Resolution cache and per-strategy I/O bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// How long a resolved answer stays valid, in milliseconds.
    /// Default: 350ms, matching the polling cooldown of the consumers
    /// this resolver was built for.
    #[serde(default = "super::defaults::default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Upper bound on each strategy's I/O (socket read, helper run),
    /// in milliseconds. Default: 200ms.
    #[serde(default = "super::defaults::default_strategy_timeout_ms")]
    pub strategy_timeout_ms: u64,
}

/// Schema of the compositor IPC exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcConfig {
    /// Environment variable holding the IPC socket path.
    #[serde(default = "super::defaults::default_ipc_socket_env")]
    pub socket_env: String,

    /// Boolean field marking the focused node in the layout tree.
    #[serde(default = "super::defaults::default_ipc_focused_field")]
    pub focused_field: String,

    /// Integer field holding the owning process id.
    #[serde(default = "super::defaults::default_ipc_pid_field")]
    pub pid_field: String,
}

/// Schema of the compositor helper invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperConfig {
    /// Helper binary looked up on PATH.
    #[serde(default = "super::defaults::default_helper_command")]
    pub command: String,

    /// Arguments asking the helper for the focused window as JSON.
    #[serde(default = "super::defaults::default_helper_args")]
    pub args: Vec<String>,

    /// Integer field holding the owning process id in the helper's output.
    #[serde(default = "super::defaults::default_helper_pid_field")]
    pub pid_field: String,
}
