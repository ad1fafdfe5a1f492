//! Default implementations for configuration types.
//!
//! This module contains all `Default` implementations and helper functions
//! for providing default values in serde deserialization.

use crate::config::types::{HelperConfig, IpcConfig, ResolverConfig};

/// Returns the default cache time-to-live in milliseconds (350ms).
///
/// One resolved answer is reused for this long before the backend is asked
/// again, bounding IPC traffic under a fast polling caller.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_cache_ttl_ms() -> u64 {
    350
}

/// Returns the default per-strategy I/O timeout in milliseconds (200ms).
///
/// An unresponsive compositor socket or helper must not stall the caller's
/// polling loop, so every strategy bounds its I/O by this.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_strategy_timeout_ms() -> u64 {
    200
}

/// Returns the environment variable naming the compositor IPC socket.
pub fn default_ipc_socket_env() -> String {
    "SWAYSOCK".to_string()
}

/// Returns the layout-tree field flagging the focused node.
pub fn default_ipc_focused_field() -> String {
    "focused".to_string()
}

/// Returns the layout-tree field holding a node's process id.
pub fn default_ipc_pid_field() -> String {
    "pid".to_string()
}

/// Returns the default compositor helper binary.
pub fn default_helper_command() -> String {
    "hyprctl".to_string()
}

/// Returns the default compositor helper arguments.
pub fn default_helper_args() -> Vec<String> {
    vec!["activewindow".to_string(), "-j".to_string()]
}

/// Returns the field holding the process id in the helper's JSON output.
pub fn default_helper_pid_field() -> String {
    "pid".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: default_cache_ttl_ms(),
            strategy_timeout_ms: default_strategy_timeout_ms(),
        }
    }
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            socket_env: default_ipc_socket_env(),
            focused_field: default_ipc_focused_field(),
            pid_field: default_ipc_pid_field(),
        }
    }
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            command: default_helper_command(),
            args: default_helper_args(),
            pid_field: default_helper_pid_field(),
        }
    }
}
