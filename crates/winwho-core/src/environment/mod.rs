//! Windowing-backend detection from ambient session indicators.
//!
//! Classification is a pure read of a [`SessionIndicators`] snapshot, so it
//! is recomputed on every cache miss (cheap) and trivially testable with
//! fabricated snapshots.

use std::fmt;

use tracing::debug;

/// Snapshot of the session environment variables the detector reads.
///
/// Captured once per resolution attempt via [`SessionIndicators::from_env`];
/// tests construct these directly instead of mutating the process
/// environment.
#[derive(Debug, Clone, Default)]
pub struct SessionIndicators {
    /// Legacy display-protocol socket (`DISPLAY`).
    pub display: Option<String>,
    /// Wayland session marker (`WAYLAND_DISPLAY`).
    pub wayland_display: Option<String>,
    /// Desktop session identifier (`XDG_CURRENT_DESKTOP`). Log context
    /// only: it names the shell brand, not a queryable channel, and many
    /// compositors leave it unset or generic, so classification rests on
    /// the socket variables alone.
    pub desktop_session: Option<String>,
    /// Compositor IPC socket path (name is configurable, `SWAYSOCK` by default).
    pub ipc_socket: Option<String>,
    /// Compositor helper instance marker (`HYPRLAND_INSTANCE_SIGNATURE`).
    pub helper_instance: Option<String>,
}

impl SessionIndicators {
    /// Capture the current process environment.
    ///
    /// `ipc_socket_env` names the variable holding the compositor IPC
    /// socket path (from configuration).
    pub fn from_env(ipc_socket_env: &str) -> Self {
        Self {
            display: non_empty_var("DISPLAY"),
            wayland_display: non_empty_var("WAYLAND_DISPLAY"),
            desktop_session: non_empty_var("XDG_CURRENT_DESKTOP"),
            ipc_socket: non_empty_var(ipc_socket_env),
            helper_instance: non_empty_var("HYPRLAND_INSTANCE_SIGNATURE"),
        }
    }
}

/// Read an environment variable, treating empty values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// The windowing backend a session appears to be running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowingEnvironment {
    /// Legacy display protocol (X11), queryable via EWMH properties.
    DisplayProtocol,
    /// Compositor with an i3-compatible IPC socket (Sway).
    CompositorIpc,
    /// Compositor answerable only through its introspection helper (Hyprland).
    CompositorHelper,
    /// A Wayland session whose compositor we cannot classify.
    Unknown,
    /// No windowing session at all (headless, console).
    None,
}

impl WindowingEnvironment {
    /// Classify the given indicator snapshot. Always returns a value.
    ///
    /// The IPC socket outranks a simultaneously present legacy display
    /// connection: the IPC yields the focused PID directly, while the
    /// legacy path would only see compatibility-shim windows on such a
    /// session.
    pub fn detect_from(indicators: &SessionIndicators) -> Self {
        let env = if indicators.ipc_socket.is_some() {
            Self::CompositorIpc
        } else if indicators.helper_instance.is_some() {
            Self::CompositorHelper
        } else if indicators.display.is_some() {
            Self::DisplayProtocol
        } else if indicators.wayland_display.is_some() {
            Self::Unknown
        } else {
            Self::None
        };

        debug!(
            event = "core.environment.detected",
            environment = %env,
            desktop_session = ?indicators.desktop_session
        );

        env
    }
}

impl fmt::Display for WindowingEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DisplayProtocol => "display-protocol",
            Self::CompositorIpc => "compositor-ipc",
            Self::CompositorHelper => "compositor-helper",
            Self::Unknown => "unknown",
            Self::None => "none",
        };
        write!(f, "{}", name)
    }
}
