//! Legacy display-protocol strategy (X11 / EWMH).
//!
//! Reads `_NET_ACTIVE_WINDOW` from the root window for the focused window
//! id, then `_NET_WM_PID` from that window for its owning process. Covers
//! native X11 sessions and XWayland clients on compositors that keep the
//! shim's active-window property current.
//!
//! The protocol library blocks on replies with no timeout of its own, so
//! connection and queries run on a dedicated worker thread and the strategy
//! waits on its reply channel with a deadline. A server that stops replying
//! costs one abandoned worker (it exits on its own once the channel closes),
//! never a stalled caller.
//!
//! Every failure mode here is a normal transient state (no server, nothing
//! focused, window gone, pid property unset, deadline passed), so this
//! strategy never produces an error.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::debug;
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt};
use x11rb::rust_connection::RustConnection;

use crate::config::WinwhoConfig;
use crate::environment::WindowingEnvironment;
use crate::process::Pid;
use crate::strategies::{FocusStrategy, StrategyError};

struct X11Handle {
    conn: RustConnection,
    root: u32,
    net_active_window: Atom,
    net_wm_pid: Atom,
}

/// The display connection died; reconnect on the next query.
struct ConnectionLost;

impl X11Handle {
    /// Connect and intern the two EWMH atoms we query.
    fn open() -> Option<Self> {
        let (conn, screen_num) = match x11rb::connect(None) {
            Ok(ok) => ok,
            Err(e) => {
                debug!(
                    event = "core.strategy.x11.connect_unavailable",
                    error = %e
                );
                return None;
            }
        };
        let root = conn.setup().roots[screen_num].root;

        let net_active_window = intern_atom(&conn, "_NET_ACTIVE_WINDOW")?;
        let net_wm_pid = intern_atom(&conn, "_NET_WM_PID")?;

        debug!(event = "core.strategy.x11.connected");
        Some(Self {
            conn,
            root,
            net_active_window,
            net_wm_pid,
        })
    }

    fn active_window_pid(&self) -> Result<Option<Pid>, ConnectionLost> {
        // Root window property names the currently active window, if any.
        let Some(window) = read_cardinal32(
            &self.conn,
            self.root,
            self.net_active_window,
            AtomEnum::WINDOW,
        )?
        else {
            return Ok(None);
        };
        if window == 0 {
            return Ok(None);
        }

        let pid = read_cardinal32(&self.conn, window, self.net_wm_pid, AtomEnum::CARDINAL)?;
        Ok(pid.and_then(|pid| Pid::from_external(i64::from(pid))))
    }
}

/// Channel pair owned by the strategy; the worker thread holds the other
/// ends together with the (lazily opened) display connection.
struct X11Worker {
    requests: mpsc::Sender<()>,
    replies: mpsc::Receiver<Option<Pid>>,
}

fn spawn_worker() -> X11Worker {
    let (requests, request_rx) = mpsc::channel::<()>();
    let (reply_tx, replies) = mpsc::channel::<Option<Pid>>();

    thread::spawn(move || {
        let mut handle: Option<X11Handle> = None;
        while request_rx.recv().is_ok() {
            if handle.is_none() {
                handle = X11Handle::open();
            }
            let pid = match handle.as_ref() {
                Some(h) => match h.active_window_pid() {
                    Ok(pid) => pid,
                    Err(ConnectionLost) => {
                        debug!(event = "core.strategy.x11.connection_lost");
                        handle = None;
                        None
                    }
                },
                None => None,
            };
            if reply_tx.send(pid).is_err() {
                break;
            }
        }
    });

    X11Worker { requests, replies }
}

pub struct X11Strategy {
    timeout: Duration,
    worker: Option<X11Worker>,
}

impl X11Strategy {
    pub fn new(config: &WinwhoConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.resolver.strategy_timeout_ms),
            worker: None,
        }
    }
}

impl FocusStrategy for X11Strategy {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn supports(&self, env: WindowingEnvironment) -> bool {
        // Applicable as the XWayland fallback under an IPC compositor, but
        // not under a helper-managed one: there the shim root only reflects
        // shim windows and the helper is authoritative.
        matches!(
            env,
            WindowingEnvironment::DisplayProtocol
                | WindowingEnvironment::CompositorIpc
                | WindowingEnvironment::Unknown
        )
    }

    fn try_resolve_pid(&mut self) -> Result<Option<Pid>, StrategyError> {
        // Don't engage on sessions without a display socket.
        if std::env::var_os("DISPLAY").filter(|d| !d.is_empty()).is_none() {
            return Ok(None);
        }

        if self.worker.is_none() {
            self.worker = Some(spawn_worker());
        }

        let received = match self.worker.as_ref() {
            Some(worker) if worker.requests.send(()).is_ok() => {
                worker.replies.recv_timeout(self.timeout)
            }
            _ => Err(mpsc::RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Some(pid)) => {
                debug!(event = "core.strategy.x11.resolved", pid = pid.as_u32());
                Ok(Some(pid))
            }
            Ok(None) => Ok(None),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                debug!(event = "core.strategy.x11.deadline_exceeded");
                // Abandon the stalled worker; the next call starts fresh
                // with a new connection.
                self.worker = None;
                Ok(None)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                self.worker = None;
                Ok(None)
            }
        }
    }
}

fn intern_atom(conn: &RustConnection, name: &str) -> Option<Atom> {
    conn.intern_atom(false, name.as_bytes())
        .ok()?
        .reply()
        .ok()
        .map(|r| r.atom)
}

/// Read the first 32-bit value of a window property.
///
/// `Ok(None)` covers the normal absences: property unset, or the window
/// itself already gone (an X11-level error reply). Only a dead connection
/// is reported upward.
fn read_cardinal32(
    conn: &RustConnection,
    window: u32,
    property: Atom,
    type_: AtomEnum,
) -> Result<Option<u32>, ConnectionLost> {
    let cookie = conn
        .get_property(false, window, property, type_, 0, 1)
        .map_err(|_| ConnectionLost)?;

    match cookie.reply() {
        Ok(reply) => Ok(reply.value32().and_then(|mut iter| iter.next())),
        Err(ReplyError::X11Error(_)) => Ok(None),
        Err(ReplyError::ConnectionError(_)) => Err(ConnectionLost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_no_display_is_not_applicable() {
        // CI runners and headless hosts have no DISPLAY; the strategy must
        // degrade silently rather than error.
        if std::env::var_os("DISPLAY").is_some() {
            return;
        }
        let mut strategy = X11Strategy::new(&WinwhoConfig::default());
        assert!(strategy.try_resolve_pid().unwrap().is_none());
    }

    #[test]
    fn test_supports_excludes_helper_sessions() {
        let strategy = X11Strategy::new(&WinwhoConfig::default());
        assert!(strategy.supports(WindowingEnvironment::DisplayProtocol));
        assert!(strategy.supports(WindowingEnvironment::CompositorIpc));
        assert!(strategy.supports(WindowingEnvironment::Unknown));
        assert!(!strategy.supports(WindowingEnvironment::CompositorHelper));
        assert!(!strategy.supports(WindowingEnvironment::None));
    }

    #[test]
    fn test_unresponsive_server_is_bounded_and_abandoned() {
        // A worker that accepts the request but never replies stands in
        // for a display server that stops responding mid-session.
        let (requests, _request_rx) = mpsc::channel();
        let (_reply_tx, replies) = mpsc::channel();
        let mut strategy = X11Strategy::new(&WinwhoConfig::default());
        strategy.timeout = Duration::from_millis(50);
        strategy.worker = Some(X11Worker { requests, replies });

        let had_display = std::env::var_os("DISPLAY").is_some();
        if !had_display {
            unsafe { std::env::set_var("DISPLAY", ":0") };
        }

        let started = Instant::now();
        let result = strategy.try_resolve_pid();

        if !had_display {
            unsafe { std::env::remove_var("DISPLAY") };
        }

        assert!(result.unwrap().is_none());
        assert!(started.elapsed() < Duration::from_millis(500));
        // The stalled worker is dropped so the next call reconnects
        assert!(strategy.worker.is_none());
    }

    #[test]
    fn test_dead_worker_is_not_applicable() {
        // Both worker-side channel ends already gone
        let (requests, _) = mpsc::channel();
        let (_, replies) = mpsc::channel();
        let mut strategy = X11Strategy::new(&WinwhoConfig::default());
        strategy.worker = Some(X11Worker { requests, replies });

        let had_display = std::env::var_os("DISPLAY").is_some();
        if !had_display {
            unsafe { std::env::set_var("DISPLAY", ":0") };
        }

        let result = strategy.try_resolve_pid();

        if !had_display {
            unsafe { std::env::remove_var("DISPLAY") };
        }

        assert!(result.unwrap().is_none());
        assert!(strategy.worker.is_none());
    }
}
