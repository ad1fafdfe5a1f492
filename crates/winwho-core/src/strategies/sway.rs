//! Compositor IPC strategy for Sway and i3-compatible compositors.
//!
//! Speaks the i3 IPC protocol over the unix socket named by the configured
//! environment variable (`SWAYSOCK` by default): a framed GET_TREE request,
//! then a depth-first search of the JSON layout tree for the node carrying
//! the focused flag, whose pid field is the answer.
//!
//! The socket is opened lazily, reused across calls, and dropped on any
//! framing trouble so the next call starts from a clean connection.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::WinwhoConfig;
use crate::environment::WindowingEnvironment;
use crate::process::Pid;
use crate::strategies::{FocusStrategy, StrategyError};

/// Magic bytes opening every i3 IPC frame.
const IPC_MAGIC: &[u8; 6] = b"i3-ipc";

/// i3 IPC message type for GET_TREE.
const IPC_GET_TREE: u32 = 4;

/// Frame header: magic + payload length (u32 le) + message type (u32 le).
const IPC_HEADER_LEN: usize = 14;

/// Upper bound on an acceptable reply payload. A layout tree is tens of
/// kilobytes at most; anything claiming more means we lost framing.
const MAX_PAYLOAD_LEN: u32 = 4 * 1024 * 1024;

pub struct SwayIpcStrategy {
    socket_env: String,
    focused_field: String,
    pid_field: String,
    timeout: Duration,
    stream: Option<UnixStream>,
}

impl SwayIpcStrategy {
    pub fn new(config: &WinwhoConfig) -> Self {
        Self {
            socket_env: config.ipc.socket_env.clone(),
            focused_field: config.ipc.focused_field.clone(),
            pid_field: config.ipc.pid_field.clone(),
            timeout: Duration::from_millis(config.resolver.strategy_timeout_ms),
            stream: None,
        }
    }

    /// Open the IPC socket if we don't already hold a connection.
    ///
    /// Returns `Ok(None)` when the socket is absent or refuses the
    /// connection; both mean "no compositor to ask", not failure.
    fn ensure_stream(&mut self) -> Result<Option<&mut UnixStream>, StrategyError> {
        if self.stream.is_none() {
            let Some(path) = std::env::var_os(&self.socket_env).filter(|p| !p.is_empty()) else {
                return Ok(None);
            };

            let stream = match UnixStream::connect(&path) {
                Ok(stream) => stream,
                Err(e) => {
                    debug!(
                        event = "core.strategy.sway.connect_unavailable",
                        socket = %path.display(),
                        error = %e
                    );
                    return Ok(None);
                }
            };

            stream
                .set_read_timeout(Some(self.timeout))
                .map_err(|e| self.protocol_error(format!("set read timeout: {}", e)))?;
            stream
                .set_write_timeout(Some(self.timeout))
                .map_err(|e| self.protocol_error(format!("set write timeout: {}", e)))?;

            debug!(
                event = "core.strategy.sway.connected",
                socket = %path.display()
            );
            self.stream = Some(stream);
        }

        Ok(self.stream.as_mut())
    }

    fn protocol_error(&self, message: String) -> StrategyError {
        StrategyError::Protocol {
            backend: "sway-ipc",
            message,
        }
    }

    /// Run one GET_TREE round trip on an open stream.
    ///
    /// `Ok(None)` means the compositor went away before answering (the
    /// caller drops the stream and the next call reconnects).
    fn query_tree(
        stream: &mut UnixStream,
        timeout: Duration,
    ) -> Result<Option<serde_json::Value>, QueryFailure> {
        // One deadline bounds the whole round trip; a peer trickling
        // bytes cannot extend it read by read.
        let deadline = Instant::now() + timeout;

        let mut request = Vec::with_capacity(IPC_HEADER_LEN);
        request.extend_from_slice(IPC_MAGIC);
        request.extend_from_slice(&0u32.to_le_bytes());
        request.extend_from_slice(&IPC_GET_TREE.to_le_bytes());

        if stream.write_all(&request).and_then(|_| stream.flush()).is_err() {
            // Write failure on a previously good socket: compositor gone.
            return Ok(None);
        }

        let mut header = [0u8; IPC_HEADER_LEN];
        match read_until_deadline(stream, &mut header, deadline) {
            Ok(()) => {}
            Err(ReadFailure::Silent) => return Ok(None),
            Err(ReadFailure::Truncated(got)) => {
                return Err(QueryFailure::desync(format!(
                    "reply header truncated after {} bytes",
                    got
                )));
            }
            Err(ReadFailure::Io(e)) => {
                return Err(QueryFailure::desync(format!("reading reply header: {}", e)));
            }
        }

        if &header[..6] != IPC_MAGIC {
            return Err(QueryFailure::desync("reply header magic mismatch".to_string()));
        }

        let payload_len = u32::from_le_bytes(header[6..10].try_into().unwrap());
        let reply_type = u32::from_le_bytes(header[10..14].try_into().unwrap());

        if reply_type != IPC_GET_TREE {
            return Err(QueryFailure::desync(format!(
                "unexpected reply type {}",
                reply_type
            )));
        }
        if payload_len > MAX_PAYLOAD_LEN {
            return Err(QueryFailure::desync(format!(
                "implausible payload length {}",
                payload_len
            )));
        }

        let mut payload = vec![0u8; payload_len as usize];
        match read_until_deadline(stream, &mut payload, deadline) {
            Ok(()) => {}
            // Header arrived but the payload didn't: desynchronized.
            Err(ReadFailure::Silent) | Err(ReadFailure::Truncated(_)) => {
                return Err(QueryFailure::desync("reply payload truncated".to_string()));
            }
            Err(ReadFailure::Io(e)) => {
                return Err(QueryFailure::desync(format!("reading reply payload: {}", e)));
            }
        }

        let tree = serde_json::from_slice(&payload)
            .map_err(|e| QueryFailure::desync(format!("invalid JSON tree: {}", e)))?;

        Ok(Some(tree))
    }

    /// Depth-first search for the node whose focused flag is set.
    fn find_focused<'a>(&self, node: &'a serde_json::Value) -> Option<&'a serde_json::Value> {
        let obj = node.as_object()?;

        if obj
            .get(&self.focused_field)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            return Some(node);
        }

        // Child containers live in arrays ("nodes", "floating_nodes");
        // walking every array keeps us schema-agnostic.
        for value in obj.values() {
            if let Some(children) = value.as_array() {
                for child in children {
                    if let Some(found) = self.find_focused(child) {
                        return Some(found);
                    }
                }
            }
        }

        None
    }
}

impl FocusStrategy for SwayIpcStrategy {
    fn name(&self) -> &'static str {
        "sway-ipc"
    }

    fn supports(&self, env: WindowingEnvironment) -> bool {
        matches!(
            env,
            WindowingEnvironment::CompositorIpc | WindowingEnvironment::Unknown
        )
    }

    fn try_resolve_pid(&mut self) -> Result<Option<Pid>, StrategyError> {
        let timeout = self.timeout;
        let Some(stream) = self.ensure_stream()? else {
            return Ok(None);
        };

        let tree = match Self::query_tree(stream, timeout) {
            Ok(Some(tree)) => tree,
            Ok(None) => {
                debug!(event = "core.strategy.sway.connection_lost");
                self.stream = None;
                return Ok(None);
            }
            Err(QueryFailure { message }) => {
                self.stream = None;
                warn!(
                    event = "core.strategy.sway.protocol_error",
                    message = %message
                );
                return Err(self.protocol_error(message));
            }
        };

        let Some(focused) = self.find_focused(&tree) else {
            debug!(event = "core.strategy.sway.no_focused_node");
            return Ok(None);
        };

        // A workspace can hold focus with no window in it; such nodes carry
        // no pid and that is a normal "nothing focused" answer.
        let pid = focused
            .get(&self.pid_field)
            .and_then(|v| v.as_i64())
            .and_then(Pid::from_external);

        if let Some(pid) = pid {
            debug!(event = "core.strategy.sway.resolved", pid = pid.as_u32());
        }

        Ok(pid)
    }
}

/// A GET_TREE round trip that engaged the socket but came back unusable.
struct QueryFailure {
    message: String,
}

impl QueryFailure {
    fn desync(message: String) -> Self {
        Self { message }
    }
}

enum ReadFailure {
    /// Deadline passed with nothing read at all.
    Silent,
    /// Some bytes arrived, then the stream dried up or closed.
    Truncated(usize),
    /// Hard I/O error mid-read.
    Io(std::io::Error),
}

/// Fill `buf` from the stream, giving up at `deadline`.
///
/// The socket read timeout is shrunk to the remaining budget before every
/// read, so no single read can outlive the deadline and a trickling peer
/// cannot restart the clock. Distinguishes "no response at all" from
/// "partial response" because the two mean different things to the caller:
/// the former is a normal absent answer, the latter is protocol breakage.
fn read_until_deadline(
    stream: &mut UnixStream,
    buf: &mut [u8],
    deadline: Instant,
) -> Result<(), ReadFailure> {
    fn out_of_time(filled: usize) -> ReadFailure {
        if filled == 0 {
            ReadFailure::Silent
        } else {
            ReadFailure::Truncated(filled)
        }
    }

    let mut filled = 0;

    while filled < buf.len() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(out_of_time(filled));
        }
        stream
            .set_read_timeout(Some(remaining))
            .map_err(ReadFailure::Io)?;

        match stream.read(&mut buf[filled..]) {
            Ok(0) => return Err(out_of_time(filled)),
            Ok(n) => filled += n,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                return Err(out_of_time(filled));
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReadFailure::Io(e)),
        }
    }

    Ok(())
}
