use crate::errors::WinwhoError;

/// Genuine strategy failures: a backend that was reachable but answered
/// with something unusable.
///
/// "Backend absent" and "nothing focused" are not errors; strategies report
/// those as `Ok(None)` and the dispatcher moves on silently.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("Compositor IPC protocol error ({backend}): {message}")]
    Protocol {
        backend: &'static str,
        message: String,
    },

    #[error("External tool '{command}' failed: {message}")]
    ExternalTool { command: String, message: String },
}

impl WinwhoError for StrategyError {
    fn error_code(&self) -> &'static str {
        match self {
            StrategyError::Protocol { .. } => "STRATEGY_PROTOCOL_ERROR",
            StrategyError::ExternalTool { .. } => "STRATEGY_EXTERNAL_TOOL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let error = StrategyError::Protocol {
            backend: "sway-ipc",
            message: "reply header magic mismatch".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Compositor IPC protocol error (sway-ipc): reply header magic mismatch"
        );
        assert_eq!(error.error_code(), "STRATEGY_PROTOCOL_ERROR");
    }

    #[test]
    fn test_external_tool_error_display() {
        let error = StrategyError::ExternalTool {
            command: "hyprctl".to_string(),
            message: "exit status 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "External tool 'hyprctl' failed: exit status 1"
        );
        assert_eq!(error.error_code(), "STRATEGY_EXTERNAL_TOOL_ERROR");
    }
}
