//! Configuration validation logic.

use crate::config::types::WinwhoConfig;
use crate::errors::ConfigError;

/// Validate a loaded configuration.
///
/// Catches values that would make the resolver misbehave quietly: a zero
/// ttl defeats the cache, a zero timeout makes every strategy give up
/// immediately, and an empty helper command or schema field can never match.
pub fn validate_config(config: &WinwhoConfig) -> Result<(), ConfigError> {
    if config.resolver.cache_ttl_ms == 0 {
        return Err(invalid("resolver.cache_ttl_ms must be greater than zero"));
    }

    if config.resolver.strategy_timeout_ms == 0 {
        return Err(invalid(
            "resolver.strategy_timeout_ms must be greater than zero",
        ));
    }

    if config.ipc.socket_env.is_empty() {
        return Err(invalid("ipc.socket_env must not be empty"));
    }

    if config.ipc.focused_field.is_empty() || config.ipc.pid_field.is_empty() {
        return Err(invalid("ipc field names must not be empty"));
    }

    if config.helper.command.is_empty() {
        return Err(invalid("helper.command must not be empty"));
    }

    if config.helper.pid_field.is_empty() {
        return Err(invalid("helper.pid_field must not be empty"));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::InvalidConfiguration {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&WinwhoConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = WinwhoConfig::default();
        config.resolver.cache_ttl_ms = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = WinwhoConfig::default();
        config.resolver.strategy_timeout_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_helper_command_rejected() {
        let mut config = WinwhoConfig::default();
        config.helper.command = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_schema_field_rejected() {
        let mut config = WinwhoConfig::default();
        config.ipc.focused_field = String::new();
        assert!(validate_config(&config).is_err());
    }
}
