//! Configuration loading logic.
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.winwho/config.toml`
//!
//! A missing config file is not an error; a present but unreadable or
//! malformed one is, so a typo never silently degrades to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::types::WinwhoConfig;
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Load configuration from the user config file, falling back to defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed, or if
/// the resulting configuration fails validation.
pub fn load() -> Result<WinwhoConfig, ConfigError> {
    let config = match user_config_path() {
        Some(path) => load_config_file(&path)?,
        None => WinwhoConfig::default(),
    };

    validate_config(&config)?;
    Ok(config)
}

/// Path of the user configuration file, if a home directory exists.
fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".winwho").join("config.toml"))
}

/// Load a configuration file from the given path.
///
/// A nonexistent file yields defaults.
pub fn load_config_file(path: &Path) -> Result<WinwhoConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(
                event = "core.config.file_not_found",
                path = %path.display()
            );
            return Ok(WinwhoConfig::default());
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    let config: WinwhoConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: format!("'{}': {}", path.display(), e),
        })?;

    debug!(
        event = "core.config.loaded",
        path = %path.display()
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_file(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.resolver.cache_ttl_ms, 350);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[resolver]\ncache_ttl_ms = 500").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.resolver.cache_ttl_ms, 500);
        // Unspecified values keep defaults
        assert_eq!(config.resolver.strategy_timeout_ms, 200);
    }

    #[test]
    fn test_load_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[resolver\ncache_ttl_ms = ???").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { .. })
        ));
    }
}
