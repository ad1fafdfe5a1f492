//! # Configuration System
//!
//! TOML configuration for the resolver. Backend wire details (socket
//! variable, JSON field names, helper command line) are deliberately
//! configuration rather than constants: compositor releases have moved
//! these before, and a config edit beats a rebuild.
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use winwho_core::config::WinwhoConfig;
//!
//! fn example() -> Result<(), winwho_core::errors::ConfigError> {
//!     let config = WinwhoConfig::load()?;
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use types::{HelperConfig, IpcConfig, ResolverConfig, WinwhoConfig};
pub use validation::validate_config;

impl WinwhoConfig {
    /// Load configuration from `~/.winwho/config.toml`, falling back to
    /// defaults when no file exists.
    ///
    /// See [`loading::load`] for details.
    pub fn load() -> Result<Self, crate::errors::ConfigError> {
        loading::load()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
