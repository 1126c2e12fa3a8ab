//! Configuration file loading for flowgrid
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FLOWGRID_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./flowgrid.toml` or `./.flowgrid.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/flowgrid/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileGenerationConfig, FileLoggingConfig,
    FileProviderConfig, FileServerConfig, FileValidatorConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
