//! Configuration file loading for llm-switchboard
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `SWITCHBOARD_API_URL`, `SWITCHBOARD_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./switchboard.toml` or `./.switchboard.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/llm-switchboard/config.toml`
//! 5. Fallback: `~/.config/llm-switchboard/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileConfig, FileDispatchConfig, FileLoggingConfig,
    FileOutputConfig, FileReplConfig, FileRetryConfig,
};
pub use loader::{API_URL_ENV, ConfigLoader, ENV_PREFIX};
