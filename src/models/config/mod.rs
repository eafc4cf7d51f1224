//! Configuration loading and validation.
//!
//! The watcher reads a single JSON file describing the status endpoint, the
//! polling cadence and the terminal trace types. Every field has a default so
//! a missing file is not an error unless one was requested explicitly.

use std::path::Path;

mod error;
mod watch_config;

pub use error::ConfigError;
pub use watch_config::{EndpointConfig, HttpRetrySettings, WatchConfig};

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	fn validate(&self) -> Result<(), String>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
