//! Configuration error types.
//!
//! Errors raised while reading, parsing or validating the watcher
//! configuration, or while applying command line overrides on top of it.
//! File-level errors carry the path they concern. Each constructor logs the
//! error before returning it.

use log::error;
use std::{
	error::Error,
	fmt,
	path::{Path, PathBuf},
};

/// Errors that can occur while building a [`WatchConfig`]
///
/// [`WatchConfig`]: crate::models::WatchConfig
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
	/// The merged configuration failed validation
	ValidationError(String),

	/// The file is not valid JSON or does not match the watcher schema
	ParseError { path: PathBuf, message: String },

	/// The file could not be found or read
	FileError { path: PathBuf, message: String },

	/// A command line flag carried a value the watcher cannot use
	OverrideError { flag: &'static str, message: String },
}

impl ConfigError {
	fn format_message(&self) -> String {
		match self {
			Self::ValidationError(msg) => format!("Invalid watcher configuration: {}", msg),
			Self::ParseError { path, message } => {
				format!("Malformed watcher configuration {}: {}", path.display(), message)
			}
			Self::FileError { path, message } => {
				format!("Cannot read watcher configuration {}: {}", path.display(), message)
			}
			Self::OverrideError { flag, message } => {
				format!("Invalid value for --{}: {}", flag, message)
			}
		}
	}

	/// Create a new validation error and log it
	pub fn validation_error(msg: impl Into<String>) -> Self {
		let error = Self::ValidationError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Create a new parse error for `path` and log it
	pub fn parse_error(path: &Path, msg: impl fmt::Display) -> Self {
		let error = Self::ParseError {
			path: path.to_path_buf(),
			message: msg.to_string(),
		};
		error!("{}", error.format_message());
		error
	}

	/// Create a new file error for `path` and log it
	pub fn file_error(path: &Path, msg: impl fmt::Display) -> Self {
		let error = Self::FileError {
			path: path.to_path_buf(),
			message: msg.to_string(),
		};
		error!("{}", error.format_message());
		error
	}

	/// Create a new error for the command line flag `flag` and log it
	pub fn override_error(flag: &'static str, msg: impl Into<String>) -> Self {
		let error = Self::OverrideError {
			flag,
			message: msg.into(),
		};
		error!("{}", error.format_message());
		error
	}

	/// Path of the configuration file involved, if the error concerns one
	pub fn path(&self) -> Option<&Path> {
		match self {
			Self::ParseError { path, .. } | Self::FileError { path, .. } => Some(path),
			Self::ValidationError(_) | Self::OverrideError { .. } => None,
		}
	}
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for ConfigError {}
