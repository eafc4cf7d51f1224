//! Watcher error types.
//!
//! These describe misuse of the watcher itself. Query failures, timeouts and
//! cancellation are not errors here; they are terminal [`WatchOutcome`]s.
//!
//! [`WatchOutcome`]: crate::models::WatchOutcome

use log::error;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum WatcherError {
	/// The watch request failed validation
	InvalidRequest(String),
	/// The watch task ended without producing an outcome
	InternalError(String),
}

impl WatcherError {
	fn format_message(&self) -> String {
		match self {
			Self::InvalidRequest(msg) => format!("Invalid watch request: {}", msg),
			Self::InternalError(msg) => format!("Internal watcher error: {}", msg),
		}
	}

	pub fn invalid_request(msg: impl Into<String>) -> Self {
		let error = Self::InvalidRequest(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for WatcherError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for WatcherError {}

impl From<tokio::task::JoinError> for WatcherError {
	fn from(err: tokio::task::JoinError) -> Self {
		Self::internal_error(format!("Watch task did not complete: {}", err))
	}
}
