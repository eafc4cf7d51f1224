//! Status query error types and handling.
//!
//! Any of these ends a watch with a `Failed` outcome; the watcher itself never
//! retries a failed query.

use log::error;

/// Represents possible errors while querying the transfer status service
#[derive(Debug, Clone, PartialEq)]
pub enum StatusQueryError {
	/// The endpoint could not be reached or the connection dropped
	ConnectionError(String),

	/// The endpoint answered with a non-success HTTP status
	RequestError(String),

	/// The response body was not the expected JSON shape
	ParseError(String),

	/// The GraphQL service reported errors for the query
	GraphQlError(String),
}

impl StatusQueryError {
	/// Formats the error message based on the error type
	fn format_message(&self) -> String {
		match self {
			Self::ConnectionError(msg) => format!("Connection error: {}", msg),
			Self::RequestError(msg) => format!("Request error: {}", msg),
			Self::ParseError(msg) => format!("Parse error: {}", msg),
			Self::GraphQlError(msg) => format!("GraphQL error: {}", msg),
		}
	}

	/// Creates a new connection error with logging
	pub fn connection_error(msg: impl Into<String>) -> Self {
		let error = Self::ConnectionError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new request error with logging
	pub fn request_error(msg: impl Into<String>) -> Self {
		let error = Self::RequestError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new parse error with logging
	pub fn parse_error(msg: impl Into<String>) -> Self {
		let error = Self::ParseError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new GraphQL error with logging
	pub fn graphql_error(msg: impl Into<String>) -> Self {
		let error = Self::GraphQlError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl std::fmt::Display for StatusQueryError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for StatusQueryError {}

impl From<reqwest_middleware::Error> for StatusQueryError {
	fn from(err: reqwest_middleware::Error) -> Self {
		Self::connection_error(err.to_string())
	}
}
