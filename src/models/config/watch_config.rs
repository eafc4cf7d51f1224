use serde::{Deserialize, Deserializer, Serialize};
use std::{path::Path, time::Duration};
use url::Url;

use crate::{
	models::{ConfigLoader, TraceType},
	services::status::StatusQuery,
	utils::{
		constants::{
			DEFAULT_CONFIG_PATH, DEFAULT_DEADLINE_MS, DEFAULT_GRAPHQL_URL, DEFAULT_INTERVAL_MS,
			DEFAULT_REQUEST_TIMEOUT_MS,
		},
		HttpRetryConfig,
	},
};

use super::error::ConfigError;

/// Status endpoint to poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
	/// GraphQL endpoint URL
	pub url: String,
	/// Which collection to query traces from
	#[serde(default)]
	pub query: StatusQuery,
}

impl Default for EndpointConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_GRAPHQL_URL.to_string(),
			query: StatusQuery::default(),
		}
	}
}

/// Transient-error retries applied by the HTTP layer to a single status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpRetrySettings {
	pub max_retries: u32,
	pub initial_backoff_ms: u64,
	pub max_backoff_ms: u64,
}

/// Watcher configuration as read from `config/watcher.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
	#[serde(default)]
	pub endpoint: EndpointConfig,
	#[serde(default = "default_interval_ms")]
	pub interval_ms: u64,
	#[serde(default = "default_deadline_ms")]
	pub deadline_ms: u64,
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
	#[serde(
		default = "default_terminal_traces",
		deserialize_with = "deserialize_terminal_traces"
	)]
	pub terminal_traces: Vec<TraceType>,
	/// Absent means a failed query ends the watch without any retry
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub http_retry: Option<HttpRetrySettings>,
}

fn default_interval_ms() -> u64 {
	DEFAULT_INTERVAL_MS
}

fn default_deadline_ms() -> u64 {
	DEFAULT_DEADLINE_MS
}

fn default_request_timeout_ms() -> u64 {
	DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_terminal_traces() -> Vec<TraceType> {
	vec![TraceType::PacketRecv]
}

/// Tags in the file are written by hand, so `packet_recv` means `PACKET_RECV`
fn deserialize_terminal_traces<'de, D>(deserializer: D) -> Result<Vec<TraceType>, D::Error>
where
	D: Deserializer<'de>,
{
	Vec::<String>::deserialize(deserializer)?
		.iter()
		.map(|tag| tag.parse::<TraceType>().map_err(serde::de::Error::custom))
		.collect()
}

impl Default for WatchConfig {
	fn default() -> Self {
		Self {
			endpoint: EndpointConfig::default(),
			interval_ms: default_interval_ms(),
			deadline_ms: default_deadline_ms(),
			request_timeout_ms: default_request_timeout_ms(),
			terminal_traces: default_terminal_traces(),
			http_retry: None,
		}
	}
}

impl WatchConfig {
	/// Loads the configuration, falling back to defaults when no file exists
	///
	/// An explicitly requested path must exist. Without one, the default path is
	/// used if present and the built-in defaults otherwise.
	pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
		match path {
			Some(path) => Self::load_from_path(path),
			None => {
				let default_path = Path::new(DEFAULT_CONFIG_PATH);
				if default_path.exists() {
					Self::load_from_path(default_path)
				} else {
					Ok(Self::default())
				}
			}
		}
	}

	pub fn interval(&self) -> Duration {
		Duration::from_millis(self.interval_ms)
	}

	pub fn deadline(&self) -> Duration {
		Duration::from_millis(self.deadline_ms)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}

	/// HTTP retry policy for status queries; zero retries unless configured
	pub fn retry_config(&self) -> HttpRetryConfig {
		match &self.http_retry {
			Some(settings) => HttpRetryConfig {
				max_retries: settings.max_retries,
				initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
				max_backoff: Duration::from_millis(settings.max_backoff_ms),
				..HttpRetryConfig::default()
			},
			None => HttpRetryConfig::disabled(),
		}
	}
}

impl ConfigLoader for WatchConfig {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(path, "not a JSON file"));
		}
		if !path.exists() {
			return Err(ConfigError::file_error(path, "not found"));
		}

		let file = std::fs::File::open(path).map_err(|e| ConfigError::file_error(path, e))?;
		let config: WatchConfig =
			serde_json::from_reader(file).map_err(|e| ConfigError::parse_error(path, e))?;

		// Validate the config after loading
		if let Err(validation_error) = config.validate() {
			return Err(ConfigError::validation_error(validation_error));
		}

		Ok(config)
	}

	fn validate(&self) -> Result<(), String> {
		let url = Url::parse(&self.endpoint.url)
			.map_err(|e| format!("Invalid endpoint URL '{}': {}", self.endpoint.url, e))?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(format!(
				"Endpoint URL must use http or https, got '{}'",
				url.scheme()
			));
		}

		if self.interval_ms == 0 {
			return Err("interval_ms must be positive".to_string());
		}
		if self.deadline_ms == 0 {
			return Err("deadline_ms must be positive".to_string());
		}
		// No tick would ever run before the deadline otherwise
		if self.interval_ms >= self.deadline_ms {
			return Err(format!(
				"interval_ms ({}) must be shorter than deadline_ms ({})",
				self.interval_ms, self.deadline_ms
			));
		}
		if self.request_timeout_ms == 0 {
			return Err("request_timeout_ms must be positive".to_string());
		}

		if self.terminal_traces.is_empty() {
			return Err("terminal_traces must name at least one trace type".to_string());
		}

		if let Some(retry) = &self.http_retry {
			if retry.initial_backoff_ms > retry.max_backoff_ms {
				return Err(format!(
					"http_retry.initial_backoff_ms ({}) must not exceed max_backoff_ms ({})",
					retry.initial_backoff_ms, retry.max_backoff_ms
				));
			}
		}

		Ok(())
	}
}
