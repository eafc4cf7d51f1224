//! Test helper utilities for watcher configuration
//!
//! - `WatchConfigBuilder`: Builder for creating test WatchConfig instances

use crate::{
	models::{EndpointConfig, HttpRetrySettings, TraceType, WatchConfig},
	services::status::StatusQuery,
};

/// Builder for creating test WatchConfig instances
#[derive(Default)]
pub struct WatchConfigBuilder {
	config: WatchConfig,
}

impl WatchConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn url(mut self, url: &str) -> Self {
		self.config.endpoint = EndpointConfig {
			url: url.to_string(),
			query: self.config.endpoint.query,
		};
		self
	}

	pub fn query(mut self, query: StatusQuery) -> Self {
		self.config.endpoint.query = query;
		self
	}

	pub fn interval_ms(mut self, interval_ms: u64) -> Self {
		self.config.interval_ms = interval_ms;
		self
	}

	pub fn deadline_ms(mut self, deadline_ms: u64) -> Self {
		self.config.deadline_ms = deadline_ms;
		self
	}

	pub fn terminal_traces(mut self, traces: Vec<TraceType>) -> Self {
		self.config.terminal_traces = traces;
		self
	}

	pub fn http_retry(mut self, retry: HttpRetrySettings) -> Self {
		self.config.http_retry = Some(retry);
		self
	}

	pub fn build(self) -> WatchConfig {
		self.config
	}
}
