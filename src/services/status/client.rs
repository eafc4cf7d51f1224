//! GraphQL-over-HTTP client for the transfer status service.
//!
//! Sends `{query, variables}` as a JSON POST and flattens the `traces` of every
//! entry returned under `data.<collection>` into one [`StatusRecord`]. Packet
//! entries also carry the route the packet took, which is kept alongside. This
//! client never retries on its own; transient HTTP retries only happen when
//! the injected middleware client was built with a retry policy.

use anyhow::Context;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use std::time::Instant;
use url::Url;

use crate::{
	models::{PacketRoute, StatusRecord, TraceRecord, WatchConfig},
	services::status::{StatusQuery, StatusQueryError},
	utils::{build_http_client, create_retryable_http_client, metrics::STATUS_QUERY_DURATION},
};

/// Source of status records for a transfer
#[async_trait]
pub trait StatusClientTrait: Send + Sync {
	/// Queries the traces observed so far for the transfer sent by `tx_hash`
	async fn query_status(&self, tx_hash: &str) -> Result<StatusRecord, StatusQueryError>;
}

/// Status client backed by a GraphQL endpoint
#[derive(Clone, Debug)]
pub struct GraphQlStatusClient {
	client: ClientWithMiddleware,
	endpoint: Url,
	query: StatusQuery,
}

impl GraphQlStatusClient {
	/// Creates a client for the given endpoint
	///
	/// # Arguments
	/// * `client` - HTTP client, optionally wrapped in retry middleware
	/// * `endpoint` - GraphQL endpoint URL
	/// * `query` - Collection to read traces from
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - New client or an invalid URL error
	pub fn new(
		client: ClientWithMiddleware,
		endpoint: &str,
		query: StatusQuery,
	) -> Result<Self, anyhow::Error> {
		let endpoint = Url::parse(endpoint)
			.with_context(|| format!("Invalid status endpoint URL: {}", endpoint))?;

		Ok(Self {
			client,
			endpoint,
			query,
		})
	}

	/// Creates a client from the watcher configuration
	pub fn from_config(config: &WatchConfig) -> Result<Self, anyhow::Error> {
		let base_client = build_http_client(config.request_timeout())?;
		let client = create_retryable_http_client(&config.retry_config(), base_client);
		Self::new(client, &config.endpoint.url, config.endpoint.query)
	}

	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	pub fn query(&self) -> StatusQuery {
		self.query
	}

	/// Posts the query and reads the JSON response body
	async fn fetch_body(&self, tx_hash: &str) -> Result<Value, StatusQueryError> {
		let response = self
			.client
			.post(self.endpoint.clone())
			.json(&self.query.payload(tx_hash))
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(StatusQueryError::request_error(format!(
				"{} returned HTTP {}",
				self.endpoint, status
			)));
		}

		response.json().await.map_err(|e| {
			StatusQueryError::parse_error(format!("Response body is not JSON: {}", e))
		})
	}
}

#[async_trait]
impl StatusClientTrait for GraphQlStatusClient {
	async fn query_status(&self, tx_hash: &str) -> Result<StatusRecord, StatusQueryError> {
		let started = Instant::now();
		let body = self.fetch_body(tx_hash).await;
		// Failed round trips are timed too
		STATUS_QUERY_DURATION.observe(started.elapsed().as_secs_f64());

		parse_status_response(&body?, self.query.collection())
	}
}

/// Extracts the traces from a GraphQL response body
///
/// # Arguments
/// * `body` - Parsed JSON response
/// * `collection` - Field under `data` holding the returned entries
///
/// # Returns
/// * `Result<StatusRecord, StatusQueryError>` - Every trace of every entry, in
///   response order, with the route of the first entry that reports one. No
///   entries yields an empty record.
pub fn parse_status_response(
	body: &Value,
	collection: &str,
) -> Result<StatusRecord, StatusQueryError> {
	if let Some(errors) = body.get("errors").and_then(Value::as_array) {
		if !errors.is_empty() {
			let messages: Vec<String> = errors
				.iter()
				.map(|e| {
					e.get("message")
						.and_then(Value::as_str)
						.map(str::to_string)
						.unwrap_or_else(|| e.to_string())
				})
				.collect();
			return Err(StatusQueryError::graphql_error(messages.join("; ")));
		}
	}

	let entries = body
		.get("data")
		.and_then(|data| data.get(collection))
		.and_then(Value::as_array)
		.ok_or_else(|| {
			StatusQueryError::parse_error(format!("Response has no data.{} array", collection))
		})?;

	let mut traces = Vec::new();
	let mut route = PacketRoute::default();
	for entry in entries {
		if route.is_empty() {
			route = route_of(entry);
		}

		let entry_traces = match entry.get("traces") {
			None | Some(Value::Null) => continue,
			Some(Value::Array(entry_traces)) => entry_traces,
			Some(other) => {
				return Err(StatusQueryError::parse_error(format!(
					"Expected traces to be an array, got {}",
					other
				)))
			}
		};

		for trace in entry_traces {
			let record: TraceRecord = serde_json::from_value(trace.clone()).map_err(|e| {
				StatusQueryError::parse_error(format!("Malformed trace record: {}", e))
			})?;
			traces.push(record);
		}
	}

	Ok(StatusRecord::new(traces).with_route(route))
}

fn route_of(entry: &Value) -> PacketRoute {
	let chain_name = |field: &str| {
		entry
			.get(field)
			.and_then(|chain| chain.get("display_name"))
			.and_then(Value::as_str)
			.map(str::to_string)
	};

	PacketRoute {
		source_chain: chain_name("source_chain"),
		destination_chain: chain_name("destination_chain"),
		packet_recv_transaction_hash: entry
			.get("packet_recv_transaction_hash")
			.and_then(Value::as_str)
			.map(str::to_string),
	}
}
