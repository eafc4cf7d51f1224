//! Bootstrap module for wiring configuration, status client and watcher.
//!
//! - `build_watch_request`: Turns a transaction hash and configuration into a
//!   validated watch request
//! - `initialize_watcher`: Builds the GraphQL status client and the watcher
//! - `await_outcome_or_shutdown`: Awaits a watch, cancelling it when the
//!   shutdown future resolves first

use std::{error::Error, future::Future, sync::Arc};
use tracing::info;

use crate::{
	models::{AllTraceTypes, WatchConfig, WatchOutcome, WatchRequest},
	services::{
		status::GraphQlStatusClient,
		watcher::{TransferWatcher, WatchHandle, WatcherError},
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// Builds a watch request for `tx_hash` from the configuration
///
/// The terminal predicate requires every configured trace type to be present.
pub fn build_watch_request(
	tx_hash: &str,
	config: &WatchConfig,
) -> std::result::Result<WatchRequest, WatcherError> {
	WatchRequest::new(
		tx_hash,
		config.interval(),
		config.deadline(),
		AllTraceTypes(config.terminal_traces.clone()),
	)
}

/// Creates the status client and watcher described by the configuration
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or the endpoint URL is invalid
pub fn initialize_watcher(config: &WatchConfig) -> Result<TransferWatcher<GraphQlStatusClient>> {
	let client = GraphQlStatusClient::from_config(config)?;
	info!(
		endpoint = %client.endpoint(),
		query = %client.query(),
		"Initialized status client"
	);
	Ok(TransferWatcher::new(Arc::new(client)))
}

/// Awaits the outcome of a watch, cancelling it if `shutdown` resolves first
///
/// # Arguments
/// * `handle` - Handle of a running watch
/// * `shutdown` - Future resolving when the process should stop, e.g. Ctrl+C
///
/// # Returns
/// * `Result<WatchOutcome, WatcherError>` - `Cancelled` if shutdown won the race
pub async fn await_outcome_or_shutdown<F>(
	mut handle: WatchHandle,
	shutdown: F,
) -> std::result::Result<WatchOutcome, WatcherError>
where
	F: Future,
{
	let shutdown_requested = tokio::select! {
		_ = handle.wait_terminal() => false,
		_ = shutdown => true,
	};

	if shutdown_requested {
		info!("Shutdown signal received, cancelling watch");
		handle.cancel();
	}

	handle.outcome().await
}

/// Logs a human readable summary of the outcome
pub fn report_outcome(tx_hash: &str, outcome: &WatchOutcome) {
	match outcome {
		WatchOutcome::Satisfied { tick, record } => {
			info!(tx_hash, tick, "Transfer reached its terminal stage");
			if let Some(route) = record.route() {
				info!(
					source = route.source_chain.as_deref().unwrap_or("unknown"),
					destination = route.destination_chain.as_deref().unwrap_or("unknown"),
					recv_tx = route.packet_recv_transaction_hash.as_deref().unwrap_or("pending"),
					"Packet route"
				);
			}
			for (chain_id, traces) in record.by_chain() {
				for trace in traces {
					info!(
						chain = %trace.chain.display_name,
						chain_id,
						trace_type = %trace.trace_type,
						height = trace.height,
						"Trace"
					);
				}
			}
		}
		WatchOutcome::TimedOut { ticks, last } => {
			let seen: Vec<String> = last
				.iter()
				.flat_map(|record| record.traces())
				.map(|t| t.trace_type.to_string())
				.collect();
			info!(
				tx_hash,
				ticks,
				seen = %seen.join(", "),
				"Gave up waiting for the transfer"
			);
		}
		WatchOutcome::Failed { tick, error } => {
			info!(tx_hash, tick, %error, "Status query failed, watch stopped");
		}
		WatchOutcome::Cancelled { ticks } => {
			info!(tx_hash, ticks, "Watch cancelled");
		}
	}
}
