//! Transfer watcher entry point.
//!
//! Watches a single cross-chain transfer until the configured trace types have
//! been observed, the deadline elapses, a status query fails or Ctrl+C is
//! pressed.
//!
//! # Flow
//! 1. Loads `.env` and applies logging options
//! 2. Loads the watcher configuration and applies command line overrides
//! 3. Starts the watch and waits for its outcome or a shutdown signal
//! 4. Reports the outcome and exits non-zero unless the transfer completed

use std::{
	env::{set_var, var},
	path::PathBuf,
};

use clap::{Arg, ArgMatches, Command};
use dotenvy::dotenv;
use tracing::{error, info};

use transfer_watcher::{
	bootstrap::{
		await_outcome_or_shutdown, build_watch_request, initialize_watcher, report_outcome,
		Result,
	},
	models::{ConfigLoader, ConfigError, TraceType, WatchConfig},
	services::status::StatusQuery,
	utils::{logging::setup_logging, metrics::gather_metrics},
};

fn cli() -> Command {
	Command::new("transfer-watcher")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Watches a cross-chain transfer through the Union status service until it reaches \
			 a terminal stage.",
		)
		.arg(
			Arg::new("tx-hash")
				.long("tx-hash")
				.help("Hash of the transaction that sent the transfer")
				.value_name("HASH")
				.required(true),
		)
		.arg(
			Arg::new("config")
				.long("config")
				.help("Path to the watcher configuration (default: config/watcher.json)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("endpoint")
				.long("endpoint")
				.help("GraphQL status endpoint URL")
				.value_name("URL"),
		)
		.arg(
			Arg::new("query")
				.long("query")
				.help("Collection to read traces from (transfers, packets)")
				.value_name("QUERY"),
		)
		.arg(
			Arg::new("until")
				.long("until")
				.help("Trace type that must be observed; repeat to require several")
				.value_name("TRACE_TYPE")
				.value_parser(|tag: &str| tag.parse::<TraceType>())
				.action(clap::ArgAction::Append),
		)
		.arg(
			Arg::new("interval")
				.long("interval")
				.help("Seconds between status queries")
				.value_name("SECS")
				.value_parser(clap::value_parser!(u64)),
		)
		.arg(
			Arg::new("deadline")
				.long("deadline")
				.help("Seconds to wait before giving up")
				.value_name("SECS")
				.value_parser(clap::value_parser!(u64)),
		)
		.arg(
			Arg::new("log-file")
				.long("log-file")
				.help("Write logs to file instead of stdout")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("log-path")
				.long("log-path")
				.help("Path to store log files (default: logs/)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("metrics")
				.long("metrics")
				.help("Print Prometheus metrics when the watch ends")
				.action(clap::ArgAction::SetTrue),
		)
}

/// Loads the configuration and applies command line overrides on top of it
fn load_config(matches: &ArgMatches) -> std::result::Result<WatchConfig, ConfigError> {
	let path = matches.get_one::<String>("config").map(PathBuf::from);
	let mut config = WatchConfig::load_or_default(path.as_deref())?;

	if let Some(url) = matches.get_one::<String>("endpoint") {
		config.endpoint.url = url.clone();
	}
	if let Some(query) = matches.get_one::<String>("query") {
		config.endpoint.query = query
			.parse::<StatusQuery>()
			.map_err(|e| ConfigError::override_error("query", e))?;
	}
	if let Some(until) = matches.get_many::<TraceType>("until") {
		config.terminal_traces = until.cloned().collect();
	}
	if let Some(interval) = matches.get_one::<u64>("interval") {
		config.interval_ms = interval.saturating_mul(1000);
	}
	if let Some(deadline) = matches.get_one::<u64>("deadline") {
		config.deadline_ms = deadline.saturating_mul(1000);
	}

	config.validate().map_err(ConfigError::validation_error)?;
	Ok(config)
}

/// Main entry point for the transfer watcher.
///
/// # Errors
/// Returns an error if configuration is invalid, the watch could not run, or
/// the transfer did not reach its terminal stage.
#[tokio::main]
async fn main() -> Result<()> {
	let matches = cli().get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	// Only apply CLI options if the corresponding environment variables are NOT already set
	if matches.get_flag("log-file") && var("LOG_MODE").is_err() {
		set_var("LOG_MODE", "file");
	}

	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("LOG_LEVEL").is_err() {
			set_var("LOG_LEVEL", level);
		}
	}

	if let Some(path) = matches.get_one::<String>("log-path") {
		if var("LOG_DATA_DIR").is_err() {
			set_var("LOG_DATA_DIR", path);
		}
	}

	setup_logging().unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	let config = load_config(&matches)?;
	let tx_hash = matches
		.get_one::<String>("tx-hash")
		.ok_or_else(|| anyhow::anyhow!("--tx-hash is required"))?
		.clone();

	let request = build_watch_request(&tx_hash, &config)?;
	let watcher = initialize_watcher(&config)?;
	let handle = watcher.watch(request);

	info!("Watch started. Press Ctrl+C to cancel");

	let outcome = await_outcome_or_shutdown(handle, async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			error!("Error waiting for Ctrl+C: {}", e);
			// Without a signal handler the watch runs to its own end
			std::future::pending::<()>().await;
		}
	})
	.await?;

	report_outcome(&tx_hash, &outcome);

	if matches.get_flag("metrics") {
		match gather_metrics() {
			Ok(metrics) => println!("{}", String::from_utf8_lossy(&metrics)),
			Err(e) => error!("Failed to gather metrics: {}", e),
		}
	}

	if outcome.is_satisfied() {
		Ok(())
	} else {
		Err(anyhow::anyhow!("Transfer {} did not complete: {}", tx_hash, outcome).into())
	}
}
