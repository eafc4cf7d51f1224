//! Logging utilities for the application
//!
//! Logs go to stdout unless `LOG_MODE=file`, in which case they are written to a
//! daily rolling file under `LOG_DATA_DIR` (default `logs/`).
//!
//! The level comes from `RUST_LOG` when set, then `LOG_LEVEL`, and defaults to
//! `info`.
use std::env;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::utils::constants::DEFAULT_LOG_DIR;

const LOG_FILE_PREFIX: &str = "transfer-watcher.log";

type SetupResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Setup logging for the application
///
/// Chooses stdout or a rolling log file depending on `LOG_MODE`.
pub fn setup_logging() -> SetupResult {
	let log_to_file = env::var("LOG_MODE")
		.map(|mode| mode.eq_ignore_ascii_case("file"))
		.unwrap_or(false);

	if log_to_file {
		let log_dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
		let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
		init_subscriber(appender, false)
	} else {
		setup_logging_with_writer(std::io::stdout)
	}
}

/// Setup logging for the application with a custom writer
pub fn setup_logging_with_writer<W>(writer: W) -> SetupResult
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	init_subscriber(writer, true)
}

/// Builds the level filter from `RUST_LOG`, then `LOG_LEVEL`, then `info`
fn env_filter() -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
		EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
	})
}

fn init_subscriber<W>(writer: W, ansi: bool) -> SetupResult
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	tracing_subscriber::registry()
		.with(env_filter())
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(ansi)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}
