//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines counters and histograms describing watches and status queries.

use lazy_static::lazy_static;
use prometheus::{
	Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::models::WatchOutcome;

lazy_static! {
	// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	// Counter for watches started.
	pub static ref WATCHES_STARTED: IntCounter = {
		let counter = IntCounter::new("watches_started_total", "Number of watches started").unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Counter for status queries issued across all watches.
	pub static ref WATCH_TICKS: IntCounter = {
		let counter = IntCounter::new("watch_ticks_total", "Number of status queries issued by watches").unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Counter vector of terminal outcomes, labelled by outcome state.
	pub static ref WATCH_OUTCOMES: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("watch_outcomes_total", "Terminal outcomes of watches"),
			&["outcome"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Histogram of status query round-trip time in seconds.
	pub static ref STATUS_QUERY_DURATION: Histogram = {
		let histogram = Histogram::with_opts(
			HistogramOpts::new("status_query_duration_seconds", "Status query round-trip time")
				.buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0])
		).unwrap();
		REGISTRY.register(Box::new(histogram.clone())).unwrap();
		histogram
	};
}

/// Records the terminal outcome of a watch.
pub fn record_outcome(outcome: &WatchOutcome) {
	WATCH_OUTCOMES
		.with_label_values(&[outcome.state().as_str()])
		.inc();
}

/// Gather all metrics and encode into the Prometheus text format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}
