//! Watch requests, states and outcomes.

use std::{fmt, sync::Arc, time::Duration};

use crate::{
	models::{StatusRecord, TerminalPredicate},
	services::{status::StatusQueryError, watcher::WatcherError},
};

/// Parameters of a single watch
///
/// Constructed through [`WatchRequest::new`], which rejects empty identifiers
/// and zero durations.
#[derive(Clone)]
pub struct WatchRequest {
	tx_hash: String,
	interval: Duration,
	deadline: Duration,
	predicate: Arc<dyn TerminalPredicate>,
}

impl WatchRequest {
	/// Creates a validated watch request
	///
	/// # Arguments
	/// * `tx_hash` - Hash of the transaction that sent the transfer
	/// * `interval` - Delay between the end of one tick and the start of the next
	/// * `deadline` - Total time budget for the watch, measured from its start
	/// * `predicate` - Terminal condition evaluated on every tick
	///
	/// # Returns
	/// * `Result<Self, WatcherError>` - The request or an invalid request error
	pub fn new(
		tx_hash: impl Into<String>,
		interval: Duration,
		deadline: Duration,
		predicate: impl TerminalPredicate + 'static,
	) -> Result<Self, WatcherError> {
		let tx_hash = tx_hash.into().trim().to_string();

		if tx_hash.is_empty() {
			return Err(WatcherError::invalid_request(
				"Transaction hash must not be empty",
			));
		}
		if interval.is_zero() {
			return Err(WatcherError::invalid_request(
				"Polling interval must be positive",
			));
		}
		if deadline.is_zero() {
			return Err(WatcherError::invalid_request("Deadline must be positive"));
		}

		Ok(Self {
			tx_hash,
			interval,
			deadline,
			predicate: Arc::new(predicate),
		})
	}

	pub fn tx_hash(&self) -> &str {
		&self.tx_hash
	}

	pub fn interval(&self) -> Duration {
		self.interval
	}

	pub fn deadline(&self) -> Duration {
		self.deadline
	}

	pub fn predicate(&self) -> &dyn TerminalPredicate {
		self.predicate.as_ref()
	}
}

impl fmt::Debug for WatchRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WatchRequest")
			.field("tx_hash", &self.tx_hash)
			.field("interval", &self.interval)
			.field("deadline", &self.deadline)
			.field("predicate", &self.predicate.describe())
			.finish()
	}
}

/// Lifecycle state of a watch
///
/// `Idle` moves to `Polling` when the watch starts. `Polling` moves to exactly
/// one of the terminal states, after which nothing changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
	Idle,
	Polling,
	Satisfied,
	TimedOut,
	Failed,
	Cancelled,
}

impl WatchState {
	pub fn is_terminal(&self) -> bool {
		!matches!(self, Self::Idle | Self::Polling)
	}

	/// Returns true if moving from `self` to `next` is a legal transition
	pub fn can_transition_to(&self, next: WatchState) -> bool {
		match self {
			Self::Idle => next == Self::Polling,
			Self::Polling => next.is_terminal(),
			_ => false,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Polling => "polling",
			Self::Satisfied => "satisfied",
			Self::TimedOut => "timed_out",
			Self::Failed => "failed",
			Self::Cancelled => "cancelled",
		}
	}
}

impl fmt::Display for WatchState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// The single terminal result of a watch
#[derive(Debug, Clone, PartialEq)]
pub enum WatchOutcome {
	/// The predicate held on tick `tick` for `record`
	Satisfied { tick: u32, record: StatusRecord },
	/// The deadline elapsed after `ticks` completed ticks
	TimedOut {
		ticks: u32,
		last: Option<StatusRecord>,
	},
	/// The status query failed on tick `tick`
	Failed { tick: u32, error: StatusQueryError },
	/// The caller cancelled the watch after `ticks` completed ticks
	Cancelled { ticks: u32 },
}

impl WatchOutcome {
	/// Terminal state corresponding to this outcome
	pub fn state(&self) -> WatchState {
		match self {
			Self::Satisfied { .. } => WatchState::Satisfied,
			Self::TimedOut { .. } => WatchState::TimedOut,
			Self::Failed { .. } => WatchState::Failed,
			Self::Cancelled { .. } => WatchState::Cancelled,
		}
	}

	pub fn is_satisfied(&self) -> bool {
		matches!(self, Self::Satisfied { .. })
	}

	/// Number of status queries whose response was evaluated or failed
	pub fn ticks(&self) -> u32 {
		match self {
			Self::Satisfied { tick, .. } | Self::Failed { tick, .. } => *tick,
			Self::TimedOut { ticks, .. } | Self::Cancelled { ticks } => *ticks,
		}
	}

	/// The satisfying record, if the watch succeeded
	pub fn record(&self) -> Option<&StatusRecord> {
		match self {
			Self::Satisfied { record, .. } => Some(record),
			_ => None,
		}
	}
}

impl fmt::Display for WatchOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Satisfied { tick, record } => write!(
				f,
				"satisfied on tick {} with {} trace(s)",
				tick,
				record.len()
			),
			Self::TimedOut { ticks, .. } => write!(f, "timed out after {} tick(s)", ticks),
			Self::Failed { tick, error } => write!(f, "failed on tick {}: {}", tick, error),
			Self::Cancelled { ticks } => write!(f, "cancelled after {} tick(s)", ticks),
		}
	}
}
