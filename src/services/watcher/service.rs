//! Poll-until-condition loop for a single transfer.
//!
//! Ticks follow a fixed-delay discipline: the first status query is issued one
//! interval after the watch starts, and every later query one interval after
//! the previous response was evaluated. Ticks therefore never overlap and at
//! most one terminal outcome can be produced.
//!
//! The deadline runs on its own clock. When it elapses, or cancellation is
//! requested, while a query is in flight, that query is dropped and its
//! response never evaluated.

use std::{sync::Arc, time::Duration};
use tokio::{
	sync::watch,
	time::{sleep, sleep_until, Instant},
};
use tracing::{debug, info, instrument, warn};

use crate::{
	models::{StatusRecord, WatchOutcome, WatchRequest, WatchState},
	services::{status::StatusClientTrait, watcher::WatchHandle},
	utils::metrics::{record_outcome, WATCHES_STARTED, WATCH_TICKS},
};

/// Stand-in for deadlines the clock cannot represent, roughly 30 years
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Starts watches against a shared status client
pub struct TransferWatcher<C: StatusClientTrait + 'static> {
	client: Arc<C>,
}

impl<C: StatusClientTrait + 'static> TransferWatcher<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}

	/// Spawns a watch on the current Tokio runtime
	///
	/// Each watch is independent; the returned handle is the only way to cancel
	/// it or collect its outcome.
	pub fn watch(&self, request: WatchRequest) -> WatchHandle {
		let (cancel_tx, cancel_rx) = watch::channel(false);
		let (state_tx, state_rx) = watch::channel(WatchState::Idle);
		let client = self.client.clone();

		let task = tokio::spawn(async move {
			run_watch(client.as_ref(), &request, cancel_rx, state_tx).await
		});

		WatchHandle::new(cancel_tx, state_rx, task)
	}
}

impl<C: StatusClientTrait + 'static> Clone for TransferWatcher<C> {
	fn clone(&self) -> Self {
		Self {
			client: self.client.clone(),
		}
	}
}

/// Runs one watch to completion on the calling task
///
/// # Arguments
/// * `client` - Status client queried once per tick
/// * `request` - The validated watch request
/// * `cancel_rx` - Becomes `true` to cancel; dropping its sender also cancels
/// * `state_tx` - Receives `Polling` on start and the terminal state at the end
///
/// # Returns
/// * `WatchOutcome` - Exactly one terminal outcome
#[instrument(skip_all, fields(tx_hash = %request.tx_hash()))]
pub async fn run_watch<C>(
	client: &C,
	request: &WatchRequest,
	mut cancel_rx: watch::Receiver<bool>,
	state_tx: watch::Sender<WatchState>,
) -> WatchOutcome
where
	C: StatusClientTrait + ?Sized,
{
	let deadline = deadline_after(Instant::now(), request.deadline());
	publish_state(&state_tx, WatchState::Polling);
	WATCHES_STARTED.inc();

	info!(
		interval = ?request.interval(),
		deadline = ?request.deadline(),
		predicate = %request.predicate().describe(),
		"Watching transfer"
	);

	let mut ticks: u32 = 0;
	let mut last: Option<StatusRecord> = None;

	let outcome = loop {
		tokio::select! {
			biased;
			_ = cancelled(&mut cancel_rx) => break WatchOutcome::Cancelled { ticks },
			_ = sleep_until(deadline) => break WatchOutcome::TimedOut { ticks, last: last.take() },
			_ = sleep(request.interval()) => {}
		}

		let tick = ticks + 1;
		WATCH_TICKS.inc();

		let response = tokio::select! {
			biased;
			_ = cancelled(&mut cancel_rx) => break WatchOutcome::Cancelled { ticks },
			_ = sleep_until(deadline) => break WatchOutcome::TimedOut { ticks, last: last.take() },
			response = client.query_status(request.tx_hash()) => response,
		};
		ticks = tick;

		match response {
			Ok(record) => {
				debug!(tick, traces = ?record.traces(), "Status response");
				info!(tick, traces = record.len(), "Polled transfer status");

				if request.predicate().is_satisfied(&record) {
					break WatchOutcome::Satisfied { tick, record };
				}
				last = Some(record);
			}
			Err(error) => break WatchOutcome::Failed { tick, error },
		}
	};

	publish_state(&state_tx, outcome.state());
	record_outcome(&outcome);

	match &outcome {
		WatchOutcome::Satisfied { tick, .. } => info!(tick, "Terminal condition observed"),
		WatchOutcome::TimedOut { ticks, .. } => {
			warn!(ticks, "Deadline elapsed before the terminal condition")
		}
		WatchOutcome::Failed { tick, error } => warn!(tick, %error, "Status query failed"),
		WatchOutcome::Cancelled { ticks } => info!(ticks, "Watch cancelled"),
	}

	outcome
}

/// Instant at which a watch started at `start` gives up
///
/// Budgets that overflow the clock are clamped to [`FAR_FUTURE`].
fn deadline_after(start: Instant, budget: Duration) -> Instant {
	start
		.checked_add(budget)
		.unwrap_or_else(|| start + FAR_FUTURE)
}

fn publish_state(state_tx: &watch::Sender<WatchState>, next: WatchState) {
	let previous = state_tx.send_replace(next);
	debug_assert!(
		previous.can_transition_to(next),
		"illegal watch transition {} -> {}",
		previous,
		next
	);
}

/// Resolves once cancellation was requested or the sender is gone
async fn cancelled(cancel_rx: &mut watch::Receiver<bool>) {
	loop {
		if *cancel_rx.borrow_and_update() {
			return;
		}
		if cancel_rx.changed().await.is_err() {
			return;
		}
	}
}
