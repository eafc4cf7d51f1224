//! Caller-held handle to a running watch.

use tokio::{sync::watch, task::JoinHandle};

use crate::{
	models::{WatchOutcome, WatchState},
	services::watcher::WatcherError,
};

/// Owned handle to a spawned watch
///
/// The handle is the only way to influence a watch once started: it can
/// request cancellation, observe the current [`WatchState`] and await the
/// single [`WatchOutcome`]. Dropping the handle cancels the watch.
#[derive(Debug)]
pub struct WatchHandle {
	cancel_tx: watch::Sender<bool>,
	state_rx: watch::Receiver<WatchState>,
	task: JoinHandle<WatchOutcome>,
}

impl WatchHandle {
	pub(crate) fn new(
		cancel_tx: watch::Sender<bool>,
		state_rx: watch::Receiver<WatchState>,
		task: JoinHandle<WatchOutcome>,
	) -> Self {
		Self {
			cancel_tx,
			state_rx,
			task,
		}
	}

	/// Requests cancellation
	///
	/// No tick starts after this call and a response still in flight is
	/// discarded. Has no effect once the watch reached a terminal state.
	pub fn cancel(&self) {
		self.cancel_tx.send_replace(true);
	}

	/// Current lifecycle state of the watch
	pub fn state(&self) -> WatchState {
		*self.state_rx.borrow()
	}

	/// Returns true once the watch task has produced its outcome
	pub fn is_finished(&self) -> bool {
		self.task.is_finished()
	}

	/// Waits until the watch reaches a terminal state without consuming the handle
	pub async fn wait_terminal(&mut self) -> WatchState {
		let reached = self
			.state_rx
			.wait_for(WatchState::is_terminal)
			.await
			.map(|state| *state);
		// Err means the task is gone without publishing a terminal state
		reached.unwrap_or_else(|_| *self.state_rx.borrow())
	}

	/// Awaits the terminal outcome of the watch
	///
	/// # Returns
	/// * `Result<WatchOutcome, WatcherError>` - The outcome, or an internal error
	///   if the watch task panicked
	pub async fn outcome(self) -> Result<WatchOutcome, WatcherError> {
		let Self {
			cancel_tx, task, ..
		} = self;
		let outcome = task.await;
		// Held until here so awaiting does not count as dropping the handle
		drop(cancel_tx);
		Ok(outcome?)
	}
}
