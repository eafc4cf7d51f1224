use std::{sync::Arc, time::Duration};
use tokio::{
	sync::watch,
	time::{sleep, Instant},
};
use tracing_test::traced_test;

use crate::integration::mocks::{record_with, MockStatusClient, ScriptedStatusClient};
use transfer_watcher::{
	models::{
		AllTraceTypes, StatusRecord, TerminalPredicate, TraceType, TraceTypeOnChain,
		TraceTypePresent, WatchOutcome, WatchRequest, WatchState,
	},
	services::{
		status::StatusQueryError,
		watcher::{run_watch, TransferWatcher, WatcherError},
	},
	utils::tests::TraceRecordBuilder,
};

fn request(
	interval_ms: u64,
	deadline_ms: u64,
	predicate: impl TerminalPredicate + 'static,
) -> WatchRequest {
	WatchRequest::new(
		"0xabc",
		Duration::from_millis(interval_ms),
		Duration::from_millis(deadline_ms),
		predicate,
	)
	.unwrap()
}

fn packet_recv() -> TraceTypePresent {
	TraceTypePresent(TraceType::PacketRecv)
}

#[tokio::test(start_paused = true)]
async fn test_watch_reaches_packet_recv_on_third_tick() {
	let holesky_recv = TraceRecordBuilder::new()
		.trace_type(TraceType::PacketRecv)
		.height(100)
		.chain("Holesky", "17000")
		.build();
	let send = TraceRecordBuilder::new().build();
	let client = Arc::new(ScriptedStatusClient::new(vec![
		Ok(StatusRecord::default()),
		Ok(StatusRecord::new(vec![send.clone()])),
		Ok(StatusRecord::new(vec![send, holesky_recv.clone()])),
	]));
	let watcher = TransferWatcher::new(client.clone());

	let started = Instant::now();
	let handle = watcher.watch(request(5_000, 300_000, packet_recv()));
	let outcome = handle.outcome().await.unwrap();

	match &outcome {
		WatchOutcome::Satisfied { tick, record } => {
			assert_eq!(*tick, 3);
			assert_eq!(record.find(&TraceType::PacketRecv), Some(&holesky_recv));
		}
		other => panic!("Expected Satisfied, got {:?}", other),
	}
	assert_eq!(started.elapsed(), Duration::from_secs(15));
	assert_eq!(client.calls(), 3);

	// No fourth tick after the outcome
	sleep(Duration::from_secs(60)).await;
	assert_eq!(client.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_watch_times_out_when_never_satisfied() {
	let client = Arc::new(ScriptedStatusClient::pending());
	let watcher = TransferWatcher::new(client.clone());

	let started = Instant::now();
	let outcome = watcher
		.watch(request(1_000, 10_000, packet_recv()))
		.outcome()
		.await
		.unwrap();

	match outcome {
		WatchOutcome::TimedOut { ticks, last } => {
			assert_eq!(ticks, 9);
			assert_eq!(last, Some(StatusRecord::default()));
		}
		other => panic!("Expected TimedOut, got {:?}", other),
	}
	assert_eq!(started.elapsed(), Duration::from_secs(10));
	assert_eq!(client.calls(), 9);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_discards_in_flight_query() {
	// The only query would satisfy the watch, but answers after the deadline
	let client = Arc::new(
		ScriptedStatusClient::new(vec![Ok(record_with(TraceType::PacketRecv))])
			.with_latency(Duration::from_secs(20)),
	);
	let watcher = TransferWatcher::new(client.clone());

	let started = Instant::now();
	let outcome = watcher
		.watch(request(5_000, 10_000, packet_recv()))
		.outcome()
		.await
		.unwrap();

	match outcome {
		WatchOutcome::TimedOut { ticks, last } => {
			assert_eq!(ticks, 0);
			assert!(last.is_none());
		}
		other => panic!("Expected TimedOut, got {:?}", other),
	}
	assert_eq!(started.elapsed(), Duration::from_secs(10));
	assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_query_failure_ends_watch() {
	let client = Arc::new(ScriptedStatusClient::new(vec![
		Ok(StatusRecord::default()),
		Ok(record_with(TraceType::PacketSend)),
		Err(StatusQueryError::request_error("HTTP 502")),
		Ok(record_with(TraceType::PacketRecv)),
	]));
	let watcher = TransferWatcher::new(client.clone());

	let handle = watcher.watch(request(1_000, 60_000, packet_recv()));
	let outcome = handle.outcome().await.unwrap();

	assert_eq!(
		outcome,
		WatchOutcome::Failed {
			tick: 3,
			error: StatusQueryError::RequestError("HTTP 502".to_string()),
		}
	);
	assert_eq!(outcome.state(), WatchState::Failed);

	sleep(Duration::from_secs(10)).await;
	assert_eq!(client.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_first_tick_issues_no_query() {
	let mut client = MockStatusClient::new();
	client.expect_query_status().times(0);
	let watcher = TransferWatcher::new(Arc::new(client));

	let handle = watcher.watch(request(5_000, 300_000, packet_recv()));
	handle.cancel();
	let outcome = handle.outcome().await.unwrap();

	assert_eq!(outcome, WatchOutcome::Cancelled { ticks: 0 });
}

#[tokio::test(start_paused = true)]
async fn test_cancel_between_ticks() {
	let mut client = MockStatusClient::new();
	client
		.expect_query_status()
		.withf(|tx_hash: &str| tx_hash == "0xabc")
		.times(3)
		.returning(|_| Ok(StatusRecord::default()));
	let watcher = TransferWatcher::new(Arc::new(client));

	let handle = watcher.watch(request(1_000, 60_000, packet_recv()));
	sleep(Duration::from_millis(3_500)).await;
	handle.cancel();

	let outcome = handle.outcome().await.unwrap();
	assert_eq!(outcome, WatchOutcome::Cancelled { ticks: 3 });
}

#[tokio::test(start_paused = true)]
async fn test_cancel_discards_in_flight_query() {
	let client = Arc::new(
		ScriptedStatusClient::new(vec![Ok(record_with(TraceType::PacketRecv))])
			.with_latency(Duration::from_secs(10)),
	);
	let watcher = TransferWatcher::new(client.clone());

	let handle = watcher.watch(request(1_000, 60_000, packet_recv()));
	sleep(Duration::from_secs(2)).await;
	assert_eq!(client.calls(), 1);
	handle.cancel();

	let outcome = handle.outcome().await.unwrap();
	assert_eq!(outcome, WatchOutcome::Cancelled { ticks: 0 });
}

#[tokio::test(start_paused = true)]
async fn test_state_transitions_are_observable() {
	let client = Arc::new(ScriptedStatusClient::new(vec![
		Ok(StatusRecord::default()),
		Ok(record_with(TraceType::PacketRecv)),
	]));
	let watcher = TransferWatcher::new(client);

	let mut handle = watcher.watch(request(1_000, 60_000, packet_recv()));
	assert!(matches!(
		handle.state(),
		WatchState::Idle | WatchState::Polling
	));

	sleep(Duration::from_millis(500)).await;
	assert_eq!(handle.state(), WatchState::Polling);
	assert!(!handle.is_finished());

	assert_eq!(handle.wait_terminal().await, WatchState::Satisfied);
	assert_eq!(handle.state(), WatchState::Satisfied);

	// Cancelling after the outcome changes nothing
	handle.cancel();
	let outcome = handle.outcome().await.unwrap();
	assert!(outcome.is_satisfied());
	assert_eq!(outcome.ticks(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_cancels_watch() {
	let client = Arc::new(ScriptedStatusClient::pending());
	let watcher = TransferWatcher::new(client.clone());

	let handle = watcher.watch(request(1_000, 60_000, packet_recv()));
	sleep(Duration::from_millis(2_500)).await;
	drop(handle);

	sleep(Duration::from_secs(10)).await;
	assert_eq!(client.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_watches_are_independent() {
	let client = Arc::new(ScriptedStatusClient::pending());
	let watcher = TransferWatcher::new(client.clone());

	let first = watcher.watch(request(1_000, 60_000, packet_recv()));
	let second = watcher.clone().watch(request(1_000, 3_500, packet_recv()));

	let second_outcome = second.outcome().await.unwrap();
	assert!(matches!(
		second_outcome,
		WatchOutcome::TimedOut { ticks: 3, .. }
	));

	// The first watch keeps polling after the second one ended
	assert_eq!(first.state(), WatchState::Polling);
	first.cancel();
	assert!(matches!(
		first.outcome().await.unwrap(),
		WatchOutcome::Cancelled { .. }
	));
}

#[tokio::test(start_paused = true)]
async fn test_watch_with_all_trace_types_predicate() {
	let send = TraceRecordBuilder::new().build();
	let recv = TraceRecordBuilder::new()
		.trace_type(TraceType::PacketRecv)
		.chain("Holesky", "17000")
		.build();
	let ack = TraceRecordBuilder::new()
		.trace_type(TraceType::PacketAck)
		.build();
	let client = Arc::new(ScriptedStatusClient::new(vec![
		Ok(StatusRecord::new(vec![send.clone(), recv.clone()])),
		Ok(StatusRecord::new(vec![send, recv, ack])),
	]));
	let watcher = TransferWatcher::new(client);

	let predicate = AllTraceTypes(vec![TraceType::PacketRecv, TraceType::PacketAck]);
	let outcome = watcher
		.watch(request(1_000, 60_000, predicate))
		.outcome()
		.await
		.unwrap();

	assert!(matches!(outcome, WatchOutcome::Satisfied { tick: 2, .. }));
}

#[tokio::test(start_paused = true)]
async fn test_watch_with_chain_scoped_predicate() {
	let recv_on_sepolia = TraceRecordBuilder::new()
		.trace_type(TraceType::PacketRecv)
		.build();
	let recv_on_holesky = TraceRecordBuilder::new()
		.trace_type(TraceType::PacketRecv)
		.chain("Holesky", "17000")
		.build();
	let client = Arc::new(ScriptedStatusClient::new(vec![
		Ok(StatusRecord::new(vec![recv_on_sepolia.clone()])),
		Ok(StatusRecord::new(vec![recv_on_sepolia, recv_on_holesky])),
	]));
	let watcher = TransferWatcher::new(client);

	let predicate = TraceTypeOnChain {
		trace_type: TraceType::PacketRecv,
		universal_chain_id: "17000".to_string(),
	};
	let outcome = watcher
		.watch(request(1_000, 60_000, predicate))
		.outcome()
		.await
		.unwrap();

	assert!(matches!(outcome, WatchOutcome::Satisfied { tick: 2, .. }));
}

#[tokio::test(start_paused = true)]
async fn test_watch_with_closure_predicate() {
	let client = Arc::new(ScriptedStatusClient::new(vec![
		Ok(record_with(TraceType::PacketSend)),
		Ok(StatusRecord::new(vec![
			TraceRecordBuilder::new().build(),
			TraceRecordBuilder::new().height(2).build(),
		])),
	]));
	let watcher = TransferWatcher::new(client);

	let outcome = watcher
		.watch(request(1_000, 60_000, |record: &StatusRecord| {
			record.len() >= 2
		}))
		.outcome()
		.await
		.unwrap();

	assert!(matches!(outcome, WatchOutcome::Satisfied { tick: 2, .. }));
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_deadline_produces_outcome() {
	let client = Arc::new(ScriptedStatusClient::pending());
	let watcher = TransferWatcher::new(client.clone());
	let request = WatchRequest::new(
		"0xabc",
		Duration::from_secs(1),
		Duration::MAX,
		|_: &StatusRecord| true,
	)
	.unwrap();

	let outcome = watcher.watch(request).outcome().await.unwrap();

	assert!(matches!(outcome, WatchOutcome::Satisfied { tick: 1, .. }));
	assert_eq!(client.calls(), 1);
}

#[test]
fn test_invalid_requests_are_rejected() {
	let cases = [
		("", 1_000, 10_000),
		("   ", 1_000, 10_000),
		("0xabc", 0, 10_000),
		("0xabc", 1_000, 0),
	];

	for (tx_hash, interval_ms, deadline_ms) in cases {
		let result = WatchRequest::new(
			tx_hash,
			Duration::from_millis(interval_ms),
			Duration::from_millis(deadline_ms),
			packet_recv(),
		);
		assert!(matches!(result, Err(WatcherError::InvalidRequest(_))));
	}
}

#[tokio::test(start_paused = true)]
#[traced_test]
async fn test_watch_logs_terminal_outcome() {
	let client = ScriptedStatusClient::new(vec![Ok(record_with(TraceType::PacketRecv))]);
	let (_cancel_tx, cancel_rx) = watch::channel(false);
	let (state_tx, _state_rx) = watch::channel(WatchState::Idle);

	// Driven on the test task so its events are captured in the test's scope
	let outcome = run_watch(
		&client,
		&request(1_000, 60_000, packet_recv()),
		cancel_rx,
		state_tx,
	)
	.await;

	assert!(outcome.is_satisfied());
	assert!(logs_contain("Watching transfer"));
	assert!(logs_contain("Terminal condition observed"));
}
