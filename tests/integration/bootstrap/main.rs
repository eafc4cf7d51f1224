use serde_json::json;
use std::{sync::Arc, time::Duration};
use tracing_test::traced_test;

use crate::integration::mocks::{record_with, ScriptedStatusClient};
use transfer_watcher::{
	bootstrap::{
		await_outcome_or_shutdown, build_watch_request, initialize_watcher, report_outcome,
	},
	models::{PacketRoute, StatusRecord, TerminalPredicate, TraceType, WatchOutcome},
	services::watcher::{TransferWatcher, WatcherError},
	utils::tests::{TraceRecordBuilder, WatchConfigBuilder},
};

#[test]
fn test_build_watch_request_from_config() {
	let config = WatchConfigBuilder::new()
		.interval_ms(5_000)
		.deadline_ms(300_000)
		.terminal_traces(vec![TraceType::PacketRecv, TraceType::WriteAck])
		.build();

	let request = build_watch_request(" 0xabc ", &config).unwrap();

	assert_eq!(request.tx_hash(), "0xabc");
	assert_eq!(request.interval(), Duration::from_secs(5));
	assert_eq!(request.deadline(), Duration::from_secs(300));

	let recv_only = record_with(TraceType::PacketRecv);
	assert!(!request.predicate().is_satisfied(&recv_only));

	let recv_and_ack = StatusRecord::new(vec![
		TraceRecordBuilder::new()
			.trace_type(TraceType::PacketRecv)
			.build(),
		TraceRecordBuilder::new()
			.trace_type(TraceType::WriteAck)
			.build(),
	]);
	assert!(request.predicate().is_satisfied(&recv_and_ack));
}

#[test]
fn test_build_watch_request_rejects_empty_hash() {
	let config = WatchConfigBuilder::new().build();
	assert!(matches!(
		build_watch_request("", &config),
		Err(WatcherError::InvalidRequest(_))
	));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_watch() {
	let client = Arc::new(ScriptedStatusClient::pending());
	let watcher = TransferWatcher::new(client.clone());
	let config = WatchConfigBuilder::new()
		.interval_ms(1_000)
		.deadline_ms(60_000)
		.build();

	let handle = watcher.watch(build_watch_request("0xabc", &config).unwrap());
	let outcome = await_outcome_or_shutdown(
		handle,
		tokio::time::sleep(Duration::from_millis(2_500)),
	)
	.await
	.unwrap();

	assert_eq!(outcome, WatchOutcome::Cancelled { ticks: 2 });
	assert_eq!(client.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_outcome_wins_over_pending_shutdown() {
	let client = Arc::new(ScriptedStatusClient::new(vec![Ok(record_with(
		TraceType::PacketRecv,
	))]));
	let watcher = TransferWatcher::new(client);
	let config = WatchConfigBuilder::new()
		.interval_ms(1_000)
		.deadline_ms(60_000)
		.build();

	let handle = watcher.watch(build_watch_request("0xabc", &config).unwrap());
	let outcome = await_outcome_or_shutdown(handle, std::future::pending::<()>())
		.await
		.unwrap();

	assert!(matches!(outcome, WatchOutcome::Satisfied { tick: 1, .. }));
	report_outcome("0xabc", &outcome);
}

#[tokio::test]
async fn test_initialized_watcher_polls_endpoint() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(200)
		.with_body(
			json!({
				"data": {
					"v2_transfers": [{
						"traces": [{
							"type": "PACKET_RECV",
							"height": 42,
							"chain": { "display_name": "Holesky", "universal_chain_id": "17000" }
						}]
					}]
				}
			})
			.to_string(),
		)
		.expect(1)
		.create_async()
		.await;

	let config = WatchConfigBuilder::new()
		.url(&server.url())
		.interval_ms(10)
		.deadline_ms(5_000)
		.build();

	let watcher = initialize_watcher(&config).unwrap();
	let handle = watcher.watch(build_watch_request("0xabc", &config).unwrap());
	let outcome = handle.outcome().await.unwrap();

	match &outcome {
		WatchOutcome::Satisfied { tick, record } => {
			assert_eq!(*tick, 1);
			assert_eq!(record.traces()[0].height, 42);
		}
		other => panic!("Expected Satisfied, got {:?}", other),
	}
	mock.assert_async().await;
}

#[test]
#[traced_test]
fn test_report_outcome_logs_packet_route() {
	let record = TraceRecordBuilder::new()
		.trace_type(TraceType::PacketRecv)
		.chain("Holesky", "17000")
		.build_record()
		.with_route(PacketRoute {
			source_chain: Some("Sepolia".to_string()),
			destination_chain: Some("Holesky".to_string()),
			packet_recv_transaction_hash: Some("0xrecv".to_string()),
		});

	report_outcome("0xabc", &WatchOutcome::Satisfied { tick: 3, record });

	assert!(logs_contain("Packet route"));
	assert!(logs_contain("source=\"Sepolia\""));
	assert!(logs_contain("recv_tx=\"0xrecv\""));
}

#[test]
fn test_initialize_watcher_rejects_invalid_url() {
	let config = WatchConfigBuilder::new().url("not a url").build();
	assert!(initialize_watcher(&config).is_err());
}
