//! Trace records reported by the transfer status service.
//!
//! A transfer moves through a series of stages (packet sent, received,
//! acknowledgement written, acknowledged). Each stage that has been observed
//! on-chain is reported as a [`TraceRecord`]. One poll of the status service
//! yields a [`StatusRecord`] holding every trace returned for that poll,
//! plus the packet's route when the service reports one.

use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Stage of a transfer's lifecycle as tagged by the status service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TraceType {
	/// Packet emitted on the source chain
	PacketSend,
	/// Light client update required before the packet can be received
	PacketSendLightClientUpdate,
	/// Packet received on the destination chain
	PacketRecv,
	/// Acknowledgement written on the destination chain
	WriteAck,
	/// Light client update required before the acknowledgement can be relayed
	WriteAckLightClientUpdate,
	/// Acknowledgement processed on the source chain
	PacketAck,
	/// Any tag this crate does not know about, preserved verbatim
	Other(String),
}

impl TraceType {
	/// Returns the wire tag for this trace type
	pub fn as_str(&self) -> &str {
		match self {
			Self::PacketSend => "PACKET_SEND",
			Self::PacketSendLightClientUpdate => "PACKET_SEND_LC_UPDATE",
			Self::PacketRecv => "PACKET_RECV",
			Self::WriteAck => "WRITE_ACK",
			Self::WriteAckLightClientUpdate => "WRITE_ACK_LC_UPDATE",
			Self::PacketAck => "PACKET_ACK",
			Self::Other(tag) => tag.as_str(),
		}
	}
}

impl From<&str> for TraceType {
	fn from(tag: &str) -> Self {
		match tag {
			"PACKET_SEND" => Self::PacketSend,
			"PACKET_RECV" => Self::PacketRecv,
			"WRITE_ACK" => Self::WriteAck,
			"PACKET_ACK" => Self::PacketAck,
			// The service numbers the update hops (_L0, _L1, ...)
			t if t.starts_with("PACKET_SEND_LC_UPDATE") => Self::PacketSendLightClientUpdate,
			t if t.starts_with("WRITE_ACK_LC_UPDATE") => Self::WriteAckLightClientUpdate,
			other => Self::Other(other.to_string()),
		}
	}
}

impl From<String> for TraceType {
	fn from(tag: String) -> Self {
		Self::from(tag.as_str())
	}
}

impl From<TraceType> for String {
	fn from(trace_type: TraceType) -> Self {
		trace_type.as_str().to_string()
	}
}

impl FromStr for TraceType {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::from(s.trim().to_ascii_uppercase().as_str()))
	}
}

impl fmt::Display for TraceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Chain on which a trace was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
	/// Human readable chain name, e.g. `Holesky`
	pub display_name: String,
	/// Chain identifier unique across ecosystems, e.g. `ethereum.17000`
	pub universal_chain_id: String,
}

/// A single observed stage of a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
	#[serde(rename = "type")]
	pub trace_type: TraceType,
	#[serde(deserialize_with = "deserialize_height")]
	pub height: u64,
	pub chain: ChainInfo,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transaction_hash: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub block_hash: Option<String>,
	/// Position of the event within its transaction
	#[serde(
		default,
		deserialize_with = "deserialize_event_index",
		skip_serializing_if = "Option::is_none"
	)]
	pub event_index: Option<u64>,
}

/// Counters the indexer emits either as JSON numbers or as decimal strings
#[derive(Deserialize)]
#[serde(untagged)]
enum Counter {
	Number(u64),
	Text(String),
}

impl Counter {
	fn value<E: serde::de::Error>(self) -> Result<u64, E> {
		match self {
			Self::Number(n) => Ok(n),
			Self::Text(s) => s.trim().parse().map_err(E::custom),
		}
	}
}

fn deserialize_height<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	Counter::deserialize(deserializer)?.value()
}

fn deserialize_event_index<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<Counter>::deserialize(deserializer)?
		.map(Counter::value)
		.transpose()
}

/// Where a packet came from and where it was received
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketRoute {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_chain: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub destination_chain: Option<String>,
	/// Hash of the transaction that received the packet on the destination
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub packet_recv_transaction_hash: Option<String>,
}

impl PacketRoute {
	pub fn is_empty(&self) -> bool {
		self.source_chain.is_none()
			&& self.destination_chain.is_none()
			&& self.packet_recv_transaction_hash.is_none()
	}
}

/// The trace records returned by one poll of the status service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
	traces: Vec<TraceRecord>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	route: Option<PacketRoute>,
}

impl StatusRecord {
	pub fn new(traces: Vec<TraceRecord>) -> Self {
		Self {
			traces,
			route: None,
		}
	}

	/// Attaches the packet route; an empty route is dropped
	pub fn with_route(mut self, route: PacketRoute) -> Self {
		self.route = (!route.is_empty()).then_some(route);
		self
	}

	pub fn route(&self) -> Option<&PacketRoute> {
		self.route.as_ref()
	}

	pub fn traces(&self) -> &[TraceRecord] {
		&self.traces
	}

	pub fn is_empty(&self) -> bool {
		self.traces.is_empty()
	}

	pub fn len(&self) -> usize {
		self.traces.len()
	}

	/// Returns true if any trace of the given type was observed
	pub fn contains(&self, trace_type: &TraceType) -> bool {
		self.traces.iter().any(|t| &t.trace_type == trace_type)
	}

	/// Returns the first trace of the given type, if any
	pub fn find(&self, trace_type: &TraceType) -> Option<&TraceRecord> {
		self.traces.iter().find(|t| &t.trace_type == trace_type)
	}

	/// Groups the traces by the universal chain id they were observed on
	///
	/// Traces keep the order in which the service returned them.
	pub fn by_chain(&self) -> BTreeMap<&str, Vec<&TraceRecord>> {
		let mut chains: BTreeMap<&str, Vec<&TraceRecord>> = BTreeMap::new();
		for trace in &self.traces {
			chains
				.entry(trace.chain.universal_chain_id.as_str())
				.or_default()
				.push(trace);
		}
		chains
	}

	pub fn into_traces(self) -> Vec<TraceRecord> {
		self.traces
	}
}

impl From<Vec<TraceRecord>> for StatusRecord {
	fn from(traces: Vec<TraceRecord>) -> Self {
		Self::new(traces)
	}
}
