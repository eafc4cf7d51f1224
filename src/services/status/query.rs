//! GraphQL documents for looking up the traces of a transfer.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{fmt, str::FromStr};

/// Traces of a transfer, looked up by the hash of the sending transaction
pub const TRANSFER_TRACES_QUERY: &str = r#"query TransferTraces($txHash: String!) {
  v2_transfers(where: { transfer_send_transaction_hash: { _eq: $txHash } }) {
    traces {
      type
      height
      transaction_hash
      block_hash
      chain {
        display_name
        universal_chain_id
      }
    }
  }
}"#;

/// Traces of an IBC packet, looked up by the hash of the sending transaction
pub const PACKET_TRACES_QUERY: &str = r#"query PacketTraces($txHash: String!) {
  v1_ibc_union_packets(where: { packet_send_transaction_hash: { _eq: $txHash } }) {
    source_chain {
      display_name
    }
    destination_chain {
      display_name
    }
    packet_recv_transaction_hash
    traces {
      type
      height
      transaction_hash
      block_hash
      event_index
      chain {
        display_name
        universal_chain_id
      }
    }
  }
}"#;

/// Which collection of the status service to read traces from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusQuery {
	/// Token transfers (`v2_transfers`)
	#[default]
	Transfers,
	/// Raw IBC packets (`v1_ibc_union_packets`)
	Packets,
}

impl StatusQuery {
	/// Field under `data` holding the returned entries
	pub fn collection(&self) -> &'static str {
		match self {
			Self::Transfers => "v2_transfers",
			Self::Packets => "v1_ibc_union_packets",
		}
	}

	pub fn document(&self) -> &'static str {
		match self {
			Self::Transfers => TRANSFER_TRACES_QUERY,
			Self::Packets => PACKET_TRACES_QUERY,
		}
	}

	/// Request body for the given transaction hash
	///
	/// The hash is passed as a variable and never spliced into the document.
	pub fn payload(&self, tx_hash: &str) -> Value {
		json!({
			"query": self.document(),
			"variables": { "txHash": tx_hash }
		})
	}
}

impl FromStr for StatusQuery {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"transfers" | "v2_transfers" => Ok(Self::Transfers),
			"packets" | "v1_ibc_union_packets" => Ok(Self::Packets),
			other => Err(format!(
				"Unknown status query '{}', expected 'transfers' or 'packets'",
				other
			)),
		}
	}
}

impl fmt::Display for StatusQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Transfers => write!(f, "transfers"),
			Self::Packets => write!(f, "packets"),
		}
	}
}
