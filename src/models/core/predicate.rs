//! Terminal predicates deciding when a watch has seen enough.
//!
//! A predicate is evaluated once per tick against the [`StatusRecord`] that
//! tick returned. Predicates must be pure: the watcher may evaluate them any
//! number of times and relies on the answer depending only on the record.

use crate::models::{StatusRecord, TraceType};

/// Condition over a status record that ends a watch successfully
pub trait TerminalPredicate: Send + Sync {
	/// Returns true when the record satisfies the condition
	fn is_satisfied(&self, record: &StatusRecord) -> bool;

	/// Short description used in logs
	fn describe(&self) -> String {
		"custom predicate".to_string()
	}
}

impl<F> TerminalPredicate for F
where
	F: Fn(&StatusRecord) -> bool + Send + Sync,
{
	fn is_satisfied(&self, record: &StatusRecord) -> bool {
		self(record)
	}
}

/// Satisfied when any trace of the given type is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceTypePresent(pub TraceType);

impl TerminalPredicate for TraceTypePresent {
	fn is_satisfied(&self, record: &StatusRecord) -> bool {
		record.contains(&self.0)
	}

	fn describe(&self) -> String {
		format!("any trace of type {}", self.0)
	}
}

/// Satisfied when every listed trace type is present
///
/// An empty list is satisfied by the first record returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllTraceTypes(pub Vec<TraceType>);

impl TerminalPredicate for AllTraceTypes {
	fn is_satisfied(&self, record: &StatusRecord) -> bool {
		self.0.iter().all(|trace_type| record.contains(trace_type))
	}

	fn describe(&self) -> String {
		let types: Vec<&str> = self.0.iter().map(TraceType::as_str).collect();
		format!("traces of types [{}]", types.join(", "))
	}
}

/// Satisfied when a trace of the given type was observed on a specific chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceTypeOnChain {
	pub trace_type: TraceType,
	pub universal_chain_id: String,
}

impl TerminalPredicate for TraceTypeOnChain {
	fn is_satisfied(&self, record: &StatusRecord) -> bool {
		record.traces().iter().any(|t| {
			t.trace_type == self.trace_type && t.chain.universal_chain_id == self.universal_chain_id
		})
	}

	fn describe(&self) -> String {
		format!(
			"trace of type {} on chain {}",
			self.trace_type, self.universal_chain_id
		)
	}
}
