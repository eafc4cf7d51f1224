//! Core domain models for watching transfers.
//!
//! - `trace`: Trace records and per-tick status records
//! - `predicate`: Terminal predicates evaluated on each tick
//! - `watch`: Watch requests, states and outcomes

mod predicate;
mod trace;
mod watch;

pub use predicate::{AllTraceTypes, TerminalPredicate, TraceTypeOnChain, TraceTypePresent};
pub use trace::{ChainInfo, PacketRoute, StatusRecord, TraceRecord, TraceType};
pub use watch::{WatchOutcome, WatchRequest, WatchState};
