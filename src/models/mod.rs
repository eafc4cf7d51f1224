//! Domain models and data structures for transfer watching.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (trace records, predicates, watches)

mod config;
mod core;

// Re-export core types
pub use core::{
	AllTraceTypes, ChainInfo, PacketRoute, StatusRecord, TerminalPredicate, TraceRecord, TraceType,
	TraceTypeOnChain, TraceTypePresent, WatchOutcome, WatchRequest, WatchState,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader, EndpointConfig, HttpRetrySettings, WatchConfig};
