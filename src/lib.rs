//! Cross-chain transfer status watcher.
//!
//! Polls a GraphQL status service for the trace records of a transfer and stops
//! once a terminal predicate holds, a deadline elapses, the query fails or the
//! caller cancels the watch.
//!
//! - `bootstrap`: Wiring of configuration, status client and watcher
//! - `models`: Trace records, watch requests, outcomes and configuration
//! - `services`: Status query client and the poll-until-condition watcher
//! - `utils`: Logging, HTTP, metrics and test helpers

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
