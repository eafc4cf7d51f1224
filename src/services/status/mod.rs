//! Transfer status service client.
//!
//! The watcher only depends on [`StatusClientTrait`]; [`GraphQlStatusClient`]
//! implements it against a GraphQL endpoint over HTTP.

mod client;
mod error;
mod query;

pub use client::{parse_status_response, GraphQlStatusClient, StatusClientTrait};
pub use error::StatusQueryError;
pub use query::{StatusQuery, PACKET_TRACES_QUERY, TRANSFER_TRACES_QUERY};
