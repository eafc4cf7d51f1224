//! Core services implementing the watcher.
//!
//! - `status`: Querying the transfer status service
//! - `watcher`: The poll-until-condition loop and its handle

pub mod status;
pub mod watcher;
