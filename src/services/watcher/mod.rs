mod error;
mod handle;
mod service;

pub use error::WatcherError;
pub use handle::WatchHandle;
pub use service::{run_watch, TransferWatcher};
