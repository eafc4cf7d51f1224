//! Default values shared by configuration and the command line.

/// Public Union indexer queried when no endpoint is configured
pub const DEFAULT_GRAPHQL_URL: &str = "https://graphql.union.build";

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config/watcher.json";

pub const DEFAULT_INTERVAL_MS: u64 = 3_000;

/// Five minutes, after which a transfer is considered stuck
pub const DEFAULT_DEADLINE_MS: u64 = 300_000;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Directory for rolling log files when `LOG_MODE=file`
pub const DEFAULT_LOG_DIR: &str = "logs/";
