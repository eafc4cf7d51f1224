//! Utility modules for common functionality.
//!
//! - constants: Default values for configuration and the CLI
//! - http: Retryable HTTP client construction
//! - logging: Logging utilities
//! - metrics: Prometheus metrics for watches
//! - tests: Builders for test fixtures

mod http;

pub mod constants;
pub mod logging;
pub mod metrics;

pub use constants::*;
pub use http::{build_http_client, create_retryable_http_client, HttpClientError, HttpRetryConfig};
