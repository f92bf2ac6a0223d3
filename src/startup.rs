use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Error};

/// Build the HTTP client shared by every upstream call
///
/// Every request carries the configured total timeout and the shorter connect timeout.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client, Error> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(client)
}

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to `default_filter`
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
