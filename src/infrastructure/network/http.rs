// HTTP client utilities
use crate::domain::error::TranslateError;
use reqwest::Client;

/// Shared HTTP client. Per-request timeouts are set by the caller, this one
/// only bounds connection setup.
pub fn create_client(connect_timeout_secs: u64) -> Result<Client, TranslateError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .connect_timeout(std::time::Duration::from_secs(connect_timeout_secs))
        .user_agent(concat!("dolmetscher/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
