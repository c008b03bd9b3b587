use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// User agent sent with every provider request
pub const USER_AGENT: &str = concat!("pushcast/", env!("CARGO_PKG_VERSION"));

/// Global HTTP client instance shared by all providers
///
/// This client is initialized lazily on first access and reused across the application.
///
/// # Features
/// - **Connection pooling**: Reuses TCP connections across providers and sends
/// - **Compression**: Supports gzip, deflate, brotli, and zstd compression
/// - **Timeouts**: 10s connect timeout; the total timeout is set per request by
///   the caller so one slow provider cannot stretch another's budget
///
/// # Example
/// ```ignore
/// use crate::external::client::HTTP_CLIENT;
///
/// let response = HTTP_CLIENT
///     .post("https://api.day.app/key")
///     .timeout(Duration::from_secs(10))
///     .json(&body)
///     .send()
///     .await?;
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    client_builder()
        .build()
        .expect("Failed to build HTTP client")
});

fn client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        // Timeouts
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        // Enable compression (gzip, deflate, brotli, zstd)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(USER_AGENT)
}

/// Build a dedicated client that routes every scheme through `proxy`
///
/// # Arguments
/// * `proxy` - Proxy URL (`http://`, `https://` or `socks5://`)
///
/// # Returns
/// A client with the same defaults as [`HTTP_CLIENT`] plus the proxy
pub fn proxied_client(proxy: &str) -> AppResult<reqwest::Client> {
    let proxy = reqwest::Proxy::all(proxy).map_err(|e| AppError::Validation {
        field: "proxy".to_string(),
        reason: e.to_string(),
    })?;

    Ok(client_builder().proxy(proxy).build()?)
}
