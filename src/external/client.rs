use std::sync::LazyLock;
use std::time::Duration;

/// User-Agent sent with every outbound request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Global HTTP client shared by every outbound call.
///
/// Initialized lazily on first access. Sharing one client keeps the
/// connection pool warm across invocations handled by the same process.
///
/// Per-request settings (such as the webhook timeout) are applied on the
/// request builder; the values here are upper bounds.
///
/// # Example
/// ```ignore
/// use crate::external::client::HTTP_CLIENT;
///
/// let response = HTTP_CLIENT
///     .post("https://hooks.slack.com/services/...")
///     .json(&message)
///     .send()
///     .await?;
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});
