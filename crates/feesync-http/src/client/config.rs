//! Configuration for the gateway HTTP client.

/// Configuration for the gateway HTTP client.
///
/// There is deliberately no retry knob here: the gateway is never
/// retried automatically. The one automatic fallback in the system
/// (single create colliding with an existing record) lives in the
/// coordinator, not the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Gateway base URL, e.g. `https://api.example.org`.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Log every request/response at debug level.
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30000,
            connect_timeout_secs: 10,
            enable_logging: false,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}
