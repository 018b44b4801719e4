/// Configures HTTP timeouts and identification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Connection establishment timeout in milliseconds.
    ///
    /// Ignored on `wasm32` targets where the browser owns the connection.
    pub connect_timeout_ms: Option<u64>,
    /// Replaces the default `Ggtasker Rust SDK v<version>` user agent.
    pub user_agent: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            connect_timeout_ms: None,
            user_agent: None,
        }
    }
}
