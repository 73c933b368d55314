//! Gateway configuration.

use std::time::Duration;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-latest";

/// Output token budget per reply.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Configuration for the Anthropic gateway.
///
/// Use struct update syntax with [`Default`]:
///
/// ```rust
/// use skiff_gateway::GatewayConfig;
///
/// let config = GatewayConfig {
///     api_key: "sk-ant-...".into(),
///     ..Default::default()
/// };
/// assert_eq!(config.max_tokens, 1024);
/// ```
#[derive(Clone)]
pub struct GatewayConfig {
    /// Anthropic API key. Required.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Maximum output tokens per reply.
    pub max_tokens: u32,
    /// Base URL for the API. Override for proxies or testing.
    pub base_url: String,
    /// `anthropic-version` header value.
    pub api_version: String,
    /// Request timeout. `None` waits for as long as the transport allows.
    pub timeout: Option<Duration>,
    /// Optional system prompt sent with every request.
    pub system: Option<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("system", &self.system.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: "https://api.anthropic.com".into(),
            api_version: "2023-06-01".into(),
            timeout: None,
            system: None,
        }
    }
}
