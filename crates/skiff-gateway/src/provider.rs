//! Anthropic implementation of [`InferenceGateway`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use skiff_core::{GatewayError, GatewayResult, InferenceGateway, ToolDeclaration, Transcript, Turn};
use tracing::instrument;

use crate::config::GatewayConfig;
use crate::convert;

/// Gateway to the Anthropic Messages API.
///
/// # Example
///
/// ```rust,no_run
/// use skiff_core::{InferenceGateway, Transcript, Turn};
/// use skiff_gateway::{AnthropicGateway, GatewayConfig};
///
/// # async fn example() -> Result<(), skiff_core::GatewayError> {
/// let gateway = AnthropicGateway::new(GatewayConfig {
///     api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
///     ..Default::default()
/// })?;
///
/// let mut transcript = Transcript::new();
/// transcript.push(Turn::human("Hello!"));
/// let reply = gateway.infer(&transcript, &[]).await?;
/// println!("{}", reply.text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AnthropicGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl AnthropicGateway {
    /// Create a gateway. Fails when the API key is empty or the HTTP client
    /// cannot be built.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GatewayError::MissingApiKey);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| {
                GatewayError::InvalidRequest(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn default_headers(&self) -> GatewayResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.config.api_key).map_err(|_| {
                GatewayError::InvalidRequest("API key contains invalid header characters".into())
            })?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.config.api_version).map_err(|_| {
                GatewayError::InvalidRequest(
                    "API version contains invalid header characters".into(),
                )
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn messages_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/v1/messages")
    }

    fn map_send_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout {
                elapsed_ms: self
                    .config
                    .timeout
                    .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            }
        } else {
            GatewayError::Transport {
                message: e.to_string(),
                retryable: e.is_connect(),
            }
        }
    }
}

#[async_trait]
impl InferenceGateway for AnthropicGateway {
    #[instrument(
        skip_all,
        fields(model = %self.config.model, turns = transcript.len(), tools = tools.len())
    )]
    async fn infer(
        &self,
        transcript: &Transcript,
        tools: &[ToolDeclaration],
    ) -> GatewayResult<Turn> {
        let body = convert::build_request(&self.config, transcript, tools);
        tracing::debug!(messages = body.messages.len(), "Sending request");

        let response = self
            .client
            .post(self.messages_url())
            .headers(self.default_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = convert::convert_error(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %err, "Request rejected");
            return Err(err);
        }

        let api_response: crate::types::Response =
            response.json().await.map_err(|e| GatewayError::ResponseFormat {
                message: format!("failed to parse Anthropic response: {e}"),
            })?;

        convert::convert_response(api_response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn gateway(config: GatewayConfig) -> AnthropicGateway {
        AnthropicGateway::new(GatewayConfig {
            api_key: "test-key".into(),
            ..config
        })
        .unwrap()
    }

    #[test]
    fn test_missing_api_key() {
        let err = AnthropicGateway::new(GatewayConfig::default()).unwrap_err();
        assert!(matches!(err, GatewayError::MissingApiKey));

        let err = AnthropicGateway::new(GatewayConfig {
            api_key: "   ".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, GatewayError::MissingApiKey));
    }

    #[test]
    fn test_messages_url() {
        let gateway = gateway(GatewayConfig::default());
        assert_eq!(gateway.messages_url(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_messages_url_trailing_slash() {
        let gateway = gateway(GatewayConfig {
            base_url: "http://localhost:8080/".into(),
            ..Default::default()
        });
        assert_eq!(gateway.messages_url(), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_default_headers() {
        let gateway = gateway(GatewayConfig::default());
        let headers = gateway.default_headers().unwrap();
        assert_eq!(headers["x-api-key"], "test-key");
        assert_eq!(headers["anthropic-version"], "2023-06-01");
        assert_eq!(headers["content-type"], "application/json");
    }

    #[test]
    fn test_invalid_header_characters() {
        let gateway = gateway(GatewayConfig {
            api_version: "bad\nversion".into(),
            ..Default::default()
        });
        assert!(matches!(
            gateway.default_headers(),
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_model_and_timeout() {
        let gateway = gateway(GatewayConfig {
            model: "claude-sonnet-4-20250514".into(),
            timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        });
        assert_eq!(gateway.model(), "claude-sonnet-4-20250514");
        assert_eq!(gateway.config().timeout, Some(Duration::from_secs(30)));
    }
}
