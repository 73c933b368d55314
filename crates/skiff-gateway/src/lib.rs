//! # Skiff Gateway
//!
//! [`AnthropicGateway`] implements [`InferenceGateway`](skiff_core::InferenceGateway)
//! over the Anthropic Messages API (`POST /v1/messages`). One call sends the
//! whole transcript plus tool declarations and returns the model's next turn.
//! Streaming is not used.

mod config;
mod convert;
mod provider;
mod types;

pub use config::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, GatewayConfig};
pub use provider::AnthropicGateway;
