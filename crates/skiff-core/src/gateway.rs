//! The inference boundary.
//!
//! An [`InferenceGateway`] performs exactly one request/response exchange with
//! a remote model: it receives the full transcript plus the tool declarations
//! and returns the model's next turn.

use async_trait::async_trait;

use crate::conversation::{Transcript, Turn};
use crate::error::GatewayResult;
use crate::tool::ToolDeclaration;

#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Send the transcript and return the model's reply.
    ///
    /// The returned turn has role [`Role::Model`](crate::Role::Model) and
    /// contains only text and tool invocation blocks.
    async fn infer(&self, transcript: &Transcript, tools: &[ToolDeclaration])
    -> GatewayResult<Turn>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

#[async_trait]
impl<G: InferenceGateway + ?Sized> InferenceGateway for Box<G> {
    async fn infer(
        &self,
        transcript: &Transcript,
        tools: &[ToolDeclaration],
    ) -> GatewayResult<Turn> {
        (**self).infer(transcript, tools).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

#[async_trait]
impl<G: InferenceGateway + ?Sized> InferenceGateway for std::sync::Arc<G> {
    async fn infer(
        &self,
        transcript: &Transcript,
        tools: &[ToolDeclaration],
    ) -> GatewayResult<Turn> {
        (**self).infer(transcript, tools).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ContentBlock;

    struct EchoGateway;

    #[async_trait]
    impl InferenceGateway for EchoGateway {
        async fn infer(
            &self,
            transcript: &Transcript,
            _tools: &[ToolDeclaration],
        ) -> GatewayResult<Turn> {
            let last = transcript.last().map(Turn::text).unwrap_or_default();
            Ok(Turn::model(vec![ContentBlock::text(format!("echo: {last}"))]))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn boxed_gateway_delegates() {
        let gateway: Box<dyn InferenceGateway> = Box::new(EchoGateway);
        let mut transcript = Transcript::new();
        transcript.push(Turn::human("hi"));

        let reply = gateway.infer(&transcript, &[]).await.unwrap();
        assert_eq!(reply.text(), "echo: hi");
        assert_eq!(gateway.model(), "echo");
    }
}
