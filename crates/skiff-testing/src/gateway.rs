//! # Scripted Gateway
//!
//! An [`InferenceGateway`] that replays a fixed script of replies and records
//! every transcript it is shown.

use async_trait::async_trait;
use skiff_core::{
    GatewayError, GatewayResult, InferenceGateway, ToolDeclaration, Transcript, Turn,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
enum Step {
    Reply(Turn),
    Fail(GatewayError),
}

#[derive(Debug, Default)]
struct Shared {
    script: VecDeque<Step>,
    seen: Vec<Transcript>,
    declarations: Vec<Vec<ToolDeclaration>>,
}

/// Replays queued replies in order.
///
/// When the script runs out the gateway answers with
/// [`GatewayError::ResponseFormat`], so an unexpected extra model call fails
/// the session loudly. Clones share the script and the recordings.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGateway {
    shared: Arc<Mutex<Shared>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway that answers with the given turns in order.
    pub fn with_replies(replies: impl IntoIterator<Item = Turn>) -> Self {
        let gateway = Self::new();
        for reply in replies {
            gateway.push_reply(reply);
        }
        gateway
    }

    pub fn push_reply(&self, turn: Turn) -> &Self {
        self.lock().script.push_back(Step::Reply(turn));
        self
    }

    pub fn push_error(&self, error: GatewayError) -> &Self {
        self.lock().script.push_back(Step::Fail(error));
        self
    }

    /// Transcripts received, one per call.
    pub fn received(&self) -> Vec<Transcript> {
        self.lock().seen.clone()
    }

    /// Tool declarations received, one list per call.
    pub fn received_declarations(&self) -> Vec<Vec<ToolDeclaration>> {
        self.lock().declarations.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().seen.len()
    }

    pub fn remaining(&self) -> usize {
        self.lock().script.len()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl InferenceGateway for ScriptedGateway {
    async fn infer(
        &self,
        transcript: &Transcript,
        tools: &[ToolDeclaration],
    ) -> GatewayResult<Turn> {
        let mut shared = self.lock();
        shared.seen.push(transcript.clone());
        shared.declarations.push(tools.to_vec());

        match shared.script.pop_front() {
            Some(Step::Reply(turn)) => Ok(turn),
            Some(Step::Fail(error)) => Err(error),
            None => Err(GatewayError::ResponseFormat {
                message: "scripted gateway has no more replies".to_string(),
            }),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turns::text_reply;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let gateway = ScriptedGateway::with_replies([text_reply("one"), text_reply("two")]);
        let mut transcript = Transcript::new();
        transcript.push(Turn::human("hi"));

        assert_eq!(gateway.infer(&transcript, &[]).await.unwrap().text(), "one");
        assert_eq!(gateway.infer(&transcript, &[]).await.unwrap().text(), "two");
        assert!(gateway.infer(&transcript, &[]).await.is_err());

        assert_eq!(gateway.call_count(), 3);
        assert_eq!(gateway.received()[0].len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let gateway = ScriptedGateway::new();
        gateway.push_error(GatewayError::Timeout { elapsed_ms: 5 });

        let err = gateway.infer(&Transcript::new(), &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout { elapsed_ms: 5 }));
        assert_eq!(gateway.remaining(), 0);
    }
}
