//! Builders for model turns.

use serde_json::Value;
use skiff_core::{ContentBlock, ToolInvocation, Turn};

/// Invocation with a fresh `toolu_`-style id.
pub fn invocation(name: &str, input: Value) -> ToolInvocation {
    ToolInvocation::new(
        format!("toolu_{}", uuid::Uuid::new_v4().simple()),
        name,
        input,
    )
}

/// Model turn with a single text block.
pub fn text_reply(text: &str) -> Turn {
    Turn::model([ContentBlock::text(text)])
}

/// Model turn that invokes one tool.
pub fn tool_call_reply(name: &str, input: Value) -> Turn {
    Turn::model([invocation(name, input).into()])
}

/// Model turn that invokes several tools in order.
pub fn tool_calls_reply(calls: impl IntoIterator<Item = (&'static str, Value)>) -> Turn {
    Turn::model(
        calls
            .into_iter()
            .map(|(name, input)| ContentBlock::from(invocation(name, input))),
    )
}
