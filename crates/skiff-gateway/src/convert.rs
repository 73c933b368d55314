//! Conversion between Skiff types and the Anthropic wire format.

use skiff_core::{
    ContentBlock, GatewayError, ToolDeclaration, ToolInvocation, Transcript, Turn,
};

use crate::config::GatewayConfig;
use crate::types;

/// Build the request body for a transcript.
///
/// Adjacent turns that travel under the same wire role are merged into a
/// single message, which keeps user/assistant alternation even when a human
/// line follows a tool-results turn.
pub(crate) fn build_request<'a>(
    config: &'a GatewayConfig,
    transcript: &'a Transcript,
    tools: &'a [ToolDeclaration],
) -> types::Request<'a> {
    let mut messages: Vec<types::Message<'a>> = Vec::with_capacity(transcript.len());

    for turn in transcript {
        let role = turn.role().wire_name();
        let blocks: Vec<_> = turn.content().iter().filter_map(convert_block).collect();
        // A message with no content is rejected by the API.
        if blocks.is_empty() {
            continue;
        }

        match messages.last_mut() {
            Some(last) if last.role == role => last.content.extend(blocks),
            _ => messages.push(types::Message {
                role,
                content: blocks,
            }),
        }
    }

    types::Request {
        model: &config.model,
        max_tokens: config.max_tokens,
        system: config.system.as_deref(),
        messages,
        tools: tools
            .iter()
            .map(|tool| types::Tool {
                name: &tool.name,
                description: &tool.description,
                input_schema: &tool.input_schema,
            })
            .collect(),
    }
}

fn convert_block(block: &ContentBlock) -> Option<types::ContentBlock<'_>> {
    match block {
        // The API rejects empty text blocks.
        ContentBlock::Text { text } if text.is_empty() => None,
        ContentBlock::Text { text } => Some(types::ContentBlock::Text { text }),
        ContentBlock::ToolInvocation(invocation) => Some(types::ContentBlock::ToolUse {
            id: &invocation.id,
            name: &invocation.name,
            input: &invocation.input,
        }),
        ContentBlock::ToolResult(result) => Some(types::ContentBlock::ToolResult {
            tool_use_id: &result.invocation_id,
            content: &result.output,
            is_error: result.is_error,
        }),
    }
}

/// Convert an API response into a model turn.
pub(crate) fn convert_response(response: types::Response) -> Result<Turn, GatewayError> {
    let mut blocks = Vec::with_capacity(response.content.len());

    for content in response.content {
        match content.content_type.as_str() {
            "text" => blocks.push(ContentBlock::text(content.text.unwrap_or_default())),
            "tool_use" => {
                let (Some(id), Some(name)) = (content.id, content.name) else {
                    return Err(GatewayError::ResponseFormat {
                        message: "tool_use block without id or name".into(),
                    });
                };
                let input = content
                    .input
                    .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
                blocks.push(ToolInvocation::new(id, name, input).into());
            }
            other => tracing::debug!(block_type = other, "Skipping unsupported content block"),
        }
    }

    if let Some(usage) = &response.usage {
        tracing::debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            stop_reason = response.stop_reason.as_deref().unwrap_or("unknown"),
            "Model replied"
        );
    }

    Ok(Turn::model(blocks))
}

/// Convert a non-success HTTP response into an error.
pub(crate) fn convert_error(status: u16, body: &str) -> GatewayError {
    let message = match serde_json::from_str::<types::ErrorResponse>(body) {
        Ok(parsed) => match parsed.error.error_type {
            Some(kind) => format!("{kind}: {}", parsed.error.message),
            None => parsed.error.message,
        },
        Err(_) if body.is_empty() => "empty response body".to_string(),
        Err(_) => body.to_string(),
    };
    GatewayError::Http { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use skiff_core::ToolResult;

    fn transcript() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push(Turn::human("what's in main.rs?"));
        transcript.push(Turn::model(vec![
            ContentBlock::text("Let me look."),
            ToolInvocation::new("toolu_1", "read_file", json!({"path": "main.rs"})).into(),
        ]));
        transcript.push(
            Turn::tool_results(vec![ToolResult::success("toolu_1", "fn main() {}")]).unwrap(),
        );
        transcript
    }

    #[test]
    fn request_uses_wire_roles_and_block_types() {
        let config = GatewayConfig::default();
        let transcript = transcript();
        let request = build_request(&config, &transcript, &[]);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "claude-3-7-sonnet-latest");
        assert_eq!(value["max_tokens"], 1024);
        assert!(value.get("tools").is_none());
        assert!(value.get("system").is_none());

        let messages = value["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"][1]["type"], "tool_use");
        assert_eq!(messages[1]["content"][1]["input"]["path"], "main.rs");
        assert_eq!(messages[2]["content"][0]["type"], "tool_result");
        assert_eq!(messages[2]["content"][0]["tool_use_id"], "toolu_1");
        assert!(messages[2]["content"][0].get("is_error").is_none());
    }

    #[test]
    fn model_turn_without_content_is_omitted() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::human("first"));
        transcript.push(Turn::model(vec![ContentBlock::text("")]));
        transcript.push(Turn::human("second"));
        let config = GatewayConfig::default();

        let value = serde_json::to_value(build_request(&config, &transcript, &[])).unwrap();

        let messages = value["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"].as_array().unwrap().len(), 2);
        assert_eq!(messages[0]["content"][1]["text"], "second");
    }

    #[test]
    fn error_results_carry_flag() {
        let mut transcript = Transcript::new();
        transcript.push(
            Turn::tool_results(vec![ToolResult::error("t", "tool not found")]).unwrap(),
        );
        let config = GatewayConfig::default();
        let value = serde_json::to_value(build_request(&config, &transcript, &[])).unwrap();
        assert_eq!(value["messages"][0]["content"][0]["is_error"], true);
    }

    #[test]
    fn adjacent_user_turns_are_coalesced() {
        let mut transcript = transcript();
        transcript.push(Turn::human("thanks, now continue"));

        let config = GatewayConfig::default();
        let value = serde_json::to_value(build_request(&config, &transcript, &[])).unwrap();
        let messages = value["messages"].as_array().unwrap();

        assert_eq!(messages.len(), 3);
        let last = messages[2]["content"].as_array().unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last[0]["type"], "tool_result");
        assert_eq!(last[1]["text"], "thanks, now continue");
    }

    #[test]
    fn tools_and_system_are_included() {
        let config = GatewayConfig {
            system: Some("Be terse.".into()),
            ..Default::default()
        };
        let tools = vec![ToolDeclaration {
            name: "read_file".into(),
            description: "Read a file".into(),
            input_schema: json!({"type": "object", "properties": {}}),
        }];
        let transcript = transcript();
        let value = serde_json::to_value(build_request(&config, &transcript, &tools)).unwrap();

        assert_eq!(value["system"], "Be terse.");
        assert_eq!(value["tools"][0]["name"], "read_file");
        assert_eq!(value["tools"][0]["input_schema"]["type"], "object");
    }

    #[test]
    fn response_keeps_text_and_tool_use_in_order() {
        let response: types::Response = serde_json::from_value(json!({
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "Listing files."},
                {"type": "tool_use", "id": "toolu_a", "name": "list_files", "input": {}},
                {"type": "tool_use", "id": "toolu_b", "name": "read_file", "input": {"path": "x"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }))
        .unwrap();

        let turn = convert_response(response).unwrap();
        assert_eq!(turn.content().len(), 3);
        assert_eq!(turn.text(), "Listing files.");
        let ids: Vec<_> = turn.invocations().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["toolu_a", "toolu_b"]);
    }

    #[test]
    fn tool_use_without_id_is_a_format_error() {
        let response: types::Response = serde_json::from_value(json!({
            "content": [{"type": "tool_use", "name": "read_file", "input": {}}]
        }))
        .unwrap();
        assert!(matches!(
            convert_response(response),
            Err(GatewayError::ResponseFormat { .. })
        ));
    }

    #[test]
    fn error_body_is_parsed() {
        let err = convert_error(
            401,
            r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#,
        );
        assert_eq!(
            err.to_string(),
            "HTTP 401: authentication_error: invalid x-api-key"
        );

        let err = convert_error(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }
}
