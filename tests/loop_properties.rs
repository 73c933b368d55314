//! Property-based tests for transcript shape.

use proptest::prelude::*;
use serde_json::json;
use skiff::{LineInput, Session};
use skiff_core::Role;
use skiff_testing::turns::{text_reply, tool_calls_reply};
use skiff_testing::{MockTool, RecordingRenderer, ScriptedGateway};
use skiff_tools::{Dispatcher, InMemoryToolRegistry};
use std::io::Cursor;
use std::sync::Arc;

fn human_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 ?!.]{0,20}[a-zA-Z0-9?!.]", 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// N human lines answered with plain text yield exactly 2N turns.
    #[test]
    fn text_only_conversation_has_two_turns_per_line(lines in human_lines()) {
        let input: String = lines.iter().map(|l| format!("{l}\n")).collect();
        let input = Cursor::new(input.into_bytes());
        let gateway = ScriptedGateway::with_replies(
            (0..lines.len()).map(|i| text_reply(&format!("reply {i}"))),
        );
        let renderer = RecordingRenderer::new();
        let mut session = Session::new(
            gateway.clone(),
            Dispatcher::new(InMemoryToolRegistry::new()),
            LineInput::new(input),
            renderer.clone(),
        );

        let summary = tokio_test::block_on(session.run()).unwrap();

        prop_assert_eq!(session.transcript().len(), 2 * lines.len());
        prop_assert_eq!(summary.human_turns, lines.len());
        prop_assert_eq!(renderer.prompt_count(), lines.len() + 1);
        for (i, turn) in session.transcript().iter().enumerate() {
            let expected = if i % 2 == 0 { Role::Human } else { Role::Model };
            prop_assert_eq!(turn.role(), expected);
        }
    }

    /// k invocations in one model turn yield one results turn with k results
    /// in invocation order.
    #[test]
    fn k_invocations_yield_one_turn_of_k_results(
        calls in prop::collection::vec((prop::bool::ANY, 0u32..100), 1..8)
    ) {
        let ok = MockTool::new("ok").with_default_response("fine");
        let bad = MockTool::new("bad").with_default_failure("broken");
        let registry = InMemoryToolRegistry::new()
            .try_with_tool(Arc::new(ok.clone()))
            .and_then(|r| r.try_with_tool(Arc::new(bad.clone())))
            .unwrap();

        let invocations = calls
            .iter()
            .map(|(succeed, n)| (if *succeed { "ok" } else { "bad" }, json!({ "n": n })));
        let gateway =
            ScriptedGateway::with_replies([tool_calls_reply(invocations), text_reply("done")]);

        let mut session = Session::new(
            gateway.clone(),
            Dispatcher::new(registry),
            LineInput::new(&b"go\n"[..]),
            RecordingRenderer::new(),
        );
        let summary = tokio_test::block_on(session.run()).unwrap();

        let turns = session.transcript().turns();
        prop_assert_eq!(turns.len(), 4);
        prop_assert_eq!(turns[2].role(), Role::ToolResults);

        let invocation_ids: Vec<_> = turns[1].invocations().map(|i| i.id.clone()).collect();
        let result_ids: Vec<_> = turns[2].results().map(|r| r.invocation_id.clone()).collect();
        prop_assert_eq!(&result_ids, &invocation_ids);

        let failures: Vec<_> = turns[2].results().map(|r| r.is_error).collect();
        let expected: Vec<_> = calls.iter().map(|(succeed, _)| !succeed).collect();
        prop_assert_eq!(failures, expected);

        prop_assert_eq!(summary.tool_invocations, calls.len());
        prop_assert_eq!(ok.call_count() + bad.call_count(), calls.len());

        // The second model call saw the results turn last.
        let received = gateway.received();
        prop_assert_eq!(received[1].last().map(|t| t.role()), Some(Role::ToolResults));
    }
}
