//! Conversation data model.
//!
//! A [`Transcript`] is an ordered list of [`Turn`]s. Turns are immutable once
//! appended and the transcript only ever grows: there is no API to remove,
//! reorder or edit a turn after it has been pushed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who contributed a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A line typed by the person at the terminal.
    Human,
    /// A reply produced by the language model.
    Model,
    /// Synthetic turn carrying the results of the model's tool invocations.
    ToolResults,
}

impl Role {
    /// Role name used on the wire: tool results travel as user content.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Role::Human | Role::ToolResults => "user",
            Role::Model => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Human => write!(f, "human"),
            Role::Model => write!(f, "model"),
            Role::ToolResults => write!(f, "tool-results"),
        }
    }
}

/// A model-issued request to run a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Identifier chosen by the model; echoed back in the matching result.
    pub id: String,
    /// Registered tool name.
    pub name: String,
    /// Raw structured input, decoded by the tool itself.
    pub input: Value,
}

impl ToolInvocation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// Outcome of one tool invocation, fed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub invocation_id: String,
    pub output: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(invocation_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            output: output.into(),
            is_error: false,
        }
    }

    pub fn error(invocation_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            output: output.into(),
            is_error: true,
        }
    }
}

/// A typed unit of content within a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text { text: String },
    /// Tool invocation request (model turns only).
    ToolInvocation(ToolInvocation),
    /// Tool result (tool-result turns only).
    ToolResult(ToolResult),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_invocation(&self) -> Option<&ToolInvocation> {
        match self {
            ContentBlock::ToolInvocation(invocation) => Some(invocation),
            _ => None,
        }
    }

    pub fn as_result(&self) -> Option<&ToolResult> {
        match self {
            ContentBlock::ToolResult(result) => Some(result),
            _ => None,
        }
    }
}

impl From<ToolInvocation> for ContentBlock {
    fn from(invocation: ToolInvocation) -> Self {
        ContentBlock::ToolInvocation(invocation)
    }
}

impl From<ToolResult> for ContentBlock {
    fn from(result: ToolResult) -> Self {
        ContentBlock::ToolResult(result)
    }
}

/// One party's contribution to the conversation.
///
/// Fields are private so that a turn cannot be altered after construction.
/// Each constructor only admits the block kinds its role may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: Vec<ContentBlock>,
}

impl Turn {
    /// A human turn holding a single text block.
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// A model turn. Tool results are not something a model can emit and are dropped.
    pub fn model(content: impl IntoIterator<Item = ContentBlock>) -> Self {
        Self {
            role: Role::Model,
            content: content
                .into_iter()
                .filter(|block| !matches!(block, ContentBlock::ToolResult(_)))
                .collect(),
        }
    }

    /// A synthetic turn carrying tool results, in invocation order.
    ///
    /// Returns `None` when there are no results: an empty result turn is never
    /// appended to a transcript.
    pub fn tool_results(results: impl IntoIterator<Item = ToolResult>) -> Option<Self> {
        let content: Vec<ContentBlock> = results.into_iter().map(ContentBlock::from).collect();
        if content.is_empty() {
            None
        } else {
            Some(Self {
                role: Role::ToolResults,
                content,
            })
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &[ContentBlock] {
        &self.content
    }

    /// Tool invocations in the order the model issued them.
    pub fn invocations(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.content.iter().filter_map(ContentBlock::as_invocation)
    }

    /// Tool results in the order they were produced.
    pub fn results(&self) -> impl Iterator<Item = &ToolResult> {
        self.content.iter().filter_map(ContentBlock::as_result)
    }

    pub fn has_invocations(&self) -> bool {
        self.invocations().next().is_some()
    }

    /// Text blocks joined by newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Ordered, append-only conversation history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn. This is the only mutation a transcript supports.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// Count of turns with the given role.
    pub fn count(&self, role: Role) -> usize {
        self.turns.iter().filter(|turn| turn.role() == role).count()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
