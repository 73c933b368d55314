use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::conversation::ToolResult;
use crate::schema::InputSchema;

/// Built-in tool kinds for strongly-typed dispatch.
///
/// Each variant corresponds to one filesystem tool shipped with Skiff. Lookups
/// by wire name go through [`StandardTool::from_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardTool {
    ReadFile,
    ListFiles,
    EditFile,
}

impl StandardTool {
    /// Wire name advertised to the model.
    pub fn name(&self) -> &'static str {
        match self {
            StandardTool::ReadFile => "read_file",
            StandardTool::ListFiles => "list_files",
            StandardTool::EditFile => "edit_file",
        }
    }

    /// Try to parse a wire name into a StandardTool.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "read_file" => Some(StandardTool::ReadFile),
            "list_files" => Some(StandardTool::ListFiles),
            "edit_file" => Some(StandardTool::EditFile),
            _ => None,
        }
    }

    /// Get all standard tools as a slice, in registration order.
    pub fn all() -> &'static [StandardTool] {
        &[
            StandardTool::ReadFile,
            StandardTool::ListFiles,
            StandardTool::EditFile,
        ]
    }
}

impl std::fmt::Display for StandardTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Categorized reasons a tool invocation failed.
///
/// Every variant is recoverable: it is reported back to the model as an
/// error result and never ends the session. `Display` yields the exact
/// text the model sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureReason {
    /// No tool is registered under the requested name.
    #[error("tool not found")]
    ToolNotFound,
    /// Input could not be decoded or violates the tool's rules.
    #[error("{message}")]
    InvalidInput { message: String },
    /// A file or directory the tool needed does not exist.
    #[error("{resource}")]
    NotFound { resource: String },
    /// The operating system refused access.
    #[error("{message}")]
    PermissionDenied { message: String },
    /// Any other I/O failure.
    #[error("{message}")]
    IoError { message: String },
    /// Tool-specific failure.
    #[error("{message}")]
    Custom { category: String, message: String },
}

impl FailureReason {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        FailureReason::InvalidInput {
            message: message.into(),
        }
    }

    /// Classify an I/O error, keeping the OS message as the model-facing text.
    pub fn from_io(context: &str, error: &std::io::Error) -> Self {
        let message = format!("{context}: {error}");
        match error.kind() {
            std::io::ErrorKind::NotFound => FailureReason::NotFound { resource: message },
            std::io::ErrorKind::PermissionDenied => FailureReason::PermissionDenied { message },
            _ => FailureReason::IoError { message },
        }
    }

    /// Short category label for logs.
    pub fn category(&self) -> &str {
        match self {
            FailureReason::ToolNotFound => "tool_not_found",
            FailureReason::InvalidInput { .. } => "invalid_input",
            FailureReason::NotFound { .. } => "not_found",
            FailureReason::PermissionDenied { .. } => "permission_denied",
            FailureReason::IoError { .. } => "io_error",
            FailureReason::Custom { category, .. } => category,
        }
    }
}

/// The result of executing a tool.
///
/// Tools return either a success carrying the text shown to the model, or a
/// failure carrying a [`FailureReason`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Success { output: String },
    Failure { reason: FailureReason },
}

impl ExecutionResult {
    pub fn success(output: impl Into<String>) -> Self {
        ExecutionResult::Success {
            output: output.into(),
        }
    }

    pub fn failed(reason: FailureReason) -> Self {
        ExecutionResult::Failure { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionResult::Failure { .. })
    }

    /// Output text for success, error text for failure.
    pub fn output(&self) -> String {
        match self {
            ExecutionResult::Success { output } => output.clone(),
            ExecutionResult::Failure { reason } => reason.to_string(),
        }
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure { reason } => Some(reason),
        }
    }

    /// Convert into the result block for the given invocation.
    pub fn into_tool_result(self, invocation_id: impl Into<String>) -> ToolResult {
        match self {
            ExecutionResult::Success { output } => ToolResult::success(invocation_id, output),
            ExecutionResult::Failure { reason } => {
                ToolResult::error(invocation_id, reason.to_string())
            }
        }
    }
}

impl From<Result<String, FailureReason>> for ExecutionResult {
    fn from(result: Result<String, FailureReason>) -> Self {
        match result {
            Ok(output) => ExecutionResult::Success { output },
            Err(reason) => ExecutionResult::Failure { reason },
        }
    }
}

/// Tool advertisement sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A named capability the model may invoke.
///
/// Tools receive the raw JSON input of an invocation and must never panic on
/// malformed input: decoding problems are reported as
/// [`FailureReason::InvalidInput`].
pub trait Tool: Send + Sync {
    /// Unique name within a registry.
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// Declared input schema.
    fn input_schema(&self) -> InputSchema;

    /// Execute the tool against raw input.
    fn call(&self, input: &Value) -> ExecutionResult;

    /// Declaration in the form the inference gateway transmits.
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema().to_value(),
        }
    }
}

/// A tool with a statically typed input.
///
/// Wrap implementations in [`TypedToolAdapter`] to obtain a [`Tool`] that
/// decodes raw input before running.
pub trait TypedTool: Send + Sync {
    type Input: DeserializeOwned;

    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> InputSchema;
    fn run(&self, input: Self::Input) -> Result<String, FailureReason>;
}

/// Decode raw invocation input into a typed value.
pub fn decode_input<T: DeserializeOwned>(input: &Value) -> Result<T, FailureReason> {
    T::deserialize(input)
        .map_err(|e| FailureReason::invalid_input(format!("invalid tool input: {e}")))
}

/// Adapter exposing a [`TypedTool`] as a [`Tool`].
pub struct TypedToolAdapter<T: TypedTool> {
    inner: T,
}

impl<T: TypedTool> TypedToolAdapter<T> {
    pub fn new(tool: T) -> Self {
        Self { inner: tool }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: TypedTool> Tool for TypedToolAdapter<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn input_schema(&self) -> InputSchema {
        self.inner.input_schema()
    }

    fn call(&self, input: &Value) -> ExecutionResult {
        decode_input::<T::Input>(input)
            .and_then(|decoded| self.inner.run(decoded))
            .into()
    }
}
