//! # Skiff Tools
//!
//! The tool side of the agent loop:
//!
//! - [`registry`]: a fixed name → tool mapping built once at startup
//! - [`dispatcher`]: resolves model invocations against a registry and turns
//!   every outcome into a [`ToolResult`](skiff_core::ToolResult)
//! - [`standard`]: the built-in filesystem tools (`read_file`, `list_files`, `edit_file`)

/// Invocation dispatch with uniform error handling.
pub mod dispatcher;
/// Tool registry implementations.
pub mod registry;
/// Standard tool library.
pub mod standard;

pub use dispatcher::Dispatcher;
pub use registry::{InMemoryToolRegistry, RegistryError, ToolRegistry};
pub use skiff_core::{ExecutionResult, FailureReason, StandardTool, Tool, ToolDeclaration};
pub use standard::{EditFileTool, EditPolicy, ListFilesTool, ReadFileTool, ToolsConfig};
