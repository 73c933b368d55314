//! # Skiff Core
//!
//! Core types shared by every Skiff crate:
//!
//! - **Conversation**: [`Turn`], [`ContentBlock`] and the append-only [`Transcript`]
//! - **Tools**: the [`Tool`] contract, [`ExecutionResult`] and [`FailureReason`]
//! - **Schema**: hand-declared [`InputSchema`] descriptors advertised to the model
//! - **Gateway**: the [`InferenceGateway`] boundary and its [`GatewayError`]

pub mod conversation;
pub mod error;
pub mod gateway;
pub mod schema;
pub mod tool;

pub use conversation::{ContentBlock, Role, ToolInvocation, ToolResult, Transcript, Turn};
pub use error::{GatewayError, GatewayResult};
pub use gateway::InferenceGateway;
pub use schema::{InputSchema, PropertyKind, SchemaProperty};
pub use tool::{
    ExecutionResult, FailureReason, StandardTool, Tool, ToolDeclaration, TypedTool,
    TypedToolAdapter, decode_input,
};
