//! # Skiff Testing
//!
//! Test doubles for driving a [`skiff::Session`] without a network or a
//! terminal:
//!
//! - [`ScriptedGateway`]: replays queued model turns and records transcripts
//! - [`RecordingRenderer`]: captures prompts, model text and tool traces
//! - [`MockTool`]: a tool with canned responses and call history
//! - [`turns`]: builders for model replies
//!
//! ```rust
//! use skiff::{LineInput, Session};
//! use skiff_testing::{RecordingRenderer, ScriptedGateway, turns::text_reply};
//! use skiff_tools::{Dispatcher, InMemoryToolRegistry};
//!
//! # tokio_test::block_on(async {
//! let gateway = ScriptedGateway::with_replies([text_reply("Hello!")]);
//! let renderer = RecordingRenderer::new();
//! let mut session = Session::new(
//!     gateway.clone(),
//!     Dispatcher::new(InMemoryToolRegistry::new()),
//!     LineInput::new(&b"hi\n"[..]),
//!     renderer.clone(),
//! );
//!
//! session.run().await.unwrap();
//! assert_eq!(renderer.model_texts(), vec!["Hello!"]);
//! # });
//! ```

pub mod gateway;
pub mod mock_tools;
pub mod render;
pub mod turns;

pub use gateway::ScriptedGateway;
pub use mock_tools::MockTool;
pub use render::{RecordingRenderer, Rendered};
