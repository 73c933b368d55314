//! # Runtime
//!
//! The orchestration loop and its terminal-facing edges.
//!
//! - **[`Session`]**: the turn-taking state machine. It reads a human line,
//!   calls the model, runs any requested tools and calls the model again with
//!   their results until a reply asks for no tools.
//! - **[`InputSource`]**: where human lines come from.
//! - **[`Renderer`]**: where the visible transcript goes.

mod input;
mod render;
mod session;

pub use input::{InputSource, LineInput};
pub use render::{AnsiRenderer, Renderer};
pub use session::{LoopState, Session, SessionSummary};
