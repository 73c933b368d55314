//! # Skiff
//!
//! A terminal agent that lets a language model read, list and edit local
//! files while it converses with a human.
//!
//! The crates split along the loop's seams:
//!
//! - [`skiff_core`]: transcript model, tool contract, gateway trait
//! - [`skiff_tools`]: registry, dispatcher and the filesystem tools
//! - [`skiff_gateway`]: the Anthropic Messages API gateway
//! - this crate: the [`Session`] loop, configuration and terminal I/O

pub mod config;
pub mod error;
pub mod runtime;

pub use config::{ConfigError, ConfigResult, GatewaySection, SessionProfile, SkiffConfig};
pub use error::{SessionError, SessionResult};
pub use runtime::{
    AnsiRenderer, InputSource, LineInput, LoopState, Renderer, Session, SessionSummary,
};
