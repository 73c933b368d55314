//! # Standard Tool Library
//!
//! Filesystem tools offered to the model. Paths are interpreted relative to
//! the process working directory.
//!
//! ## Usage
//!
//! ```rust
//! use skiff_tools::{Dispatcher, InMemoryToolRegistry, ToolsConfig};
//!
//! let dispatcher = Dispatcher::new(InMemoryToolRegistry::standard(&ToolsConfig::default()));
//! ```

/// File system I/O operations
pub mod io;

pub use io::{EditFileTool, EditPolicy, ListFilesTool, ReadFileTool};

use serde::{Deserialize, Serialize};

/// Tool settings, loadable from the `[tools]` table of a config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub edit_policy: EditPolicy,
}
