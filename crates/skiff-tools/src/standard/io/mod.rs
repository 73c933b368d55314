//! # File System Tools
//!
//! Reading, listing and editing files on behalf of the model.

mod edit;
mod list;
mod read;

pub use edit::{EditFileTool, EditPolicy};
pub use list::ListFilesTool;
pub use read::ReadFileTool;
