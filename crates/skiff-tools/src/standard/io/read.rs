use serde::Deserialize;
use skiff_core::{FailureReason, InputSchema, StandardTool, TypedTool};
use std::fs;

#[derive(Debug, Deserialize)]
pub struct ReadFileInput {
    pub path: String,
}

/// Returns the full contents of a text file.
#[derive(Debug, Default)]
pub struct ReadFileTool;

impl ReadFileTool {
    pub fn new() -> Self {
        Self
    }
}

impl TypedTool for ReadFileTool {
    type Input = ReadFileInput;

    fn name(&self) -> &str {
        StandardTool::ReadFile.name()
    }

    fn description(&self) -> &str {
        "Read the contents of a given relative file path. Use this when you want to see what's inside a file. Do not use this with directory names."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::object().required(
            "path",
            "The relative path of a file in the working directory.",
        )
    }

    fn run(&self, input: ReadFileInput) -> Result<String, FailureReason> {
        let bytes = fs::read(&input.path)
            .map_err(|e| FailureReason::from_io(&format!("failed to read '{}'", input.path), &e))?;
        // Invalid sequences become U+FFFD rather than failing the read.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
