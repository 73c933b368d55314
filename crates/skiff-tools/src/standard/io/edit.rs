use serde::{Deserialize, Serialize};
use skiff_core::{FailureReason, InputSchema, StandardTool, TypedTool};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const INVALID_PARAMETERS: &str = "invalid input parameters";
const NOT_FOUND_IN_FILE: &str = "old_str not found in file";

const DESCRIPTION_REPLACE_ALL: &str = "Make edits to a text file.

Replaces every occurrence of 'old_str' with 'new_str' in the given file. 'old_str' and 'new_str' MUST be different from each other.

If the file specified with path doesn't exist and 'old_str' is empty, it will be created with 'new_str' as its contents.
";

const DESCRIPTION_REQUIRE_UNIQUE: &str = "Make edits to a text file.

Replaces 'old_str' with 'new_str' in the given file. 'old_str' must match exactly once. 'old_str' and 'new_str' MUST be different from each other.

If the file specified with path doesn't exist and 'old_str' is empty, it will be created with 'new_str' as its contents.
";

/// How many occurrences of `old_str` an edit may touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPolicy {
    /// Replace every non-overlapping occurrence.
    #[default]
    ReplaceAll,
    /// Fail unless `old_str` occurs exactly once.
    RequireUnique,
}

#[derive(Debug, Deserialize)]
pub struct EditFileInput {
    pub path: String,
    #[serde(default)]
    pub old_str: String,
    #[serde(default)]
    pub new_str: String,
}

/// Text substitution and file creation.
#[derive(Debug, Default)]
pub struct EditFileTool {
    policy: EditPolicy,
}

impl EditFileTool {
    pub fn new(policy: EditPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> EditPolicy {
        self.policy
    }

    fn create(path: &str, content: &str) -> Result<String, FailureReason> {
        if let Some(parent) = Path::new(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|e| {
                FailureReason::from_io(
                    &format!("failed to create directory '{}'", parent.display()),
                    &e,
                )
            })?;
        }

        fs::write(path, content)
            .map_err(|e| FailureReason::from_io(&format!("failed to create file '{path}'"), &e))?;

        tracing::debug!(path, bytes = content.len(), "Created file");
        Ok(format!("Successfully created file {path}"))
    }

    fn replace(&self, path: &str, old: &str, new: &str) -> Result<String, FailureReason> {
        // Raw bytes, so files that are not valid UTF-8 can still be edited.
        let content = fs::read(path)
            .map_err(|e| FailureReason::from_io(&format!("failed to read '{path}'"), &e))?;

        if old.is_empty() {
            return Err(FailureReason::invalid_input(
                "old_str must not be empty when editing an existing file",
            ));
        }

        let matches = match_offsets(&content, old.as_bytes());
        let occurrences = matches.len();
        if occurrences == 0 {
            return Err(FailureReason::invalid_input(NOT_FOUND_IN_FILE));
        }
        if self.policy == EditPolicy::RequireUnique && occurrences > 1 {
            return Err(FailureReason::invalid_input(format!(
                "old_str found {occurrences} times in file; it must match exactly once"
            )));
        }

        let edited = splice(&content, &matches, old.len(), new.as_bytes());
        fs::write(path, edited)
            .map_err(|e| FailureReason::from_io(&format!("failed to write '{path}'"), &e))?;

        tracing::debug!(path, occurrences, "Edited file");
        Ok("OK".to_string())
    }
}

/// Start offsets of every non-overlapping occurrence of `needle`, scanning left to right.
fn match_offsets(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    if needle.is_empty() {
        return offsets;
    }
    let mut at = 0;
    while at + needle.len() <= haystack.len() {
        if haystack[at..].starts_with(needle) {
            offsets.push(at);
            at += needle.len();
        } else {
            at += 1;
        }
    }
    offsets
}

fn splice(content: &[u8], offsets: &[usize], old_len: usize, new: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + offsets.len() * new.len());
    let mut copied = 0;
    for &offset in offsets {
        out.extend_from_slice(&content[copied..offset]);
        out.extend_from_slice(new);
        copied = offset + old_len;
    }
    out.extend_from_slice(&content[copied..]);
    out
}

impl TypedTool for EditFileTool {
    type Input = EditFileInput;

    fn name(&self) -> &str {
        StandardTool::EditFile.name()
    }

    fn description(&self) -> &str {
        match self.policy {
            EditPolicy::ReplaceAll => DESCRIPTION_REPLACE_ALL,
            EditPolicy::RequireUnique => DESCRIPTION_REQUIRE_UNIQUE,
        }
    }

    fn input_schema(&self) -> InputSchema {
        let old_str = match self.policy {
            EditPolicy::ReplaceAll => {
                "Text to search for - must match exactly; every occurrence is replaced"
            }
            EditPolicy::RequireUnique => {
                "Text to search for - must match exactly and must only have one match exactly"
            }
        };
        InputSchema::object()
            .required("path", "The path to the file")
            .required("old_str", old_str)
            .required("new_str", "Text to replace old_str with")
    }

    fn run(&self, input: EditFileInput) -> Result<String, FailureReason> {
        if input.path.is_empty() || input.old_str == input.new_str {
            return Err(FailureReason::invalid_input(INVALID_PARAMETERS));
        }

        // Follows symlinks: a link to a missing target counts as missing.
        match fs::metadata(&input.path) {
            Err(e) if e.kind() == ErrorKind::NotFound && input.old_str.is_empty() => {
                Self::create(&input.path, &input.new_str)
            }
            _ => self.replace(&input.path, &input.old_str, &input.new_str),
        }
    }
}
