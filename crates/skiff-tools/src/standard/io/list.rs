use serde::Deserialize;
use skiff_core::{FailureReason, InputSchema, StandardTool, TypedTool};
use std::path::Path;
use walkdir::WalkDir;

const DEFAULT_DIR: &str = ".";

#[derive(Debug, Default, Deserialize)]
pub struct ListFilesInput {
    #[serde(default)]
    pub path: Option<String>,
}

/// Recursively lists a directory as a JSON array of relative paths.
///
/// Directories carry a trailing `/`; the directory itself is never listed.
/// Entries appear in walk order with siblings sorted by name.
#[derive(Debug, Default)]
pub struct ListFilesTool;

impl ListFilesTool {
    pub fn new() -> Self {
        Self
    }

    fn entries(dir: &Path) -> Result<Vec<String>, FailureReason> {
        let context = || format!("failed to list '{}'", dir.display());
        let mut entries = Vec::new();

        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| match e.io_error() {
                Some(io) => FailureReason::from_io(&context(), io),
                None => FailureReason::IoError {
                    message: format!("{}: {e}", context()),
                },
            })?;

            if entry.depth() == 0 {
                if !entry.file_type().is_dir() {
                    return Err(FailureReason::invalid_input(format!(
                        "'{}' is not a directory",
                        dir.display()
                    )));
                }
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let mut name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if entry.file_type().is_dir() {
                name.push('/');
            }
            entries.push(name);
        }

        Ok(entries)
    }
}

impl TypedTool for ListFilesTool {
    type Input = ListFilesInput;

    fn name(&self) -> &str {
        StandardTool::ListFiles.name()
    }

    fn description(&self) -> &str {
        "List files and directories at a given path. If no path is provided, lists files in the current directory."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::object().optional(
            "path",
            "Optional relative path to list files from. Defaults to current directory if not provided.",
        )
    }

    fn run(&self, input: ListFilesInput) -> Result<String, FailureReason> {
        let dir = input
            .path
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_DIR.to_string());

        let entries = Self::entries(Path::new(&dir))?;
        serde_json::to_string(&entries).map_err(|e| FailureReason::Custom {
            category: "serialization".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn list(dir: &Path) -> Result<Vec<String>, FailureReason> {
        let output = ListFilesTool.run(ListFilesInput {
            path: Some(dir.to_string_lossy().into_owned()),
        })?;
        Ok(serde_json::from_str(&output).unwrap())
    }

    #[test]
    fn lists_one_file_and_one_subdirectory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let entries = list(dir.path()).unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&"sub/".to_string()));
        assert!(entries.contains(&"a.txt".to_string()));
        assert!(!entries.contains(&".".to_string()));
    }

    #[test]
    fn walks_nested_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/bin")).unwrap();
        fs::write(dir.path().join("src/bin/main.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "").unwrap();

        let entries = list(dir.path()).unwrap();

        assert_eq!(
            entries,
            vec!["Cargo.toml", "src/", "src/bin/", "src/bin/main.rs"]
        );
    }

    #[test]
    fn empty_directory_is_empty_array() {
        let dir = TempDir::new().unwrap();
        let output = ListFilesTool
            .run(ListFilesInput {
                path: Some(dir.path().to_string_lossy().into_owned()),
            })
            .unwrap();
        assert_eq!(output, "[]");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = list(&dir.path().join("nope")).unwrap_err();
        assert_eq!(err.category(), "not_found");
    }

    #[test]
    fn file_path_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        let err = list(&file).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn defaults_to_current_directory() {
        let output = ListFilesTool.run(ListFilesInput::default()).unwrap();
        let entries: Vec<String> = serde_json::from_str(&output).unwrap();
        assert!(!entries.contains(&".".to_string()));
        assert!(!entries.contains(&"./".to_string()));
    }
}
