use skiff_core::{StandardTool, Tool, ToolDeclaration, TypedToolAdapter};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::standard::{EditFileTool, ListFilesTool, ReadFileTool, ToolsConfig};

/// Maximum tool name length accepted by the inference API.
const MAX_TOOL_NAME_LEN: usize = 64;

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A tool with this name is already registered.
    #[error("tool '{0}' is already registered")]
    Duplicate(String),
    /// The name cannot be advertised to the model.
    #[error("invalid tool name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
}

/// Trait for looking up tools by name.
///
/// Registries are built once at startup and are read-only afterwards. Lookup
/// is total: a name resolves to exactly one tool or to nothing.
pub trait ToolRegistry: Send + Sync {
    /// Resolve a tool by its exact name.
    fn lookup(&self, name: &str) -> Option<&dyn Tool>;

    /// Declarations of every registered tool, in registration order.
    fn declarations(&self) -> Vec<ToolDeclaration>;

    /// Registered names, in registration order.
    fn tool_names(&self) -> Vec<String> {
        self.declarations().into_iter().map(|d| d.name).collect()
    }
}

/// In-memory tool registry for local tool storage and dispatch.
///
/// Tools keep their registration order so declarations are sent to the model
/// in a stable sequence; a HashMap index gives O(1) lookup by name.
///
/// # Example
///
/// ```rust
/// use skiff_tools::{InMemoryToolRegistry, ToolRegistry, ToolsConfig};
///
/// let registry = InMemoryToolRegistry::standard(&ToolsConfig::default());
/// assert!(registry.lookup("read_file").is_some());
/// assert!(registry.lookup("rm_rf").is_none());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for InMemoryToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

impl InMemoryToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the three standard filesystem tools.
    pub fn standard(config: &ToolsConfig) -> Self {
        let mut registry = Self::new();
        for tool in StandardTool::all() {
            let tool: Arc<dyn Tool> = match tool {
                StandardTool::ReadFile => Arc::new(TypedToolAdapter::new(ReadFileTool::new())),
                StandardTool::ListFiles => Arc::new(TypedToolAdapter::new(ListFilesTool::new())),
                StandardTool::EditFile => Arc::new(TypedToolAdapter::new(EditFileTool::new(
                    config.edit_policy,
                ))),
            };
            registry.insert(tool);
        }
        registry
    }

    /// Try to add a tool using the builder pattern.
    ///
    /// Fails if the name is invalid or already taken.
    pub fn try_with_tool(mut self, tool: Arc<dyn Tool>) -> Result<Self, RegistryError> {
        self.register(tool)?;
        Ok(self)
    }

    /// Add a tool, validating its name and uniqueness.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        validate_tool_name(tool.name())?;
        if self.index.contains_key(tool.name()) {
            return Err(RegistryError::Duplicate(tool.name().to_string()));
        }
        self.insert(tool);
        Ok(())
    }

    fn insert(&mut self, tool: Arc<dyn Tool>) {
        self.index.insert(tool.name().to_string(), self.tools.len());
        self.tools.push(tool);
    }

    /// Get a shared handle to a tool by name.
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolRegistry for InMemoryToolRegistry {
    fn lookup(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools.iter().map(|tool| tool.declaration()).collect()
    }
}

fn validate_tool_name(name: &str) -> Result<(), RegistryError> {
    let invalid = |reason| RegistryError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.len() > MAX_TOOL_NAME_LEN {
        return Err(invalid("name exceeds 64 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid(
            "only ASCII letters, digits, '_' and '-' are allowed",
        ));
    }
    Ok(())
}
