//! # Recording Renderer
//!
//! Captures everything a session would show on the terminal.

use skiff::Renderer;
use skiff_core::ToolInvocation;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One rendered item.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Banner,
    Prompt,
    ModelText(String),
    /// Tool name and raw JSON input.
    ToolTrace(String, String),
    Warning(String),
}

/// Renderer that records instead of printing. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<Rendered>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Rendered> {
        self.lock().clone()
    }

    pub fn model_texts(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                Rendered::ModelText(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Names of traced tools, in order.
    pub fn traced_tools(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                Rendered::ToolTrace(name, _) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn prompt_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|event| **event == Rendered::Prompt)
            .count()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                Rendered::Warning(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Rendered) -> std::io::Result<()> {
        self.lock().push(event);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Rendered>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Renderer for RecordingRenderer {
    fn banner(&mut self) -> std::io::Result<()> {
        self.record(Rendered::Banner)
    }

    fn prompt(&mut self) -> std::io::Result<()> {
        self.record(Rendered::Prompt)
    }

    fn model_text(&mut self, text: &str) -> std::io::Result<()> {
        self.record(Rendered::ModelText(text.to_string()))
    }

    fn tool_trace(&mut self, invocation: &ToolInvocation) -> std::io::Result<()> {
        self.record(Rendered::ToolTrace(
            invocation.name.clone(),
            invocation.input.to_string(),
        ))
    }

    fn warning(&mut self, message: &str) -> std::io::Result<()> {
        self.record(Rendered::Warning(message.to_string()))
    }
}
