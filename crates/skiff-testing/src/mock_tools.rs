//! # Mock Tools
//!
//! A tool that returns predefined results and records how it was called.

use serde_json::Value;
use skiff_core::{ExecutionResult, FailureReason, InputSchema, Tool};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A mock tool that returns predefined responses based on its input.
///
/// Clones share call history, so a clone can be registered while the
/// first handle is kept for assertions.
#[derive(Debug, Clone)]
pub struct MockTool {
    name: String,
    responses: HashMap<String, ExecutionResult>,
    default_response: Option<ExecutionResult>,
    call_history: Arc<Mutex<Vec<Value>>>,
}

impl MockTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: HashMap::new(),
            default_response: None,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Respond to an exact input with a success.
    pub fn with_response(mut self, input: &Value, response: impl Into<String>) -> Self {
        self.responses
            .insert(input.to_string(), ExecutionResult::success(response));
        self
    }

    /// Respond to an exact input with a failure.
    pub fn with_failure(mut self, input: &Value, error: impl Into<String>) -> Self {
        self.responses.insert(
            input.to_string(),
            ExecutionResult::failed(FailureReason::invalid_input(error)),
        );
        self
    }

    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = Some(ExecutionResult::success(response));
        self
    }

    pub fn with_default_failure(mut self, error: impl Into<String>) -> Self {
        self.default_response = Some(ExecutionResult::failed(FailureReason::invalid_input(error)));
        self
    }

    pub fn call_count(&self) -> usize {
        self.history().len()
    }

    /// Inputs this tool was called with, in order.
    pub fn call_history(&self) -> Vec<Value> {
        self.history().clone()
    }

    pub fn was_called_with(&self, input: &Value) -> bool {
        self.history().contains(input)
    }

    pub fn reset(&self) {
        self.history().clear();
    }

    fn history(&self) -> std::sync::MutexGuard<'_, Vec<Value>> {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Mock tool for testing"
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::object()
    }

    fn call(&self, input: &Value) -> ExecutionResult {
        self.history().push(input.clone());

        if let Some(response) = self.responses.get(&input.to_string()) {
            response.clone()
        } else if let Some(default) = &self.default_response {
            default.clone()
        } else {
            ExecutionResult::success(format!("Mock response for: {input}"))
        }
    }
}
