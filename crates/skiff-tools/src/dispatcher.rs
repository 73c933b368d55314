use skiff_core::{ExecutionResult, FailureReason, ToolInvocation, ToolResult};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::instrument;

use crate::registry::ToolRegistry;

/// Resolves model-issued invocations against a registry.
///
/// Every path ends in a [`ToolResult`]: unknown names, undecodable input,
/// tool errors and even a panicking tool are reported as `is_error = true`
/// results, so dispatch can never end the session.
#[derive(Debug, Clone)]
pub struct Dispatcher<R> {
    registry: R,
}

impl<R: ToolRegistry> Dispatcher<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Execute one invocation.
    pub fn execute(&self, invocation: &ToolInvocation) -> ToolResult {
        self.execute_traced(invocation, |_| {})
    }

    /// Execute one invocation, calling `trace` right before the tool runs.
    ///
    /// `trace` is not called when the tool does not exist.
    #[instrument(skip_all, fields(tool = %invocation.name, invocation_id = %invocation.id))]
    pub fn execute_traced(
        &self,
        invocation: &ToolInvocation,
        trace: impl FnOnce(&ToolInvocation),
    ) -> ToolResult {
        let Some(tool) = self.registry.lookup(&invocation.name) else {
            tracing::warn!("Model requested an unregistered tool");
            return ExecutionResult::failed(FailureReason::ToolNotFound)
                .into_tool_result(invocation.id.clone());
        };

        trace(invocation);
        tracing::debug!(input = %invocation.input, "Executing tool");

        let result = catch_unwind(AssertUnwindSafe(|| tool.call(&invocation.input)))
            .unwrap_or_else(|_| {
                tracing::error!("Tool panicked during execution");
                ExecutionResult::failed(FailureReason::Custom {
                    category: "panic".to_string(),
                    message: format!("tool '{}' failed unexpectedly", invocation.name),
                })
            });

        if let Some(reason) = result.failure_reason() {
            tracing::info!(category = reason.category(), error = %reason, "Tool failed");
        }

        result.into_tool_result(invocation.id.clone())
    }

    /// Execute invocations sequentially, preserving order.
    ///
    /// Later invocations may depend on filesystem changes made by earlier ones,
    /// so they never run concurrently.
    pub fn execute_all<'a>(
        &self,
        invocations: impl IntoIterator<Item = &'a ToolInvocation>,
        mut trace: impl FnMut(&ToolInvocation),
    ) -> Vec<ToolResult> {
        invocations
            .into_iter()
            .map(|invocation| self.execute_traced(invocation, &mut trace))
            .collect()
    }
}
