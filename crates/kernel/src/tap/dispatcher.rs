//! Tap dispatcher - runs a tap's filter chain over a value.
//!
//! Each handler receives the previous handler's output. The dispatcher never
//! inspects what the handlers return.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::TapRegistry;

/// Dispatcher for applying taps registered in a [`TapRegistry`].
#[derive(Debug, Clone, Default)]
pub struct TapDispatcher {
    registry: Arc<TapRegistry>,
}

impl TapDispatcher {
    /// Create a new tap dispatcher over a shared registry.
    pub fn new(registry: Arc<TapRegistry>) -> Self {
        Self { registry }
    }

    /// Get the tap registry for handler introspection.
    pub fn registry(&self) -> &TapRegistry {
        &self.registry
    }

    /// Append a transformer for `tap_name` with the default weight.
    pub fn register<F>(&self, tap_name: &str, transformer: F)
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.registry.register(tap_name, transformer);
    }

    /// Apply every handler for `tap_name` to `value`, in order.
    ///
    /// Returns `value` untouched when no handler implements the tap. The handler
    /// list is snapshotted first, so handlers may register further taps without
    /// deadlocking; those only take effect on the next application.
    pub fn apply(&self, tap_name: &str, value: Value) -> Value {
        let handlers = self.registry.get_handlers(tap_name);
        if handlers.is_empty() {
            debug!(tap = %tap_name, "no handlers registered for tap");
            return value;
        }

        let output = handlers
            .iter()
            .fold(value, |acc, handler| (handler.transformer)(acc));

        debug!(
            tap = %tap_name,
            handlers = handlers.len(),
            "filter chain applied"
        );

        output
    }
}
