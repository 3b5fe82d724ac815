//! Tap registry - indexes which handlers implement which taps.
//!
//! The registry maps tap names to an ordered list of handlers. Handlers are kept
//! sorted by weight (lower = higher priority, called first); handlers with equal
//! weight stay in the order they were registered.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

/// Weight given to handlers registered without an explicit weight.
pub const DEFAULT_WEIGHT: i32 = 10;

/// A value transformer invoked by a tap.
pub type Transformer = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A registered tap handler with its origin and priority.
#[derive(Clone)]
pub struct TapHandler {
    /// Label of the code that registered this handler (e.g. "config").
    pub source: String,
    /// Weight for ordering (lower = higher priority).
    pub weight: i32,
    /// The transformer itself.
    pub transformer: Transformer,
}

impl fmt::Debug for TapHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapHandler")
            .field("source", &self.source)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// Registry mapping tap names to ordered handlers.
///
/// Registration takes `&self` so the registry can be shared behind an `Arc`
/// by everything that wants to hook in before the lifecycle ready event.
#[derive(Debug, Default)]
pub struct TapRegistry {
    /// Map from tap name to ordered list of handlers.
    handlers: RwLock<HashMap<String, Vec<TapHandler>>>,
}

impl TapRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transformer for `tap_name` with the default weight.
    ///
    /// No deduplication: registering the same transformer twice runs it twice.
    pub fn register<F>(&self, tap_name: &str, transformer: F)
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.register_weighted(tap_name, DEFAULT_WEIGHT, "anonymous", transformer);
    }

    /// Register a transformer with an explicit weight and source label.
    pub fn register_weighted<F>(&self, tap_name: &str, weight: i32, source: &str, transformer: F)
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let handler = TapHandler {
            source: source.to_string(),
            weight,
            transformer: Arc::new(transformer),
        };

        let mut handlers = self.handlers.write();
        let list = handlers.entry(tap_name.to_string()).or_default();

        // Insert after every handler of equal or lower weight
        let position = list.partition_point(|h| h.weight <= weight);
        list.insert(position, handler);

        debug!(
            tap = %tap_name,
            source = %source,
            weight,
            handlers = list.len(),
            "tap handler registered"
        );
    }

    /// Get a snapshot of the handlers for a tap, in call order.
    ///
    /// Returns an empty list if nothing implements the tap.
    pub fn get_handlers(&self, tap_name: &str) -> Vec<TapHandler> {
        self.handlers
            .read()
            .get(tap_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Check if any handler implements a tap.
    pub fn has_tap(&self, tap_name: &str) -> bool {
        self.handlers
            .read()
            .get(tap_name)
            .is_some_and(|handlers| !handlers.is_empty())
    }

    /// Get all registered tap names.
    pub fn tap_names(&self) -> Vec<String> {
        self.handlers.read().keys().cloned().collect()
    }

    /// Get the count of handlers for a tap.
    pub fn handler_count(&self, tap_name: &str) -> usize {
        self.handlers.read().get(tap_name).map(|v| v.len()).unwrap_or(0)
    }

    /// Get total number of registered taps.
    pub fn tap_count(&self) -> usize {
        self.handlers.read().len()
    }
}
