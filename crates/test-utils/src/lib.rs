//! Trellis test utilities.
//!
//! Helpers for integration testing: a recording template renderer, attribute
//! builders, and small schema fixtures.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use trellis_kernel::BlockResult;
use trellis_kernel::content::{AttributeDefinition, AttributeSchema, Attributes};
use trellis_kernel::theme::TemplateRenderer;

/// Build an attribute map from a JSON object literal.
///
/// Anything other than an object yields an empty map.
pub fn attributes(value: JsonValue) -> Attributes {
    match value {
        JsonValue::Object(map) => map,
        _ => Attributes::new(),
    }
}

/// A single call made to a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCall {
    pub template_name: String,
    pub attributes: Attributes,
    pub content: String,
}

/// Template renderer that records every call and returns a predictable string.
///
/// Output is `{template_name}:{attributes as JSON}:{content}`.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRenderer {
    /// Create a shared recorder.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// The output this renderer produces for the given inputs.
    pub fn expected_output(template_name: &str, attributes: &Attributes, content: &str) -> String {
        format!(
            "{template_name}:{}:{content}",
            JsonValue::Object(attributes.clone())
        )
    }
}

impl TemplateRenderer for RecordingRenderer {
    fn render_template(
        &self,
        template_name: &str,
        attributes: &Attributes,
        content: &str,
    ) -> BlockResult<String> {
        self.calls.lock().push(RenderCall {
            template_name: template_name.to_string(),
            attributes: attributes.clone(),
            content: content.to_string(),
        });
        Ok(Self::expected_output(template_name, attributes, content))
    }
}

/// Schema with a single numeric `sizeXs` attribute defaulting to 0.
pub fn size_schema() -> AttributeSchema {
    AttributeSchema::new().attribute("sizeXs", AttributeDefinition::number().default_value(0))
}

/// Column-like schema used across integration tests.
pub fn column_schema() -> AttributeSchema {
    AttributeSchema::new()
        .attribute("sizeXs", AttributeDefinition::number().default_value(0))
        .attribute("sizeMd", AttributeDefinition::number().default_value(0))
        .attribute("centerContent", AttributeDefinition::boolean().default_value(false))
        .attribute("bgColor", AttributeDefinition::string())
}
