//! Block type declaration, default resolution, and the render callback.
//!
//! A [`BlockType`] is declared at startup with its schema and supplied
//! defaults. When the lifecycle ready event fires it is consumed by
//! [`BlockType::resolve`], which runs the supplied defaults through the
//! `{filter_key}_default_attributes` tap and merges them into the schema. The
//! resulting [`ResolvedBlockType`] is immutable and is what the registry stores
//! and renders.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::naming::{default_attributes_tap, template_name};
use super::schema::{AttributeSchema, Attributes};
use crate::error::BlockResult;
use crate::lifecycle::Lifecycle;
use crate::tap::TapDispatcher;
use crate::theme::TemplateRenderer;

/// A declared block type whose defaults have not been resolved yet.
pub struct BlockType {
    identifier: String,
    schema: AttributeSchema,
    supplied_defaults: Attributes,
    renderer: Arc<dyn TemplateRenderer>,
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType")
            .field("identifier", &self.identifier)
            .field("schema", &self.schema)
            .field("supplied_defaults", &self.supplied_defaults)
            .finish_non_exhaustive()
    }
}

impl BlockType {
    /// Create a block type. Nothing is resolved or registered yet.
    pub fn new(
        identifier: impl Into<String>,
        schema: AttributeSchema,
        supplied_defaults: Attributes,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            schema,
            supplied_defaults,
            renderer,
        }
    }

    /// Create a block type and defer its registration to the ready event.
    pub fn declare(
        lifecycle: &Lifecycle,
        identifier: impl Into<String>,
        schema: AttributeSchema,
        supplied_defaults: Attributes,
        renderer: Arc<dyn TemplateRenderer>,
    ) {
        Self::new(identifier, schema, supplied_defaults, renderer).subscribe(lifecycle);
    }

    /// Subscribe to the ready event: resolve defaults, then register.
    pub fn subscribe(self, lifecycle: &Lifecycle) {
        let label = self.identifier.clone();
        lifecycle.on_ready(&label, move |ctx| {
            let resolved = self.resolve(ctx.dispatcher());
            ctx.registry().register(resolved).map(|_| ())
        });
    }

    /// Namespaced identifier, e.g. `wp-bootstrap-blocks/column`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Schema as declared, before supplied defaults are merged.
    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    /// Defaults supplied at declaration, before filtering.
    pub fn supplied_defaults(&self) -> &Attributes {
        &self.supplied_defaults
    }

    /// Filter the supplied defaults and merge them into the schema.
    ///
    /// Keys the schema does not declare are dropped. A filter chain that returns
    /// anything other than an object merges nothing.
    pub fn resolve(self, dispatcher: &TapDispatcher) -> ResolvedBlockType {
        let tap = default_attributes_tap(&self.identifier);
        let filtered = match dispatcher.apply(&tap, Value::Object(self.supplied_defaults)) {
            Value::Object(map) => map,
            other => {
                warn!(
                    block = %self.identifier,
                    tap = %tap,
                    output = %other,
                    "default attribute filters returned a non-object, ignoring"
                );
                Attributes::new()
            }
        };

        let mut schema = self.schema;
        let mut resolved_defaults = Attributes::new();
        for (name, value) in filtered {
            if schema.set_default(&name, value.clone()) {
                resolved_defaults.insert(name, value);
            } else {
                debug!(
                    block = %self.identifier,
                    attribute = %name,
                    "default supplied for undeclared attribute, skipping"
                );
            }
        }

        debug!(
            block = %self.identifier,
            defaults = resolved_defaults.len(),
            "default attributes resolved"
        );

        ResolvedBlockType {
            identifier: self.identifier,
            schema,
            resolved_defaults,
            renderer: self.renderer,
        }
    }
}

/// A block type with resolved defaults, ready to register and render.
///
/// Immutable after construction; shared across concurrent renders via `Arc`.
pub struct ResolvedBlockType {
    identifier: String,
    schema: AttributeSchema,
    resolved_defaults: Attributes,
    renderer: Arc<dyn TemplateRenderer>,
}

impl fmt::Debug for ResolvedBlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedBlockType")
            .field("identifier", &self.identifier)
            .field("schema", &self.schema)
            .field("resolved_defaults", &self.resolved_defaults)
            .finish_non_exhaustive()
    }
}

impl ResolvedBlockType {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Schema with the resolved defaults merged in.
    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    /// Filtered defaults that matched a declared attribute.
    pub fn resolved_defaults(&self) -> &Attributes {
        &self.resolved_defaults
    }

    /// Template used by [`render`](Self::render): the identifier without namespace.
    pub fn template_name(&self) -> &str {
        template_name(&self.identifier)
    }

    /// Render callback: pass attributes and content to the template renderer.
    ///
    /// `attributes` are expected to be prepared already (defaults applied,
    /// types coerced); nothing is validated or changed here.
    pub fn render(&self, attributes: &Attributes, content: &str) -> BlockResult<String> {
        self.renderer
            .render_template(self.template_name(), attributes, content)
    }
}
