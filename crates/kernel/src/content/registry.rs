//! Block type registry.
//!
//! Holds every resolved block type by identifier and renders blocks on request.
//! Registration happens once at startup; afterwards the registry is only read,
//! from any number of concurrent render calls.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{info, warn};

use super::block_type::ResolvedBlockType;
use super::naming::validate_identifier;
use super::schema::Attributes;
use crate::error::{BlockError, BlockResult};

/// Registry of resolved block types.
///
/// Cheap to clone; clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    types: Arc<DashMap<String, Arc<ResolvedBlockType>>>,
}

impl BlockRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolved block type.
    ///
    /// Fails with `DuplicateRegistration` if the identifier is taken; the
    /// existing registration is left untouched.
    pub fn register(&self, block_type: ResolvedBlockType) -> BlockResult<Arc<ResolvedBlockType>> {
        let identifier = block_type.identifier().to_string();
        validate_identifier(&identifier)?;

        match self.types.entry(identifier) {
            Entry::Occupied(entry) => {
                warn!(block = %entry.key(), "block type already registered");
                Err(BlockError::duplicate(entry.key().as_str()))
            }
            Entry::Vacant(entry) => {
                let block_type = Arc::new(block_type);
                info!(
                    block = %entry.key(),
                    attributes = block_type.schema().len(),
                    "registered block type"
                );
                entry.insert(Arc::clone(&block_type));
                Ok(block_type)
            }
        }
    }

    /// Look up a block type by identifier.
    pub fn get(&self, identifier: &str) -> Option<Arc<ResolvedBlockType>> {
        self.types.get(identifier).map(|r| Arc::clone(r.value()))
    }

    /// Check whether a block type is registered.
    pub fn contains(&self, identifier: &str) -> bool {
        self.types.contains_key(identifier)
    }

    /// Return the number of registered block types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.types.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    /// All registered block types, sorted by identifier.
    pub fn list(&self) -> Vec<Arc<ResolvedBlockType>> {
        let mut types: Vec<_> = self.types.iter().map(|r| Arc::clone(r.value())).collect();
        types.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        types
    }

    /// Render a block the way a host does for stored content.
    ///
    /// Prepares the raw attributes against the block's schema (defaults,
    /// coercion, unknown keys dropped) and invokes its render callback.
    pub fn render_block(
        &self,
        identifier: &str,
        attributes: &Attributes,
        content: &str,
    ) -> BlockResult<String> {
        let block_type = self
            .get(identifier)
            .ok_or_else(|| BlockError::unknown(identifier))?;

        let prepared = block_type.schema().prepare(attributes);
        block_type.render(&prepared, content)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::content::{AttributeDefinition, AttributeSchema, BlockType};
    use crate::tap::TapDispatcher;
    use crate::theme::TemplateRenderer;
    use serde_json::{Value, json};

    struct JsonRenderer;

    impl TemplateRenderer for JsonRenderer {
        fn render_template(
            &self,
            template_name: &str,
            attributes: &Attributes,
            content: &str,
        ) -> BlockResult<String> {
            Ok(format!(
                "{template_name}|{}|{content}",
                Value::Object(attributes.clone())
            ))
        }
    }

    fn resolved(id: &str, default_size: i64) -> ResolvedBlockType {
        let schema = AttributeSchema::new()
            .attribute("sizeXs", AttributeDefinition::number().default_value(0));
        let defaults = json!({"sizeXs": default_size}).as_object().cloned().unwrap();
        BlockType::new(id, schema, defaults, Arc::new(JsonRenderer)).resolve(&TapDispatcher::default())
    }

    #[test]
    fn register_and_get() {
        let registry = BlockRegistry::new();
        registry.register(resolved("ns/column", 12)).unwrap();

        assert!(registry.contains("ns/column"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("ns/column").unwrap().resolved_defaults()["sizeXs"],
            json!(12)
        );
        assert!(registry.get("ns/row").is_none());
    }

    #[test]
    fn duplicate_registration_keeps_first() {
        let registry = BlockRegistry::new();
        registry.register(resolved("ns/column", 12)).unwrap();

        let err = registry.register(resolved("ns/column", 6)).unwrap_err();

        assert_eq!(err, BlockError::duplicate("ns/column"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("ns/column").unwrap().resolved_defaults()["sizeXs"],
            json!(12)
        );
    }

    #[test]
    fn invalid_identifier_rejected() {
        let registry = BlockRegistry::new();
        let err = registry.register(resolved("column", 12)).unwrap_err();

        assert!(matches!(err, BlockError::InvalidIdentifier { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn identifiers_are_sorted() {
        let registry = BlockRegistry::new();
        registry.register(resolved("ns/row", 0)).unwrap();
        registry.register(resolved("ns/column", 0)).unwrap();
        registry.register(resolved("ns/button", 0)).unwrap();

        assert_eq!(registry.identifiers(), ["ns/button", "ns/column", "ns/row"]);
        let listed: Vec<_> = registry
            .list()
            .iter()
            .map(|b| b.identifier().to_string())
            .collect();
        assert_eq!(listed, registry.identifiers());
    }

    #[test]
    fn render_block_prepares_attributes() {
        let registry = BlockRegistry::new();
        registry.register(resolved("ns/column", 12)).unwrap();

        let html = registry
            .render_block("ns/column", &Attributes::new(), "<p>x</p>")
            .unwrap();
        assert_eq!(html, r#"column|{"sizeXs":12}|<p>x</p>"#);

        let raw = json!({"sizeXs": "4", "junk": 1}).as_object().cloned().unwrap();
        let html = registry.render_block("ns/column", &raw, "").unwrap();
        assert_eq!(html, r#"column|{"sizeXs":4}|"#);
    }

    #[test]
    fn render_unknown_block() {
        let registry = BlockRegistry::new();
        assert_eq!(
            registry.render_block("ns/missing", &Attributes::new(), ""),
            Err(BlockError::unknown("ns/missing"))
        );
    }

    #[test]
    fn clones_share_state() {
        let registry = BlockRegistry::new();
        let clone = registry.clone();
        registry.register(resolved("ns/column", 12)).unwrap();

        assert!(clone.contains("ns/column"));
    }
}
