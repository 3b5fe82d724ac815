//! Bundled Bootstrap layout blocks.
//!
//! Declares `container`, `row`, `column` and `button` under the
//! `wp-bootstrap-blocks` namespace. Schemas declare types only; defaults are
//! supplied separately so they can be filtered through
//! `wp_bootstrap_blocks_{name}_default_attributes` before registration.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::content::{AttributeDefinition, AttributeSchema, Attributes, BlockType};
use crate::lifecycle::Lifecycle;
use crate::theme::TemplateRenderer;

/// Namespace shared by the bundled blocks.
pub const NAMESPACE: &str = "wp-bootstrap-blocks";

const BREAKPOINTS: [&str; 5] = ["Xs", "Sm", "Md", "Lg", "Xl"];

fn object(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

/// Declare all bundled blocks; they register when `lifecycle` fires.
pub fn declare_bootstrap_blocks(lifecycle: &Lifecycle, renderer: Arc<dyn TemplateRenderer>) {
    let blocks = [
        ("container", container_schema(), container_defaults()),
        ("row", row_schema(), row_defaults()),
        ("column", column_schema(), column_defaults()),
        ("button", button_schema(), button_defaults()),
    ];

    for (name, schema, defaults) in blocks {
        BlockType::declare(
            lifecycle,
            format!("{NAMESPACE}/{name}"),
            schema,
            defaults,
            Arc::clone(&renderer),
        );
    }
}

pub fn container_schema() -> AttributeSchema {
    AttributeSchema::new()
        .attribute("isFluid", AttributeDefinition::boolean())
        .attribute("fluidBreakpoint", AttributeDefinition::string())
        .attribute("marginAfter", AttributeDefinition::string())
        .attribute("className", AttributeDefinition::string())
}

pub fn container_defaults() -> Attributes {
    object(json!({
        "isFluid": false,
        "fluidBreakpoint": "",
        "marginAfter": "mb-2"
    }))
}

pub fn row_schema() -> AttributeSchema {
    AttributeSchema::new()
        .attribute("template", AttributeDefinition::string())
        .attribute("noGutters", AttributeDefinition::boolean())
        .attribute("alignment", AttributeDefinition::string())
        .attribute("verticalAlignment", AttributeDefinition::string())
        .attribute("editorStackColumns", AttributeDefinition::boolean())
        .attribute("horizontalGutters", AttributeDefinition::string())
        .attribute("verticalGutters", AttributeDefinition::string())
        .attribute("className", AttributeDefinition::string())
}

pub fn row_defaults() -> Attributes {
    object(json!({
        "template": "1-1",
        "noGutters": false,
        "alignment": "",
        "verticalAlignment": "",
        "editorStackColumns": false,
        "horizontalGutters": "",
        "verticalGutters": ""
    }))
}

/// Column schema: a size and an equal-width flag per breakpoint, plus styling.
pub fn column_schema() -> AttributeSchema {
    let mut schema = AttributeSchema::new();
    for bp in BREAKPOINTS {
        schema = schema.attribute(&format!("size{bp}"), AttributeDefinition::number());
    }
    for bp in BREAKPOINTS {
        schema = schema.attribute(&format!("equalWidth{bp}"), AttributeDefinition::boolean());
    }
    schema
        .attribute("bgColor", AttributeDefinition::string())
        .attribute("padding", AttributeDefinition::string())
        .attribute("centerContent", AttributeDefinition::boolean())
        .attribute("contentVerticalAlignment", AttributeDefinition::string())
        .attribute("className", AttributeDefinition::string())
}

/// Full width on extra-small screens, unset elsewhere.
pub fn column_defaults() -> Attributes {
    let mut defaults = Attributes::new();
    for bp in BREAKPOINTS {
        let size = if bp == "Xs" { 12 } else { 0 };
        defaults.insert(format!("size{bp}"), json!(size));
    }
    for bp in BREAKPOINTS {
        defaults.insert(format!("equalWidth{bp}"), json!(false));
    }
    defaults.insert("bgColor".to_string(), json!(""));
    defaults.insert("padding".to_string(), json!(""));
    defaults.insert("centerContent".to_string(), json!(false));
    defaults.insert("contentVerticalAlignment".to_string(), json!(""));
    defaults
}

pub fn button_schema() -> AttributeSchema {
    AttributeSchema::new()
        .attribute("url", AttributeDefinition::string())
        .attribute("linkTitle", AttributeDefinition::string())
        .attribute("text", AttributeDefinition::string())
        .attribute("style", AttributeDefinition::string())
        .attribute("alignment", AttributeDefinition::string())
        .attribute("openInNewTab", AttributeDefinition::boolean())
        .attribute("rel", AttributeDefinition::string())
        .attribute("className", AttributeDefinition::string())
}

pub fn button_defaults() -> Attributes {
    object(json!({
        "url": "",
        "linkTitle": "",
        "text": "",
        "style": "primary",
        "alignment": "",
        "openInNewTab": false,
        "rel": ""
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_only_name_declared_attributes() {
        let sets = [
            (container_schema(), container_defaults()),
            (row_schema(), row_defaults()),
            (column_schema(), column_defaults()),
            (button_schema(), button_defaults()),
        ];
        for (schema, defaults) in sets {
            for name in defaults.keys() {
                assert!(schema.contains(name), "{name} not declared");
            }
        }
    }

    #[test]
    fn column_defaults_match_editor_expectations() {
        let defaults = column_defaults();
        assert_eq!(defaults["sizeXs"], json!(12));
        for bp in ["Sm", "Md", "Lg", "Xl"] {
            assert_eq!(defaults[&format!("size{bp}")], json!(0));
        }
        for bp in BREAKPOINTS {
            assert_eq!(defaults[&format!("equalWidth{bp}")], json!(false));
        }
    }

    #[test]
    fn declares_four_blocks() {
        let lifecycle = Lifecycle::new();
        struct Nothing;
        impl TemplateRenderer for Nothing {
            fn render_template(
                &self,
                _: &str,
                _: &Attributes,
                _: &str,
            ) -> crate::error::BlockResult<String> {
                Ok(String::new())
            }
        }

        declare_bootstrap_blocks(&lifecycle, Arc::new(Nothing));
        assert_eq!(lifecycle.pending_count(), 4);
    }
}
