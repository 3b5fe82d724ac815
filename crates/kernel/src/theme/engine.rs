//! Theme engine with Tera templates and suggestion resolution.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use dashmap::DashMap;
use tera::Tera;
use tracing::debug;

use super::filters;
use super::renderer::TemplateRenderer;
use crate::content::Attributes;
use crate::error::{BlockError, BlockResult};

/// Block templates shipped with the kernel, by Tera template name.
const BUNDLED_TEMPLATES: [(&str, &str); 4] = [
    (
        "blocks/container.html",
        include_str!("../../templates/blocks/container.html"),
    ),
    ("blocks/row.html", include_str!("../../templates/blocks/row.html")),
    (
        "blocks/column.html",
        include_str!("../../templates/blocks/column.html"),
    ),
    (
        "blocks/button.html",
        include_str!("../../templates/blocks/button.html"),
    ),
];

/// Theme engine for rendering block templates.
pub struct ThemeEngine {
    /// Tera template engine instance.
    tera: Tera,
    /// Cache mapping template names to resolved Tera template names.
    suggestion_cache: DashMap<String, String>,
}

impl ThemeEngine {
    /// Create a theme engine with the bundled block templates.
    ///
    /// Templates found under `theme_dir` (`**/*.html`) take precedence over
    /// bundled templates with the same name, and may `{% extends %}` any
    /// bundled template.
    pub fn new(theme_dir: Option<&Path>) -> Result<Self> {
        let mut tera = match theme_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    anyhow::bail!("theme directory {} does not exist", dir.display());
                }
                let pattern = dir.join("**/*.html");
                let pattern_str = pattern.to_str().context("invalid theme directory path")?;
                // Inheritance is built below, once bundled parents are present
                Tera::parse(pattern_str).context("failed to load theme templates")?
            }
            None => Tera::default(),
        };

        let mut bundled = Tera::default();
        bundled
            .add_raw_templates(BUNDLED_TEMPLATES)
            .context("failed to parse bundled block templates")?;

        // Templates already present (from the theme) win over bundled ones
        tera.extend(&bundled)
            .context("failed to merge bundled block templates")?;
        tera.build_inheritance_chains()
            .context("failed to resolve theme template inheritance")?;

        Self::register_filters(&mut tera);

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "loaded templates");

        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    /// Create a theme engine with only the bundled templates.
    pub fn bundled() -> Result<Self> {
        Self::new(None)
    }

    /// Create a theme engine with no templates (for testing).
    pub fn empty() -> Self {
        let mut tera = Tera::default();
        Self::register_filters(&mut tera);
        Self {
            tera,
            suggestion_cache: DashMap::new(),
        }
    }

    /// Register the attribute filters used by block templates.
    fn register_filters(tera: &mut Tera) {
        // Autoescaped output lands in attribute values; leave `/` in URLs alone
        tera.set_escape_fn(filters::escape_attribute);

        type FilterFn = fn(&Attributes) -> String;
        let attribute_filters: [(&str, FilterFn); 5] = [
            ("data_attributes", filters::data_attributes),
            ("column_classes", filters::column_classes),
            ("row_classes", filters::row_classes),
            ("container_classes", filters::container_classes),
            ("button_classes", filters::button_classes),
        ];

        for (name, filter) in attribute_filters {
            tera.register_filter(
                name,
                move |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                    let attributes = tera::try_get_value!(name, "value", Attributes, value);
                    Ok(tera::Value::String(filter(&attributes)))
                },
            );
        }
    }

    /// Get the underlying Tera instance for custom operations.
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Add or replace a template at runtime.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<()> {
        self.tera
            .add_raw_template(name, source)
            .with_context(|| format!("failed to parse template {name}"))?;
        self.suggestion_cache.clear();
        Ok(())
    }

    /// Resolve the Tera template for a block template name.
    ///
    /// Suggestions are tried in order: `blocks/{name}.html`, then
    /// `{name}.html`. Results are cached; misses are not, so templates added
    /// later are still found.
    pub fn resolve_template(&self, template_name: &str) -> Option<String> {
        if template_name.is_empty() {
            return None;
        }

        if let Some(cached) = self.suggestion_cache.get(template_name) {
            return Some(cached.clone());
        }

        let suggestions = [
            format!("blocks/{template_name}.html"),
            format!("{template_name}.html"),
        ];

        for suggestion in suggestions {
            if self.tera.get_template(&suggestion).is_ok() {
                debug!(template = %template_name, resolved = %suggestion, "template resolved");
                self.suggestion_cache
                    .insert(template_name.to_string(), suggestion.clone());
                return Some(suggestion);
            }
        }

        None
    }
}

impl TemplateRenderer for ThemeEngine {
    fn render_template(
        &self,
        template_name: &str,
        attributes: &Attributes,
        content: &str,
    ) -> BlockResult<String> {
        let template = self
            .resolve_template(template_name)
            .ok_or_else(|| BlockError::template_not_found(template_name))?;

        let mut context = tera::Context::new();
        for (name, value) in attributes {
            context.insert(name.as_str(), value);
        }
        context.insert("attributes", attributes);
        context.insert("content", content);

        self.tera
            .render(&template, &context)
            .map_err(|e| BlockError::Template {
                template,
                message: error_chain(&e),
            })
    }
}

/// Flatten an error and its sources into one message.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
