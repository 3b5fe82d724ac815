//! Theme engine and template rendering.
//!
//! Provides the [`TemplateRenderer`] seam used by block render callbacks and a
//! Tera-based implementation with theme overrides and suggestion resolution.

mod engine;
mod filters;
mod renderer;

pub use engine::ThemeEngine;
pub use filters::{button_classes, column_classes, container_classes, data_attributes, row_classes};
pub use renderer::TemplateRenderer;
