//! Template renderer interface used by block render callbacks.

use crate::content::Attributes;
use crate::error::BlockResult;

/// Turns a template name plus resolved attributes and inner content into markup.
///
/// Implementations must be safe to call concurrently; a block type holds one
/// shared renderer for its whole lifetime.
pub trait TemplateRenderer: Send + Sync {
    /// Render `template_name` with the given attributes and inner content.
    ///
    /// Fails with [`BlockError::TemplateNotFound`](crate::error::BlockError::TemplateNotFound)
    /// when no template matches, never with empty output.
    fn render_template(
        &self,
        template_name: &str,
        attributes: &Attributes,
        content: &str,
    ) -> BlockResult<String>;
}
