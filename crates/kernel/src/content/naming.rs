//! Names derived from a block type identifier.
//!
//! An identifier has the form `namespace/name`. From it we derive the tap key
//! used to filter default attributes and the template name used for rendering.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{BlockError, BlockResult};

/// Suffix appended to [`filter_key`] for the default-attributes tap.
pub const DEFAULT_ATTRIBUTES_SUFFIX: &str = "_default_attributes";

// The pattern is a literal; compilation cannot fail.
#[allow(clippy::expect_used)]
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9-]+/[a-z0-9-]+$").expect("identifier pattern is valid")
});

/// Turn an identifier into a tap key by replacing `/` and `-` with `_`.
///
/// `wp-bootstrap-blocks/column` becomes `wp_bootstrap_blocks_column`.
pub fn filter_key(identifier: &str) -> String {
    identifier.replace(['/', '-'], "_")
}

/// Tap name under which a block type's supplied defaults are filtered.
pub fn default_attributes_tap(identifier: &str) -> String {
    format!("{}{DEFAULT_ATTRIBUTES_SUFFIX}", filter_key(identifier))
}

/// Strip the namespace from an identifier.
///
/// Everything after the last `/`, or the whole identifier if there is none.
pub fn template_name(identifier: &str) -> &str {
    identifier
        .rsplit_once('/')
        .map_or(identifier, |(_, name)| name)
}

/// Check that an identifier is a lowercase `namespace/name` pair.
pub fn validate_identifier(identifier: &str) -> BlockResult<()> {
    if IDENTIFIER_RE.is_match(identifier) {
        return Ok(());
    }

    let reason = if !identifier.contains('/') {
        "must contain a namespace prefix, e.g. my-plugin/my-block"
    } else if identifier.chars().any(|c| c.is_ascii_uppercase()) {
        "must not contain uppercase characters"
    } else {
        "must contain only lowercase alphanumerics and dashes around a single '/'"
    };

    Err(BlockError::InvalidIdentifier {
        identifier: identifier.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn filter_key_replaces_separators() {
        assert_eq!(
            filter_key("wp-bootstrap-blocks/column"),
            "wp_bootstrap_blocks_column"
        );
        assert_eq!(filter_key("ns/name"), "ns_name");
        assert_eq!(filter_key("plain"), "plain");
    }

    #[test]
    fn default_attributes_tap_appends_suffix() {
        assert_eq!(
            default_attributes_tap("wp-bootstrap-blocks/row"),
            "wp_bootstrap_blocks_row_default_attributes"
        );
    }

    #[test]
    fn template_name_strips_namespace() {
        assert_eq!(template_name("wp-bootstrap-blocks/column"), "column");
        assert_eq!(template_name("nosep"), "nosep");
        assert_eq!(template_name("a/b/c"), "c");
        assert_eq!(template_name("trailing/"), "");
    }

    #[test]
    fn derivations_are_pure() {
        let id = "ns/my-block";
        assert_eq!(filter_key(id), filter_key(id));
        assert_eq!(template_name(id), template_name(id));
    }

    #[test]
    fn validates_identifiers() {
        assert!(validate_identifier("wp-bootstrap-blocks/column").is_ok());
        assert!(validate_identifier("ns/block2").is_ok());

        for bad in ["column", "NS/column", "ns/col/umn", "ns/", "/column", "ns/col_umn"] {
            assert!(
                matches!(
                    validate_identifier(bad),
                    Err(BlockError::InvalidIdentifier { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }
}
