//! Markup helpers shared by the bundled block templates.
//!
//! These run as Tera filters over the `attributes` map, so templates stay free
//! of class-building logic.

use heck::ToKebabCase;
use serde_json::Value;

use crate::content::Attributes;

const BREAKPOINTS: [&str; 5] = ["xs", "sm", "md", "lg", "xl"];

/// Escape a string for use inside a double-quoted HTML attribute.
pub(crate) fn escape_attribute(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Serialize an attribute value for a `data-*` marker.
///
/// Returns `None` for values that are omitted (null and empty strings).
fn marker_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Render every attribute as a ` data-<kebab-name>="value"` marker.
///
/// `sizeXs: 12` becomes ` data-size-xs="12"`; booleans render as
/// `"true"`/`"false"`. Each marker carries a leading space so the output can be
/// placed right after a tag's last attribute.
pub fn data_attributes(attributes: &Attributes) -> String {
    attributes
        .iter()
        .filter_map(|(name, value)| {
            marker_value(value).map(|v| {
                format!(" data-{}=\"{}\"", name.to_kebab_case(), escape_attribute(&v))
            })
        })
        .collect()
}

fn str_attr<'a>(attributes: &'a Attributes, name: &str) -> &'a str {
    attributes.get(name).and_then(Value::as_str).unwrap_or("")
}

fn bool_attr(attributes: &Attributes, name: &str) -> bool {
    attributes.get(name).and_then(Value::as_bool).unwrap_or(false)
}

fn int_attr(attributes: &Attributes, name: &str) -> i64 {
    attributes
        .get(name)
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
}

fn push_custom_class(classes: &mut Vec<String>, attributes: &Attributes) {
    let custom = str_attr(attributes, "className").trim();
    if !custom.is_empty() {
        classes.push(custom.to_string());
    }
}

/// Bootstrap grid classes for a column.
///
/// Per breakpoint, `equalWidth*` wins over a positive `size*`; a column with
/// neither at any breakpoint gets plain `col`.
pub fn column_classes(attributes: &Attributes) -> String {
    let mut classes = Vec::new();

    for bp in BREAKPOINTS {
        let suffix = capitalize(bp);
        let prefix = if bp == "xs" {
            "col".to_string()
        } else {
            format!("col-{bp}")
        };

        if bool_attr(attributes, &format!("equalWidth{suffix}")) {
            classes.push(prefix);
        } else {
            let size = int_attr(attributes, &format!("size{suffix}"));
            if size > 0 {
                classes.push(format!("{prefix}-{size}"));
            }
        }
    }

    if classes.is_empty() {
        classes.push("col".to_string());
    }

    match str_attr(attributes, "contentVerticalAlignment") {
        "top" => classes.push("align-self-start".to_string()),
        "center" => classes.push("align-self-center".to_string()),
        "bottom" => classes.push("align-self-end".to_string()),
        _ => {}
    }

    push_custom_class(&mut classes, attributes);
    classes.join(" ")
}

/// Classes for a row: gutters and horizontal/vertical alignment.
///
/// `horizontalGutters`/`verticalGutters` hold ready-made gutter classes
/// (`gx-5`, `gy-2`) and are appended as given.
pub fn row_classes(attributes: &Attributes) -> String {
    let mut classes = vec!["row".to_string()];

    if bool_attr(attributes, "noGutters") {
        classes.push("no-gutters".to_string());
    }

    match str_attr(attributes, "alignment") {
        "left" => classes.push("justify-content-start".to_string()),
        "center" => classes.push("justify-content-center".to_string()),
        "right" => classes.push("justify-content-end".to_string()),
        _ => {}
    }

    match str_attr(attributes, "verticalAlignment") {
        "top" => classes.push("align-items-start".to_string()),
        "center" => classes.push("align-items-center".to_string()),
        "bottom" => classes.push("align-items-end".to_string()),
        _ => {}
    }

    for gutter in ["horizontalGutters", "verticalGutters"] {
        let class = str_attr(attributes, gutter).trim();
        if !class.is_empty() {
            classes.push(class.to_string());
        }
    }

    push_custom_class(&mut classes, attributes);
    classes.join(" ")
}

/// Classes for a container: fixed, fluid, or fluid below a breakpoint.
pub fn container_classes(attributes: &Attributes) -> String {
    let mut classes = Vec::new();

    let breakpoint = str_attr(attributes, "fluidBreakpoint");
    if bool_attr(attributes, "isFluid") {
        if breakpoint.is_empty() {
            classes.push("container-fluid".to_string());
        } else {
            classes.push(format!("container-{breakpoint}"));
        }
    } else {
        classes.push("container".to_string());
    }

    let margin = str_attr(attributes, "marginAfter").trim();
    if !margin.is_empty() {
        classes.push(margin.to_string());
    }

    push_custom_class(&mut classes, attributes);
    classes.join(" ")
}

/// Classes for a button link.
pub fn button_classes(attributes: &Attributes) -> String {
    let style = match str_attr(attributes, "style") {
        "" => "primary",
        other => other,
    };
    let mut classes = vec!["btn".to_string(), format!("btn-{style}")];
    push_custom_class(&mut classes, attributes);
    classes.join(" ")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
