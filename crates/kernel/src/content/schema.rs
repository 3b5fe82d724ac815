//! Attribute schemas for block types.
//!
//! A schema is an ordered map from attribute name to its type and optional
//! default. The set of attributes is fixed once the schema is built; only the
//! defaults are updated later, during default resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Attribute values keyed by attribute name, in insertion order.
pub type Attributes = Map<String, Value>;

/// JSON type accepted by an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl AttributeType {
    /// Whether `value` already has this type.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Null => value.is_null(),
        }
    }

    /// Convert `value` to this type when that can be done without loss.
    ///
    /// Returns `None` if the value cannot be represented as this type.
    pub fn coerce(self, value: &Value) -> Option<Value> {
        if self.matches(value) {
            return Some(value.clone());
        }

        match (self, value) {
            (Self::String, Value::Number(n)) => Some(Value::String(n.to_string())),
            (Self::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
            (Self::Number, Value::String(s)) => parse_number(s.trim()),
            (Self::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
            (Self::Integer, Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| Value::from(f as i64)),
            (Self::Boolean, Value::String(s)) => match s.as_str() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" | "" => Some(Value::Bool(false)),
                _ => None,
            },
            (Self::Boolean, Value::Number(n)) => match n.as_i64() {
                Some(1) => Some(Value::Bool(true)),
                Some(0) => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Parse a numeric string, keeping integers integral.
fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Type and default of a single attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Accepted JSON type.
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    /// Value used when the author has not set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl AttributeDefinition {
    /// Create a definition without a default.
    pub fn new(attr_type: AttributeType) -> Self {
        Self {
            attr_type,
            default: None,
        }
    }

    pub fn string() -> Self {
        Self::new(AttributeType::String)
    }

    pub fn number() -> Self {
        Self::new(AttributeType::Number)
    }

    pub fn integer() -> Self {
        Self::new(AttributeType::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(AttributeType::Boolean)
    }

    /// Set the default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Ordered set of attribute definitions for one block type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSchema {
    attributes: IndexMap<String, AttributeDefinition>,
}

impl AttributeSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, consuming the schema (builder style).
    pub fn attribute(mut self, name: &str, definition: AttributeDefinition) -> Self {
        self.attributes.insert(name.to_string(), definition);
        self
    }

    /// Look up an attribute definition.
    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.get(name)
    }

    /// Check whether the schema declares an attribute.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Number of declared attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the schema declares no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attribute names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(|s| s.as_str())
    }

    /// Iterate over `(name, definition)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeDefinition)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replace the default of an existing attribute.
    ///
    /// Returns `false` and leaves the schema untouched if `name` is not
    /// declared; the attribute set never grows.
    pub(crate) fn set_default(&mut self, name: &str, value: Value) -> bool {
        match self.attributes.get_mut(name) {
            Some(definition) => {
                definition.default = Some(value);
                true
            }
            None => false,
        }
    }

    /// Default values of every attribute that has one, in declaration order.
    pub fn defaults(&self) -> Attributes {
        self.attributes
            .iter()
            .filter_map(|(name, def)| def.default.clone().map(|v| (name.clone(), v)))
            .collect()
    }

    /// Build the attribute set handed to a render callback.
    ///
    /// Starts from the defaults, overlays author values for declared
    /// attributes (coerced to the declared type), and drops undeclared keys.
    /// A value that cannot be coerced falls back to the default.
    pub fn prepare(&self, raw: &Attributes) -> Attributes {
        for name in raw.keys().filter(|name| !self.contains(name)) {
            debug!(attribute = %name, "dropping undeclared attribute");
        }

        let mut prepared = Attributes::new();
        for (name, definition) in &self.attributes {
            let supplied = raw
                .get(name)
                .and_then(|value| match definition.attr_type.coerce(value) {
                    Some(coerced) => Some(coerced),
                    None => {
                        debug!(
                            attribute = %name,
                            expected = ?definition.attr_type,
                            "attribute value has wrong type, using default"
                        );
                        None
                    }
                });

            if let Some(value) = supplied.or_else(|| definition.default.clone()) {
                prepared.insert(name.clone(), value);
            }
        }
        prepared
    }

    /// Report attributes whose values do not match the declared types.
    ///
    /// Returns a list of messages; an empty list means the attributes are valid.
    /// Undeclared attributes are reported too.
    pub fn validate(&self, attributes: &Attributes) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in attributes {
            match self.attributes.get(name) {
                Some(definition) if !definition.attr_type.matches(value) => {
                    errors.push(format!(
                        "{name}: expected {:?}, got {value}",
                        definition.attr_type
                    ));
                }
                Some(_) => {}
                None => errors.push(format!("{name}: not declared in schema")),
            }
        }

        errors
    }
}

impl FromIterator<(String, AttributeDefinition)> for AttributeSchema {
    fn from_iter<I: IntoIterator<Item = (String, AttributeDefinition)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}
