//! Schema document classification.
//!
//! The raw JSON document is classified once, before rendering, into a tagged
//! tree: every entry is a group, a field, an invalid field configuration, or
//! plain data. Rendering dispatches on the tag instead of re-inspecting raw
//! JSON shapes during traversal.

use indexmap::IndexMap;
use log::warn;
use serde_json::Value;

use crate::{data::path::FieldPath, error::SchemaError};

/// Keys consumed into [`GroupNode`] metadata. Not addressable as children.
const GROUP_META_KEYS: [&str; 5] = ["_group", "_title", "_collapsible", "_collapsed", "_hidden"];

/// One entry in the classified schema tree.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// Nests further children; renders as a titled section.
    Group(GroupNode),
    /// Leaf describing one interactive input.
    Field(FieldConfig),
    /// Declares a `type` but fails shape validation; renders as an inline
    /// placeholder and registers nothing.
    Invalid(InvalidField),
    /// Anything else. Never rendered, but addressable by `$` references.
    Data(Value),
}

/// A grouping node and its section metadata.
#[derive(Debug, Clone)]
pub struct GroupNode {
    pub title: Option<String>,
    pub collapsible: bool,
    pub collapsed: bool,
    pub hidden: bool,
    pub visible_if: Option<String>,
    /// Child nodes in declaration order.
    pub children: IndexMap<String, SchemaNode>,
}

/// Declared widget kind of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Boolean,
    Select,
    /// Free text; carries the declared subtype ("text", "password", ...).
    Text(String),
}

/// Where a select widget draws its choices from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    /// Literal option list from the schema.
    List(Vec<String>),
    /// String to resolve against the schema root at construction time.
    /// Only `$`-prefixed strings resolve; anything else fails at the widget.
    Reference(String),
}

/// Validated configuration of one field.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub kind: FieldKind,
    /// Initial scalar value, as declared.
    pub value: Value,
    pub label: Option<String>,
    pub required: bool,
    pub visible_if: Option<String>,
    /// Present exactly when `kind` is [`FieldKind::Select`].
    pub options: Option<OptionSource>,
    pub hidden: bool,
}

/// A field configuration rejected at classification time.
#[derive(Debug, Clone)]
pub struct InvalidField {
    pub reason: String,
    pub hidden: bool,
}

/// Classified schema document plus the raw tree it came from.
///
/// The raw document stays around because `$` references traverse raw JSON:
/// they may reach inside field objects (`$sensors.value`) or plain data.
#[derive(Debug, Clone)]
pub struct SchemaRoot {
    raw: Value,
    children: IndexMap<String, SchemaNode>,
}

impl TryFrom<&Value> for SchemaRoot {
    type Error = SchemaError;

    fn try_from(document: &Value) -> Result<Self, Self::Error> {
        let Some(map) = document.as_object() else {
            return Err(SchemaError::RootNotObject {
                actual: json_kind(document),
            });
        };
        let children = map
            .iter()
            .map(|(key, value)| (key.clone(), classify(value)))
            .collect();
        Ok(SchemaRoot {
            raw: document.clone(),
            children,
        })
    }
}

impl SchemaRoot {
    /// Top-level nodes in declaration order.
    pub fn children(&self) -> &IndexMap<String, SchemaNode> {
        &self.children
    }

    /// Walk the classified tree segment by segment.
    ///
    /// Returns `None` as soon as a segment is absent or the current node
    /// cannot be descended into.
    pub fn node_at(&self, path: &FieldPath) -> Option<&SchemaNode> {
        let mut segments = path.segments().iter();
        let mut node = self.children.get(segments.next()?)?;
        for segment in segments {
            let SchemaNode::Group(group) = node else {
                return None;
            };
            node = group.children.get(segment)?;
        }
        Some(node)
    }

    /// Resolve a `$`-prefixed dotted reference against the raw document.
    ///
    /// Non-`$` strings do not activate resolution. A missing segment
    /// resolves to `None` with a diagnostic; it never raises.
    pub fn resolve_reference(&self, reference: &str) -> Option<&Value> {
        let rest = reference.strip_prefix('$')?;
        let mut current = &self.raw;
        for segment in rest.split('.') {
            match current.as_object().and_then(|map| map.get(segment)) {
                Some(value) => current = value,
                None => {
                    warn!("reference {reference:?} could not be resolved");
                    return None;
                }
            }
        }
        Some(current)
    }
}

fn classify(value: &Value) -> SchemaNode {
    let Some(object) = value.as_object() else {
        return SchemaNode::Data(value.clone());
    };
    let hidden = truthy(object.get("_hidden"));

    if truthy(object.get("_group")) {
        let children = object
            .iter()
            .filter(|(key, _)| !GROUP_META_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), classify(value)))
            .collect();
        return SchemaNode::Group(GroupNode {
            title: string_of(object.get("_title")),
            collapsible: truthy(object.get("_collapsible")),
            collapsed: truthy(object.get("_collapsed")),
            hidden,
            visible_if: string_of(object.get("visibleIf")),
            children,
        });
    }

    if let Some(declared) = object.get("type") {
        return match field_config(declared, object, hidden) {
            Ok(config) => SchemaNode::Field(config),
            Err(reason) => SchemaNode::Invalid(InvalidField { reason, hidden }),
        };
    }

    SchemaNode::Data(value.clone())
}

fn field_config(
    declared: &Value,
    object: &serde_json::Map<String, Value>,
    hidden: bool,
) -> Result<FieldConfig, String> {
    let Some(type_name) = declared.as_str() else {
        return Err(format!("field type must be a string, got {declared}"));
    };
    let kind = match type_name {
        "boolean" => FieldKind::Boolean,
        "select" => FieldKind::Select,
        other => FieldKind::Text(other.to_string()),
    };
    let options = if kind == FieldKind::Select {
        match object.get("options") {
            Some(Value::Array(items)) => {
                let strings = scalar_strings(items)
                    .ok_or_else(|| "select options must be scalar values".to_string())?;
                Some(OptionSource::List(strings))
            }
            Some(Value::String(reference)) => Some(OptionSource::Reference(reference.clone())),
            _ => return Err("select options must be an array or a reference string".to_string()),
        }
    } else {
        None
    };
    Ok(FieldConfig {
        kind,
        value: object.get("value").cloned().unwrap_or(Value::Null),
        label: string_of(object.get("label")),
        required: truthy(object.get("required")),
        visible_if: string_of(object.get("visibleIf")),
        options,
        hidden,
    })
}

/// Stringify every item of an option array; `None` if any item is not a
/// scalar. Numbers and booleans stringify the way they print.
pub(crate) fn scalar_strings(items: &[Value]) -> Option<Vec<String>> {
    items.iter().map(scalar_string).collect()
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// JSON truthiness for flag keys (`_group`, `_hidden`, `required`, ...):
/// absent, `null`, `false`, `0` and `""` are falsy, everything else truthy.
pub(crate) fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Initial control text for a declared scalar: falsy values render empty,
/// other scalars stringify. Non-scalars have no text form.
pub(crate) fn text_or_empty(value: &Value) -> String {
    if !truthy(Some(value)) {
        return String::new();
    }
    scalar_string(value).unwrap_or_default()
}

fn string_of(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
