//! Conditional-visibility sublanguage.
//!
//! The grammar is a single equality comparison, `<dependencyPath> ==
//! <literal>`, where the literal is `true`, `false`, or a (possibly quoted)
//! string. The asymmetry on failure is deliberate and load-bearing:
//!
//! - a malformed expression is a schema-authoring bug and fails **open**
//!   (the element stays visible);
//! - a dependency path with no registry entry is a data-integrity signal
//!   and fails **closed** (the element hides).

use crate::{
    data::{
        registry::{FieldRegistry, FieldValue},
        schema::{SchemaNode, SchemaRoot},
    },
    host::RenderHost,
    render::GroupView,
};

/// A parsed visibility expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Flat path of the field the expression depends on.
    pub dependency: String,
    pub expected: Literal,
}

/// Right-hand side of a visibility expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Text(String),
}

/// Parse `<path> == <literal>`; `None` when the expression does not match
/// the grammar. One layer of quotes is stripped from the literal before it
/// is classified, so `'true'` still means the boolean.
pub fn parse_condition(expression: &str) -> Option<Condition> {
    let (lhs, rhs) = expression.split_once("==")?;
    let dependency = lhs.trim();
    let literal = unquote(rhs.trim());
    if dependency.is_empty() || literal.is_empty() {
        return None;
    }
    let expected = match literal {
        "true" => Literal::Bool(true),
        "false" => Literal::Bool(false),
        other => Literal::Text(other.to_string()),
    };
    Some(Condition {
        dependency: dependency.to_string(),
        expected,
    })
}

/// Evaluate a visibility expression against the registry.
pub fn evaluate(expression: &str, registry: &FieldRegistry) -> bool {
    let Some(condition) = parse_condition(expression) else {
        return true;
    };
    let Some(entry) = registry.get(&condition.dependency) else {
        return false;
    };
    loose_eq(&entry.value, &condition.expected)
}

/// Loose equality: `"true"`/`"false"` are interchangeable with booleans
/// (several widgets store their values as strings), everything else
/// compares as strings.
fn loose_eq(actual: &FieldValue, expected: &Literal) -> bool {
    match (actual, expected) {
        (FieldValue::Bool(a), Literal::Bool(b)) => a == b,
        (FieldValue::Text(a), Literal::Text(b)) => a == b,
        (FieldValue::Bool(a), Literal::Text(text)) => text == bool_text(*a),
        (FieldValue::Text(text), Literal::Bool(b)) => text == bool_text(*b),
    }
}

fn bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn unquote(text: &str) -> &str {
    let text = text.strip_prefix(['\'', '"']).unwrap_or(text);
    text.strip_suffix(['\'', '"']).unwrap_or(text)
}

/// Re-evaluate and re-apply visibility for every rendered group and every
/// registered field.
///
/// Full re-evaluation, no dependency graph: O(groups + fields) per call.
/// Idempotent and safe to run while the tree is still being built; only the
/// final call after the full tree exists determines what the user sees.
pub fn refresh_visibility(
    host: &mut dyn RenderHost,
    root: &SchemaRoot,
    groups: &[GroupView],
    registry: &FieldRegistry,
) {
    for group in groups {
        if let Some(SchemaNode::Group(config)) = root.node_at(&group.path)
            && let Some(expression) = &config.visible_if
        {
            host.set_display(group.section, evaluate(expression, registry));
        }
    }
    for (_, entry) in registry.iter() {
        if let Some(expression) = &entry.config.visible_if {
            host.set_display(entry.wrapper, evaluate(expression, registry));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{
            path::FieldPath,
            registry::{FieldEntry, FieldRegistry},
            schema::{FieldConfig, FieldKind},
        },
        host::NodeId,
    };
    use serde_json::Value;

    fn registry_with(flat: &str, value: FieldValue) -> FieldRegistry {
        let mut registry = FieldRegistry::new();
        registry.register(FieldEntry {
            path: FieldPath::from_flat(flat),
            value,
            config: FieldConfig {
                kind: FieldKind::Boolean,
                value: Value::Null,
                label: None,
                required: false,
                visible_if: None,
                options: None,
                hidden: false,
            },
            wrapper: NodeId(0),
            error: NodeId(0),
        });
        registry
    }

    #[test]
    fn test_parse_literals() {
        let cond = parse_condition("a_b == true").unwrap();
        assert_eq!(cond.dependency, "a_b");
        assert_eq!(cond.expected, Literal::Bool(true));

        let cond = parse_condition("mode == 'LAN'").unwrap();
        assert_eq!(cond.expected, Literal::Text("LAN".to_string()));

        // quotes are stripped before classification
        let cond = parse_condition("x == \"false\"").unwrap();
        assert_eq!(cond.expected, Literal::Bool(false));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_condition("no comparison here").is_none());
        assert!(parse_condition("== true").is_none());
        assert!(parse_condition("a == ").is_none());
        assert!(parse_condition("a == ''").is_none());
    }

    #[test]
    fn test_evaluate_matching_entry() {
        let registry = registry_with("a_b", FieldValue::Bool(true));
        assert!(evaluate("a_b == true", &registry));
        assert!(!evaluate("a_b == false", &registry));
    }

    #[test]
    fn test_evaluate_fails_closed_on_missing_dependency() {
        let registry = FieldRegistry::new();
        assert!(!evaluate("ghost == true", &registry));
    }

    #[test]
    fn test_evaluate_fails_open_on_malformed_expression() {
        let registry = FieldRegistry::new();
        assert!(evaluate("not an expression", &registry));
        assert!(evaluate("", &registry));
    }

    #[test]
    fn test_loose_equality_across_kinds() {
        let registry = registry_with("flag", FieldValue::Text("true".to_string()));
        // stored string "true" satisfies expected boolean true
        assert!(evaluate("flag == true", &registry));

        let registry = registry_with("flag", FieldValue::Bool(false));
        // stored boolean false satisfies expected string "false"
        assert!(evaluate("flag == 'false'", &registry));

        let registry = registry_with("mode", FieldValue::Text("LAN".to_string()));
        assert!(evaluate("mode == LAN", &registry));
        assert!(!evaluate("mode == WIFI", &registry));
    }

    #[test]
    fn test_dependency_path_is_trimmed() {
        let registry = registry_with("a", FieldValue::Bool(true));
        assert!(evaluate("  a   ==  true", &registry));
    }
}
