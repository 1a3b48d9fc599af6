//! Capability queries over the host formatter's syntax tree.
//!
//! The tree arrives as a `serde_json::Value` document with heterogeneous node
//! shapes defined by an external grammar. Nothing here enumerates that
//! grammar; nodes are recognized structurally, by the presence of a string
//! `type` tag.

use serde_json::Value;

/// Type tag of a syntax node, when the value is one.
pub fn type_tag(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

/// A value is a node iff it is an object carrying a string `type` tag.
pub fn is_node(value: &Value) -> bool {
    value.is_object() && type_tag(value).is_some()
}

/// True for plain string literals in either parser family's tree shape.
pub fn is_string_literal(node: &Value) -> bool {
    match type_tag(node) {
        Some("StringLiteral") => true,
        Some("Literal") => node.get("value").is_some_and(Value::is_string),
        _ => false,
    }
}

/// The two upstream representations of a quoted literal. Resolved once per
/// node, instead of probing for fields at every access site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralShape {
    /// Raw source text lives under `extra.raw`, next to `extra.rawValue`.
    Extra,
    /// Raw source text lives directly under `raw`.
    Raw,
}

impl LiteralShape {
    pub fn detect(node: &Value) -> Option<Self> {
        let extra_raw = node
            .get("extra")
            .and_then(|extra| extra.get("raw"))
            .and_then(Value::as_str);
        if extra_raw.is_some() {
            return Some(Self::Extra);
        }
        if node.get("raw").and_then(Value::as_str).is_some() {
            return Some(Self::Raw);
        }
        None
    }

    /// Raw source form of the literal, quotes included.
    pub fn raw<'a>(&self, node: &'a Value) -> Option<&'a str> {
        match self {
            Self::Extra => node.get("extra")?.get("raw")?.as_str(),
            Self::Raw => node.get("raw")?.as_str(),
        }
    }

    /// Write back a rewritten literal, keeping the raw and logical forms in
    /// step with each other.
    pub fn write(&self, node: &mut Value, logical: &str, raw: String) {
        match self {
            Self::Extra => {
                if let Some(extra) = node.get_mut("extra").and_then(Value::as_object_mut) {
                    extra.insert("rawValue".to_string(), Value::String(logical.to_string()));
                    extra.insert("raw".to_string(), Value::String(raw));
                }
            }
            Self::Raw => {
                if let Some(object) = node.as_object_mut() {
                    object.insert("raw".to_string(), Value::String(raw));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_is_node() {
        assert!(is_node(&json!({ "type": "Identifier", "name": "x" })));
        assert!(!is_node(&json!({ "name": "x" })));
        assert!(!is_node(&json!({ "type": 3 })));
        assert!(!is_node(&json!("Identifier")));
        assert!(!is_node(&json!(null)));
    }

    #[test]
    fn test_is_string_literal() {
        assert!(is_string_literal(&json!({ "type": "StringLiteral", "value": "a" })));
        assert!(is_string_literal(&json!({ "type": "Literal", "value": "a" })));
        assert!(!is_string_literal(&json!({ "type": "Literal", "value": 3 })));
        assert!(!is_string_literal(&json!({ "type": "NumericLiteral", "value": 3 })));
    }

    #[test]
    fn test_detect_shape() {
        let extra = json!({ "type": "StringLiteral", "value": "a", "extra": { "raw": "\"a\"" } });
        let raw = json!({ "type": "Literal", "value": "a", "raw": "'a'" });
        let bare = json!({ "type": "Literal", "value": "a" });

        assert_eq!(LiteralShape::detect(&extra), Some(LiteralShape::Extra));
        assert_eq!(LiteralShape::detect(&raw), Some(LiteralShape::Raw));
        assert_eq!(LiteralShape::detect(&bare), None);
    }

    #[test]
    fn test_write_keeps_forms_in_step() {
        let mut node = json!({
            "type": "StringLiteral",
            "value": "a",
            "extra": { "raw": "\"a\"", "rawValue": "a" }
        });
        let shape = LiteralShape::detect(&node).unwrap();
        shape.write(&mut node, "b c", "\"b c\"".to_string());

        assert_eq!(node["extra"]["raw"], json!("\"b c\""));
        assert_eq!(node["extra"]["rawValue"], json!("b c"));
    }
}
