//! Rewrite rules for class-bearing nodes.
//!
//! Transformers locate class lists under recognized attributes, run them
//! through the sorter and write the result back to both the logical value and
//! the raw source form of the node. Unrecognized shapes are skipped, never
//! treated as fatal: the worst outcome of a failed match is an unsorted
//! class list, not corrupted output.

use serde_json::Value;

use crate::context::RuleContext;
use crate::groups::GroupTable;
use crate::node::{self, LiteralShape};
use crate::sort::{self, SortHints};
use crate::visit::{self, Flow, NodePath, Visitor};

/// Attribute names whose values carry class lists. Anything else is left
/// untouched regardless of its value's shape.
const CLASS_ATTRIBUTES: [&str; 2] = ["class", "className"];

/// Callee names recognized as class-list-merging helper calls.
const MERGE_HELPERS: [&str; 1] = ["classNames"];

/// Shared state threaded through the transformers during one walk. The rule
/// context is reserved for class validation and unused by the sorter itself.
pub struct TransformEnv<'a> {
    pub table: &'a GroupTable,
    pub context: &'a RuleContext,
}

/// Walk a parsed source tree and sort every class list found under a
/// recognized attribute. Returns whether any node changed.
pub fn transform_tree(tree: &mut Value, env: &TransformEnv) -> bool {
    let mut visitor = AttributeVisitor {
        env,
        changed: false,
    };
    visit::visit(tree, &mut visitor);
    visitor.changed
}

struct AttributeVisitor<'a> {
    env: &'a TransformEnv<'a>,
    changed: bool,
}

impl Visitor for AttributeVisitor<'_> {
    fn enter(&mut self, current: &mut Value, _path: &NodePath) -> Flow {
        if node::type_tag(current) != Some("JSXAttribute") {
            return Flow::Descend;
        }

        let name = current
            .get("name")
            .and_then(|name| name.get("name"))
            .and_then(Value::as_str);
        if !name.is_some_and(|name| CLASS_ATTRIBUTES.contains(&name)) {
            return Flow::Descend;
        }

        if let Some(value) = current.get_mut("value") {
            if node::is_string_literal(value) {
                self.changed |= sort_string_literal(value, self.env);
            } else if node::type_tag(value) == Some("JSXExpressionContainer") {
                if let Some(expression) = value.get_mut("expression") {
                    self.changed |= sort_attribute_expression(expression, self.env);
                }
            }
        }

        Flow::Descend
    }
}

fn sort_attribute_expression(expression: &mut Value, env: &TransformEnv) -> bool {
    if node::is_string_literal(expression) {
        return sort_string_literal(expression, env);
    }
    match node::type_tag(expression) {
        Some("TemplateLiteral") => sort_template_literal(expression, env),
        Some("CallExpression") if is_merge_helper(expression) => {
            sort_attribute_call(expression, env)
        }
        _ => false,
    }
}

fn is_merge_helper(call: &Value) -> bool {
    let Some(callee) = call.get("callee") else {
        return false;
    };
    if node::type_tag(callee) != Some("Identifier") {
        return false;
    }
    callee
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| MERGE_HELPERS.contains(&name))
}

/// Sort the class list of a plain string literal, rewriting the logical value
/// and the raw source form together. The raw rewrite keeps the original quote
/// characters and replaces only the text between them.
pub fn sort_string_literal(literal: &mut Value, env: &TransformEnv) -> bool {
    let Some(value) = literal.get("value").and_then(Value::as_str) else {
        return false;
    };
    let result = sort::sort_classes(env.table, value);
    if result == value {
        return false;
    }

    let Some(shape) = LiteralShape::detect(literal) else {
        return false;
    };
    let Some(raw) = shape.raw(literal) else {
        return false;
    };
    let (Some(open), Some(close)) = (raw.chars().next(), raw.chars().last()) else {
        return false;
    };
    if raw.len() < open.len_utf8() + close.len_utf8() {
        // No room for both quote characters; leave the node alone.
        return false;
    }
    let new_raw = format!("{open}{result}{close}");

    shape.write(literal, &result, new_raw);
    if let Some(object) = literal.as_object_mut() {
        object.insert("value".to_string(), Value::String(result));
    }
    true
}

/// Sort each literal segment of a template literal independently. Segments
/// touching an interpolated expression without adjoining whitespace keep
/// their boundary token anchored, so no token migrates across the expression.
/// The cooked form is only re-sorted when escape decoding made it differ from
/// the raw form.
pub fn sort_template_literal(template: &mut Value, env: &TransformEnv) -> bool {
    let expression_count = template
        .get("expressions")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let Some(quasis) = template.get_mut("quasis").and_then(Value::as_array_mut) else {
        return false;
    };

    let mut changed = false;

    for (index, quasi) in quasis.iter_mut().enumerate() {
        let Some(value) = quasi.get_mut("value").and_then(Value::as_object_mut) else {
            continue;
        };
        let Some(raw) = value.get("raw").and_then(Value::as_str).map(str::to_string) else {
            continue;
        };
        let cooked = value
            .get("cooked")
            .and_then(Value::as_str)
            .map(str::to_string);
        let same = cooked.as_deref() == Some(raw.as_str());

        let hints = |text: &str| SortHints {
            anchor_first: index > 0 && !text.starts_with(char::is_whitespace),
            anchor_last: index < expression_count && !text.ends_with(char::is_whitespace),
        };

        let new_raw = sort::sort_classes_with(env.table, &raw, hints(&raw));
        let new_cooked = if same {
            Some(new_raw.clone())
        } else {
            cooked
                .as_deref()
                .map(|cooked| sort::sort_classes_with(env.table, cooked, hints(cooked)))
        };

        if new_raw != raw || new_cooked != cooked {
            changed = true;
        }

        value.insert("raw".to_string(), Value::String(new_raw));
        if let Some(new_cooked) = new_cooked {
            value.insert("cooked".to_string(), Value::String(new_cooked));
        }
    }

    changed
}

/// Best-effort pass over a class-list-merging helper call: string-literal
/// arguments are sorted in place, while `LogicalExpression` subtrees carrying
/// conditionally-applied classes are left alone. Full multi-argument merging
/// is out of contract; this pass only guarantees it never corrupts the tree.
pub fn sort_attribute_call(call: &mut Value, env: &TransformEnv) -> bool {
    let mut changed = false;

    visit::visit(call, &mut |child: &mut Value, _path: &NodePath| {
        if node::type_tag(child) == Some("LogicalExpression") {
            return Flow::Skip;
        }
        if node::is_string_literal(child) && sort_string_literal(child, env) {
            changed = true;
        }
        Flow::Descend
    });

    changed
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn env_fixture() -> (GroupTable, RuleContext) {
        (GroupTable::default(), RuleContext::new(json!({})))
    }

    #[test]
    fn test_sort_string_literal_extra_shape() {
        let (table, context) = env_fixture();
        let env = TransformEnv {
            table: &table,
            context: &context,
        };
        let mut literal = json!({
            "type": "StringLiteral",
            "value": "text-sm flex",
            "extra": { "raw": "'text-sm flex'", "rawValue": "text-sm flex" }
        });

        assert!(sort_string_literal(&mut literal, &env));
        assert_eq!(literal["value"], json!("flex,text-sm"));
        assert_eq!(literal["extra"]["raw"], json!("'flex,text-sm'"));
        assert_eq!(literal["extra"]["rawValue"], json!("flex,text-sm"));
    }

    #[test]
    fn test_sort_string_literal_raw_shape() {
        let (table, context) = env_fixture();
        let env = TransformEnv {
            table: &table,
            context: &context,
        };
        let mut literal = json!({
            "type": "Literal",
            "value": "text-sm flex",
            "raw": "\"text-sm flex\""
        });

        assert!(sort_string_literal(&mut literal, &env));
        assert_eq!(literal["value"], json!("flex,text-sm"));
        assert_eq!(literal["raw"], json!("\"flex,text-sm\""));
    }

    #[test]
    fn test_sort_string_literal_unchanged_reports_false() {
        let (table, context) = env_fixture();
        let env = TransformEnv {
            table: &table,
            context: &context,
        };
        let mut literal = json!({
            "type": "Literal",
            "value": "b-class a-class",
            "raw": "\"b-class a-class\""
        });

        assert!(!sort_string_literal(&mut literal, &env));
        assert_eq!(literal["raw"], json!("\"b-class a-class\""));
    }

    #[test]
    fn test_template_cooked_follows_raw_when_identical() {
        let (table, context) = env_fixture();
        let env = TransformEnv {
            table: &table,
            context: &context,
        };
        let mut template = json!({
            "type": "TemplateLiteral",
            "expressions": [],
            "quasis": [{
                "type": "TemplateElement",
                "value": { "raw": "text-sm flex", "cooked": "text-sm flex" },
                "tail": true
            }]
        });

        assert!(sort_template_literal(&mut template, &env));
        assert_eq!(template["quasis"][0]["value"]["raw"], json!("flex,text-sm"));
        assert_eq!(template["quasis"][0]["value"]["cooked"], json!("flex,text-sm"));
    }

    #[test]
    fn test_template_segments_sorted_independently() {
        let (table, context) = env_fixture();
        let env = TransformEnv {
            table: &table,
            context: &context,
        };
        let mut template = json!({
            "type": "TemplateLiteral",
            "expressions": [{ "type": "Identifier", "name": "extra" }],
            "quasis": [
                {
                    "type": "TemplateElement",
                    "value": { "raw": "a b ", "cooked": "a b " },
                    "tail": false
                },
                {
                    "type": "TemplateElement",
                    "value": { "raw": " c", "cooked": " c" },
                    "tail": true
                }
            ]
        });

        assert!(sort_template_literal(&mut template, &env));
        assert_eq!(template["quasis"][0]["value"]["raw"], json!("a b"));
        assert_eq!(template["quasis"][1]["value"]["raw"], json!("c"));
    }

    #[test]
    fn test_template_boundary_token_stays_anchored() {
        let (table, context) = env_fixture();
        let env = TransformEnv {
            table: &table,
            context: &context,
        };
        // In `text-${width}-500 flex`, "text-" and "-500" are halves of a
        // split class name and must not migrate.
        let mut template = json!({
            "type": "TemplateLiteral",
            "expressions": [{ "type": "Identifier", "name": "width" }],
            "quasis": [
                {
                    "type": "TemplateElement",
                    "value": { "raw": "text-", "cooked": "text-" },
                    "tail": false
                },
                {
                    "type": "TemplateElement",
                    "value": { "raw": "-500 flex", "cooked": "-500 flex" },
                    "tail": true
                }
            ]
        });

        sort_template_literal(&mut template, &env);
        assert_eq!(template["quasis"][0]["value"]["raw"], json!("text-"));
        assert_eq!(template["quasis"][1]["value"]["raw"], json!("-500 flex"));
    }

    #[test]
    fn test_merge_helper_recognized_by_name() {
        assert!(is_merge_helper(&json!({
            "callee": { "type": "Identifier", "name": "classNames" }
        })));
        assert!(!is_merge_helper(&json!({
            "callee": { "type": "Identifier", "name": "cx" }
        })));
        assert!(!is_merge_helper(&json!({
            "callee": { "type": "MemberExpression" }
        })));
    }

    #[test]
    fn test_attribute_call_skips_logical_expressions() {
        let (table, context) = env_fixture();
        let env = TransformEnv {
            table: &table,
            context: &context,
        };
        let mut call = json!({
            "type": "CallExpression",
            "callee": { "type": "Identifier", "name": "classNames" },
            "arguments": [
                {
                    "type": "StringLiteral",
                    "value": "text-sm flex",
                    "extra": { "raw": "'text-sm flex'", "rawValue": "text-sm flex" }
                },
                {
                    "type": "LogicalExpression",
                    "operator": "&&",
                    "left": { "type": "Identifier", "name": "condition" },
                    "right": {
                        "type": "StringLiteral",
                        "value": "text-sm flex",
                        "extra": { "raw": "'text-sm flex'", "rawValue": "text-sm flex" }
                    }
                }
            ]
        });

        assert!(sort_attribute_call(&mut call, &env));
        assert_eq!(call["arguments"][0]["value"], json!("flex,text-sm"));
        // The conditionally-applied class list is untouched.
        assert_eq!(call["arguments"][1]["right"]["value"], json!("text-sm flex"));
    }
}
