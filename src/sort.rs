//! Class-list sorting.
//!
//! [`sort_classes`] rebuilds a whitespace-delimited class string in canonical
//! group order: tokens keep their arrival order within a group, groups are
//! emitted in table order, space-joined inside a group and comma-joined
//! between groups. Empty groups are omitted, so a single populated group
//! yields no comma at all.

use serde_json::Value;

use crate::groups::GroupTable;

/// Interpolation marker of moustache-style template languages. Class lists
/// containing it cannot be restructured safely and are passed through.
const MOUSTACHE_MARKER: &str = "{{";

/// Positional hints for sorting one template-literal segment. An anchored
/// boundary token stays in place, since it may be one half of a class name
/// split by an interpolated expression.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SortHints {
    /// Keep the first token at the front of the output.
    pub anchor_first: bool,
    /// Keep the last token at the end of the output, with no trailing
    /// whitespace after it.
    pub anchor_last: bool,
}

/// Sort a class list into canonical group order.
pub fn sort_classes(table: &GroupTable, text: &str) -> String {
    sort_classes_with(table, text, SortHints::default())
}

/// Sort a class list, keeping anchored boundary tokens in place.
pub fn sort_classes_with(table: &GroupTable, text: &str, hints: SortHints) -> String {
    if text.is_empty() || text.contains(MOUSTACHE_MARKER) {
        return text.to_string();
    }

    let mut tokens: Vec<&str> = text.split_whitespace().collect();

    let first = if hints.anchor_first && !tokens.is_empty() {
        Some(tokens.remove(0))
    } else {
        None
    };
    let last = if hints.anchor_last { tokens.pop() } else { None };

    let mut buckets: Vec<Vec<&str>> = vec![Vec::new(); table.groups().len()];
    for token in tokens {
        buckets[table.classify_index(token)].push(token);
    }

    let grouped = buckets
        .iter()
        .filter(|bucket| !bucket.is_empty())
        .map(|bucket| bucket.join(" "))
        .collect::<Vec<_>>()
        .join(",");

    let mut parts = Vec::new();
    if let Some(first) = first {
        parts.push(first.to_string());
    }
    if !grouped.is_empty() {
        parts.push(grouped);
    }
    if let Some(last) = last {
        parts.push(last.to_string());
    }
    parts.join(" ")
}

/// Apply the sorter to a JSON string value; any other value kind is returned
/// unchanged.
pub fn sort_class_value(table: &GroupTable, value: &Value) -> Value {
    match value.as_str() {
        Some(text) => Value::String(sort_classes(table, text)),
        None => value.clone(),
    }
}
