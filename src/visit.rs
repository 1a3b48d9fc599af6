//! Generic depth-first traversal over heterogeneous syntax nodes.
//!
//! The walk is structural: it recurses into every property whose value is a
//! node (an object with a string `type` tag) or a sequence of nodes, in
//! property-declaration order, then sequence order. It knows nothing about
//! the grammar producing the tree.

use serde_json::Value;

use crate::node;

/// Where a node was reached from during traversal.
#[derive(Debug, Clone, Default)]
pub struct NodePath {
    /// Type tag of the parent node. Absent at the root.
    pub parent_type: Option<String>,
    /// Property key under which the node was reached.
    pub key: Option<String>,
    /// Position within a sequence, when the node was reached through one.
    pub index: Option<usize>,
}

/// Visitor outcome controlling descent into the current node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Recurse into the node's children.
    Descend,
    /// Prune this subtree.
    Skip,
}

/// Callback invoked for every node, pre-order.
pub trait Visitor {
    fn enter(&mut self, node: &mut Value, path: &NodePath) -> Flow;
}

impl<F> Visitor for F
where
    F: FnMut(&mut Value, &NodePath) -> Flow,
{
    fn enter(&mut self, node: &mut Value, path: &NodePath) -> Flow {
        self(node, path)
    }
}

/// Walk every node reachable from `root`, depth-first pre-order. The tree is
/// assumed acyclic; that is a structural guarantee of the upstream parser and
/// is not re-validated here.
pub fn visit<V: Visitor>(root: &mut Value, visitor: &mut V) {
    if node::is_node(root) {
        walk(root, NodePath::default(), visitor);
    }
}

fn walk<V: Visitor>(current: &mut Value, path: NodePath, visitor: &mut V) {
    if visitor.enter(current, &path) == Flow::Skip {
        return;
    }

    let parent_type = node::type_tag(current).map(str::to_string);

    let Some(object) = current.as_object_mut() else {
        return;
    };
    for (key, child) in object.iter_mut() {
        if node::is_node(child) {
            let path = NodePath {
                parent_type: parent_type.clone(),
                key: Some(key.clone()),
                index: None,
            };
            walk(child, path, visitor);
        } else if let Some(items) = child.as_array_mut() {
            for (index, item) in items.iter_mut().enumerate() {
                // Null slots are explicit absence markers, e.g. array holes.
                if !node::is_node(item) {
                    continue;
                }
                let path = NodePath {
                    parent_type: parent_type.clone(),
                    key: Some(key.clone()),
                    index: Some(index),
                };
                walk(item, path, visitor);
            }
        }
    }
}
