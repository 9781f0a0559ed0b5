use crate::document::Document;
use core_types::{BoundaryPoint, NodeId, Range};
use std::cmp::Ordering;
use text_source::HostError;

/// Next node in tree order (first child, else next sibling of the nearest
/// ancestor that has one). Shadow boundaries are not crossed.
pub fn next_node(doc: &Document, node: NodeId) -> Option<NodeId> {
    if let Some(first) = doc.children(node).first() {
        return Some(*first);
    }
    let mut current = node;
    loop {
        let parent = doc.parent_of(current)?;
        let index = doc.index_in_parent(current)?;
        if let Some(sibling) = doc.children(parent).get(index + 1) {
            return Some(*sibling);
        }
        current = parent;
    }
}

/// Nodes from the range's start container to its end container, in tree
/// order, both inclusive.
pub fn nodes_in_range(doc: &Document, range: &Range) -> Vec<NodeId> {
    let end = range.end.node;
    let mut nodes = Vec::new();
    let mut current = Some(range.start.node);
    while let Some(node) = current {
        nodes.push(node);
        if node == end {
            break;
        }
        current = next_node(doc, node);
    }
    nodes
}

/// Order two boundary points. Points whose nodes have different tree roots
/// cannot be ordered and yield [`HostError::WrongDocument`].
pub fn compare_points(
    doc: &Document,
    a: BoundaryPoint,
    b: BoundaryPoint,
) -> Result<Ordering, HostError> {
    doc.record(a.node)?;
    doc.record(b.node)?;
    if a.node == b.node {
        return Ok(a.offset.cmp(&b.offset));
    }

    let path_a = doc.ancestor_path(a.node);
    let path_b = doc.ancestor_path(b.node);
    if path_a[0] != path_b[0] {
        return Err(HostError::WrongDocument);
    }

    let common = path_a
        .iter()
        .zip(&path_b)
        .take_while(|(x, y)| x == y)
        .count();
    let index = |node: NodeId| doc.index_in_parent(node).unwrap_or(0);

    if common == path_a.len() {
        // a's node contains b's node.
        let child = path_b[common];
        return Ok(if index(child) < a.offset {
            Ordering::Greater
        } else {
            Ordering::Less
        });
    }
    if common == path_b.len() {
        let child = path_a[common];
        return Ok(if index(child) < b.offset {
            Ordering::Less
        } else {
            Ordering::Greater
        });
    }
    Ok(index(path_a[common]).cmp(&index(path_b[common])))
}
