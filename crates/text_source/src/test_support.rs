//! Minimal in-memory host for unit tests.
//!
//! Node ids are handed out in creation order and that order doubles as
//! document order. Text scanning walks text nodes in that order.

use crate::error::HostError;
use crate::host::{
    CodepointScanner, CoordinateConverter, DomAccess, NodeKind, NodeRangeEnumerator, ScanOutcome,
    WritingModeLookup,
};
use core_types::{BoundaryPoint, NodeId, Range, Rect, WritingMode};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Default)]
struct FakeNode {
    kind: Option<NodeKind>,
    tag: String,
    parent: Option<NodeId>,
    tree: u32,
    text: String,
    attributes: HashMap<String, String>,
    value: Option<String>,
    selected_option: Option<NodeId>,
    rects: Vec<Rect>,
    zoom: f32,
    writing_mode: Option<WritingMode>,
}

pub(crate) struct FakeHost {
    nodes: Vec<FakeNode>,
    selection: Vec<Range>,
    compare_failure: Option<HostError>,
}

const ROOT: NodeId = NodeId(0);

impl FakeHost {
    pub(crate) fn new() -> Self {
        let root = FakeNode {
            kind: Some(NodeKind::Document),
            zoom: 1.0,
            ..FakeNode::default()
        };
        Self {
            nodes: vec![root],
            selection: Vec::new(),
            compare_failure: None,
        }
    }

    fn push(&mut self, node: FakeNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(FakeNode {
            parent: Some(ROOT),
            zoom: 1.0,
            ..node
        });
        id
    }

    fn node(&self, id: NodeId) -> Option<&FakeNode> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut FakeNode {
        &mut self.nodes[id.0 as usize]
    }

    pub(crate) fn element(&mut self, tag: &str) -> NodeId {
        self.push(FakeNode {
            kind: Some(NodeKind::Element),
            tag: tag.to_string(),
            ..FakeNode::default()
        })
    }

    pub(crate) fn text(&mut self, text: &str) -> NodeId {
        self.push(FakeNode {
            kind: Some(NodeKind::Text),
            text: text.to_string(),
            ..FakeNode::default()
        })
    }

    pub(crate) fn set_parent(&mut self, node: NodeId, parent: NodeId) {
        self.node_mut(node).parent = Some(parent);
    }

    /// Move a node into a separate tree; comparisons against it fail.
    pub(crate) fn set_tree(&mut self, node: NodeId, tree: u32) {
        self.node_mut(node).tree = tree;
    }

    pub(crate) fn set_value(&mut self, node: NodeId, value: &str) {
        self.node_mut(node).value = Some(value.to_string());
    }

    pub(crate) fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.node_mut(node).text = text.to_string();
    }

    pub(crate) fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.node_mut(node)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub(crate) fn set_selected_option(&mut self, select: NodeId, option: NodeId) {
        self.node_mut(select).selected_option = Some(option);
    }

    pub(crate) fn set_rects(&mut self, node: NodeId, rects: Vec<Rect>) {
        self.node_mut(node).rects = rects;
    }

    pub(crate) fn set_zoom(&mut self, node: NodeId, zoom: f32) {
        self.node_mut(node).zoom = zoom;
    }

    pub(crate) fn set_writing_mode(&mut self, node: NodeId, mode: WritingMode) {
        self.node_mut(node).writing_mode = Some(mode);
    }

    pub(crate) fn fail_comparisons_with(&mut self, err: HostError) {
        self.compare_failure = Some(err);
    }

    pub(crate) fn selection(&self) -> &[Range] {
        &self.selection
    }

    fn text_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == Some(NodeKind::Text))
            .map(|(i, _)| NodeId(i as u32))
    }

    fn chars_of(&self, node: NodeId) -> Result<Vec<char>, HostError> {
        match self.node(node) {
            Some(n) if n.kind == Some(NodeKind::Text) => Ok(n.text.chars().collect()),
            _ => Err(HostError::InvalidNode(node)),
        }
    }
}

impl DomAccess for FakeHost {
    fn node_kind(&self, node: NodeId) -> Result<NodeKind, HostError> {
        self.node(node)
            .and_then(|n| n.kind)
            .ok_or(HostError::InvalidNode(node))
    }

    fn tag_name(&self, element: NodeId) -> Option<&str> {
        self.node(element)
            .filter(|n| n.kind == Some(NodeKind::Element))
            .map(|n| n.tag.as_str())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ROOT {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn detach(&mut self, node: NodeId) -> Result<(), HostError> {
        if self.node(node).is_none() {
            return Err(HostError::InvalidNode(node));
        }
        self.node_mut(node).parent = None;
        Ok(())
    }

    fn text_content(&self, node: NodeId) -> Result<String, HostError> {
        self.node(node)
            .map(|n| n.text.clone())
            .ok_or(HostError::InvalidNode(node))
    }

    fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.node(element)?.attributes.get(name).map(String::as_str)
    }

    fn value(&self, element: NodeId) -> Option<&str> {
        self.node(element)?.value.as_deref()
    }

    fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        self.node(select)?.selected_option
    }

    fn bounding_client_rect(&self, element: NodeId) -> Result<Rect, HostError> {
        let node = self.node(element).ok_or(HostError::InvalidNode(element))?;
        Ok(node
            .rects
            .iter()
            .copied()
            .reduce(Rect::union)
            .unwrap_or_default())
    }

    fn client_rects(&self, element: NodeId) -> Result<Vec<Rect>, HostError> {
        let node = self.node(element).ok_or(HostError::InvalidNode(element))?;
        Ok(node.rects.clone())
    }

    fn range_client_rects(&self, range: &Range) -> Result<Vec<Rect>, HostError> {
        let mut out = Vec::new();
        for id in self.text_nodes() {
            if id >= range.start.node && id <= range.end.node {
                out.extend(self.client_rects(id)?);
            }
        }
        Ok(out)
    }

    fn range_text(&self, range: &Range) -> Result<String, HostError> {
        let mut out = String::new();
        for id in self.text_nodes() {
            if id < range.start.node || id > range.end.node {
                continue;
            }
            let chars = self.chars_of(id)?;
            let from = if id == range.start.node {
                range.start.offset
            } else {
                0
            };
            let to = if id == range.end.node {
                range.end.offset
            } else {
                chars.len()
            };
            out.extend(chars[from.min(chars.len())..to.min(chars.len())].iter());
        }
        Ok(out)
    }

    fn compare_boundary_points(
        &self,
        a: BoundaryPoint,
        b: BoundaryPoint,
    ) -> Result<Ordering, HostError> {
        if let Some(err) = &self.compare_failure {
            return Err(err.clone());
        }
        let tree_a = self.node(a.node).ok_or(HostError::InvalidNode(a.node))?.tree;
        let tree_b = self.node(b.node).ok_or(HostError::InvalidNode(b.node))?.tree;
        if tree_a != tree_b {
            return Err(HostError::WrongDocument);
        }
        Ok((a.node, a.offset).cmp(&(b.node, b.offset)))
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn add_selection_range(&mut self, range: Range) {
        self.selection.push(range);
    }
}

impl CodepointScanner for FakeHost {
    fn scan(
        &self,
        anchor: BoundaryPoint,
        count: isize,
        _force_preserve_whitespace: bool,
        _layout_aware: bool,
    ) -> Result<ScanOutcome, HostError> {
        let order: Vec<NodeId> = self.text_nodes().collect();
        let mut index = order
            .iter()
            .position(|id| *id == anchor.node)
            .ok_or(HostError::InvalidNode(anchor.node))?;
        let mut chars = self.chars_of(order[index])?;
        let mut offset = anchor.offset.min(chars.len());
        let mut remaining = count.unsigned_abs();
        let mut taken = Vec::new();

        if count >= 0 {
            while remaining > 0 {
                if offset < chars.len() {
                    taken.push(chars[offset]);
                    offset += 1;
                    remaining -= 1;
                } else if index + 1 < order.len() {
                    index += 1;
                    chars = self.chars_of(order[index])?;
                    offset = 0;
                } else {
                    break;
                }
            }
        } else {
            while remaining > 0 {
                if offset > 0 {
                    offset -= 1;
                    taken.push(chars[offset]);
                    remaining -= 1;
                } else if index > 0 {
                    index -= 1;
                    chars = self.chars_of(order[index])?;
                    offset = chars.len();
                } else {
                    break;
                }
            }
            taken.reverse();
        }

        Ok(ScanOutcome {
            point: BoundaryPoint::new(order[index], offset),
            content: taken.into_iter().collect(),
            remainder: remaining,
        })
    }
}

impl CoordinateConverter for FakeHost {
    fn convert_rect(&self, rect: Rect, relative_to: NodeId) -> Rect {
        let zoom = self.node(relative_to).map_or(1.0, |n| n.zoom);
        if zoom == 1.0 { rect } else { rect.scale(zoom) }
    }
}

impl WritingModeLookup for FakeHost {
    fn writing_mode_of(&self, element: NodeId) -> WritingMode {
        self.node(element)
            .and_then(|n| n.writing_mode)
            .unwrap_or_default()
    }
}

impl NodeRangeEnumerator for FakeHost {
    fn nodes_in_range(&self, range: &Range) -> Vec<NodeId> {
        (range.start.node.0..=range.end.node.0).map(NodeId).collect()
    }
}
