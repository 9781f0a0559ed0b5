//! `text_source` host traits for [`Document`].

use crate::document::Document;
use crate::node::NodeData;
use crate::scan;
use crate::traverse::{compare_points, nodes_in_range};
use core_types::{BoundaryPoint, NodeId, Range, Rect, WritingMode};
use std::cmp::Ordering;
use text_source::{HostError, NodeKind, ScanOutcome};
use text_source::host::{
    CodepointScanner, CoordinateConverter, DomAccess, NodeRangeEnumerator, WritingModeLookup,
};

impl Document {
    /// Codepoint span of a text node covered by `range`, if any.
    fn covered_span(&self, node: NodeId, range: &Range) -> Option<(usize, usize)> {
        let NodeData::Text { text } = self.data(node).ok()? else {
            return None;
        };
        let len = text.chars().count();
        let from = if node == range.start.node {
            range.start.offset.min(len)
        } else {
            0
        };
        let to = if node == range.end.node {
            range.end.offset.min(len)
        } else {
            len
        };
        (from < to).then_some((from, to))
    }

    /// Product of the `zoom` declarations from `node` up to the document
    /// element, crossing shadow roots through their host.
    pub fn zoom_scale(&self, node: NodeId) -> f32 {
        let document_element = self.document_element();
        let mut scale = 1.0;
        let mut current = Some(node);
        while let Some(id) = current {
            if Some(id) == document_element {
                break;
            }
            if let Some(zoom) = self
                .style_value(id, "zoom")
                .and_then(|z| z.trim().parse::<f32>().ok())
                .filter(|z| z.is_finite() && *z > 0.0)
            {
                scale *= zoom;
            }
            current = self.composed_parent(id);
        }
        scale
    }

    /// Nearest inclusive ancestor element declaring `writing-mode`.
    pub fn computed_writing_mode(&self, element: NodeId) -> WritingMode {
        let mut current = Some(element);
        while let Some(id) = current {
            if let Some(value) = self.style_value(id, "writing-mode") {
                return WritingMode::from_css(value);
            }
            current = self.composed_parent(id);
        }
        WritingMode::HorizontalTb
    }

    fn first_option(&self, node: NodeId, pred: &dyn Fn(NodeId) -> bool) -> Option<NodeId> {
        for child in self.children(node) {
            let data = self.data(*child).ok()?;
            if data.is_element_named("option") && pred(*child) {
                return Some(*child);
            }
            if data.is_element_named("optgroup")
                && let Some(found) = self.first_option(*child, pred)
            {
                return Some(found);
            }
        }
        None
    }
}

impl DomAccess for Document {
    fn node_kind(&self, node: NodeId) -> Result<NodeKind, HostError> {
        Ok(match self.data(node)? {
            NodeData::Document => NodeKind::Document,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text { .. } => NodeKind::Text,
            NodeData::Comment { .. } => NodeKind::Comment,
            NodeData::ShadowRoot { .. } => NodeKind::ShadowRoot,
        })
    }

    fn tag_name(&self, element: NodeId) -> Option<&str> {
        self.data(element).ok()?.element_name()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        Document::is_connected(self, node)
    }

    fn detach(&mut self, node: NodeId) -> Result<(), HostError> {
        self.remove(node)
    }

    fn text_content(&self, node: NodeId) -> Result<String, HostError> {
        self.text_content_of(node)
    }

    fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.get_attribute(element, name)
    }

    fn value(&self, element: NodeId) -> Option<&str> {
        match self.data(element).ok()? {
            NodeData::Element {
                value: Some(value),
                ..
            } => Some(value.as_str()),
            NodeData::Element { name, .. } if &**name == "input" || &**name == "option" => {
                self.get_attribute(element, "value")
            }
            _ => None,
        }
    }

    fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        if let NodeData::Element {
            selected_option: Some(option),
            ..
        } = self.data(select).ok()?
            && self.is_inclusive_ancestor(select, *option)
        {
            return Some(*option);
        }
        self.first_option(select, &|option: NodeId| self.has_attribute(option, "selected"))
            .or_else(|| self.first_option(select, &|_: NodeId| true))
    }

    fn bounding_client_rect(&self, element: NodeId) -> Result<Rect, HostError> {
        self.data(element)?;
        Ok(self
            .rects_of(element)
            .iter()
            .copied()
            .reduce(Rect::union)
            .unwrap_or_default())
    }

    fn client_rects(&self, element: NodeId) -> Result<Vec<Rect>, HostError> {
        self.data(element)?;
        Ok(self.rects_of(element).to_vec())
    }

    fn range_client_rects(&self, range: &Range) -> Result<Vec<Rect>, HostError> {
        self.data(range.start.node)?;
        self.data(range.end.node)?;
        Ok(nodes_in_range(self, range)
            .into_iter()
            .filter(|node| self.covered_span(*node, range).is_some())
            .flat_map(|node| self.rects_of(node).iter().copied())
            .collect())
    }

    fn range_text(&self, range: &Range) -> Result<String, HostError> {
        self.data(range.start.node)?;
        self.data(range.end.node)?;
        let mut out = String::new();
        for node in nodes_in_range(self, range) {
            let Some((from, to)) = self.covered_span(node, range) else {
                continue;
            };
            if let NodeData::Text { text } = self.data(node)? {
                out.extend(text.chars().skip(from).take(to - from));
            }
        }
        Ok(out)
    }

    fn compare_boundary_points(
        &self,
        a: BoundaryPoint,
        b: BoundaryPoint,
    ) -> Result<Ordering, HostError> {
        compare_points(self, a, b)
    }

    fn clear_selection(&mut self) {
        self.selection_mut().clear();
    }

    fn add_selection_range(&mut self, range: Range) {
        self.selection_mut().push(range);
    }
}

impl CodepointScanner for Document {
    fn scan(
        &self,
        anchor: BoundaryPoint,
        count: isize,
        force_preserve_whitespace: bool,
        layout_aware: bool,
    ) -> Result<ScanOutcome, HostError> {
        scan::scan(self, anchor, count, force_preserve_whitespace, layout_aware)
    }
}

impl CoordinateConverter for Document {
    fn convert_rect(&self, rect: Rect, relative_to: NodeId) -> Rect {
        let scale = self.zoom_scale(relative_to);
        if scale == 1.0 { rect } else { rect.scale(scale) }
    }
}

impl WritingModeLookup for Document {
    fn writing_mode_of(&self, element: NodeId) -> WritingMode {
        self.computed_writing_mode(element)
    }
}

impl NodeRangeEnumerator for Document {
    fn nodes_in_range(&self, range: &Range) -> Vec<NodeId> {
        nodes_in_range(self, range)
    }
}
