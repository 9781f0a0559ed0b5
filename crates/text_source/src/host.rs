//! Collaborator interfaces a host document provides to text sources.
//!
//! Text sources never own the document. Every operation receives the host
//! explicitly: `&dyn TextHost` for queries, `&mut dyn TextHost` for the few
//! operations that touch document state (imposter removal and selection).
//!
//! # Integration Pattern
//!
//! A host implements the five small traits below; [`TextHost`] is then
//! provided by a blanket impl:
//!
//! ```ignore
//! let mut source = TextSource::from(RangeTextSource::create(&doc, range)?);
//! source.set_end_offset(&doc, 8, true, true)?;
//! let rects = source.rects(&doc)?;
//! ```

use crate::error::HostError;
use core_types::{BoundaryPoint, NodeId, Range, Rect, WritingMode};
use std::cmp::Ordering;

/// Coarse node classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
    ShadowRoot,
}

/// Result of a codepoint scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Boundary reached by the scan.
    pub point: BoundaryPoint,
    /// Text traversed, in document order.
    pub content: String,
    /// Codepoints left unconsumed when the document boundary was hit first.
    pub remainder: usize,
}

/// Node, geometry and selection access on the host document.
pub trait DomAccess {
    // =========================================================================
    // Tree
    // =========================================================================

    fn node_kind(&self, node: NodeId) -> Result<NodeKind, HostError>;

    /// Lower-case local name of an element.
    fn tag_name(&self, element: NodeId) -> Option<&str>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Parent node when it is an element.
    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        matches!(self.node_kind(parent), Ok(NodeKind::Element)).then_some(parent)
    }

    /// Whether the node is reachable from the document root.
    ///
    /// Hosts must answer from current tree state; attachment can change
    /// between calls for reasons outside the caller's control.
    fn is_connected(&self, node: NodeId) -> bool;

    /// Remove a node from its parent. Removing a parentless node is a no-op.
    fn detach(&mut self, node: NodeId) -> Result<(), HostError>;

    // =========================================================================
    // Element content
    // =========================================================================

    fn text_content(&self, node: NodeId) -> Result<String, HostError>;

    fn attribute(&self, element: NodeId, name: &str) -> Option<&str>;

    /// Current value of a form control, if the element has one.
    fn value(&self, element: NodeId) -> Option<&str>;

    /// Selected `<option>` of a `<select>`, if any.
    fn selected_option(&self, select: NodeId) -> Option<NodeId>;

    // =========================================================================
    // Geometry
    // =========================================================================

    fn bounding_client_rect(&self, element: NodeId) -> Result<Rect, HostError>;

    fn client_rects(&self, element: NodeId) -> Result<Vec<Rect>, HostError>;

    fn range_client_rects(&self, range: &Range) -> Result<Vec<Rect>, HostError>;

    // =========================================================================
    // Ranges & selection
    // =========================================================================

    fn range_text(&self, range: &Range) -> Result<String, HostError>;

    /// Order two boundary points in tree order.
    ///
    /// Points in different node trees yield [`HostError::WrongDocument`].
    fn compare_boundary_points(
        &self,
        a: BoundaryPoint,
        b: BoundaryPoint,
    ) -> Result<Ordering, HostError>;

    fn clear_selection(&mut self);

    fn add_selection_range(&mut self, range: Range);
}

/// Per-codepoint walker over rendered document text.
pub trait CodepointScanner {
    /// Walk `count` codepoints from `anchor`: forward when positive,
    /// backward when negative.
    ///
    /// `force_preserve_whitespace` keeps whitespace characters verbatim;
    /// `layout_aware` makes rendered line breaks part of the traversed text.
    fn scan(
        &self,
        anchor: BoundaryPoint,
        count: isize,
        force_preserve_whitespace: bool,
        layout_aware: bool,
    ) -> Result<ScanOutcome, HostError>;
}

/// Zoom/transform-aware geometry adjustment.
pub trait CoordinateConverter {
    fn convert_rect(&self, rect: Rect, relative_to: NodeId) -> Rect;

    fn convert_rects(&self, rects: &[Rect], relative_to: NodeId) -> Vec<Rect> {
        rects
            .iter()
            .map(|r| self.convert_rect(*r, relative_to))
            .collect()
    }

    fn offset_rects(&self, rects: &[Rect], dx: f32, dy: f32) -> Vec<Rect> {
        rects.iter().map(|r| r.offset(dx, dy)).collect()
    }
}

pub trait WritingModeLookup {
    fn writing_mode_of(&self, element: NodeId) -> WritingMode;
}

pub trait NodeRangeEnumerator {
    fn nodes_in_range(&self, range: &Range) -> Vec<NodeId>;
}

/// Everything a text source needs from its host.
pub trait TextHost:
    DomAccess + CodepointScanner + CoordinateConverter + WritingModeLookup + NodeRangeEnumerator
{
}

impl<T> TextHost for T where
    T: DomAccess
        + CodepointScanner
        + CoordinateConverter
        + WritingModeLookup
        + NodeRangeEnumerator
        + ?Sized
{
}
