//! Text source over a document range, optionally hosted on an imposter.

use crate::error::HostError;
use crate::host::{DomAccess, NodeKind, TextHost};
use crate::source::{StartComparison, TextSource};
use core_types::{NodeId, Range, Rect, WritingMode};
use std::cmp::Ordering;
use std::sync::Arc;

/// Stand-in element hosting the range for a source that cannot hold one,
/// together with the geometry captured while it was attached.
#[derive(Debug, PartialEq)]
pub struct Imposter {
    element: NodeId,
    source_element: NodeId,
    cached_rects: Vec<Rect>,
    cached_source_rect: Rect,
}

impl Imposter {
    #[inline]
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// The element the imposter imitates.
    #[inline]
    pub fn source_element(&self) -> NodeId {
        self.source_element
    }

    #[inline]
    pub fn cached_rects(&self) -> &[Rect] {
        &self.cached_rects
    }

    #[inline]
    pub fn cached_source_rect(&self) -> Rect {
        self.cached_source_rect
    }

    /// Cached rects moved by however far the source element has moved since
    /// the snapshot.
    fn shifted_rects(&self, host: &dyn TextHost) -> Result<Vec<Rect>, HostError> {
        let current = host.bounding_client_rect(self.source_element)?;
        let current = host.convert_rect(current, self.source_element);
        let dx = current.left() - self.cached_source_rect.left();
        let dy = current.top() - self.cached_source_rect.top();
        Ok(host.offset_rects(&self.cached_rects, dx, dy))
    }
}

/// A range whose boundaries move by codepoints through the host scanner.
///
/// `content` is accumulated as the boundaries move instead of being read back
/// from the range, since the range may be unusable once an imposter is gone.
#[derive(Clone, Debug)]
pub struct RangeTextSource {
    range: Range,
    range_start_offset: usize,
    content: String,
    imposter: Option<Arc<Imposter>>,
}

impl RangeTextSource {
    pub fn create(host: &dyn TextHost, range: Range) -> Result<Self, HostError> {
        let content = host.range_text(&range)?;
        Ok(Self {
            range,
            range_start_offset: range.start.offset,
            content,
            imposter: None,
        })
    }

    /// Build a source whose range lives on `imposter_element`, snapshotting
    /// geometry now, while the imposter is still attached.
    pub fn create_from_imposter(
        host: &dyn TextHost,
        range: Range,
        imposter_element: NodeId,
        imposter_source_element: NodeId,
    ) -> Result<Self, HostError> {
        let content = host.range_text(&range)?;
        let cached_rects =
            host.convert_rects(&host.range_client_rects(&range)?, range.start.node);
        let cached_source_rect = host.convert_rect(
            host.bounding_client_rect(imposter_source_element)?,
            imposter_source_element,
        );
        log::debug!(
            target: "text_source.range",
            "imposter {imposter_element} for {imposter_source_element}: {} cached rects",
            cached_rects.len()
        );
        Ok(Self {
            range,
            range_start_offset: range.start.offset,
            content,
            imposter: Some(Arc::new(Imposter {
                element: imposter_element,
                source_element: imposter_source_element,
                cached_rects,
                cached_source_rect,
            })),
        })
    }

    #[inline]
    pub fn range(&self) -> &Range {
        &self.range
    }

    #[inline]
    pub fn range_start_offset(&self) -> usize {
        self.range_start_offset
    }

    #[inline]
    pub fn imposter(&self) -> Option<&Imposter> {
        self.imposter.as_deref()
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.content
    }

    /// Scan `length` codepoints forward from the range end (`from_end`) or
    /// start, and move the end boundary there.
    ///
    /// Scanning from the start restarts the covered text at the start
    /// boundary. Returns the codepoints actually scanned.
    pub fn set_end_offset(
        &mut self,
        host: &dyn TextHost,
        length: usize,
        from_end: bool,
        layout_aware: bool,
    ) -> Result<usize, HostError> {
        let anchor = if from_end {
            self.range.end
        } else {
            self.range.start
        };
        let length = length.min(isize::MAX as usize);
        let outcome = host.scan(anchor, length as isize, !layout_aware, layout_aware)?;
        log::trace!(
            target: "text_source.range",
            "end +{length} from {anchor:?} -> {:?} (remainder {})",
            outcome.point,
            outcome.remainder
        );

        self.range.end = outcome.point;
        if from_end {
            self.content.push_str(&outcome.content);
        } else {
            self.content = outcome.content;
        }
        Ok(length - outcome.remainder.min(length))
    }

    /// Scan `length` codepoints backward from the range start and move the
    /// start boundary there.
    pub fn set_start_offset(
        &mut self,
        host: &dyn TextHost,
        length: usize,
        layout_aware: bool,
    ) -> Result<usize, HostError> {
        let anchor = self.range.start;
        let length = length.min(isize::MAX as usize);
        let outcome = host.scan(anchor, -(length as isize), !layout_aware, layout_aware)?;
        log::trace!(
            target: "text_source.range",
            "start -{length} from {anchor:?} -> {:?} (remainder {})",
            outcome.point,
            outcome.remainder
        );

        self.range.start = outcome.point;
        self.range_start_offset = self.range.start.offset;
        self.content.insert_str(0, &outcome.content);
        Ok(length - outcome.remainder.min(length))
    }

    /// Detach the imposter if it is still in the document.
    ///
    /// Safe to call any number of times, including after the imposter was
    /// removed by other code.
    pub fn cleanup(&self, host: &mut dyn TextHost) {
        let Some(imposter) = &self.imposter else {
            return;
        };
        if host.parent(imposter.element).is_none() {
            return;
        }
        if let Err(err) = host.detach(imposter.element) {
            log::debug!(
                target: "text_source.range",
                "imposter {} already gone: {err}",
                imposter.element
            );
        }
    }

    pub fn rects(&self, host: &dyn TextHost) -> Result<Vec<Rect>, HostError> {
        if let Some(imposter) = self.disconnected_imposter(host) {
            return imposter.shifted_rects(host);
        }
        let rects = host.range_client_rects(&self.range)?;
        Ok(host.convert_rects(&rects, self.range.start.node))
    }

    pub fn writing_mode(&self, host: &dyn TextHost) -> WritingMode {
        let node = match self.disconnected_imposter(host) {
            Some(imposter) => imposter.source_element,
            None => self.range.start.node,
        };
        let element = match host.node_kind(node) {
            Ok(NodeKind::Element) => Some(node),
            _ => host.parent_element(node),
        };
        element
            .map(|e| host.writing_mode_of(e))
            .unwrap_or_default()
    }

    /// Make this range the document selection. Imposters are never selected.
    pub fn select(&self, host: &mut dyn TextHost) {
        if self.imposter.is_some() {
            return;
        }
        host.clear_selection();
        host.add_selection_range(self.range);
    }

    pub fn deselect(&self, host: &mut dyn TextHost) {
        if self.imposter.is_some() {
            return;
        }
        host.clear_selection();
    }

    /// Compare start points, keeping "incomparable" apart from "different".
    pub fn compare_start(
        &self,
        host: &dyn TextHost,
        other: &TextSource,
    ) -> Result<StartComparison, HostError> {
        let TextSource::Range(other) = other else {
            return Ok(StartComparison::Different);
        };

        // The live range of a detached imposter cannot be compared reliably.
        if let Some(imposter) = &self.imposter {
            let same_source = other
                .imposter
                .as_ref()
                .is_some_and(|o| o.source_element == imposter.source_element);
            let same = same_source && self.range_start_offset == other.range_start_offset;
            return Ok(if same {
                StartComparison::Same
            } else {
                StartComparison::Different
            });
        }

        match host.compare_boundary_points(self.range.start, other.range.start) {
            Ok(Ordering::Equal) => Ok(StartComparison::Same),
            Ok(_) => Ok(StartComparison::Different),
            Err(HostError::WrongDocument) => Ok(StartComparison::Incomparable),
            Err(err) => Err(err),
        }
    }

    pub fn has_same_start(
        &self,
        host: &dyn TextHost,
        other: &TextSource,
    ) -> Result<bool, HostError> {
        Ok(self.compare_start(host, other)? == StartComparison::Same)
    }

    pub fn nodes_in_range(&self, host: &dyn TextHost) -> Vec<NodeId> {
        host.nodes_in_range(&self.range)
    }

    pub fn is_connected(&self, host: &dyn DomAccess) -> bool {
        host.is_connected(self.range.start.node) && host.is_connected(self.range.end.node)
    }

    // Attachment is checked on every call; other code may remove the imposter.
    fn disconnected_imposter(&self, host: &dyn TextHost) -> Option<&Imposter> {
        self.imposter
            .as_deref()
            .filter(|imposter| !host.is_connected(imposter.element))
    }
}
