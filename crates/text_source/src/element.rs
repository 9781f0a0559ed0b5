//! Text source over the value-like content of a single element.

use crate::error::HostError;
use crate::host::{DomAccess, NodeKind, TextHost};
use crate::source::TextSource;
use crate::text::{CodepointText, strip_zero_width};
use core_types::{NodeId, Rect, WritingMode};
use std::sync::Arc;

/// A movable codepoint window over text derived once from an element.
///
/// No document range or selection is involved; boundary movement is offset
/// arithmetic clamped to the derived content.
#[derive(Clone, Debug)]
pub struct ElementTextSource {
    element: NodeId,
    full_content: Arc<CodepointText>,
    start_offset: usize,
    end_offset: usize,
}

impl ElementTextSource {
    /// Derive the element's content and open an empty window at its start.
    pub fn create(host: &dyn DomAccess, element: NodeId) -> Result<Self, HostError> {
        let content = element_content(host, element)?;
        log::trace!(
            target: "text_source.element",
            "create element source {element}: {} codepoints",
            content.chars().count()
        );
        Ok(Self {
            element,
            full_content: Arc::new(CodepointText::new(content)),
            start_offset: 0,
            end_offset: 0,
        })
    }

    #[inline]
    pub fn element(&self) -> NodeId {
        self.element
    }

    #[inline]
    pub fn full_content(&self) -> &str {
        self.full_content.as_str()
    }

    #[inline]
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    #[inline]
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    /// The `[start, end)` window of the full content.
    #[inline]
    pub fn text(&self) -> &str {
        self.full_content.slice(self.start_offset, self.end_offset)
    }

    /// Place the end boundary up to `length` codepoints after the current end
    /// (`from_end`) or the current start. Returns the codepoints actually
    /// covered, which is less than `length` at the end of the content.
    pub fn set_end_offset(&mut self, length: usize, from_end: bool) -> usize {
        if length == 0 {
            return 0;
        }
        let anchor = if from_end {
            self.end_offset
        } else {
            self.start_offset
        };
        let length = length.min(self.full_content.len() - anchor);
        self.end_offset = anchor + length;
        debug_assert!(self.start_offset <= self.end_offset);
        length
    }

    /// Move the start boundary back by up to `length` codepoints.
    pub fn set_start_offset(&mut self, length: usize) -> usize {
        let length = length.min(self.start_offset);
        self.start_offset -= length;
        length
    }

    pub fn has_same_start(&self, other: &TextSource) -> bool {
        let TextSource::Element(other) = other else {
            return false;
        };
        self.element == other.element
            && (Arc::ptr_eq(&self.full_content, &other.full_content)
                || self.full_content.as_str() == other.full_content.as_str())
            && self.start_offset == other.start_offset
    }

    pub fn rects(&self, host: &dyn TextHost) -> Result<Vec<Rect>, HostError> {
        let rects = host.client_rects(self.element)?;
        Ok(host.convert_rects(&rects, self.element))
    }

    /// Element sources carry no writing-mode information.
    #[inline]
    pub fn writing_mode(&self) -> WritingMode {
        WritingMode::HorizontalTb
    }

    #[inline]
    pub fn nodes_in_range(&self) -> Vec<NodeId> {
        vec![self.element]
    }

    pub fn is_connected(&self, host: &dyn DomAccess) -> bool {
        host.is_connected(self.element)
    }
}

/// Text an element contributes to a lookup, by element type.
pub fn element_content(host: &dyn DomAccess, element: NodeId) -> Result<String, HostError> {
    if host.node_kind(element)? != NodeKind::Element {
        return Err(HostError::NotAnElement(element));
    }

    let content = match host.tag_name(element) {
        Some("button") => host.text_content(element)?,
        Some("img") => host.attribute(element, "alt").unwrap_or("").to_string(),
        Some("select") => match host.selected_option(element) {
            Some(option) => host.text_content(option)?,
            None => String::new(),
        },
        _ => host.value(element).unwrap_or("").to_string(),
    };

    Ok(strip_zero_width(&content).into_owned())
}
