use crate::element::ElementTextSource;
use crate::error::HostError;
use crate::host::{DomAccess, TextHost};
use crate::range::RangeTextSource;
use core_types::{NodeId, Rect, WritingMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSourceKind {
    Element,
    Range,
}

/// Outcome of comparing the start points of two sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartComparison {
    Same,
    Different,
    /// The starts live in different node trees and have no order.
    Incomparable,
}

/// A cursor over a span of displayed text.
///
/// Lengths and offsets count codepoints. The host is passed to every call
/// that needs the document; element sources ignore it where their answer is
/// pure offset arithmetic.
#[derive(Clone, Debug)]
pub enum TextSource {
    Element(ElementTextSource),
    Range(RangeTextSource),
}

impl TextSource {
    pub fn kind(&self) -> TextSourceKind {
        match self {
            TextSource::Element(_) => TextSourceKind::Element,
            TextSource::Range(_) => TextSourceKind::Range,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            TextSource::Element(source) => source.text(),
            TextSource::Range(source) => source.text(),
        }
    }

    pub fn set_end_offset(
        &mut self,
        host: &dyn TextHost,
        length: usize,
        from_end: bool,
        layout_aware: bool,
    ) -> Result<usize, HostError> {
        match self {
            TextSource::Element(source) => Ok(source.set_end_offset(length, from_end)),
            TextSource::Range(source) => {
                source.set_end_offset(host, length, from_end, layout_aware)
            }
        }
    }

    pub fn set_start_offset(
        &mut self,
        host: &dyn TextHost,
        length: usize,
        layout_aware: bool,
    ) -> Result<usize, HostError> {
        match self {
            TextSource::Element(source) => Ok(source.set_start_offset(length)),
            TextSource::Range(source) => source.set_start_offset(host, length, layout_aware),
        }
    }

    pub fn compare_start(
        &self,
        host: &dyn TextHost,
        other: &TextSource,
    ) -> Result<StartComparison, HostError> {
        match self {
            TextSource::Element(source) => Ok(if source.has_same_start(other) {
                StartComparison::Same
            } else {
                StartComparison::Different
            }),
            TextSource::Range(source) => source.compare_start(host, other),
        }
    }

    /// Whether both sources begin at the same point. Starts in different
    /// node trees are never the same.
    pub fn has_same_start(
        &self,
        host: &dyn TextHost,
        other: &TextSource,
    ) -> Result<bool, HostError> {
        Ok(self.compare_start(host, other)? == StartComparison::Same)
    }

    pub fn rects(&self, host: &dyn TextHost) -> Result<Vec<Rect>, HostError> {
        match self {
            TextSource::Element(source) => source.rects(host),
            TextSource::Range(source) => source.rects(host),
        }
    }

    pub fn writing_mode(&self, host: &dyn TextHost) -> WritingMode {
        match self {
            TextSource::Element(source) => source.writing_mode(),
            TextSource::Range(source) => source.writing_mode(host),
        }
    }

    pub fn select(&self, host: &mut dyn TextHost) {
        if let TextSource::Range(source) = self {
            source.select(host);
        }
    }

    pub fn deselect(&self, host: &mut dyn TextHost) {
        if let TextSource::Range(source) = self {
            source.deselect(host);
        }
    }

    pub fn cleanup(&self, host: &mut dyn TextHost) {
        if let TextSource::Range(source) = self {
            source.cleanup(host);
        }
    }

    pub fn nodes_in_range(&self, host: &dyn TextHost) -> Vec<NodeId> {
        match self {
            TextSource::Element(source) => source.nodes_in_range(),
            TextSource::Range(source) => source.nodes_in_range(host),
        }
    }

    pub fn is_connected(&self, host: &dyn DomAccess) -> bool {
        match self {
            TextSource::Element(source) => source.is_connected(host),
            TextSource::Range(source) => source.is_connected(host),
        }
    }
}

impl From<ElementTextSource> for TextSource {
    fn from(source: ElementTextSource) -> Self {
        TextSource::Element(source)
    }
}

impl From<RangeTextSource> for TextSource {
    fn from(source: RangeTextSource) -> Self {
        TextSource::Range(source)
    }
}
