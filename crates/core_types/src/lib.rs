//! Value types shared between the text-source layer and document hosts.

use std::fmt;
use std::str::FromStr;

/// Opaque handle of a node inside a host document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A position in a document.
///
/// For text nodes `offset` counts codepoints into the node's text; for any
/// other node it is an index into the node's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl BoundaryPoint {
    #[inline]
    pub const fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A start/end boundary pair. Hosts interpret it against their own tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

impl Range {
    #[inline]
    pub const fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    /// Collapsed range at `point`.
    #[inline]
    pub const fn collapsed_at(point: BoundaryPoint) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// A rectangle in CSS px units, viewport-relative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Translate by `(dx, dy)`, keeping the size.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Scale position and size uniformly.
    #[inline]
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Smallest rect containing both.
    pub fn union(self, other: Rect) -> Self {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }
}

/// Effective text flow direction of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WritingMode {
    #[default]
    HorizontalTb,
    VerticalRl,
    VerticalLr,
    SidewaysRl,
    SidewaysLr,
}

impl WritingMode {
    /// Normalize a computed `writing-mode` value, including the legacy
    /// SVG 1.1 keywords. Unknown values fall back to `horizontal-tb`.
    pub fn from_css(value: &str) -> Self {
        match value.trim() {
            "lr" | "lr-tb" | "rl" | "horizontal-tb" => WritingMode::HorizontalTb,
            "tb" | "vertical-lr" => WritingMode::VerticalLr,
            "tb-rl" | "vertical-rl" => WritingMode::VerticalRl,
            "sideways-rl" => WritingMode::SidewaysRl,
            "sideways-lr" => WritingMode::SidewaysLr,
            _ => WritingMode::HorizontalTb,
        }
    }

    pub fn as_css_str(self) -> &'static str {
        match self {
            WritingMode::HorizontalTb => "horizontal-tb",
            WritingMode::VerticalRl => "vertical-rl",
            WritingMode::VerticalLr => "vertical-lr",
            WritingMode::SidewaysRl => "sideways-rl",
            WritingMode::SidewaysLr => "sideways-lr",
        }
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        !matches!(self, WritingMode::HorizontalTb)
    }
}

impl FromStr for WritingMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(WritingMode::from_css(s))
    }
}

impl fmt::Display for WritingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css_str())
    }
}
