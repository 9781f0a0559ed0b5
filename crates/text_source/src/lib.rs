//! # text_source
//!
//! Cursors over a span of displayed page text, independent of how that text
//! is backed:
//! - [`ElementTextSource`]: text derived from one element (a control's value,
//!   an image's alt text, a button's label, a select's chosen option)
//! - [`RangeTextSource`]: a document range, optionally hosted on an imposter
//!   element that stands in for a source unable to hold a range
//!
//! Both are wrapped by [`TextSource`], which callers extend and contract by
//! codepoint counts, read back, and compare for a common start point.
//!
//! The document itself is reached only through the traits in [`host`];
//! this crate depends on no DOM implementation.

mod element;
mod error;
pub mod host;
mod range;
mod source;
mod text;

#[cfg(test)]
mod test_support;

pub use element::{ElementTextSource, element_content};
pub use error::HostError;
pub use host::{NodeKind, ScanOutcome, TextHost};
pub use range::{Imposter, RangeTextSource};
pub use source::{StartComparison, TextSource, TextSourceKind};
pub use text::{rebuild_codepoint_boundaries, strip_zero_width};

pub use core_types::{BoundaryPoint, NodeId, Range, Rect, WritingMode};
