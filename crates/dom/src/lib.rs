//! In-memory page document used as the reference `text_source` host.
//!
//! Nodes live in an arena and are never freed, so a `NodeId` stays valid
//! after its node is removed from the tree. Shadow roots form their own
//! trees, reachable from the page only through their host element.

pub mod fixtures;
pub mod scan;
pub mod traverse;

mod document;
mod host;
mod node;

pub use document::Document;
pub use node::NodeData;
pub use scan::ScanConfig;
