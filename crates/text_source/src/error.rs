use core_types::NodeId;
use std::fmt;

/// Failures reported by a host document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// Two boundary points live in different node trees and cannot be
    /// ordered (e.g. one of them is inside a shadow tree).
    WrongDocument,
    /// The node is unknown to the host or has been destroyed.
    InvalidNode(NodeId),
    /// An element was required.
    NotAnElement(NodeId),
    /// A boundary offset is past the end of its node.
    IndexSize { node: NodeId, offset: usize },
    /// A tree mutation would produce an invalid hierarchy.
    HierarchyRequest { parent: NodeId, child: NodeId },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::WrongDocument => {
                f.write_str("boundary points belong to different node trees")
            }
            HostError::InvalidNode(node) => write!(f, "node {node} is not part of the document"),
            HostError::NotAnElement(node) => write!(f, "node {node} is not an element"),
            HostError::IndexSize { node, offset } => {
                write!(f, "offset {offset} is out of bounds for node {node}")
            }
            HostError::HierarchyRequest { parent, child } => {
                write!(f, "cannot insert node {child} under {parent}")
            }
        }
    }
}

impl std::error::Error for HostError {}
