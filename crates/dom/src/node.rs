use core_types::{NodeId, Rect};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum NodeData {
    Document,
    Element {
        /// Lower-case local name.
        name: Arc<str>,
        attributes: Vec<(Arc<str>, Option<String>)>,
        /// Inline style declarations, property names lower-cased.
        style: Vec<(String, String)>,
        /// Current form-control value, when it differs from the markup.
        value: Option<String>,
        selected_option: Option<NodeId>,
        shadow_root: Option<NodeId>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
    ShadowRoot {
        host: NodeId,
    },
}

impl NodeData {
    pub(crate) fn element(name: &str) -> Self {
        NodeData::Element {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes: Vec::new(),
            style: Vec::new(),
            value: None,
            selected_option: None,
            shadow_root: None,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, NodeData::Element { .. })
    }

    #[inline]
    pub fn is_element_named(&self, tag: &str) -> bool {
        matches!(self, NodeData::Element { name, .. } if &**name == tag)
    }

    pub fn element_name(&self) -> Option<&str> {
        match self {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub(crate) fn allows_children(&self) -> bool {
        matches!(
            self,
            NodeData::Document | NodeData::Element { .. } | NodeData::ShadowRoot { .. }
        )
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeRecord {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) rects: Vec<Rect>,
}

impl NodeRecord {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            rects: Vec::new(),
        }
    }
}

/// Parse `a: b; c: d` into lower-cased property/value pairs.
pub(crate) fn parse_style_declarations(css: &str) -> Vec<(String, String)> {
    css.split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            let value = value.trim();
            if prop.is_empty() || value.is_empty() {
                return None;
            }
            Some((prop.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}
