use crate::node::{NodeData, NodeRecord, parse_style_declarations};
use crate::scan::ScanConfig;
use core_types::{NodeId, Range, Rect};
use std::sync::Arc;
use text_source::HostError;

/// An arena-backed page document.
///
/// Nodes are never freed: removing a node only detaches it, so handles held
/// by text sources stay valid and report themselves as disconnected.
/// Geometry is supplied by the embedder through [`Document::set_client_rects`].
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<NodeRecord>,
    selection: Vec<Range>,
    scan_config: ScanConfig,
}

impl Document {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord::new(NodeData::Document)],
            selection: Vec::new(),
            scan_config: ScanConfig::default(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan_config
    }

    pub fn set_scan_config(&mut self, config: ScanConfig) {
        self.scan_config = config;
    }

    // =========================================================================
    // Node creation
    // =========================================================================

    fn insert_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord::new(data));
        id
    }

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.insert_node(NodeData::element(name))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.insert_node(NodeData::Text {
            text: text.to_string(),
        })
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.insert_node(NodeData::Comment {
            text: text.to_string(),
        })
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> Result<NodeId, HostError> {
        let id = self.create_element(name);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, HostError> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Attach a shadow root to `host`. The shadow tree is a separate node
    /// tree: its nodes are connected through the host but cannot be ordered
    /// against light-tree nodes.
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, HostError> {
        match &self.record(host)?.data {
            NodeData::Element {
                shadow_root: Some(_),
                ..
            } => {
                return Err(HostError::HierarchyRequest {
                    parent: host,
                    child: host,
                });
            }
            NodeData::Element { .. } => {}
            _ => return Err(HostError::NotAnElement(host)),
        }
        let root = self.insert_node(NodeData::ShadowRoot { host });
        if let NodeData::Element { shadow_root, .. } = &mut self.record_mut(host)?.data {
            *shadow_root = Some(root);
        }
        Ok(root)
    }

    // =========================================================================
    // Tree mutation
    // =========================================================================

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        self.check_insertion(parent, child)?;
        self.record_mut(parent)?.children.push(child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: NodeId,
    ) -> Result<(), HostError> {
        self.check_insertion(parent, child)?;
        let pos = self
            .record(parent)?
            .children
            .iter()
            .position(|c| *c == before)
            .ok_or(HostError::HierarchyRequest {
                parent,
                child: before,
            })?;
        self.record_mut(parent)?.children.insert(pos, child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `node` from its parent. The subtree stays intact.
    pub fn remove(&mut self, node: NodeId) -> Result<(), HostError> {
        let Some(parent) = self.record_mut(node)?.parent.take() else {
            return Ok(());
        };
        self.record_mut(parent)?.children.retain(|c| *c != node);
        log::trace!(target: "dom", "detached {node} from {parent}");
        Ok(())
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let parent_record = self.record(parent)?;
        let child_record = self.record(child)?;
        let invalid = HostError::HierarchyRequest { parent, child };
        if !parent_record.data.allows_children() {
            return Err(invalid);
        }
        if matches!(
            child_record.data,
            NodeData::Document | NodeData::ShadowRoot { .. }
        ) {
            return Err(invalid);
        }
        if child_record.parent.is_some() || self.is_inclusive_ancestor(child, parent) {
            return Err(invalid);
        }
        Ok(())
    }

    // =========================================================================
    // Element state
    // =========================================================================

    /// Set an attribute. Setting `style` also replaces the inline style.
    pub fn set_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), HostError> {
        let NodeData::Element {
            attributes, style, ..
        } = &mut self.record_mut(element)?.data
        else {
            return Err(HostError::NotAnElement(element));
        };
        if name.eq_ignore_ascii_case("style") {
            *style = parse_style_declarations(value);
        }
        match attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = Some(value.to_string()),
            None => attributes.push((
                Arc::from(name.to_ascii_lowercase()),
                Some(value.to_string()),
            )),
        }
        Ok(())
    }

    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(element.0 as usize)?.data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }

    pub fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        match self.nodes.get(element.0 as usize).map(|r| &r.data) {
            Some(NodeData::Element { attributes, .. }) => {
                attributes.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
            }
            _ => false,
        }
    }

    /// Set one inline style declaration.
    pub fn set_style(
        &mut self,
        element: NodeId,
        property: &str,
        value: &str,
    ) -> Result<(), HostError> {
        let NodeData::Element { style, .. } = &mut self.record_mut(element)?.data else {
            return Err(HostError::NotAnElement(element));
        };
        let property = property.to_ascii_lowercase();
        match style.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => style.push((property, value.to_string())),
        }
        Ok(())
    }

    pub fn style_value(&self, element: NodeId, property: &str) -> Option<&str> {
        match &self.nodes.get(element.0 as usize)?.data {
            NodeData::Element { style, .. } => style
                .iter()
                .find(|(p, _)| p.eq_ignore_ascii_case(property))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Set the live value of a form control.
    pub fn set_value(&mut self, element: NodeId, value: &str) -> Result<(), HostError> {
        let NodeData::Element { value: slot, .. } = &mut self.record_mut(element)?.data else {
            return Err(HostError::NotAnElement(element));
        };
        *slot = Some(value.to_string());
        Ok(())
    }

    /// Choose the selected `<option>` of a `<select>`.
    pub fn select_option(&mut self, select: NodeId, option: NodeId) -> Result<(), HostError> {
        let is_option = self.data(option)?.is_element_named("option");
        if !is_option || !self.is_inclusive_ancestor(select, option) {
            return Err(HostError::HierarchyRequest {
                parent: select,
                child: option,
            });
        }
        let NodeData::Element {
            selected_option, ..
        } = &mut self.record_mut(select)?.data
        else {
            return Err(HostError::NotAnElement(select));
        };
        *selected_option = Some(option);
        Ok(())
    }

    /// Replace the layout boxes of a node, in viewport coordinates before
    /// zoom conversion.
    pub fn set_client_rects(&mut self, node: NodeId, rects: Vec<Rect>) -> Result<(), HostError> {
        self.record_mut(node)?.rects = rects;
        Ok(())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> &[Range] {
        &self.selection
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Vec<Range> {
        &mut self.selection
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn data(&self, node: NodeId) -> Result<&NodeData, HostError> {
        Ok(&self.record(node)?.data)
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0 as usize)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0 as usize)
            .map_or(&[], |r| r.children.as_slice())
    }

    pub fn rects_of(&self, node: NodeId) -> &[Rect] {
        self.nodes
            .get(node.0 as usize)
            .map_or(&[], |r| r.rects.as_slice())
    }

    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent_of(node)?;
        self.children(parent).iter().position(|c| *c == node)
    }

    /// Host element of a shadow root.
    pub fn shadow_host(&self, node: NodeId) -> Option<NodeId> {
        match self.nodes.get(node.0 as usize)?.data {
            NodeData::ShadowRoot { host } => Some(host),
            _ => None,
        }
    }

    /// Topmost ancestor without crossing shadow boundaries.
    pub fn tree_root(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent_of(current) {
            current = parent;
        }
        current
    }

    /// Whether the node belongs to the document, possibly through shadow
    /// hosts.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            let root = self.tree_root(current);
            if root == Self::ROOT {
                return true;
            }
            match self.shadow_host(root) {
                Some(host) => current = host,
                None => return false,
            }
        }
    }

    /// Like [`Document::parent_of`], but a shadow root yields its host.
    pub fn composed_parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node).or_else(|| self.shadow_host(node))
    }

    /// First element child of the document node.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(Self::ROOT)
            .iter()
            .copied()
            .find(|c| self.nodes[c.0 as usize].data.is_element())
    }

    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// Inclusive ancestors of `node`, tree root first.
    pub(crate) fn ancestor_path(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent_of(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content_of(&self, node: NodeId) -> Result<String, HostError> {
        let mut out = String::new();
        self.collect_text(node, &mut out)?;
        Ok(out)
    }

    fn collect_text(&self, node: NodeId, out: &mut String) -> Result<(), HostError> {
        let record = self.record(node)?;
        match &record.data {
            NodeData::Text { text } => out.push_str(text),
            NodeData::Comment { .. } => {}
            _ => {
                for child in &record.children {
                    self.collect_text(*child, out)?;
                }
            }
        }
        Ok(())
    }

    /// Number of codepoints in a text node, or children of any other node.
    pub fn node_length(&self, node: NodeId) -> Result<usize, HostError> {
        let record = self.record(node)?;
        Ok(match &record.data {
            NodeData::Text { text } | NodeData::Comment { text } => text.chars().count(),
            _ => record.children.len(),
        })
    }

    pub(crate) fn record(&self, node: NodeId) -> Result<&NodeRecord, HostError> {
        self.nodes
            .get(node.0 as usize)
            .ok_or(HostError::InvalidNode(node))
    }

    fn record_mut(&mut self, node: NodeId) -> Result<&mut NodeRecord, HostError> {
        self.nodes
            .get_mut(node.0 as usize)
            .ok_or(HostError::InvalidNode(node))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
