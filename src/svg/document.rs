use std::fmt::Write as _;

use crate::foundation::{
    core::CanvasSize,
    error::{KeyplayError, KeyplayResult},
};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Handle to a node of an [`SvgDocument`]. Only valid for the document that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
enum NodeKind {
    Element {
        /// Qualified name as written (`g`, `svg:g`, `sodipodi:namedview`).
        name: String,
        /// Attributes in document order, namespace declarations included.
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable SVG element tree.
///
/// Nodes live in an arena; removing a node only unlinks it, so handles never dangle. Comments and
/// processing instructions are dropped on parse.
#[derive(Clone, Debug)]
pub struct SvgDocument {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl SvgDocument {
    /// An empty `<svg>` canvas of the given size.
    pub fn new_canvas(size: CanvasSize) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = doc.create_element("svg");
        doc.set_attr(root, "xmlns", SVG_NS);
        doc.set_attr(root, "xmlns:xlink", XLINK_NS);
        doc.set_attr(root, "width", size.width.to_string());
        doc.set_attr(root, "height", size.height.to_string());
        doc.set_attr(
            root,
            "viewBox",
            format!("0 0 {} {}", size.width, size.height),
        );
        doc.root = root;
        doc
    }

    pub fn parse(text: &str) -> KeyplayResult<Self> {
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let xml = roxmltree::Document::parse_with_options(text, opts)
            .map_err(|e| KeyplayError::svg(format!("parse svg document: {e}")))?;
        let xml_root = xml.root_element();
        if xml_root.tag_name().name() != "svg" {
            return Err(KeyplayError::svg(format!(
                "root element is <{}>, expected <svg>",
                xml_root.tag_name().name()
            )));
        }

        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.import_xml(xml_root, None);
        Ok(doc)
    }

    pub fn parse_bytes(bytes: &[u8]) -> KeyplayResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| KeyplayError::svg(format!("svg is not valid utf-8: {e}")))?;
        Self::parse(text)
    }

    fn import_xml(&mut self, node: roxmltree::Node<'_, '_>, parent: Option<NodeId>) -> NodeId {
        let mut attrs = Vec::new();
        for ns in node.namespaces() {
            if ns.uri() == XML_NS {
                continue;
            }
            let inherited = node.parent_element().is_some_and(|p| {
                p.namespaces()
                    .any(|pn| pn.name() == ns.name() && pn.uri() == ns.uri())
            });
            if !inherited {
                let key = match ns.name() {
                    Some(prefix) => format!("xmlns:{prefix}"),
                    None => "xmlns".to_string(),
                };
                attrs.push((key, ns.uri().to_string()));
            }
        }
        for attr in node.attributes() {
            let name = qualified_name(node, attr.namespace(), attr.name(), true);
            attrs.push((name, attr.value().to_string()));
        }

        let tag = node.tag_name();
        let name = qualified_name(node, tag.namespace(), tag.name(), false);
        let id = self.push(NodeKind::Element { name, attrs }, parent);

        for child in node.children() {
            if child.is_element() {
                let child_id = self.import_xml(child, Some(id));
                self.nodes[id.0].children.push(child_id);
            } else if child.is_text() {
                let text = child.text().unwrap_or_default().to_string();
                let child_id = self.push(NodeKind::Text(text), Some(id));
                self.nodes[id.0].children.push(child_id);
            }
        }
        id
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Storage slot of a node, stable for the document's lifetime. Used as an identity key.
    pub(crate) fn node_address(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element { .. })
    }

    /// Qualified tag name, `None` for text nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    /// Tag name without its namespace prefix.
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.tag(id)
            .map(|name| name.rsplit_once(':').map_or(name, |(_, local)| local))
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs,
            NodeKind::Text(_) => &[],
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace an attribute. No-op on text nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind else {
            return;
        };
        let value = value.into();
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind else {
            return None;
        };
        let pos = attrs.iter().position(|(k, _)| k == name)?;
        Some(attrs.remove(pos).1)
    }

    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.attr(id, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    /// A new detached element in the SVG namespace of the document.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(
            NodeKind::Element {
                name: name.to_string(),
                attrs: Vec::new(),
            },
            None,
        )
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()), None)
    }

    /// Unlink `id` from its parent. The subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Move `child` (and its subtree) to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> KeyplayResult<()> {
        if !self.is_element(parent) {
            return Err(KeyplayError::validation("cannot append to a text node"));
        }
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(KeyplayError::validation(
                "cannot append a node into its own subtree",
            ));
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Unlink and return every direct child of `id`, in order.
    pub fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for &c in &children {
            self.nodes[c.0].parent = None;
        }
        children
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Pre-order descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// First element whose `id` attribute equals `value`.
    pub fn find_by_id(&self, value: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&n| self.attr(n, "id") == Some(value))
    }

    /// Deep-copy `node` of `other` into this document as a detached subtree.
    pub fn import(&mut self, other: &SvgDocument, node: NodeId) -> NodeId {
        let copy = self.push(other.nodes[node.0].kind.clone(), None);
        for &child in other.children(node) {
            let child_copy = self.import(other, child);
            self.nodes[child_copy.0].parent = Some(copy);
            self.nodes[copy.0].children.push(child_copy);
        }
        copy
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root, &mut out);
        out
    }

    /// Serialize `id` and its subtree.
    pub fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => escape_into(text, false, out),
            NodeKind::Element { name, attrs } => {
                out.push('<');
                out.push_str(name);
                for (k, v) in attrs {
                    let _ = write!(out, " {k}=\"");
                    escape_into(v, true, out);
                    out.push('"');
                }
                let children = self.children(id);
                if children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for &c in children {
                    self.write_node(c, out);
                }
                let _ = write!(out, "</{name}>");
            }
        }
    }

    /// Canvas pixel size from the root `width`/`height`, falling back to the `viewBox`.
    pub fn size(&self) -> Option<(f64, f64)> {
        let parse = |name: &str| {
            self.attr(self.root, name)
                .and_then(|v| v.trim().trim_end_matches("px").parse::<f64>().ok())
        };
        match (parse("width"), parse("height")) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => {
                let vb: Vec<f64> = self
                    .attr(self.root, "viewBox")?
                    .split(|c: char| c.is_ascii_whitespace() || c == ',')
                    .filter(|s| !s.is_empty())
                    .filter_map(|s| s.parse().ok())
                    .collect();
                (vb.len() == 4).then(|| (vb[2], vb[3]))
            }
        }
    }

    /// Short human-readable label for logs: `<g id="arm">`.
    pub fn describe(&self, id: NodeId) -> String {
        match (self.tag(id), self.attr(id, "id")) {
            (Some(tag), Some(el_id)) => format!("<{tag} id=\"{el_id}\">"),
            (Some(tag), None) => format!("<{tag}>"),
            (None, _) => format!("text node ({} chars)", self.text(id).map_or(0, str::len)),
        }
    }
}

fn qualified_name(
    node: roxmltree::Node<'_, '_>,
    ns: Option<&str>,
    local: &str,
    is_attr: bool,
) -> String {
    let Some(uri) = ns else {
        return local.to_string();
    };
    if uri == XML_NS {
        return format!("xml:{local}");
    }
    // Elements in the default namespace are written unprefixed; attributes never use it.
    if !is_attr && node.namespaces().any(|n| n.name().is_none() && n.uri() == uri) {
        return local.to_string();
    }
    match node
        .namespaces()
        .find(|n| n.uri() == uri && n.name().is_some())
        .and_then(|n| n.name())
    {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn escape_into(s: &str, attr: bool, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/svg/document.rs"]
mod tests;
