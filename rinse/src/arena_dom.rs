//! Arena-based DOM for HTML fragments.
//!
//! Fragments are parsed with html5ever's tree construction algorithm (so
//! malformed markup is recovered exactly the way a browser would recover it)
//! into an indextree [`Arena`]. The sanitizer rewrites that arena in place and
//! the serializer turns it back into a string.

use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, QualName, parse_fragment as html5ever_parse_fragment};
use html5ever::{local_name, namespace_url, ns};
use indexmap::IndexMap;
use indextree::{Arena, NodeEdge, NodeId};
use std::borrow::Cow;
use std::cell::RefCell;
use tendril::{StrTendril, TendrilSink};

/// A parsed fragment. All nodes live in `arena`; `root` is the synthetic
/// `<html>` element whose children are the fragment's top-level nodes.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub arena: Arena<NodeData>,
    pub root: NodeId,
}

impl Fragment {
    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Get mutable reference to node data
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    /// Iterate children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Get the element data of a node, if it is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id).kind {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    /// Serialize the fragment's top-level nodes back to HTML.
    pub fn to_html(&self) -> String {
        crate::serialize::serialize_children(self, self.root)
    }

    /// Concatenated text of every text node under the root, skipping the
    /// whole subtree of any element whose tag is in `skip`.
    ///
    /// Walks edges instead of recursing, so it is safe on arbitrarily deep
    /// trees.
    pub fn text_content(&self, skip: &[&str]) -> String {
        let mut out = String::new();
        let mut skipping: Option<NodeId> = None;

        for edge in self.root.traverse(&self.arena) {
            match edge {
                NodeEdge::Start(id) => {
                    if skipping.is_some() {
                        continue;
                    }
                    match &self.get(id).kind {
                        NodeKind::Element(elem)
                            if skip.iter().any(|t| elem.tag().eq_ignore_ascii_case(t)) =>
                        {
                            skipping = Some(id);
                        }
                        NodeKind::Text(text) => out.push_str(text),
                        _ => {}
                    }
                }
                NodeEdge::End(id) => {
                    if skipping == Some(id) {
                        skipping = None;
                    }
                }
            }
        }

        out
    }
}

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
}

/// Node types
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Document root (invisible, parent of the synthetic `<html>`)
    Document,
    /// Element with qualified name and attributes
    Element(ElementData),
    /// Text content (StrTendril is refcounted - cheap to clone)
    Text(StrTendril),
    /// HTML comment
    Comment(StrTendril),
}

/// Element data (name + attributes)
#[derive(Debug, Clone)]
pub struct ElementData {
    pub name: QualName,

    /// Attributes keyed by (possibly prefixed) name. IndexMap keeps source
    /// order for serialization.
    pub attrs: IndexMap<String, StrTendril>,
}

impl ElementData {
    /// Local tag name as html5ever produced it (lowercase for HTML elements).
    pub fn tag(&self) -> &str {
        self.name.local.as_ref()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|v| v.as_ref())
    }
}

/// Parse an HTML fragment as if it were the contents of a `<body>` element.
///
/// Never fails: html5ever recovers from every malformed input.
pub fn parse_fragment(html: &str) -> Fragment {
    let sink = ArenaSink::new();
    let context = QualName::new(None, ns!(html), local_name!("body"));
    let tendril = StrTendril::from(html);
    html5ever_parse_fragment(sink, Default::default(), context, Vec::new()).one(tendril)
}

/// Attribute key as it appears in markup: `prefix:local` for namespaced
/// foreign attributes, plain local name otherwise.
fn attr_key(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

/// Owned element name wrapper
#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &html5ever::Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink implementation building the arena
struct ArenaSink {
    arena: RefCell<Arena<NodeData>>,

    /// Document node (parent of the synthetic `<html>`)
    document: NodeId,
}

impl ArenaSink {
    fn new() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(NodeData {
            kind: NodeKind::Document,
        });

        ArenaSink {
            arena: RefCell::new(arena),
            document,
        }
    }

    fn new_text(&self, arena: &mut Arena<NodeData>, text: StrTendril) -> NodeId {
        arena.new_node(NodeData {
            kind: NodeKind::Text(text),
        })
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Fragment;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        let arena = self.arena.into_inner();

        // html5ever creates the `<html>` root for fragments up front; fall
        // back to the document node if it somehow didn't.
        let root = self
            .document
            .children(&arena)
            .find(|&id| matches!(arena[id].get().kind, NodeKind::Element(_)))
            .unwrap_or(self.document);

        Fragment { arena, root }
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // html5ever recovers automatically
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let arena = self.arena.borrow();
        match &arena[*target].get().kind {
            NodeKind::Element(elem) => OwnedElemName(elem.name.clone()),
            _ => OwnedElemName(QualName::new(None, ns!(html), local_name!(""))),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        // First occurrence of a duplicated attribute wins, as in browsers.
        let mut attr_map = IndexMap::with_capacity(attrs.len());
        for attr in attrs {
            attr_map.entry(attr_key(&attr.name)).or_insert(attr.value);
        }

        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Element(ElementData {
                name,
                attrs: attr_map,
            }),
        })
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Comment(text),
        })
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        // Not produced by the HTML tokenizer; keep it inert.
        self.arena.borrow_mut().new_node(NodeData {
            kind: NodeKind::Comment(StrTendril::new()),
        })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                let last_child = parent.children(&arena).next_back();
                if let Some(last_child) = last_child
                    && let NodeKind::Text(existing) = &mut arena[last_child].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = self.new_text(&mut arena, text);
                parent.append(text_node, &mut arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => {
                sibling.insert_before(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                // Merge into a preceding text node when foster parenting
                // lands text right after existing text.
                let prev = arena[*sibling].previous_sibling();
                if let Some(prev) = prev
                    && let NodeKind::Text(existing) = &mut arena[prev].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = self.new_text(&mut arena, text);
                sibling.insert_before(text_node, &mut arena);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.arena.borrow()[*element].parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctypes are meaningless inside a fragment.
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents live directly under the element.
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let NodeKind::Element(elem) = &mut arena[*target].get_mut().kind {
            for attr in attrs {
                elem.attrs.entry(attr_key(&attr.name)).or_insert(attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}
