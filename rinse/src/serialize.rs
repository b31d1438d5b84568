//! HTML serializer for arena fragments.
//!
//! Follows the HTML5 fragment serialization rules with one deliberate
//! difference: text is escaped everywhere, including under raw-text elements.
//! Nothing that reaches this module is meant to execute, so text never needs
//! to be emitted raw.
//!
//! - Void elements never get end tags
//! - Attribute values are escaped and double-quoted
//! - Comments are written as `<!--...-->`

use crate::arena_dom::{ElementData, Fragment, NodeKind};
use indextree::NodeId;

/// Which characters [`escape_into`] replaces with character references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// `&`, `<`, `>`: enough for text content.
    Text,
    /// `&`, `<`, `>`, `"`: enough for double-quoted attribute values.
    Attribute,
    /// `&`, `<`, `>`, `"`, `'`: safe in text and in either quoting style.
    All,
}

/// Append `text` to `out`, replacing markup-significant characters.
///
/// Each input character maps to exactly one output piece, so an already
/// produced `&amp;` can never be escaped a second time.
pub fn escape_into(out: &mut String, text: &str, mode: Escape) {
    out.reserve(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if mode != Escape::Text => out.push_str("&quot;"),
            '\'' if mode == Escape::All => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Serialize the children of `node` (not `node` itself).
pub fn serialize_children(frag: &Fragment, node: NodeId) -> String {
    let mut out = String::new();
    for child in frag.children(node) {
        write_node(frag, &mut out, child);
    }
    out
}

/// HTML5 void elements that never have closing tags
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn write_node(frag: &Fragment, out: &mut String, id: NodeId) {
    match &frag.get(id).kind {
        NodeKind::Document => {
            for child in frag.children(id) {
                write_node(frag, out, child);
            }
        }
        NodeKind::Element(elem) => write_element(frag, out, id, elem),
        NodeKind::Text(text) => escape_into(out, text, Escape::Text),
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

fn write_element(frag: &Fragment, out: &mut String, id: NodeId, elem: &ElementData) {
    let tag = elem.tag();

    out.push('<');
    out.push_str(tag);
    for (name, value) in &elem.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(out, value, Escape::Attribute);
        out.push('"');
    }
    out.push('>');

    if is_void_element(tag) {
        return;
    }

    for child in frag.children(id) {
        write_node(frag, out, child);
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
