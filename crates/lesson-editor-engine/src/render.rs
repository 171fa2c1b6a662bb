//! HTML rendering of content trees, used for the `originalHtml`/`newHtml`
//! side of text edits.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::commands::BlockVariant;
use crate::markers;
use crate::tree::ContentNode;

/// Tags rendered without children or a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img"];

/// Renders a node and its subtree as HTML.
pub fn render_html(node: &ContentNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &ContentNode, out: &mut String) {
    match node {
        ContentNode::Text { text } => out.push_str(&encode_text(text)),
        ContentNode::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            if let Some(id) = el.id.as_deref().filter(|id| !id.is_empty()) {
                push_attr(out, "id", id);
            }
            for (key, value) in &el.attrs {
                push_attr(out, key, value);
            }
            out.push('>');
            if VOID_TAGS.contains(&el.tag.as_str()) {
                return;
            }
            for child in &el.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
}

fn push_attr(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&encode_double_quoted_attribute(value));
    out.push('"');
}

/// Builds the block node for a section from committed marker content.
///
/// Markers become widget nodes; a divider is an empty `hr`.
pub fn block_node(section_id: &str, variant: BlockVariant, content: &str) -> ContentNode {
    let node = ContentNode::element(variant.html_tag()).with_id(section_id);
    if variant == BlockVariant::Divider {
        return node;
    }
    node.with_children(content_nodes(content))
}

/// Nodes for committed marker content.
pub fn content_nodes(content: &str) -> Vec<ContentNode> {
    markers::to_nodes(&markers::decode(content).into_segments())
}
