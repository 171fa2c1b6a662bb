use crate::commands::WidgetKind;
use crate::tree::ContentNode;

use super::{cursor::Cursor, token::MarkerToken, widget::WidgetInstance};

/// One piece of decoded content.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    Text(&'a str),
    Widget(WidgetInstance),
}

/// Result of decoding a content string.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<'a> {
    /// No marker matched; the input is returned as-is.
    Plain(&'a str),
    /// Literal text interleaved with widget instances, in input order.
    Segments(Vec<Segment<'a>>),
}

impl<'a> Decoded<'a> {
    pub fn into_segments(self) -> Vec<Segment<'a>> {
        match self {
            Decoded::Plain("") => Vec::new(),
            Decoded::Plain(text) => vec![Segment::Text(text)],
            Decoded::Segments(segments) => segments,
        }
    }

    pub fn widgets(&self) -> impl Iterator<Item = &WidgetInstance> {
        let segments: &[Segment<'a>] = match self {
            Decoded::Plain(_) => &[],
            Decoded::Segments(segments) => segments,
        };
        segments.iter().filter_map(|segment| match segment {
            Segment::Widget(widget) => Some(widget),
            Segment::Text(_) => None,
        })
    }
}

/// Flattens a content tree into a marker string.
///
/// Text nodes contribute their text, widget nodes (both widget attributes
/// present) contribute `{{kind:id}}` without descending, and every other
/// node contributes only its children. The result is trimmed.
pub fn encode(node: &ContentNode) -> String {
    let mut out = String::new();
    encode_into(node, &mut out);
    out.trim().to_string()
}

/// [`encode`] over a list of sibling nodes.
pub fn encode_nodes(nodes: &[ContentNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        encode_into(node, &mut out);
    }
    out.trim().to_string()
}

fn encode_into(node: &ContentNode, out: &mut String) {
    match node {
        ContentNode::Text { text } => out.push_str(text),
        ContentNode::Element(el) => {
            let kind = el.attrs.get(MarkerToken::KIND_ATTR);
            let id = el.attrs.get(MarkerToken::ID_ATTR);
            if let (Some(kind), Some(id)) = (kind, id) {
                out.push_str(&MarkerToken::format(kind, id));
                return;
            }
            for child in &el.children {
                encode_into(child, out);
            }
        }
    }
}

/// Splits `text` into literal runs and widget instances.
///
/// Tokens with an unregistered kind, an empty id, or no closing `}}` are
/// left in the literal text.
pub fn decode(text: &str) -> Decoded<'_> {
    let mut cur = Cursor::new(text);
    let mut out = Vec::new();
    let mut text_start = 0;

    fn flush_text<'a>(out: &mut Vec<Segment<'a>>, cur: &Cursor<'a>, start: usize, end: usize) {
        if end > start {
            out.push(Segment::Text(cur.slice(start, end)));
        }
    }

    while !cur.eof() {
        let start = cur.pos();
        if let Some(widget) = try_parse_marker(&mut cur) {
            flush_text(&mut out, &cur, text_start, start);
            out.push(Segment::Widget(widget));
            text_start = cur.pos();
            continue;
        }
        cur.bump();
    }

    if out.is_empty() {
        return Decoded::Plain(text);
    }
    flush_text(&mut out, &cur, text_start, cur.pos());
    Decoded::Segments(out)
}

/// Attempts to parse `{{kind:id}}` at the cursor; restores it on failure.
fn try_parse_marker(cur: &mut Cursor<'_>) -> Option<WidgetInstance> {
    if !cur.starts_with(MarkerToken::OPEN) {
        return None;
    }

    let saved = cur.clone();
    cur.bump_n(MarkerToken::OPEN.len());

    let kind_start = cur.pos();
    cur.eat_until(|b| b == MarkerToken::SEP || b == MarkerToken::CLOSE_BYTE);
    let kind = cur.slice(kind_start, cur.pos());
    let Some(kind) = (cur.peek() == Some(MarkerToken::SEP))
        .then(|| kind.parse::<WidgetKind>().ok())
        .flatten()
    else {
        *cur = saved;
        return None;
    };
    cur.bump(); // :

    let id_start = cur.pos();
    cur.eat_until(|b| b == MarkerToken::CLOSE_BYTE);
    let id = cur.slice(id_start, cur.pos());
    if id.is_empty() || !cur.starts_with(MarkerToken::CLOSE) {
        *cur = saved;
        return None;
    }
    cur.bump_n(MarkerToken::CLOSE.len());

    Some(WidgetInstance::new(kind, id))
}

/// Node for a widget marker, carrying the two widget attributes.
pub fn widget_node(kind: WidgetKind, id: &str) -> ContentNode {
    ContentNode::element("span")
        .with_attr(MarkerToken::KIND_ATTR, kind.as_str())
        .with_attr(MarkerToken::ID_ATTR, id)
}

/// Rebuilds tree nodes from decoded segments.
pub fn to_nodes(segments: &[Segment<'_>]) -> Vec<ContentNode> {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => ContentNode::text(*text),
            Segment::Widget(widget) => widget_node(widget.kind, &widget.id),
        })
        .collect()
}

/// Widget instances referenced by `text`, in order.
pub fn markers(text: &str) -> Vec<WidgetInstance> {
    decode(text).widgets().cloned().collect()
}

/// Pushes a raw buffer through the codec: decode to nodes, encode back.
///
/// Only well-formed markers survive as markers; the result is trimmed.
pub fn finalize(buffer: &str) -> String {
    encode_nodes(&to_nodes(&decode(buffer).into_segments()))
}
