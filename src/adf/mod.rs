pub mod attachments;

use serde_json::Value;

/// Node types that render as visual blocks and get a trailing newline
/// after their flattened children.
const BLOCK_TYPES: &[&str] = &[
    "doc",
    "paragraph",
    "heading",
    "blockquote",
    "listItem",
    "bulletList",
    "orderedList",
    "codeBlock",
    "panel",
    "rule",
    "table",
    "tableRow",
    "tableCell",
];

/// Classified view of a single ADF node. One variant per node kind the
/// flattener cares about, plus a generic container fallback for everything
/// else (known block types and unknown inline types alike).
enum Node<'a> {
    Text { text: &'a str, href: Option<&'a str> },
    HardBreak,
    LinkCard { url: Option<&'a str> },
    Media { id: Option<&'a str> },
    MediaWrapper { content: Option<&'a Value> },
    Container { kind: &'a str, content: Option<&'a Value> },
}

/// Flatten an ADF document into plain text, preserving reading order.
///
/// Media nodes become `[ATTACHMENT_ID:<id>]` placeholder tokens (resolved
/// later by [`attachments::resolve`]); link cards become `[Link: <url>]`
/// lines; block-level nodes get a trailing newline. Null flattens to the
/// empty string and a bare string passes through unchanged, so malformed
/// description fields degrade gracefully.
pub fn flatten(node: &Value) -> String {
    match node {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(children) => children.iter().map(flatten).collect(),
        Value::Object(_) => render(classify(node)),
        _ => String::new(),
    }
}

fn classify(node: &Value) -> Node<'_> {
    let kind = node.get("type").and_then(Value::as_str).unwrap_or("");
    match kind {
        "text" => Node::Text {
            text: node.get("text").and_then(Value::as_str).unwrap_or(""),
            href: link_mark_href(node),
        },
        "hardBreak" => Node::HardBreak,
        "inlineCard" | "blockCard" | "embedCard" => Node::LinkCard {
            url: attr_str(node, "url"),
        },
        "media" => Node::Media {
            id: attr_str(node, "id"),
        },
        "mediaGroup" | "mediaSingle" => Node::MediaWrapper {
            content: node.get("content"),
        },
        _ => Node::Container {
            kind,
            content: node.get("content"),
        },
    }
}

fn render(node: Node<'_>) -> String {
    match node {
        Node::Text { text, href } => match href {
            // Collapse redundant link text down to the bare href.
            Some(href) if text.trim().is_empty() || text == href => href.to_string(),
            Some(href) => format!("{} ({})", text, href),
            None => text.to_string(),
        },
        Node::HardBreak => "\n".to_string(),
        Node::LinkCard { url } => match url {
            Some(url) => format!("[Link: {}]\n", url),
            None => "[Link]\n".to_string(),
        },
        Node::Media { id } => match id {
            Some(id) => format!("[ATTACHMENT_ID:{}]", id),
            None => "[ATTACHMENT]".to_string(),
        },
        Node::MediaWrapper { content } => match content {
            Some(content) => {
                let inner = flatten(content);
                if inner.is_empty() {
                    inner
                } else {
                    inner + "\n"
                }
            }
            None => "[ATTACHMENT]\n".to_string(),
        },
        Node::Container { kind, content } => {
            let inner = content.map(flatten).unwrap_or_default();
            if BLOCK_TYPES.contains(&kind) {
                inner + "\n"
            } else {
                inner
            }
        }
    }
}

/// Extract the href of a `link` mark, if the node carries one.
fn link_mark_href(node: &Value) -> Option<&str> {
    node.get("marks")?
        .as_array()?
        .iter()
        .find(|mark| mark.get("type").and_then(Value::as_str) == Some("link"))
        .and_then(|mark| mark.get("attrs")?.get("href")?.as_str())
}

fn attr_str<'a>(node: &'a Value, name: &str) -> Option<&'a str> {
    node.get("attrs")?.get(name)?.as_str()
}
