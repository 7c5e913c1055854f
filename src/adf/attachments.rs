use std::collections::HashMap;

use crate::jira::types::Attachment;

const ID_TOKEN_PREFIX: &str = "[ATTACHMENT_ID:";
const BARE_TOKEN: &str = "[ATTACHMENT]";
const UNRESOLVED_LABEL: &str = "[Attachment]";

/// Replace every attachment placeholder token in flattened text with a
/// human-readable label.
///
/// `[ATTACHMENT_ID:<id>]` becomes `[Image: <filename>]` for image mime
/// types, `[File: <filename>]` otherwise, or `[Attachment]` when the id is
/// not in the lookup. Bare `[ATTACHMENT]` tokens (media nodes without an id)
/// also become `[Attachment]`.
pub fn resolve(text: &str, lookup: &HashMap<&str, &Attachment>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(ID_TOKEN_PREFIX) {
        out.push_str(&rest[..start]);
        let after = &rest[start + ID_TOKEN_PREFIX.len()..];
        match after.find(']') {
            Some(end) => {
                out.push_str(&label(lookup.get(&after[..end]).copied()));
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated token; pass the remainder through untouched.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out.replace(BARE_TOKEN, UNRESOLVED_LABEL)
}

fn label(attachment: Option<&Attachment>) -> String {
    match attachment {
        Some(attachment) if attachment.is_image() => format!("[Image: {}]", attachment.filename),
        Some(attachment) => format!("[File: {}]", attachment.filename),
        None => UNRESOLVED_LABEL.to_string(),
    }
}
