use std::collections::HashMap;

use serde::Serialize;

use crate::adf::{self, attachments};
use crate::jira::types::{Attachment, DetailIssue, Named, User};

/// Sentinel for optional fields the issue does not carry.
const UNKNOWN: &str = "Unknown";

/// Fully assembled detail view: flattened text, resolved attachment labels,
/// no binary payloads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDetail {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: String,
    pub priority: String,
    pub issue_type: String,
    pub created: String,
    pub url: String,
    pub description: String,
    pub comments: Vec<CommentView>,
    pub attachments: Vec<AttachmentView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub author: String,
    pub created: Option<String>,
    pub body: String,
}

/// Attachment projection; `content_url` is fetched separately through the
/// proxy endpoint, never inlined here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    pub id: String,
    pub filename: String,
    pub mime_type: Option<String>,
    pub size: Option<u64>,
    pub content_url: Option<String>,
}

/// Turn a fetched issue into the detail view: flatten description and
/// comment bodies, resolve placeholder tokens against the issue's own
/// attachment list, and substitute `"Unknown"` for absent optionals.
pub fn assemble(issue: DetailIssue, url: String) -> IssueDetail {
    let fields = &issue.fields;
    let lookup: HashMap<&str, &Attachment> = fields
        .attachment
        .iter()
        .map(|attachment| (attachment.id.as_str(), attachment))
        .collect();

    let description = flatten_body(&fields.description, &lookup);

    let comments = fields
        .comment
        .comments
        .iter()
        .map(|comment| CommentView {
            id: comment.id.clone(),
            author: display_name(comment.author.as_ref()),
            created: comment.created.clone(),
            body: flatten_body(&comment.body, &lookup),
        })
        .collect();

    let attachments = fields
        .attachment
        .iter()
        .map(|attachment| AttachmentView {
            id: attachment.id.clone(),
            filename: attachment.filename.clone(),
            mime_type: attachment.mime_type.clone(),
            size: attachment.size,
            content_url: attachment.content_url.clone(),
        })
        .collect();

    IssueDetail {
        summary: fields.summary.clone().unwrap_or_default(),
        status: named_or_unknown(fields.status.as_ref()),
        assignee: fields
            .assignee
            .as_ref()
            .map(|user| display_name(Some(user)))
            .unwrap_or_else(|| UNKNOWN.to_string()),
        priority: named_or_unknown(fields.priority.as_ref()),
        issue_type: named_or_unknown(fields.issuetype.as_ref()),
        created: fields.created.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        url,
        description,
        comments,
        attachments,
        key: issue.key,
    }
}

fn flatten_body(body: &serde_json::Value, lookup: &HashMap<&str, &Attachment>) -> String {
    attachments::resolve(adf::flatten(body).trim(), lookup)
}

fn display_name(user: Option<&User>) -> String {
    user.and_then(|user| user.display_name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn named_or_unknown(value: Option<&Named>) -> String {
    value
        .and_then(|named| named.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fetch_fixture() -> DetailIssue {
        serde_json::from_value(json!({
            "key": "REL-42",
            "fields": {
                "summary": "Broken login button",
                "description": {
                    "type": "doc",
                    "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "Screenshot:"}]},
                        {"type": "mediaSingle", "content": [{"type": "media", "attrs": {"id": "10001"}}]}
                    ]
                },
                "comment": {
                    "comments": [
                        {
                            "id": "500",
                            "author": {"displayName": "Rita"},
                            "created": "2024-01-05T10:00:00.000+0000",
                            "body": {"type": "doc", "content": [
                                {"type": "paragraph", "content": [{"type": "text", "text": "See log"}]},
                                {"type": "mediaGroup", "content": [{"type": "media", "attrs": {"id": "10002"}}]}
                            ]}
                        },
                        {"id": "501", "body": {"type": "paragraph", "content": [{"type": "text", "text": "ack"}]}}
                    ]
                },
                "attachment": [
                    {"id": "10001", "filename": "a.png", "mimeType": "image/png", "size": 2048,
                     "content": "https://jira.example.com/secure/attachment/10001"},
                    {"id": "10002", "filename": "trace.log", "mimeType": "text/plain", "size": 99,
                     "content": "https://jira.example.com/secure/attachment/10002"}
                ],
                "assignee": {"displayName": "Jonas"},
                "status": {"name": "In Progress"},
                "priority": null,
                "issuetype": {"name": "Bug"},
                "created": "2024-01-01T09:00:00.000+0000"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_assemble_resolves_description_placeholders() {
        let detail = assemble(fetch_fixture(), "https://jira.example.com/browse/REL-42".into());
        assert_eq!(detail.key, "REL-42");
        assert_eq!(detail.description, "Screenshot:\n[Image: a.png]");
        assert!(!detail.description.contains("ATTACHMENT_ID"));
    }

    #[test]
    fn test_assemble_resolves_comment_placeholders() {
        let detail = assemble(fetch_fixture(), String::new());
        assert_eq!(detail.comments.len(), 2);
        assert_eq!(detail.comments[0].author, "Rita");
        assert_eq!(detail.comments[0].body, "See log\n[File: trace.log]");
    }

    #[test]
    fn test_missing_comment_author_is_unknown() {
        let detail = assemble(fetch_fixture(), String::new());
        assert_eq!(detail.comments[1].author, "Unknown");
        assert_eq!(detail.comments[1].created, None);
        assert_eq!(detail.comments[1].body, "ack");
    }

    #[test]
    fn test_missing_optionals_surface_as_unknown() {
        let detail = assemble(fetch_fixture(), String::new());
        assert_eq!(detail.priority, "Unknown");
        assert_eq!(detail.status, "In Progress");
        assert_eq!(detail.assignee, "Jonas");
        assert_eq!(detail.issue_type, "Bug");

        let bare: DetailIssue =
            serde_json::from_value(json!({"key": "REL-1", "fields": {}})).unwrap();
        let detail = assemble(bare, String::new());
        assert_eq!(detail.status, "Unknown");
        assert_eq!(detail.assignee, "Unknown");
        assert_eq!(detail.created, "Unknown");
        assert_eq!(detail.description, "");
        assert!(detail.comments.is_empty());
    }

    #[test]
    fn test_attachments_project_metadata_only() {
        let detail = assemble(fetch_fixture(), String::new());
        assert_eq!(detail.attachments.len(), 2);
        assert_eq!(detail.attachments[0].filename, "a.png");
        assert_eq!(detail.attachments[0].size, Some(2048));
        assert!(detail.attachments[0]
            .content_url
            .as_deref()
            .unwrap()
            .ends_with("/10001"));
    }
}
