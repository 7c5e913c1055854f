use serde::Deserialize;
use serde_json::Value;

/// One page of results from the paginated JQL search endpoint.
///
/// Jira omits `isLast` on some deployments; treating an absent flag as
/// "last" keeps the page loop from spinning on a response with no cursor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default = "default_true")]
    pub is_last: bool,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

fn default_true() -> bool {
    true
}

/// A search hit: just the key plus the projected fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub fix_versions: Vec<FixVersion>,
}

/// A fix version as listed on an issue. `released` is tri-state: the API
/// may omit it entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct FixVersion {
    pub name: String,
    #[serde(default)]
    pub released: Option<bool>,
}

/// Full issue payload from the detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailIssue {
    pub key: String,
    pub fields: DetailFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailFields {
    #[serde(default)]
    pub summary: Option<String>,
    /// ADF document; arbitrary JSON handed to the flattener as-is.
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub comment: CommentPage,
    #[serde(default)]
    pub attachment: Vec<Attachment>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub priority: Option<Named>,
    #[serde(default)]
    pub status: Option<Named>,
    #[serde(default)]
    pub issuetype: Option<Named>,
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub created: Option<String>,
    /// ADF document, like the description.
    #[serde(default)]
    pub body: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Named lookup value (priority, status, issue type).
#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: Option<String>,
}

/// Attachment metadata. `content` is the authenticated download URL; the
/// bytes themselves are only ever fetched through the proxy endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "content")]
    pub content_url: Option<String>,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.to_ascii_lowercase().starts_with("image/"))
    }
}
