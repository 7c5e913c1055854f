use serde::Serialize;

/// Slim projection of an issue for the grouped list view.
#[derive(Debug, Clone, Serialize)]
pub struct IssueRef {
    pub key: String,
    pub summary: String,
    pub url: String,
}

/// One fix version with the issues tagged against it, in the order the
/// search returned them.
#[derive(Debug, Serialize)]
pub struct VersionGroup {
    #[serde(rename = "fixVersion")]
    pub fix_version: String,
    pub released: Option<bool>,
    pub issues: Vec<IssueRef>,
}

/// Response body for the grouped list endpoint. `total` counts aggregated
/// issues, not group memberships; `truncated` reports the page-bound
/// safety valve.
#[derive(Debug, Serialize)]
pub struct GroupedIssues {
    pub total: usize,
    pub truncated: bool,
    pub groups: Vec<VersionGroup>,
}
