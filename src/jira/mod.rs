pub mod types;

pub use types::{DetailIssue, Issue, SearchPage};

use std::future::Future;

use reqwest::Url;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::JiraCredentials;

/// Circuit breaker for the page loop: at 100 issues per page this caps a
/// single aggregation at ~3000 issues.
pub const MAX_SEARCH_PAGES: usize = 30;

const SEARCH_PAGE_SIZE: u32 = 100;
const SEARCH_JQL: &str = "fixVersion is not EMPTY ORDER BY updated DESC";
const SEARCH_FIELDS: &str = "summary,fixVersions";
const DETAIL_FIELDS: &str =
    "summary,description,comment,attachment,assignee,priority,status,issuetype,created";

#[derive(Debug, Error)]
pub enum JiraError {
    #[error("Jira request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Jira rejected request with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid Jira base URL: {0}")]
    BaseUrl(String),
}

/// Everything a grouped-list request accumulated. `truncated` is set when
/// the page bound cut the search short; it is reported, not an error.
#[derive(Debug, Default)]
pub struct SearchResults {
    pub issues: Vec<Issue>,
    pub truncated: bool,
}

/// Read-only Jira REST client with static basic-auth credentials.
#[derive(Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    base: Url,
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(credentials: &JiraCredentials) -> Result<Self, JiraError> {
        let base = Url::parse(&credentials.base_url)
            .map_err(|e| JiraError::BaseUrl(format!("{}: {}", credentials.base_url, e)))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            email: credentials.email.clone(),
            api_token: credentials.api_token.clone(),
        })
    }

    /// Browse URL for an issue key, for links rendered by the frontend.
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base.as_str().trim_end_matches('/'), key)
    }

    /// Fetch every issue that has at least one fix version, following the
    /// continuation cursor until the server reports the last page (or the
    /// page bound trips).
    #[instrument(skip(self))]
    pub async fn search_all_issues(&self) -> Result<SearchResults, JiraError> {
        drive_search(|cursor| {
            let client = self.clone();
            async move { client.fetch_search_page(cursor).await }
        })
        .await
    }

    async fn fetch_search_page(&self, cursor: Option<String>) -> Result<SearchPage, JiraError> {
        let url = self.api_url(&["search", "jql"])?;
        let page_size = SEARCH_PAGE_SIZE.to_string();
        let mut request = self
            .http
            .get(url)
            .basic_auth(&self.email, Some(&self.api_token))
            .query(&[
                ("jql", SEARCH_JQL),
                ("fields", SEARCH_FIELDS),
                ("maxResults", page_size.as_str()),
            ]);
        if let Some(token) = cursor {
            request = request.query(&[("nextPageToken", token.as_str())]);
        }

        debug!("fetching search page");
        let response = check_status(request.send().await?).await?;
        let page = response.json::<SearchPage>().await?;
        debug!(issues = page.issues.len(), is_last = page.is_last, "received search page");
        Ok(page)
    }

    /// Fetch the full field set for one issue. The key is inserted as a
    /// path segment, so anything URL-hostile in it gets escaped.
    #[instrument(skip(self))]
    pub async fn fetch_issue(&self, key: &str) -> Result<DetailIssue, JiraError> {
        let mut url = self.api_url(&["issue", key])?;
        url.query_pairs_mut().append_pair("fields", DETAIL_FIELDS);

        debug!("fetching issue detail");
        let response = check_status(
            self.http
                .get(url)
                .basic_auth(&self.email, Some(&self.api_token))
                .send()
                .await?,
        )
        .await?;
        Ok(response.json::<DetailIssue>().await?)
    }

    /// Fetch attachment bytes from an opaque content URL. Returns the raw
    /// response so the caller can stream the body through.
    pub async fn fetch_attachment(&self, content_url: Url) -> Result<reqwest::Response, JiraError> {
        debug!(url = %content_url, "fetching attachment content");
        check_status(
            self.http
                .get(content_url)
                .basic_auth(&self.email, Some(&self.api_token))
                .send()
                .await?,
        )
        .await
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url, JiraError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| JiraError::BaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(["rest", "api", "3"])
            .extend(segments);
        Ok(url)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, JiraError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(JiraError::Upstream {
        status: status.as_u16(),
        body,
    })
}

/// Page loop, generic over the page fetcher. Continuation only happens on
/// an explicit `isLast: false` paired with a cursor; a missing cursor ends
/// the search even if the server forgot the flag.
async fn drive_search<F, Fut>(mut fetch_page: F) -> Result<SearchResults, JiraError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<SearchPage, JiraError>>,
{
    let mut issues = Vec::new();
    let mut cursor: Option<String> = None;

    for _ in 0..MAX_SEARCH_PAGES {
        let page = fetch_page(cursor.take()).await?;
        issues.extend(page.issues);
        match (page.is_last, page.next_page_token) {
            (false, Some(token)) => cursor = Some(token),
            _ => return Ok(SearchResults { issues, truncated: false }),
        }
    }

    warn!(pages = MAX_SEARCH_PAGES, total = issues.len(), "search page bound reached, truncating");
    Ok(SearchResults { issues, truncated: true })
}
