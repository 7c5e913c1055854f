use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::detail;
use crate::grouping::{self, GroupedIssues};
use crate::jira::{JiraClient, JiraError};

#[derive(Clone)]
pub struct AppState {
    pub jira: JiraClient,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/issues", get(list_grouped_issues))
        .route("/api/issues/{key}", get(issue_detail))
        .route("/api/attachment", get(proxy_attachment))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Jira rejected request with status {status}")]
    Upstream { status: u16, body: String },

    #[error("{0}")]
    Internal(String),
}

impl From<JiraError> for ApiError {
    fn from(err: JiraError) -> Self {
        match err {
            JiraError::Upstream { status, body } => ApiError::Upstream { status, body },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Error envelope shared by all endpoints.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, envelope) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorEnvelope {
                    error: message,
                    details: None,
                    status: None,
                },
            ),
            ApiError::Upstream { status, body } => {
                error!(upstream_status = status, "Jira rejected request");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorEnvelope {
                        error: "Jira request failed".to_string(),
                        details: Some(body),
                        status: Some(status),
                    },
                )
            }
            ApiError::Internal(message) => {
                error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorEnvelope {
                        error: "Internal server error".to_string(),
                        details: Some(message),
                        status: None,
                    },
                )
            }
        };
        (code, Json(envelope)).into_response()
    }
}

/// GET /api/issues — aggregate every issue with a fix version and return
/// them grouped by version, most recent release first.
async fn list_grouped_issues(
    State(state): State<AppState>,
) -> Result<Json<GroupedIssues>, ApiError> {
    let results = state.jira.search_all_issues().await?;
    info!(total = results.issues.len(), truncated = results.truncated, "aggregated issues");

    let groups = grouping::group_by_fix_version(&results.issues, |key| state.jira.browse_url(key));
    Ok(Json(GroupedIssues {
        total: results.issues.len(),
        truncated: results.truncated,
        groups,
    }))
}

/// GET /api/issues/{key} — full detail view with flattened description and
/// comments.
async fn issue_detail(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<detail::IssueDetail>, ApiError> {
    let issue = state.jira.fetch_issue(&key).await?;
    let url = state.jira.browse_url(&issue.key);
    Ok(Json(detail::assemble(issue, url)))
}

#[derive(Debug, Deserialize)]
struct AttachmentQuery {
    url: Option<String>,
    filename: Option<String>,
}

/// GET /api/attachment?url=...&filename=... — pass upstream attachment
/// bytes through with the upstream content type.
async fn proxy_attachment(
    State(state): State<AppState>,
    Query(query): Query<AttachmentQuery>,
) -> Result<Response, ApiError> {
    let raw_url = query
        .url
        .ok_or_else(|| ApiError::BadRequest("Missing required query parameter: url".to_string()))?;
    let content_url = raw_url
        .parse::<reqwest::Url>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid attachment url: {raw_url}")))?;

    let upstream = state.jira.fetch_attachment(content_url).await?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

    // Strip quotes so the filename cannot break out of the header value.
    let filename = query.filename.unwrap_or_else(|| "attachment".to_string());
    let disposition = format!("attachment; filename=\"{}\"", filename.replace('"', ""));
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|_| ApiError::BadRequest(format!("Invalid filename: {filename}")))?;

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
