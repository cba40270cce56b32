//! Shared API response types used across commands.

use serde::Deserialize;

use crate::session::Role;
use crate::types::{de_opt_severity, CitizenRank, DepartmentRank, Severity};

/// Login response: token pair plus identity.
#[derive(Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub role: Role,
    pub username: String,
}

/// Refresh response carries only a new access token.
#[derive(Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Deserialize)]
pub struct CsrfResponse {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

/// Server-authoritative counters returned by the vote endpoints. These are
/// the only fields the client ever writes back into a stored issue.
#[derive(Deserialize, Debug, Clone)]
pub struct VoteResult {
    pub upvotes: u32,
    pub downvotes: u32,
    #[serde(default)]
    pub duplicate_count: u32,
    #[serde(default, deserialize_with = "de_opt_severity")]
    pub severity: Option<Severity>,
}

/// Classification service output. Both fields must be present and non-empty
/// for a submission to proceed.
#[derive(Deserialize)]
pub struct ClassifyResponse {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

/// Submission endpoint response. When the server merges the report into an
/// existing issue it sets `is_duplicate` and names the original.
#[derive(Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default)]
    pub original_issue_id: Option<u64>,
    #[serde(default)]
    pub id: Option<u64>,
}

/// Refinement endpoint wraps its output in a `refined` string, which is
/// itself expected to contain a JSON-encoded [`RefinedReport`].
#[derive(Deserialize)]
pub struct RefineResponse {
    #[serde(default)]
    pub refined: String,
}

/// The structured report the AI service is prompted to produce.
#[derive(Deserialize, Debug, Default)]
pub struct RefinedReport {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub urgency: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub contact: String,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub reply: Option<String>,
}

#[derive(Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub department_leaderboard: Vec<DepartmentRank>,
    #[serde(default)]
    pub citizen_leaderboard: Vec<CitizenRank>,
}
