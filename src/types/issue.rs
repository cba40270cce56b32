use serde::{Deserialize, Serialize};

use super::severity::de_opt_severity;
use super::{Severity, Status};

/// A citizen-reported civic problem record, as returned by the listing and
/// detail endpoints. The server owns every field; the client only ever
/// rewrites the vote counters and severity from a vote response.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Issue {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de_opt_severity")]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub citizen_username: Option<String>,
    #[serde(default)]
    pub assigned_to_username: Option<String>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    #[serde(default)]
    pub duplicate_count: u32,
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default)]
    pub resolution_description: Option<String>,
    #[serde(default)]
    pub resolution_proof: Option<String>,
    #[serde(default)]
    pub resolved_by: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Issue {
    pub fn severity_label(&self) -> &str {
        self.severity.map(Severity::label).unwrap_or("Not specified")
    }

    pub fn department_label(&self) -> &str {
        self.department_name.as_deref().unwrap_or("General Department")
    }

    pub fn reporter_label(&self) -> &str {
        self.citizen_username.as_deref().unwrap_or("Unknown")
    }

    pub fn assignee_label(&self) -> &str {
        self.assigned_to_username.as_deref().unwrap_or("Unassigned")
    }
}
