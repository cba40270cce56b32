use serde::{Deserialize, Serialize};

/// The current user's profile, including gamification points.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub issues_resolved: u32,
}

/// One row of the citizen leaderboard.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CitizenRank {
    pub username: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub issues_resolved: u32,
}

/// One row of the department leaderboard.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DepartmentRank {
    #[serde(default)]
    pub rank: u32,
    pub department: String,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default)]
    pub issues_resolved: u32,
}
