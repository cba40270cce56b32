use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{CivicError, Result};

/// Stored identity for the logged-in user. Loaded once at startup and
/// cleared on logout; the access token is rewritten in place whenever the
/// client refreshes it.
#[derive(Serialize, Deserialize, Clone)]
pub struct Session {
    pub access: String,
    pub refresh: String,
    pub role: Role,
    pub username: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Citizen,
    DeptOfficer,
    Admin,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Citizen => "Citizen",
            Role::DeptOfficer => "Department Officer",
            Role::Admin => "Admin",
            Role::Unknown => "Unknown",
        };
        write!(f, "{label}")
    }
}

impl Session {
    pub fn default_path() -> Result<PathBuf> {
        Config::config_path().map(|p| p.with_file_name("session.json"))
    }

    /// Load the stored session, if any. A missing or unreadable file means
    /// "not logged in" rather than an error.
    pub fn load(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CivicError::SessionWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents = serde_json::to_string_pretty(self).unwrap_or_default();
        std::fs::write(path, contents).map_err(|e| CivicError::SessionWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Remove the session file. Used on logout and whenever a token refresh
    /// fails (the stored credentials are no longer usable).
    pub fn clear(path: &Path) {
        let _ = std::fs::remove_file(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_wire_names() {
        let role: Role = serde_json::from_str("\"DEPT_OFFICER\"").unwrap();
        assert_eq!(role, Role::DeptOfficer);
    }

    #[test]
    fn unknown_role_does_not_fail() {
        let role: Role = serde_json::from_str("\"SUPERVISOR\"").unwrap();
        assert_eq!(role, Role::Unknown);
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let session = Session {
            access: "a".into(),
            refresh: "r".into(),
            role: Role::Citizen,
            username: "asha".into(),
        };
        session.save(&path).unwrap();

        let loaded = Session::load(&path).unwrap();
        assert_eq!(loaded.username, "asha");
        assert_eq!(loaded.role, Role::Citizen);

        Session::clear(&path);
        assert!(Session::load(&path).is_none());
    }
}
