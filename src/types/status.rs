use std::fmt;

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle states for an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Status {
    #[value(alias = "pending")]
    Open,
    Assigned,
    InProgress,
    PendingApproval,
    Resolved,
    Closed,
}

impl Status {
    /// Parse a status string regardless of case and spacing. The legacy
    /// "PENDING" spelling maps to Open.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "OPEN" | "PENDING" => Some(Status::Open),
            "ASSIGNED" => Some(Status::Assigned),
            "IN_PROGRESS" => Some(Status::InProgress),
            "PENDING_APPROVAL" => Some(Status::PendingApproval),
            "RESOLVED" => Some(Status::Resolved),
            "CLOSED" => Some(Status::Closed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::Assigned => "Assigned",
            Status::InProgress => "In Progress",
            Status::PendingApproval => "Pending Approval",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::Assigned => "ASSIGNED",
            Status::InProgress => "IN_PROGRESS",
            Status::PendingApproval => "PENDING_APPROVAL",
            Status::Resolved => "RESOLVED",
            Status::Closed => "CLOSED",
        }
    }

    /// Get the colored label for terminal output.
    pub fn colored(self) -> String {
        let label = self.label();
        match self {
            Status::Resolved | Status::Closed => label.green().to_string(),
            Status::InProgress => label.blue().to_string(),
            Status::PendingApproval => label.magenta().to_string(),
            Status::Assigned => label.cyan().to_string(),
            Status::Open => label.yellow().to_string(),
        }
    }

    /// An issue still needing attention (everything except Resolved/Closed).
    pub fn is_active(self) -> bool {
        !matches!(self, Status::Resolved | Status::Closed)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Open
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        // Servers have been seen sending display labels; fall back to Open
        // for anything unrecognized rather than rejecting the whole record.
        Ok(Status::parse(&value).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wire_and_display_forms() {
        assert_eq!(Status::parse("IN_PROGRESS"), Some(Status::InProgress));
        assert_eq!(Status::parse("in progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("Pending Approval"), Some(Status::PendingApproval));
    }

    #[test]
    fn legacy_pending_maps_to_open() {
        assert_eq!(Status::parse("PENDING"), Some(Status::Open));
    }

    #[test]
    fn active_excludes_terminal_states() {
        assert!(Status::Open.is_active());
        assert!(Status::InProgress.is_active());
        assert!(!Status::Resolved.is_active());
        assert!(!Status::Closed.is_active());
    }
}
