use tabled::Tabled;

use crate::cli::NotificationArgs;
use crate::client::CivicClient;
use crate::error::{CivicError, Result};
use crate::output::{self, format_relative, truncate};
use crate::readstate::ReadState;
use crate::types::{Issue, Status};

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "Issue")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Resolved by")]
    resolved_by: String,
    #[tabled(rename = "When")]
    when: String,
}

impl From<&Issue> for NotificationRow {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id,
            title: truncate(&issue.title, 40),
            resolved_by: issue.resolved_by.clone().unwrap_or_else(|| {
                issue.assigned_to_username.clone().unwrap_or_default()
            }),
            when: issue
                .resolved_at
                .as_deref()
                .map(format_relative)
                .unwrap_or_default(),
        }
    }
}

/// Unread notifications are resolved reports of yours that haven't been
/// acknowledged yet; the read ids live in a per-user state file.
pub async fn list(client: &mut CivicClient, args: NotificationArgs) -> Result<()> {
    let username = client
        .session()
        .map(|s| s.username.clone())
        .ok_or(CivicError::MissingSession)?;

    let reports: Vec<Issue> = client.get("/api/my-reports/").await?;
    let mut read_state = ReadState::load(&username);

    let unread: Vec<&Issue> = reports
        .iter()
        .filter(|issue| issue.status == Status::Resolved && !read_state.is_read(issue.id))
        .collect();

    if unread.is_empty() {
        output::print_message("No new notifications.");
        return Ok(());
    }

    output::print_table(&unread, |issue| NotificationRow::from(*issue));

    if args.mark_read {
        for issue in &unread {
            read_state.mark_read(issue.id);
        }
        read_state.save(&username);
        output::print_message(&format!(
            "Marked {} notification{} as read.",
            unread.len(),
            if unread.len() == 1 { "" } else { "s" }
        ));
    }

    Ok(())
}
