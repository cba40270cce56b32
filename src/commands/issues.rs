use tabled::Tabled;

use crate::cli::IssueListArgs;
use crate::client::CivicClient;
use crate::error::{CivicError, Result};
use crate::output::{self, truncate};
use crate::responses::VoteResult;
use crate::store::{IssueStore, ReportFilter};
use crate::types::Issue;

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Votes")]
    votes: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Reported by")]
    reporter: String,
}

impl From<&&Issue> for IssueRow {
    fn from(issue: &&Issue) -> Self {
        Self {
            id: issue.id,
            title: truncate(&issue.title, 40),
            status: issue.status.colored(),
            severity: issue
                .severity
                .map(|s| s.colored())
                .unwrap_or_else(|| "Not specified".to_string()),
            votes: format!("+{} -{}", issue.upvotes, issue.downvotes),
            department: issue.department_label().to_string(),
            reporter: issue.reporter_label().to_string(),
        }
    }
}

fn filter_from(args: &IssueListArgs) -> ReportFilter {
    ReportFilter {
        status: args.status,
        high_priority: args.high_priority,
        include_resolved: args.all,
        sort: args.sort,
    }
}

async fn fetch_listing(client: &mut CivicClient, args: &IssueListArgs) -> Result<IssueStore> {
    let issues: Vec<Issue> = if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        client
            .get(&format!("/api/nearby-issues/?lat={lat}&lng={lng}"))
            .await?
    } else if args.assigned {
        client.get("/api/assigned-issues/").await?
    } else if args.mine {
        client.get("/api/my-reports/").await?
    } else {
        client.get("/api/issues/").await?
    };

    Ok(IssueStore::from_fetch(issues))
}

pub async fn list(client: &mut CivicClient, args: IssueListArgs) -> Result<()> {
    let store = fetch_listing(client, &args).await?;
    let filter = filter_from(&args);

    if args.csv {
        println!("{}", store.to_csv(&filter));
        return Ok(());
    }

    let visible = store.view(&filter);
    if visible.is_empty() {
        output::print_message("No reports found.");
        return Ok(());
    }

    if filter.high_priority {
        output::print_message(&format!(
            "Showing {} high-priority {}",
            visible.len(),
            if visible.len() == 1 { "report" } else { "reports" }
        ));
    }

    output::print_table(&visible, |i| IssueRow::from(i));
    Ok(())
}

pub async fn view(client: &mut CivicClient, id: u64) -> Result<()> {
    let issue: Issue = client.get(&format!("/api/issues/{id}/")).await?;

    output::print_item(&issue, |issue| {
        println!("Issue #{} - {}", issue.id, issue.title);
        if IssueStore::is_high_priority(issue) {
            println!("[High Priority]");
        }
        println!();
        println!("{}", issue.description);
        println!();
        println!("Status:      {}", issue.status.colored());
        println!(
            "Severity:    {}",
            issue
                .severity
                .map(|s| s.colored())
                .unwrap_or_else(|| "Not specified".to_string())
        );
        println!("Department:  {}", issue.department_label());
        println!("Reported by: {}", issue.reporter_label());
        println!("Assigned to: {}", issue.assignee_label());
        println!(
            "Votes:       +{} -{} ({} duplicates)",
            issue.upvotes, issue.downvotes, issue.duplicate_count
        );
        if let Some(address) = &issue.address {
            println!("Address:     {address}");
        }
        if let (Some(lat), Some(lng)) = (issue.latitude, issue.longitude) {
            println!("Location:    {lat}, {lng}");
        }
        if let Some(created) = &issue.created_at {
            println!("Reported:    {}", output::format_relative(created));
        }
        if let Some(resolution) = &issue.resolution_description {
            println!();
            println!("Resolution:  {resolution}");
            if let Some(by) = &issue.resolved_by {
                println!("Resolved by: {by}");
            }
            if let Some(at) = &issue.resolved_at {
                println!("Resolved:    {}", output::format_date(at));
            }
            if let Some(proof) = &issue.resolution_proof {
                println!("Proof:       {proof}");
            }
        }
    });

    Ok(())
}

/// Vote on an issue and reconcile the server's counters into the local
/// listing. Nothing is updated optimistically; the displayed counts are
/// whatever the server confirmed.
pub async fn vote(client: &mut CivicClient, id: u64, upvote: bool) -> Result<()> {
    client.session().ok_or(CivicError::MissingSession)?;

    let mut store = fetch_listing(client, &default_args()).await?;
    if !store.select(id) {
        return Err(CivicError::IssueNotFound(id));
    }

    let endpoint = if upvote { "upvote" } else { "downvote" };
    let result: VoteResult = client
        .post(&format!("/api/issues/{id}/{endpoint}/"), serde_json::json!({}))
        .await?;

    store.apply_vote(id, &result);

    let issue = store.selected().ok_or(CivicError::IssueNotFound(id))?;
    output::print_message(&format!(
        "{} recorded for issue #{}: +{} -{} ({} duplicates)",
        if upvote { "Upvote" } else { "Downvote" },
        issue.id,
        issue.upvotes,
        issue.downvotes,
        issue.duplicate_count
    ));

    Ok(())
}

/// Delete one of your reports. The local copy goes away only after the
/// server confirms.
pub async fn delete(client: &mut CivicClient, id: u64) -> Result<()> {
    client.session().ok_or(CivicError::MissingSession)?;

    let mut store = {
        let issues: Vec<Issue> = client.get("/api/my-reports/").await?;
        IssueStore::from_fetch(issues)
    };
    if !store.contains(id) {
        return Err(CivicError::IssueNotFound(id));
    }

    client.delete(&format!("/api/delete-report/{id}/")).await?;
    store.remove(id);

    output::print_message("Report deleted successfully!");
    Ok(())
}

fn default_args() -> IssueListArgs {
    IssueListArgs {
        mine: false,
        assigned: false,
        status: None,
        high_priority: false,
        all: true,
        sort: None,
        csv: false,
        lat: None,
        lng: None,
    }
}
