//! Normalized local cache of issues. Every view (the full listing, a
//! filtered/sorted listing, the selected detail record) is derived from the
//! single id-keyed map, so a vote reconciliation written once is observed
//! everywhere a copy of the issue appears.

use clap::ValueEnum;
use indexmap::IndexMap;

use crate::responses::VoteResult;
use crate::types::{Issue, Severity, Status};

/// Upvote count above which a report counts as high priority.
pub const VOTE_THRESHOLD: u32 = 2;
/// Duplicate count above which a report counts as high priority.
pub const DUPLICATE_THRESHOLD: u32 = 2;

#[derive(Default)]
pub struct IssueStore {
    issues: IndexMap<u64, Issue>,
    selected: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    HighPriorityFirst,
    MostVotes,
    LeastVotes,
    SeverityDesc,
    SeverityAsc,
}

/// What the listing should show. Default: active (non-resolved) reports in
/// fetch order.
#[derive(Default, Clone)]
pub struct ReportFilter {
    pub status: Option<Status>,
    pub high_priority: bool,
    pub include_resolved: bool,
    pub sort: Option<SortOrder>,
}

impl IssueStore {
    pub fn from_fetch(issues: Vec<Issue>) -> Self {
        let mut map = IndexMap::with_capacity(issues.len());
        for issue in issues {
            map.insert(issue.id, issue);
        }
        Self {
            issues: map,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Issue> {
        self.issues.get(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.issues.contains_key(&id)
    }

    /// Apply a server-confirmed vote result to the stored issue. Unknown ids
    /// are a no-op; applying the same result twice leaves the same state.
    pub fn apply_vote(&mut self, id: u64, result: &VoteResult) -> bool {
        match self.issues.get_mut(&id) {
            Some(issue) => {
                issue.upvotes = result.upvotes;
                issue.downvotes = result.downvotes;
                issue.duplicate_count = result.duplicate_count;
                issue.severity = result.severity;
                true
            }
            None => false,
        }
    }

    /// Drop an issue after the server confirmed its deletion.
    pub fn remove(&mut self, id: u64) -> bool {
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.issues.shift_remove(&id).is_some()
    }

    /// Mark an issue as the open detail view. Its fields are always read
    /// through the store, never snapshotted.
    pub fn select(&mut self, id: u64) -> bool {
        if self.issues.contains_key(&id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<&Issue> {
        self.selected.and_then(|id| self.issues.get(&id))
    }

    pub fn is_high_priority(issue: &Issue) -> bool {
        issue.upvotes > VOTE_THRESHOLD || issue.duplicate_count > DUPLICATE_THRESHOLD
    }

    /// Derive the visible, ordered listing for a filter.
    pub fn view(&self, filter: &ReportFilter) -> Vec<&Issue> {
        let mut visible: Vec<&Issue> = self
            .issues
            .values()
            .filter(|issue| {
                if filter.high_priority {
                    Self::is_high_priority(issue)
                } else if let Some(status) = filter.status {
                    issue.status == status
                } else if filter.include_resolved {
                    true
                } else {
                    issue.status.is_active()
                }
            })
            .collect();

        match filter.sort {
            Some(SortOrder::HighPriorityFirst) => {
                visible.sort_by_key(|issue| !Self::is_high_priority(issue));
            }
            Some(SortOrder::MostVotes) => {
                visible.sort_by_key(|issue| std::cmp::Reverse(issue.upvotes));
            }
            Some(SortOrder::LeastVotes) => {
                visible.sort_by_key(|issue| issue.upvotes);
            }
            Some(SortOrder::SeverityDesc) => {
                visible.sort_by_key(|issue| {
                    std::cmp::Reverse(issue.severity.map(Severity::rank).unwrap_or(0))
                });
            }
            Some(SortOrder::SeverityAsc) => {
                visible.sort_by_key(|issue| issue.severity.map(Severity::rank).unwrap_or(0));
            }
            None => {}
        }

        visible
    }

    /// Render the current view as CSV, matching the web client's export
    /// column set.
    pub fn to_csv(&self, filter: &ReportFilter) -> String {
        let mut lines = vec![
            "ID,Title,Status,Severity,Department,Reported by,Assigned to,Duplicate Count,Upvotes,Address"
                .to_string(),
        ];

        for issue in self.view(filter) {
            lines.push(
                [
                    issue.id.to_string(),
                    csv_quote(&issue.title),
                    issue.status.label().to_string(),
                    issue.severity_label().to_string(),
                    issue.department_label().to_string(),
                    issue.reporter_label().to_string(),
                    issue.assignee_label().to_string(),
                    issue.duplicate_count.to_string(),
                    issue.upvotes.to_string(),
                    csv_quote(issue.address.as_deref().unwrap_or("")),
                ]
                .join(","),
            );
        }

        lines.join("\n")
    }
}

fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: u64, title: &str) -> Issue {
        serde_json::from_value(serde_json::json!({ "id": id, "title": title })).unwrap()
    }

    fn vote(upvotes: u32, downvotes: u32, duplicate_count: u32) -> VoteResult {
        VoteResult {
            upvotes,
            downvotes,
            duplicate_count,
            severity: Some(Severity::High),
        }
    }

    #[test]
    fn vote_result_visible_in_every_view() {
        let mut store = IssueStore::from_fetch(vec![issue(1, "pothole"), issue(2, "streetlight")]);
        store.select(1);

        assert!(store.apply_vote(1, &vote(5, 1, 2)));

        // Source entry, derived listing, and the open detail view all
        // observe the same write.
        let direct = store.get(1).unwrap();
        assert_eq!(
            (direct.upvotes, direct.downvotes, direct.duplicate_count),
            (5, 1, 2)
        );

        let filter = ReportFilter::default();
        let listed = store
            .view(&filter)
            .into_iter()
            .find(|i| i.id == 1)
            .unwrap();
        assert_eq!(listed.upvotes, 5);

        let selected = store.selected().unwrap();
        assert_eq!(selected.duplicate_count, 2);
        assert_eq!(selected.severity, Some(Severity::High));

        // Non-matching issues untouched.
        let other = store.get(2).unwrap();
        assert_eq!((other.upvotes, other.downvotes, other.duplicate_count), (0, 0, 0));
    }

    #[test]
    fn apply_vote_is_idempotent() {
        let mut store = IssueStore::from_fetch(vec![issue(1, "pothole")]);
        let result = vote(5, 1, 2);

        store.apply_vote(1, &result);
        let once = store.get(1).unwrap().clone();

        store.apply_vote(1, &result);
        let twice = store.get(1).unwrap();

        assert_eq!(once.upvotes, twice.upvotes);
        assert_eq!(once.downvotes, twice.downvotes);
        assert_eq!(once.duplicate_count, twice.duplicate_count);
        assert_eq!(once.severity, twice.severity);
    }

    #[test]
    fn apply_vote_unknown_id_is_noop() {
        let mut store = IssueStore::from_fetch(vec![issue(1, "pothole")]);
        assert!(!store.apply_vote(42, &vote(5, 1, 2)));
        assert_eq!(store.get(1).unwrap().upvotes, 0);
    }

    #[test]
    fn default_view_hides_resolved() {
        let mut resolved = issue(2, "fixed");
        resolved.status = Status::Resolved;
        let store = IssueStore::from_fetch(vec![issue(1, "open"), resolved]);

        let ids: Vec<u64> = store
            .view(&ReportFilter::default())
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![1]);

        let all = ReportFilter {
            include_resolved: true,
            ..Default::default()
        };
        assert_eq!(store.view(&all).len(), 2);
    }

    #[test]
    fn high_priority_filter_uses_thresholds() {
        let mut hot = issue(1, "burst main");
        hot.upvotes = VOTE_THRESHOLD + 1;
        let mut dup = issue(2, "same pothole");
        dup.duplicate_count = DUPLICATE_THRESHOLD + 1;
        let cold = issue(3, "quiet");

        let store = IssueStore::from_fetch(vec![hot, dup, cold]);
        let filter = ReportFilter {
            high_priority: true,
            ..Default::default()
        };

        let ids: Vec<u64> = store.view(&filter).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn severity_sort_puts_unspecified_last() {
        let mut low = issue(1, "a");
        low.severity = Some(Severity::Low);
        let mut critical = issue(2, "b");
        critical.severity = Some(Severity::Critical);
        let unspecified = issue(3, "c");

        let store = IssueStore::from_fetch(vec![low, critical, unspecified]);
        let filter = ReportFilter {
            sort: Some(SortOrder::SeverityDesc),
            ..Default::default()
        };

        let ids: Vec<u64> = store.view(&filter).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn remove_clears_selection() {
        let mut store = IssueStore::from_fetch(vec![issue(1, "pothole")]);
        store.select(1);
        assert!(store.remove(1));
        assert!(store.selected().is_none());
        assert!(!store.contains(1));
    }

    #[test]
    fn csv_escapes_quotes() {
        let store = IssueStore::from_fetch(vec![issue(1, "the \"big\" pothole")]);
        let csv = store.to_csv(&ReportFilter::default());
        assert!(csv.contains("\"the \"\"big\"\" pothole\""));
        assert!(csv.starts_with("ID,Title,Status"));
    }
}
