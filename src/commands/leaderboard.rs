use tabled::{settings::Style, Table, Tabled};

use crate::client::CivicClient;
use crate::error::Result;
use crate::output;
use crate::responses::LeaderboardResponse;
use crate::types::{CitizenRank, DepartmentRank};

#[derive(Tabled)]
struct DepartmentRow {
    #[tabled(rename = "Rank")]
    rank: u32,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Issues Resolved")]
    issues_resolved: u32,
    #[tabled(rename = "Points")]
    points: u32,
}

impl From<&DepartmentRank> for DepartmentRow {
    fn from(entry: &DepartmentRank) -> Self {
        Self {
            rank: entry.rank,
            department: entry.department.clone(),
            issues_resolved: entry.issues_resolved,
            points: entry.total_points,
        }
    }
}

#[derive(Tabled)]
struct CitizenRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Citizen")]
    username: String,
    #[tabled(rename = "Issues Resolved")]
    issues_resolved: u32,
    #[tabled(rename = "Points")]
    points: u32,
}

pub async fn show(client: &mut CivicClient) -> Result<()> {
    let board: LeaderboardResponse = client.get("/api/leaderboard/").await?;

    // Only entries that have earned points make the board.
    let departments: Vec<DepartmentRank> = board
        .department_leaderboard
        .into_iter()
        .filter(|d| d.total_points > 0)
        .collect();
    let citizens: Vec<CitizenRank> = board
        .citizen_leaderboard
        .into_iter()
        .filter(|c| c.points > 0)
        .collect();

    if output::is_json_output() {
        let combined = serde_json::json!({
            "department_leaderboard": departments,
            "citizen_leaderboard": citizens,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&combined).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Department Leaderboard");
    if departments.is_empty() {
        println!("No departments with points yet.");
    } else {
        let rows: Vec<DepartmentRow> = departments.iter().map(DepartmentRow::from).collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    println!();
    println!("Citizen Leaderboard");
    if citizens.is_empty() {
        println!("No citizens with points yet.");
    } else {
        // Citizen entries arrive ordered; rank is positional.
        let rows: Vec<CitizenRow> = citizens
            .iter()
            .enumerate()
            .map(|(i, c)| CitizenRow {
                rank: i + 1,
                username: c.username.clone(),
                issues_resolved: c.issues_resolved,
                points: c.points,
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    Ok(())
}
