use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::assistant::Language;
use crate::store::SortOrder;
use crate::types::{Category, Status};

#[derive(Parser)]
#[command(name = "civic")]
#[command(about = "A CLI for reporting and tracking civic issues", version)]
#[command(after_help = "EXAMPLES:
    civic login -u asha                 Log in
    civic report -t \"Pothole\" -d \"...\"  Report an issue
    civic chat                          Report via the assistant
    civic issues --high-priority        List high-priority reports
    civic issue upvote 42               Upvote an issue")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Show the full error chain on failure
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Write debug logs to debug.log
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    #[command(after_help = "EXAMPLES:
    civic login
    civic login --username asha")]
    Login(LoginArgs),
    /// Log out and clear the stored session
    Logout,
    /// Show the logged-in user and profile
    Whoami,
    /// Register a new account
    Register {
        #[command(subcommand)]
        role: RegisterCommands,
    },
    /// Report a new issue
    #[command(after_help = "EXAMPLES:
    civic report -t \"Pothole on 5th Ave\" -d \"Deep pothole near the school\"
    civic report -d \"...\" --lat 17.38 --lng 78.48 --photo pothole.jpg
    civic report --transcript note.txt --lang telugu
    civic report --chat")]
    Report(ReportArgs),
    /// Talk to the reporting assistant
    #[command(after_help = "EXAMPLES:
    civic chat
    (then type 'fill the form' to start a guided report)")]
    Chat,
    /// List issues (alias for 'issue list')
    #[command(after_help = "EXAMPLES:
    civic issues --mine
    civic issues --status in-progress --sort most-votes
    civic issues --high-priority --csv
    civic issues --lat 17.38 --lng 78.48")]
    Issues(IssueListArgs),
    /// Manage issues
    #[command(after_help = "EXAMPLES:
    civic issue view 42
    civic issue upvote 42
    civic issue delete 42")]
    Issue {
        #[command(subcommand)]
        action: IssueCommands,
    },
    /// Submit or approve resolutions
    #[command(after_help = "EXAMPLES:
    civic resolution submit 42 --file proof.jpg -d \"Road repaved\"
    civic resolution approve 42")]
    Resolution {
        #[command(subcommand)]
        action: ResolutionCommands,
    },
    /// List departments
    Departments,
    /// Show citizen and department leaderboards
    Leaderboard,
    /// Show your profile
    Profile,
    /// Show notifications about your resolved reports
    #[command(after_help = "EXAMPLES:
    civic notifications
    civic notifications --mark-read")]
    Notifications(NotificationArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    civic completions bash > ~/.bash_completion.d/civic
    civic completions zsh > ~/.zfunc/_civic")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    Init,
}

#[derive(Subcommand)]
pub enum RegisterCommands {
    /// Register a citizen account
    Citizen(RegisterArgs),
    /// Register a department officer account
    Officer(OfficerRegisterArgs),
    /// Register an admin account
    Admin(RegisterArgs),
}

#[derive(Subcommand)]
pub enum IssueCommands {
    /// List issues
    List(IssueListArgs),
    /// Show issue details, including any resolution
    View {
        /// Issue id
        id: u64,
    },
    /// Upvote an issue
    Upvote {
        /// Issue id
        id: u64,
    },
    /// Downvote an issue
    Downvote {
        /// Issue id
        id: u64,
    },
    /// Delete one of your reports
    Delete {
        /// Issue id
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum ResolutionCommands {
    /// Submit resolution proof for an assigned issue
    Submit(ResolutionSubmitArgs),
    /// Approve a pending resolution on your report
    Approve {
        /// Issue id
        id: u64,
    },
}

#[derive(Args)]
pub struct LoginArgs {
    /// Username (prompted if omitted)
    #[arg(long, short)]
    pub username: Option<String>,

    /// Password (prompted if omitted)
    #[arg(long, short)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct RegisterArgs {
    /// Username
    #[arg(long, short)]
    pub username: String,

    /// Password
    #[arg(long, short)]
    pub password: String,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Args)]
pub struct OfficerRegisterArgs {
    /// Username
    #[arg(long, short)]
    pub username: String,

    /// Password
    #[arg(long, short)]
    pub password: String,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Department id (see `civic departments`)
    #[arg(long)]
    pub department: u64,
}

#[derive(Args, Clone)]
pub struct IssueListArgs {
    /// Show only reports you submitted
    #[arg(long)]
    pub mine: bool,

    /// Show issues assigned to you (officers)
    #[arg(long)]
    pub assigned: bool,

    /// Filter by status
    #[arg(long, value_enum)]
    pub status: Option<Status>,

    /// Show only high-priority reports
    #[arg(long)]
    pub high_priority: bool,

    /// Include resolved reports
    #[arg(long)]
    pub all: bool,

    /// Sort order
    #[arg(long, value_enum)]
    pub sort: Option<SortOrder>,

    /// Export the listing as CSV
    #[arg(long)]
    pub csv: bool,

    /// Latitude for a nearby search (requires --lng)
    #[arg(long, requires = "lng")]
    pub lat: Option<f64>,

    /// Longitude for a nearby search (requires --lat)
    #[arg(long, requires = "lat")]
    pub lng: Option<f64>,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Issue title
    #[arg(long, short)]
    pub title: Option<String>,

    /// Issue description
    #[arg(long, short)]
    pub description: Option<String>,

    /// Issue category
    #[arg(long, value_enum)]
    pub category: Option<Category>,

    /// Latitude of the problem location
    #[arg(long)]
    pub lat: Option<f64>,

    /// Longitude of the problem location
    #[arg(long)]
    pub lng: Option<f64>,

    /// Address of the problem location
    #[arg(long)]
    pub address: Option<String>,

    /// Photo to attach
    #[arg(long)]
    pub photo: Option<PathBuf>,

    /// Voice transcript file to build the report from
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Transcript language
    #[arg(long, value_enum)]
    pub lang: Option<Language>,

    /// Build the report through the chat assistant
    #[arg(long, conflicts_with = "transcript")]
    pub chat: bool,
}

#[derive(Args)]
pub struct ResolutionSubmitArgs {
    /// Issue id
    pub id: u64,

    /// Proof file (photo or document)
    #[arg(long, short)]
    pub file: PathBuf,

    /// Description of the work done
    #[arg(long, short)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct NotificationArgs {
    /// Mark the listed notifications as read
    #[arg(long)]
    pub mark_read: bool,
}
