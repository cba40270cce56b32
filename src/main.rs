use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use civic_cli::cli::{Cli, Commands, IssueCommands, RegisterCommands, ResolutionCommands};
use civic_cli::client::CivicClient;
use civic_cli::config::Config;
use civic_cli::error::Result;
use civic_cli::session::Session;
use civic_cli::{commands, output};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = Error::source(cause);
            }
        }

        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    output::set_json_output(cli.json);

    if cli.debug {
        let file = std::fs::File::create("debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    match cli.command {
        // Commands that don't require config/client
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "civic", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        // Commands that require config and client
        command => {
            let config = Config::load()?;
            let session_path = Session::default_path()?;
            let session = Session::load(&session_path);
            let mut client = CivicClient::new(&config.api_url(), session)?
                .with_session_path(session_path);

            match command {
                Commands::Login(args) => {
                    commands::auth::login(&mut client, args).await?;
                }
                Commands::Logout => {
                    commands::auth::logout(&mut client)?;
                }
                Commands::Whoami => {
                    commands::auth::whoami(&mut client).await?;
                }
                Commands::Register { role } => match role {
                    RegisterCommands::Citizen(args) => {
                        commands::auth::register_citizen(&mut client, args).await?;
                    }
                    RegisterCommands::Officer(args) => {
                        commands::auth::register_officer(&mut client, args).await?;
                    }
                    RegisterCommands::Admin(args) => {
                        commands::auth::register_admin(&mut client, args).await?;
                    }
                },
                Commands::Report(args) => {
                    commands::report::run(&mut client, &config, args).await?;
                }
                Commands::Chat => {
                    commands::chat::run(&mut client).await?;
                }
                Commands::Issues(args) => {
                    commands::issues::list(&mut client, args).await?;
                }
                Commands::Issue { action } => match action {
                    IssueCommands::List(args) => {
                        commands::issues::list(&mut client, args).await?;
                    }
                    IssueCommands::View { id } => {
                        commands::issues::view(&mut client, id).await?;
                    }
                    IssueCommands::Upvote { id } => {
                        commands::issues::vote(&mut client, id, true).await?;
                    }
                    IssueCommands::Downvote { id } => {
                        commands::issues::vote(&mut client, id, false).await?;
                    }
                    IssueCommands::Delete { id } => {
                        commands::issues::delete(&mut client, id).await?;
                    }
                },
                Commands::Resolution { action } => match action {
                    ResolutionCommands::Submit(args) => {
                        commands::resolution::submit(&mut client, args).await?;
                    }
                    ResolutionCommands::Approve { id } => {
                        commands::resolution::approve(&mut client, id).await?;
                    }
                },
                Commands::Departments => {
                    commands::departments::list(&mut client).await?;
                }
                Commands::Leaderboard => {
                    commands::leaderboard::show(&mut client).await?;
                }
                Commands::Profile => {
                    commands::profile::show(&mut client).await?;
                }
                Commands::Notifications(args) => {
                    commands::notifications::list(&mut client, args).await?;
                }
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
