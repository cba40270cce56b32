use std::io::{self, Write};

use crate::config::Config;
use crate::error::{CivicError, Result};

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        print!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Civic CLI Configuration");
    println!("=======================\n");

    print!("Enter the API base URL [http://127.0.0.1:8000]: ");
    io::stdout().flush()?;

    let mut api_url = String::new();
    io::stdin().read_line(&mut api_url)?;
    let api_url = api_url.trim();
    let api_url = if api_url.is_empty() {
        "http://127.0.0.1:8000"
    } else {
        api_url
    };

    print!("Default voice language (hindi/english/telugu/jharkhandi) [hindi]: ");
    io::stdout().flush()?;

    let mut language = String::new();
    io::stdin().read_line(&mut language)?;
    let language = language.trim();

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CivicError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    let mut config_content = format!("api_url = \"{api_url}\"\n");
    if !language.is_empty() {
        config_content.push_str(&format!("default_language = \"{language}\"\n"));
    }

    std::fs::write(&config_path, config_content).map_err(|e| CivicError::ConfigRead {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now use 'civic' commands!");

    Ok(())
}
