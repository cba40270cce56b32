use std::io::{self, BufRead, Write};

use crate::assistant::{FormFiller, GREETING};
use crate::client::CivicClient;
use crate::error::{CivicError, Result};
use crate::output;
use crate::submit::ReportSession;
use crate::types::IssueDraft;

/// Line-oriented conversation with the assistant. Typing the fill intent
/// starts a guided report; anything else goes to the general chat endpoint.
pub async fn run(client: &mut CivicClient) -> Result<()> {
    client.session().ok_or(CivicError::MissingSession)?;

    println!("Assistant: {GREETING}");
    println!("(type 'exit' to quit)");

    let stdin = io::stdin();
    let mut filler = FormFiller::new();

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        let reply = filler.handle_message(client, line).await;
        for text in &reply.lines {
            println!("Assistant: {text}");
        }

        if let Some(draft) = reply.completed {
            submit_draft(client, draft).await?;
        }
    }

    Ok(())
}

async fn submit_draft(client: &mut CivicClient, draft: IssueDraft) -> Result<()> {
    println!();
    println!("Title:       {}", draft.title);
    println!("Description: {}", draft.description);
    if let Some(category) = draft.category {
        println!("Category:    {category}");
    }
    if !draft.address.is_empty() {
        println!("Address:     {}", draft.address);
    }
    print!("Submit this report now? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    if !answer.trim().eq_ignore_ascii_case("y") {
        println!("Draft discarded.");
        return Ok(());
    }

    let mut session = ReportSession::new(draft);
    match session.submit(client).await {
        Ok(outcome) => output::print_message(&outcome.notice()),
        Err(e) => {
            if let Some(preview) = session.preview() {
                println!(
                    "Attempted classification - Severity: {}, Department: {}",
                    preview.severity, preview.department
                );
            }
            println!("Failed to submit issue: {e}");
        }
    }

    Ok(())
}
