use crate::cli::ResolutionSubmitArgs;
use crate::client::{CivicClient, MultipartPayload};
use crate::error::{CivicError, Result};
use crate::output;
use crate::types::Issue;

pub async fn submit(client: &mut CivicClient, args: ResolutionSubmitArgs) -> Result<()> {
    client.session().ok_or(CivicError::MissingSession)?;

    let payload = MultipartPayload::new()
        .file("file", &args.file)?
        .text("description", args.description.unwrap_or_default());

    client
        .post_multipart::<serde_json::Value>(
            &format!("/api/issues/{}/submit_resolution/", args.id),
            &payload,
        )
        .await?;

    output::print_message(&format!(
        "Resolution submitted for issue #{}. Awaiting citizen approval.",
        args.id
    ));
    Ok(())
}

pub async fn approve(client: &mut CivicClient, id: u64) -> Result<()> {
    client.session().ok_or(CivicError::MissingSession)?;

    let issue: Issue = client
        .post(&format!("/api/issues/{id}/approve_resolution/"), serde_json::json!({}))
        .await?;

    output::print_message(&format!(
        "Resolution approved. Issue #{} is now {}.",
        issue.id,
        issue.status.label()
    ));
    Ok(())
}
