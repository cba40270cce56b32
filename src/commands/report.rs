use std::fs::File;
use std::io::BufReader;

use crate::assistant::{apply_voice_input, Language, TranscriptReader, VoiceIntake};
use crate::cli::ReportArgs;
use crate::client::CivicClient;
use crate::config::Config;
use crate::error::{CivicError, Result};
use crate::output;
use crate::submit::ReportSession;
use crate::types::IssueDraft;

pub async fn run(client: &mut CivicClient, config: &Config, args: ReportArgs) -> Result<()> {
    client.session().ok_or(CivicError::MissingSession)?;

    if args.chat {
        return super::chat::run(client).await;
    }

    let mut draft = IssueDraft {
        title: args.title.unwrap_or_default(),
        description: args.description.unwrap_or_default(),
        category: args.category,
        latitude: args.lat,
        longitude: args.lng,
        address: args.address.unwrap_or_default(),
        photo: args.photo,
    };

    if let Some(path) = &args.transcript {
        let language = args
            .lang
            .or_else(|| {
                config
                    .default_language
                    .as_deref()
                    .and_then(Language::parse)
            })
            .unwrap_or(Language::Hindi);

        let file = File::open(path).map_err(|e| CivicError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut intake = VoiceIntake::new(language);
        intake.start(false)?;
        let mut source = TranscriptReader::new(BufReader::new(file));
        intake.pump(&mut source)?;
        intake.stop();

        let text = intake.commit().ok_or_else(|| {
            CivicError::Validation("The transcript file is empty.".to_string())
        })?;

        apply_voice_input(client, &mut draft, &text, language).await?;
    }

    let mut session = ReportSession::new(draft);
    match session.submit(client).await {
        Ok(outcome) => {
            output::print_message(&outcome.notice());
            Ok(())
        }
        Err(e) => {
            // Keep the attempted classification visible so the user can see
            // what the draft would have been filed as.
            if let Some(preview) = session.preview() {
                output::print_message(&format!(
                    "Attempted classification - Severity: {}, Department: {}",
                    preview.severity, preview.department
                ));
            }
            Err(e)
        }
    }
}
