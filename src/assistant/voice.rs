//! Voice transcript intake. Actual speech capture is an external concern;
//! anything that can hand over transcript chunks (a file, stdin, a test
//! stub) plugs in through [`SpeechSource`]. The intake mirrors chunks into
//! an editable buffer and only hands text onward on an explicit commit.

use std::io::BufRead;

use clap::ValueEnum;
use serde_json::json;

use crate::client::CivicClient;
use crate::error::{CivicError, Result};
use crate::responses::{RefineResponse, RefinedReport};
use crate::types::IssueDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    Hindi,
    English,
    Telugu,
    /// No speech model of its own; captured with the Hindi locale.
    Jharkhandi,
}

impl Language {
    pub fn locale(self) -> &'static str {
        match self {
            Language::Hindi | Language::Jharkhandi => "hi-IN",
            Language::English => "en-US",
            Language::Telugu => "te-IN",
        }
    }

    pub fn is_english(self) -> bool {
        matches!(self, Language::English)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "hindi" => Some(Language::Hindi),
            "english" => Some(Language::English),
            "telugu" => Some(Language::Telugu),
            "jharkhandi" => Some(Language::Jharkhandi),
            _ => None,
        }
    }
}

pub trait SpeechSource {
    /// Next transcribed chunk, or None when the source is exhausted.
    fn next_chunk(&mut self) -> std::io::Result<Option<String>>;
}

/// Reads transcript chunks line by line from any buffered reader.
pub struct TranscriptReader<R: BufRead> {
    inner: R,
}

impl<R: BufRead> TranscriptReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> SpeechSource for TranscriptReader<R> {
    fn next_chunk(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end().to_string()))
    }
}

pub struct VoiceIntake {
    language: Language,
    transcript: String,
    buffer: String,
    listening: bool,
}

impl VoiceIntake {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            transcript: String::new(),
            buffer: String::new(),
            listening: false,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Begin listening. Refused while another request holds the shared
    /// loading lock, so capture cannot race a submission in flight.
    pub fn start(&mut self, busy: bool) -> Result<()> {
        if busy {
            return Err(CivicError::Validation(
                "Voice capture is unavailable while a request is in progress.".to_string(),
            ));
        }
        self.listening = true;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.listening = false;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Drain the source while listening, appending each chunk to the live
    /// transcript. The editable buffer mirrors the transcript; any manual
    /// edits made so far are overwritten, as with a live dictation box.
    pub fn pump(&mut self, source: &mut dyn SpeechSource) -> Result<()> {
        while self.listening {
            match source.next_chunk()? {
                Some(chunk) => {
                    if !self.transcript.is_empty() {
                        self.transcript.push(' ');
                    }
                    self.transcript.push_str(&chunk);
                    self.buffer = self.transcript.clone();
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Hand-edit the buffer before committing.
    pub fn edit(&mut self, text: &str) {
        self.buffer = text.to_string();
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Take the final text. Returns None for an empty buffer; otherwise
    /// clears both transcript and buffer. Never submits anything itself.
    pub fn commit(&mut self) -> Option<String> {
        let text = self.buffer.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.transcript.clear();
        self.buffer.clear();
        Some(text)
    }
}

/// Turn committed voice text into draft fields: translate to English when
/// needed, then ask the refinement service for a structured report. A
/// malformed report leaves the draft untouched.
pub async fn apply_voice_input(
    client: &mut CivicClient,
    draft: &mut IssueDraft,
    text: &str,
    language: Language,
) -> Result<()> {
    let mut english = text.to_string();

    if !language.is_english() {
        let prompt = format!(
            "You are an AI assistant. Translate the following text to English: \"{text}\" \
             Return only the translated English text."
        );
        let response: RefineResponse = client
            .post("/api/refine-description/", json!({ "text": prompt }))
            .await?;
        if !response.refined.trim().is_empty() {
            english = response.refined;
        }
    }

    let prompt = format!(
        "You are an AI assistant for civic issue reporting. Convert the following input into a structured report with:\n\
         - Title\n\
         - Detailed Description\n\
         - Urgency (24-48 hours)\n\
         - Specific details\n\
         - Contact info placeholder\n\
         \n\
         Return JSON like:\n\
         {{\n  \"title\": \"\",\n  \"description\": \"\",\n  \"urgency\": \"\",\n  \"details\": \"\",\n  \"contact\": \"\"\n}}\n\
         \n\
         User input: \"{english}\""
    );

    let response: RefineResponse = client
        .post("/api/refine-description/", json!({ "text": prompt }))
        .await?;

    let report: RefinedReport =
        serde_json::from_str(&response.refined).map_err(|_| CivicError::InvalidAiResponse)?;

    if !report.title.trim().is_empty() {
        draft.title = report.title;
    }
    draft.description = format!(
        "{} Urgency: {} Details: {} Contact: {}",
        report.description, report.urgency, report.details, report.contact
    )
    .trim()
    .to_string();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn jharkhandi_uses_hindi_locale() {
        assert_eq!(Language::Jharkhandi.locale(), "hi-IN");
        assert_eq!(Language::Telugu.locale(), "te-IN");
    }

    #[test]
    fn start_refused_while_busy() {
        let mut intake = VoiceIntake::new(Language::Hindi);
        assert!(intake.start(true).is_err());
        assert!(!intake.is_listening());
        assert!(intake.start(false).is_ok());
        assert!(intake.is_listening());
    }

    #[test]
    fn pump_mirrors_transcript_into_buffer() {
        let mut intake = VoiceIntake::new(Language::English);
        intake.start(false).unwrap();

        let mut source = TranscriptReader::new(Cursor::new("there is a\nbroken streetlight\n"));
        intake.pump(&mut source).unwrap();

        assert_eq!(intake.buffer(), "there is a broken streetlight");
    }

    #[test]
    fn commit_clears_state_and_respects_edits() {
        let mut intake = VoiceIntake::new(Language::English);
        intake.start(false).unwrap();

        let mut source = TranscriptReader::new(Cursor::new("brokn streetlight\n"));
        intake.pump(&mut source).unwrap();
        intake.stop();

        intake.edit("broken streetlight on 5th avenue");
        let text = intake.commit().unwrap();
        assert_eq!(text, "broken streetlight on 5th avenue");
        assert_eq!(intake.buffer(), "");
        assert!(intake.commit().is_none());
    }

    #[test]
    fn empty_buffer_commits_nothing() {
        let mut intake = VoiceIntake::new(Language::English);
        intake.edit("   ");
        assert!(intake.commit().is_none());
    }
}
