//! Turn-based form-filling assistant. One user message per turn; each turn
//! either answers the current field or, outside a filling session, is
//! forwarded to the general chat endpoint.

use regex::Regex;
use serde_json::json;

use crate::client::CivicClient;
use crate::error::{CivicError, Result};
use crate::responses::{ChatResponse, RefineResponse, RefinedReport};
use crate::types::{Category, IssueDraft};

pub const GREETING: &str =
    "Hello! Ask me anything or type 'fill the form' to submit an issue.";

const TITLE_PROMPT: &str = "Please enter the title of the issue:";
const DESCRIPTION_PROMPT: &str = "Please describe the issue in detail:";
const ADDRESS_PROMPT: &str = "Enter the address/location:";
const COMPLETE_MESSAGE: &str = "Form filled successfully with AI-refined description!";
const REFINE_FAILED: &str = "Failed to refine description. Using your input.";
const CHAT_FAILED: &str = "AI response failed.";
const CHAT_FALLBACK: &str = "Sorry, I couldn't understand that.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillState {
    Idle,
    AwaitingTitle,
    AwaitingDescription,
    AwaitingCategory,
    AwaitingAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub sender: Sender,
    pub message: String,
}

/// What one turn produced: the assistant lines to show, and the finished
/// draft once the last field has been answered.
pub struct FillerReply {
    pub lines: Vec<String>,
    pub completed: Option<IssueDraft>,
}

pub struct FormFiller {
    state: FillState,
    draft: IssueDraft,
    transcript: Vec<ChatTurn>,
}

impl Default for FormFiller {
    fn default() -> Self {
        Self::new()
    }
}

impl FormFiller {
    pub fn new() -> Self {
        Self {
            state: FillState::Idle,
            draft: IssueDraft::default(),
            transcript: Vec::new(),
        }
    }

    pub fn state(&self) -> FillState {
        self.state
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Feed one user message through the state machine. Refinement and chat
    /// failures are absorbed into visible assistant lines; this never fails
    /// the surrounding conversation.
    pub async fn handle_message(&mut self, client: &mut CivicClient, text: &str) -> FillerReply {
        let text = text.trim();
        if text.is_empty() {
            return FillerReply {
                lines: Vec::new(),
                completed: None,
            };
        }

        self.transcript.push(ChatTurn {
            sender: Sender::User,
            message: text.to_string(),
        });

        let mut lines = Vec::new();
        let mut completed = None;

        match self.state {
            FillState::Idle => {
                if fill_intent(text) {
                    self.draft = IssueDraft::default();
                    self.state = FillState::AwaitingTitle;
                    lines.push(TITLE_PROMPT.to_string());
                } else {
                    lines.push(self.plain_chat(client, text).await);
                }
            }
            FillState::AwaitingTitle => {
                self.draft.title = text.to_string();
                self.state = FillState::AwaitingDescription;
                lines.push(DESCRIPTION_PROMPT.to_string());
            }
            FillState::AwaitingDescription => {
                self.draft.description = text.to_string();
                match refine_description(client, text).await {
                    Ok(report) => {
                        self.draft.title = report.title;
                        self.draft.description = format!(
                            "{}\nUrgency: {}\nDetails: {}\nContact: {}",
                            report.description, report.urgency, report.details, report.contact
                        )
                        .trim()
                        .to_string();
                    }
                    Err(_) => lines.push(REFINE_FAILED.to_string()),
                }
                self.state = FillState::AwaitingCategory;
                lines.push(category_prompt());
            }
            FillState::AwaitingCategory => {
                self.draft.category = Some(Category::parse(text).unwrap_or(Category::Other));
                self.state = FillState::AwaitingAddress;
                lines.push(ADDRESS_PROMPT.to_string());
            }
            FillState::AwaitingAddress => {
                self.draft.address = text.to_string();
                self.state = FillState::Idle;
                completed = Some(std::mem::take(&mut self.draft));
                lines.push(COMPLETE_MESSAGE.to_string());
            }
        }

        for line in &lines {
            self.transcript.push(ChatTurn {
                sender: Sender::Assistant,
                message: line.clone(),
            });
        }

        FillerReply { lines, completed }
    }

    async fn plain_chat(&mut self, client: &mut CivicClient, text: &str) -> String {
        match client
            .post::<ChatResponse>("/api/ai-chat/", json!({ "message": text }))
            .await
        {
            Ok(response) => response
                .reply
                .filter(|reply| !reply.trim().is_empty())
                .unwrap_or_else(|| CHAT_FALLBACK.to_string()),
            Err(_) => CHAT_FAILED.to_string(),
        }
    }
}

fn fill_intent(text: &str) -> bool {
    let re = Regex::new(r"(?i)fill the form").unwrap();
    re.is_match(text)
}

fn category_prompt() -> String {
    let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_wire()).collect();
    format!("Select category ({}):", names.join(", "))
}

/// Send raw text through the refinement endpoint and decode the JSON report
/// it is expected to wrap. A malformed payload is a refinement failure, not
/// a flow-fatal error.
async fn refine_description(client: &mut CivicClient, text: &str) -> Result<RefinedReport> {
    let response: RefineResponse = client
        .post("/api/refine-description/", json!({ "text": text }))
        .await?;

    serde_json::from_str(&response.refined).map_err(|_| CivicError::InvalidAiResponse)
}
