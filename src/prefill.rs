//! The prefill request: from "what is the user looking at" to a card draft.
//!
//! ```text
//! resolve item ──none──▶ null
//!      │
//! retrieve parts ─▶ extract body ─▶ normalize ─▶ format ─▶ bound ─▶ {subject, body}
//! ```
//!
//! Faults are absorbed where they happen: an unresolved item yields `None`,
//! a failed retrieval yields an empty body with the subject intact.

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::export::{render_card_body, CardOptions};
use crate::host::resolve::{resolve_displayed_item, retrieve_parts};
use crate::host::MailHost;
use crate::model::mail::PrefillDraft;
use crate::parser::mime::{extract_body, normalize_body};

/// A request from the card-creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Build a draft from the message currently on screen.
    GetCurrentMessage,
}

impl Command {
    /// Parse a JSON request such as `{"command": "get_current_message"}`.
    pub fn parse(request: &str) -> Result<Self> {
        Ok(serde_json::from_str(request)?)
    }
}

/// Runs prefill requests against a mail host.
pub struct Prefill<H> {
    host: H,
    options: CardOptions,
}

impl<H: MailHost> Prefill<H> {
    pub fn new(host: H, options: CardOptions) -> Self {
        Self { host, options }
    }

    pub fn with_config(host: H, config: &Config) -> Self {
        Self::new(host, CardOptions::from(config))
    }

    /// Answer one command.
    pub async fn handle(&self, command: Command) -> Option<PrefillDraft> {
        match command {
            Command::GetCurrentMessage => self.current_draft().await,
        }
    }

    /// Answer one JSON request line with a JSON response (`null` when there
    /// is no draft or the request is not understood).
    pub async fn handle_json(&self, request: &str) -> String {
        let draft = match Command::parse(request) {
            Ok(command) => self.handle(command).await,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed request");
                None
            }
        };
        serde_json::to_string(&draft).unwrap_or_else(|_| "null".to_string())
    }

    /// Build the draft for the message currently displayed, if any.
    pub async fn current_draft(&self) -> Option<PrefillDraft> {
        let item = resolve_displayed_item(&self.host).await?;

        let parts = retrieve_parts(&self.host, &item).await;
        let body = normalize_body(&extract_body(&parts));
        debug!(parts = parts.len(), chars = body.chars().count(), "Extracted body");

        let body = if body.is_empty() {
            body
        } else {
            render_card_body(&body, &item, &self.options)
        };

        info!(subject = %item.subject, body_chars = body.chars().count(), "Draft ready");
        Some(PrefillDraft {
            subject: item.subject,
            body,
        })
    }
}
