//! Rendering a message as a task-card description: Markdown formatting and size bounding.

pub mod card;
pub mod limit;

use crate::config::Config;

/// Knobs of the card renderer, taken from [`Config`].
#[derive(Debug, Clone)]
pub struct CardOptions {
    /// `strftime` format for the `**Date:**` line, rendered in local time.
    pub date_format: String,
    /// Exclusive lower bound on the length of a relocated signature.
    pub signature_min_chars: usize,
    /// Exclusive upper bound on the length of a relocated signature.
    pub signature_max_chars: usize,
    /// Ceiling for the whole description, in characters.
    pub max_body_chars: usize,
}

impl From<&Config> for CardOptions {
    fn from(config: &Config) -> Self {
        Self {
            date_format: config.format.date_format.clone(),
            signature_min_chars: config.format.signature_min_chars,
            signature_max_chars: config.format.signature_max_chars,
            max_body_chars: config.limits.max_body_chars,
        }
    }
}

impl Default for CardOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Format `body` for `item` and bound the result to the configured ceiling.
pub fn render_card_body(
    body: &str,
    item: &crate::model::mail::MailItem,
    options: &CardOptions,
) -> String {
    let document = card::format_email(body, item, options);
    limit::enforce_limit(&document, options.max_body_chars)
}
