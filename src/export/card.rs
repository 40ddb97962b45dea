//! Markdown card description for an email.
//!
//! Layout:
//!
//! ```text
//! ## Email Details
//!
//! **From:** ...
//! **To:** ...
//! **CC:** ...
//! **Date:** ...
//!
//! ---
//!
//! body, with quoted replies folded and the signature relabelled
//! ```

use std::fmt::Write as _;
use std::sync::OnceLock;

use chrono::{DateTime, Local, Utc};
use regex::Regex;

use super::CardOptions;
use crate::model::address::bare_address;
use crate::model::mail::MailItem;
use crate::parser::html::collapse_blank_runs;

const QUOTE_MARKER: &str = "\n**Previous conversation:**\n";
const QUOTE_END: &str = "\n---\n";
const SIGNATURE_LABEL: &str = "\n\n**Signature:**\n";

/// Build the card description for `body` with the metadata of `item`.
///
/// Header lines are emitted only for metadata that is present.
pub fn format_email(body: &str, item: &MailItem, options: &CardOptions) -> String {
    let mut out = String::from("## Email Details\n\n");

    if let Some(author) = item.author.as_deref().filter(|a| !a.is_empty()) {
        out.push_str(&format!("**From:** {author}\n"));
    }
    if !item.recipients.is_empty() {
        out.push_str(&format!("**To:** {}\n", address_list(&item.recipients)));
    }
    if !item.cc_recipients.is_empty() {
        out.push_str(&format!("**CC:** {}\n", address_list(&item.cc_recipients)));
    }
    if let Some(date) = item.date {
        out.push_str(&format!("**Date:** {}\n", local_date(date, &options.date_format)));
    }

    out.push_str("\n---\n\n");

    let folded = fold_quotes(body);
    let collapsed = collapse_blank_runs(&folded);
    out.push_str(&relocate_signature(
        &collapsed,
        options.signature_min_chars,
        options.signature_max_chars,
    ));
    out
}

/// Comma-joined recipients, each reduced to its bare address.
fn address_list(recipients: &[String]) -> String {
    recipients
        .iter()
        .map(|r| bare_address(r))
        .collect::<Vec<_>>()
        .join(", ")
}

fn local_date(date: DateTime<Utc>, format: &str) -> String {
    let local = date.with_timezone(&Local);
    let mut rendered = String::new();
    if write!(rendered, "{}", local.format(format)).is_err() {
        tracing::warn!(format, "Invalid date format, using RFC 2822");
        return local.to_rfc2822();
    }
    rendered
}

/// Restyle `>`-quoted reply lines as a labelled blockquote.
///
/// The first quoted line is preceded by the "Previous conversation" marker;
/// blank lines inside a quote stay in it as a bare `>`; the first ordinary
/// line after a quote is preceded by a horizontal rule.
pub fn fold_quotes(body: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut in_quote = false;

    for line in body.split('\n') {
        let trimmed = line.trim();

        if let Some(quoted) = trimmed.strip_prefix('>') {
            if !in_quote {
                lines.push(QUOTE_MARKER.to_string());
                in_quote = true;
            }
            lines.push(format!("> {}", quoted.trim()));
        } else if in_quote && trimmed.is_empty() {
            lines.push(">".to_string());
        } else {
            if in_quote {
                lines.push(QUOTE_END.to_string());
                in_quote = false;
            }
            lines.push(line.to_string());
        }
    }

    lines.join("\n")
}

fn signature_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?s)\n--\s*\n.*$",
            r"(?s)\n_{3,}\s*\n.*$",
            r"(?is)\nBest regards?.*$",
            r"(?is)\nSincerely.*$",
            r"(?is)\nThanks?.*$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid signature regex"))
        .collect()
    })
}

/// Move a trailing sign-off under a `**Signature:**` label.
///
/// Patterns are tried in a fixed order: `-- ` delimiter, underscore rule,
/// then "Best regards", "Sincerely" and "Thanks" endings. A match is only
/// accepted when its trimmed length lies strictly between `min_chars` and
/// `max_chars`; the first accepted match wins.
pub fn relocate_signature(body: &str, min_chars: usize, max_chars: usize) -> String {
    for pattern in signature_patterns() {
        let Some(found) = pattern.find(body) else {
            continue;
        };
        let signature = found.as_str().trim();
        let len = signature.chars().count();
        if len > min_chars && len < max_chars {
            return format!("{}{SIGNATURE_LABEL}{signature}", &body[..found.start()]);
        }
    }
    body.to_string()
}
