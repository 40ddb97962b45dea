//! MIME structure: building the part tree and extracting the readable body.

use std::sync::OnceLock;

use mail_parser::{MessageParser, MimeHeaders, PartType};
use regex::Regex;

use crate::model::mail::MessagePart;
use crate::parser::header::{decode_header_bytes, skip_bom};
use crate::parser::html;

/// Maximum depth for recursive multipart descent (adversarial input guard).
const MAX_DEPTH: usize = 10;

const TEXT_PLAIN: &str = "text/plain";
const TEXT_HTML: &str = "text/html";

/// Pick the readable text of a message part tree.
///
/// Depth-first, left to right:
/// - every non-empty `text/plain` leaf is appended verbatim;
/// - a non-empty `text/html` leaf is converted with [`html::to_markdown`]
///   only while nothing has been gathered yet, so HTML contributes at most once;
/// - container parts are descended into with the same accumulator;
/// - anything else (attachments, empty leaves) is skipped.
pub fn extract_body(parts: &[MessagePart]) -> String {
    let mut text = String::new();
    collect_text(parts, &mut text);
    text
}

fn collect_text(parts: &[MessagePart], text: &mut String) {
    for part in parts {
        match part.text() {
            Some(body) if part.media_type == TEXT_PLAIN => text.push_str(body),
            Some(body) if part.media_type == TEXT_HTML && text.is_empty() => {
                *text = html::to_markdown(body);
            }
            _ if !part.children.is_empty() => collect_text(&part.children, text),
            _ => {}
        }
    }
}

/// Normalize an extracted body before formatting.
///
/// CRLF and bare CR become LF, three or more consecutive newlines shrink to
/// one blank line, and surrounding whitespace is trimmed.
pub fn normalize_body(body: &str) -> String {
    static BLANKS: OnceLock<Regex> = OnceLock::new();
    let blanks = BLANKS.get_or_init(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

    let unified = body.replace("\r\n", "\n").replace('\r', "\n");
    blanks.replace_all(&unified, "\n\n").trim().to_string()
}

/// Build the part tree of a raw RFC 5322 message.
///
/// The returned list holds the single root part. Messages `mail-parser`
/// cannot make sense of become one `text/plain` leaf holding everything
/// after the header block.
pub fn parse_message_parts(raw_message: &[u8]) -> Vec<MessagePart> {
    let message_bytes = skip_bom(raw_message);

    match MessageParser::default().parse(message_bytes) {
        Some(msg) => vec![part_tree(&msg, 0, 0)],
        None => {
            tracing::debug!("mail-parser rejected message, using raw body fallback");
            let body = extract_body_fallback(message_bytes);
            if body.is_empty() {
                Vec::new()
            } else {
                vec![MessagePart::leaf(TEXT_PLAIN, body)]
            }
        }
    }
}

/// Convert part `id` of `msg` (and its descendants) into a [`MessagePart`].
fn part_tree(msg: &mail_parser::Message<'_>, id: usize, depth: usize) -> MessagePart {
    let Some(part) = msg.parts.get(id) else {
        return MessagePart::multipart("application/octet-stream", Vec::new());
    };
    let media_type = media_type_of(part);

    match &part.body {
        PartType::Text(_) | PartType::Html(_) if is_attachment(part) => {
            tracing::debug!(part = id, media_type = %media_type, "Skipping attached text part");
            MessagePart::multipart(media_type, Vec::new())
        }
        PartType::Text(text) | PartType::Html(text) => MessagePart::leaf(media_type, text.as_ref()),
        PartType::Multipart(ids) if depth < MAX_DEPTH => MessagePart::multipart(
            media_type,
            ids.iter()
                .map(|&child| part_tree(msg, child, depth + 1))
                .collect(),
        ),
        PartType::Message(nested) if depth < MAX_DEPTH => {
            MessagePart::multipart(media_type, vec![part_tree(nested, 0, depth + 1)])
        }
        _ => {
            if depth >= MAX_DEPTH {
                tracing::warn!(depth, "MIME nesting too deep, skipping subtree");
            }
            MessagePart::multipart(media_type, Vec::new())
        }
    }
}

/// `true` for parts sent as files rather than as the message text: an
/// `attachment` disposition, or a file name on the part.
fn is_attachment(part: &mail_parser::MessagePart<'_>) -> bool {
    let disposed = part
        .content_disposition()
        .is_some_and(|d| d.ctype().eq_ignore_ascii_case("attachment"));
    disposed || part.attachment_name().is_some()
}

/// Lowercase `type/subtype` from the `Content-Type` header, or a default
/// derived from how `mail-parser` classified the body.
fn media_type_of(part: &mail_parser::MessagePart<'_>) -> String {
    if let Some(ct) = part.content_type() {
        let main = ct.ctype().to_ascii_lowercase();
        return match ct.subtype() {
            Some(sub) => format!("{main}/{}", sub.to_ascii_lowercase()),
            None => main,
        };
    }

    match &part.body {
        PartType::Text(_) => TEXT_PLAIN,
        PartType::Html(_) => TEXT_HTML,
        PartType::Multipart(_) => "multipart/mixed",
        PartType::Message(_) => "message/rfc822",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Fallback body extraction when `mail-parser` cannot parse the message.
fn extract_body_fallback(data: &[u8]) -> String {
    let text = decode_header_bytes(data);
    if let Some(pos) = text.find("\n\n") {
        text[pos + 2..].to_string()
    } else if let Some(pos) = text.find("\r\n\r\n") {
        text[pos + 4..].to_string()
    } else {
        String::new()
    }
}
