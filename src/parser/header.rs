//! Header decoding: subject, addresses and date of a raw message.

use chrono::{DateTime, Utc};
use mail_parser::{Address, MessageParser};
use tracing::warn;

use crate::error::{MailcardError, Result};
use crate::model::address::EmailAddress;
use crate::model::mail::{ItemId, MailItem};

/// Parse the headers of a raw RFC 5322 message into a [`MailItem`].
pub fn parse_item(raw_message: &[u8], id: ItemId) -> Result<MailItem> {
    let message_bytes = skip_bom(raw_message);
    let msg = MessageParser::default()
        .parse(message_bytes)
        .ok_or_else(|| MailcardError::MimeError(format!("Unparseable headers in '{id}'")))?;

    let author = msg
        .from()
        .and_then(|from| render_addresses(from).into_iter().next());
    let recipients = msg.to().map(render_addresses).unwrap_or_default();
    let cc_recipients = msg.cc().map(render_addresses).unwrap_or_default();

    let date = msg.date().and_then(|d| {
        let rfc3339 = d.to_rfc3339();
        match DateTime::parse_from_rfc3339(&rfc3339) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                warn!(date = %rfc3339, error = %e, "Could not convert message date");
                None
            }
        }
    });

    Ok(MailItem {
        id: Some(id),
        subject: msg.subject().unwrap_or_default().to_string(),
        author,
        recipients,
        cc_recipients,
        date,
    })
}

/// Render every mailbox of an address header as `"Name <addr>"` / `"addr"`.
fn render_addresses(addr: &Address<'_>) -> Vec<String> {
    let mailboxes: Vec<&mail_parser::Addr<'_>> = match addr {
        Address::List(list) => list.iter().collect(),
        Address::Group(groups) => groups.iter().flat_map(|g| g.addresses.iter()).collect(),
    };

    mailboxes
        .into_iter()
        .map(|a| EmailAddress::new(a.name.as_deref(), a.address.as_deref()))
        .filter(|a| !a.is_empty())
        .map(|a| a.display())
        .collect()
}

/// Strip a UTF-8 byte-order mark.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data)
}

/// Decode raw message bytes to a string.
///
/// Tries UTF-8 first, then falls back to Windows-1252 (which accepts every byte).
pub fn decode_header_bytes(bytes: &[u8]) -> String {
    let bytes = skip_bom(bytes);

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}
