//! The mail client as seen by the pipeline.
//!
//! The pipeline never talks to a concrete mail client. It needs three
//! capabilities, captured by [`MailHost`]: listing open display surfaces,
//! asking a surface which message it shows, and fetching a message's MIME
//! structure. [`eml::EmlHost`] implements them over `.eml` files.

pub mod eml;
pub mod resolve;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::mail::{ItemId, MailItem, MessagePart};

/// Which surfaces to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Active surfaces dedicated to displaying a single message.
    MessageDisplay,
    /// Any active surface, whatever it shows.
    Any,
}

/// Host-assigned identifier of a display surface (window or tab).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub String);

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capabilities the prefill pipeline needs from the mail client.
#[async_trait]
pub trait MailHost: Send + Sync {
    /// Active surfaces of `kind`, in the host's order.
    async fn list_surfaces(&self, kind: SurfaceKind) -> Result<Vec<SurfaceId>>;

    /// The message shown in `surface`, if any.
    async fn displayed_item(&self, surface: &SurfaceId) -> Result<Option<MailItem>>;

    /// The full MIME structure of `item` as a list of top-level parts.
    async fn content(&self, item: &ItemId) -> Result<Vec<MessagePart>>;
}
