//! A [`MailHost`] over individual `.eml` files (RFC 5322 messages without MBOX framing).
//!
//! Every file given to [`EmlHost::new`] counts as one open message window,
//! in the order given. The surface and item identifiers are both the file
//! path, so a window whose file has vanished is simply skipped by the
//! resolver.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{MailHost, SurfaceId, SurfaceKind};
use crate::error::{MailcardError, Result};
use crate::model::mail::{ItemId, MailItem, MessagePart};
use crate::parser::{header, mime};

/// Message files presented as open message windows.
#[derive(Debug, Clone)]
pub struct EmlHost {
    files: Vec<PathBuf>,
}

impl EmlHost {
    pub fn new(files: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    fn known_file(&self, id: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|f| f.to_string_lossy() == id)
            .map(PathBuf::as_path)
    }
}

#[async_trait]
impl MailHost for EmlHost {
    async fn list_surfaces(&self, kind: SurfaceKind) -> Result<Vec<SurfaceId>> {
        tracing::trace!(?kind, files = self.files.len(), "Listing message files");
        Ok(self
            .files
            .iter()
            .map(|f| SurfaceId(f.to_string_lossy().into_owned()))
            .collect())
    }

    async fn displayed_item(&self, surface: &SurfaceId) -> Result<Option<MailItem>> {
        let path = self
            .known_file(&surface.0)
            .ok_or_else(|| MailcardError::UnknownSurface(surface.0.clone()))?;
        let data = read_message(path).await?;
        header::parse_item(&data, ItemId(surface.0.clone())).map(Some)
    }

    async fn content(&self, item: &ItemId) -> Result<Vec<MessagePart>> {
        let path = self
            .known_file(&item.0)
            .ok_or_else(|| MailcardError::UnknownItem(item.0.clone()))?;
        let data = read_message(path).await?;
        Ok(mime::parse_message_parts(&data))
    }
}

async fn read_message(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MailcardError::FileNotFound(path.to_path_buf())
        } else {
            MailcardError::io(path, e)
        }
    })
}
