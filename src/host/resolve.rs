//! Finding the displayed message and fetching its content.
//!
//! Both steps absorb host faults: a failed lookup is logged and turned into
//! "nothing found" or an empty part list.

use tracing::{debug, info, warn};

use super::{MailHost, SurfaceId, SurfaceKind};
use crate::model::mail::{MailItem, MessagePart};

/// Locate the message the user is looking at.
///
/// Message-display surfaces are tried first; when there are none, every
/// active surface is. Surfaces are asked one after another and the first
/// one showing a message wins.
pub async fn resolve_displayed_item<H>(host: &H) -> Option<MailItem>
where
    H: MailHost + ?Sized,
{
    let surfaces = match candidate_surfaces(host).await {
        Ok(surfaces) => surfaces,
        Err(e) => {
            warn!(error = %e, "Could not enumerate display surfaces");
            return None;
        }
    };

    for surface in &surfaces {
        match host.displayed_item(surface).await {
            Ok(Some(item)) => {
                info!(surface = %surface, subject = %item.subject, "Resolved displayed message");
                return Some(item);
            }
            Ok(None) => debug!(surface = %surface, "Surface shows no message"),
            Err(e) => debug!(surface = %surface, error = %e, "Surface lookup failed"),
        }
    }

    info!(candidates = surfaces.len(), "No displayed message found");
    None
}

async fn candidate_surfaces<H>(host: &H) -> crate::error::Result<Vec<SurfaceId>>
where
    H: MailHost + ?Sized,
{
    let surfaces = host.list_surfaces(SurfaceKind::MessageDisplay).await?;
    if !surfaces.is_empty() {
        return Ok(surfaces);
    }
    debug!("No message-display surface, widening to all active surfaces");
    host.list_surfaces(SurfaceKind::Any).await
}

/// Fetch the MIME structure of `item`, or an empty list on any fault.
pub async fn retrieve_parts<H>(host: &H, item: &MailItem) -> Vec<MessagePart>
where
    H: MailHost + ?Sized,
{
    let Some(id) = item.id.as_ref() else {
        warn!(subject = %item.subject, "Displayed message has no identifier");
        return Vec::new();
    };

    match host.content(id).await {
        Ok(parts) => parts,
        Err(e) => {
            warn!(item = %id, error = %e, "Could not retrieve message content");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MailcardError, Result};
    use crate::model::mail::ItemId;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedHost {
        display: Vec<&'static str>,
        any: Vec<&'static str>,
        items: Vec<(&'static str, &'static str)>,
        failing: Vec<&'static str>,
        enumerate_fails: bool,
        asked: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MailHost for ScriptedHost {
        async fn list_surfaces(&self, kind: SurfaceKind) -> Result<Vec<SurfaceId>> {
            if self.enumerate_fails {
                return Err(MailcardError::Host("tabs unavailable".into()));
            }
            let ids = match kind {
                SurfaceKind::MessageDisplay => &self.display,
                SurfaceKind::Any => &self.any,
            };
            Ok(ids.iter().map(|s| SurfaceId(s.to_string())).collect())
        }

        async fn displayed_item(&self, surface: &SurfaceId) -> Result<Option<MailItem>> {
            self.asked.lock().unwrap().push(surface.0.clone());
            if self.failing.iter().any(|f| *f == surface.0) {
                return Err(MailcardError::UnknownSurface(surface.0.clone()));
            }
            Ok(self
                .items
                .iter()
                .find(|(s, _)| *s == surface.0)
                .map(|(s, subject)| MailItem::new(*s, *subject)))
        }

        async fn content(&self, item: &ItemId) -> Result<Vec<MessagePart>> {
            Err(MailcardError::UnknownItem(item.0.clone()))
        }
    }

    #[tokio::test]
    async fn test_first_surface_with_item_wins() {
        let host = ScriptedHost {
            display: vec!["t1", "t2", "t3"],
            items: vec![("t2", "second"), ("t3", "third")],
            ..Default::default()
        };
        let item = resolve_displayed_item(&host).await.unwrap();
        assert_eq!(item.subject, "second");
        assert_eq!(*host.asked.lock().unwrap(), vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_any_surface() {
        let host = ScriptedHost {
            any: vec!["tab"],
            items: vec![("tab", "from general tab")],
            ..Default::default()
        };
        let item = resolve_displayed_item(&host).await.unwrap();
        assert_eq!(item.subject, "from general tab");
    }

    #[tokio::test]
    async fn test_failing_surface_is_skipped() {
        let host = ScriptedHost {
            display: vec!["broken", "ok"],
            items: vec![("ok", "fine")],
            failing: vec!["broken"],
            ..Default::default()
        };
        assert_eq!(resolve_displayed_item(&host).await.unwrap().subject, "fine");
    }

    #[tokio::test]
    async fn test_nothing_found() {
        let host = ScriptedHost {
            display: vec!["t1"],
            ..Default::default()
        };
        assert!(resolve_displayed_item(&host).await.is_none());
        assert!(resolve_displayed_item(&ScriptedHost::default()).await.is_none());
    }

    #[tokio::test]
    async fn test_enumeration_fault_is_not_found() {
        let host = ScriptedHost {
            enumerate_fails: true,
            ..Default::default()
        };
        assert!(resolve_displayed_item(&host).await.is_none());
    }

    #[tokio::test]
    async fn test_retrieval_fault_yields_empty_tree() {
        let host = ScriptedHost::default();
        let parts = retrieve_parts(&host, &MailItem::new("m1", "s")).await;
        assert!(parts.is_empty());
        assert!(retrieve_parts(&host, &MailItem::default()).await.is_empty());
    }
}
