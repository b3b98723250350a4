//! Per-article comment threads with a write-through durable mirror.
//!
//! # Responsibility
//! - Own the in-memory article-id -> comment-list mapping.
//! - Mirror every addition wholesale into the `article-comments` slot.
//!
//! # Invariants
//! - Blank content never produces a comment or a mirror write.
//! - A missing author is recorded as the fixed anonymous name.
//! - Comment ids are millisecond timestamps, bumped past the thread's
//!   last id so two quick additions to one article never collide.
//! - Mirror failures are logged, never propagated; in-memory state is the
//!   source of truth for the rest of the session.

use crate::model::identity::ArticleId;
use crate::repo::slot_store::SlotStore;
use chrono::{SecondsFormat, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Durable slot holding the serialized comment mapping.
pub const COMMENTS_SLOT: &str = "article-comments";

/// Author name recorded when none is given.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// One comment on one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Millisecond timestamp, unique within its thread.
    pub id: u64,
    pub author: String,
    pub content: String,
    /// Creation time in RFC 3339 form.
    pub created_at: String,
}

/// In-memory comment threads mirrored to a durable slot.
///
/// Threads are keyed by the article identity's string form, so store-origin
/// and file-origin articles share one mapping.
pub struct CommentStore<S: SlotStore> {
    slots: S,
    threads: BTreeMap<String, Vec<Comment>>,
}

impl<S: SlotStore> CommentStore<S> {
    /// Opens the store, loading the mirror or starting empty.
    ///
    /// An absent, unreadable or corrupt mirror yields an empty mapping;
    /// articles without comments simply have no entry.
    pub fn open(slots: S) -> Self {
        let mut store = Self {
            slots,
            threads: BTreeMap::new(),
        };
        store.reload();
        store
    }

    /// Discards the in-memory mapping and re-reads the mirror.
    pub fn reload(&mut self) {
        self.threads = self.load_mirror().unwrap_or_default();
        info!(
            "event=comments_load module=comments status=ok threads={}",
            self.threads.len()
        );
    }

    /// Returns the comment thread for `id`, oldest first.
    pub fn comments_for(&self, id: &ArticleId) -> &[Comment] {
        self.threads
            .get(&id.to_string())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Appends a comment to the article's thread.
    ///
    /// Content is trimmed; blank content is rejected with `None` and
    /// nothing is written. A blank or missing author is recorded as
    /// `ANONYMOUS_AUTHOR`. Mirror write failure is logged and does not
    /// roll back the addition.
    pub fn add(
        &mut self,
        id: &ArticleId,
        author: Option<&str>,
        content: &str,
    ) -> Option<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let author = author
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR);

        let thread = self.threads.entry(id.to_string()).or_default();
        let now = Utc::now();
        let last_id = thread.last().map_or(0, |comment| comment.id);
        let comment = Comment {
            id: (now.timestamp_millis().max(0) as u64).max(last_id + 1),
            author: author.to_string(),
            content: content.to_string(),
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        thread.push(comment.clone());

        self.persist();
        info!(
            "event=comment_add module=comments status=ok article={id} comment={}",
            comment.id
        );
        Some(comment)
    }

    fn load_mirror(&self) -> Option<BTreeMap<String, Vec<Comment>>> {
        let body = match self.slots.read_slot(COMMENTS_SLOT) {
            Ok(Some(body)) => body,
            Ok(None) => return None,
            Err(err) => {
                error!("event=comments_read module=comments status=error error={err}");
                return None;
            }
        };

        match serde_json::from_str(&body) {
            Ok(threads) => Some(threads),
            Err(err) => {
                warn!("event=comments_parse module=comments status=error error={err}");
                None
            }
        }
    }

    fn persist(&mut self) {
        let body = match serde_json::to_string(&self.threads) {
            Ok(body) => body,
            Err(err) => {
                error!("event=comments_serialize module=comments status=error error={err}");
                return;
            }
        };

        if let Err(err) = self.slots.write_slot(COMMENTS_SLOT, &body) {
            error!("event=comments_write module=comments status=error error={err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentStore, ANONYMOUS_AUTHOR};
    use crate::model::identity::ArticleId;
    use crate::repo::slot_store::MemorySlotStore;

    #[test]
    fn blank_content_is_rejected_without_a_write() {
        let mut store = CommentStore::open(MemorySlotStore::new());
        let id = ArticleId::Store(1);

        assert!(store.add(&id, Some("Ada"), "   ").is_none());
        assert!(store.comments_for(&id).is_empty());
        assert!(store.slots.peek(super::COMMENTS_SLOT).is_none());
    }

    #[test]
    fn a_missing_or_blank_author_becomes_anonymous() {
        let mut store = CommentStore::open(MemorySlotStore::new());
        let id = ArticleId::Store(1);

        let first = store.add(&id, None, "First!").unwrap();
        let second = store.add(&id, Some("  "), "Second.").unwrap();
        assert_eq!(first.author, ANONYMOUS_AUTHOR);
        assert_eq!(second.author, ANONYMOUS_AUTHOR);
    }

    #[test]
    fn ids_stay_unique_within_a_thread_even_for_quick_additions() {
        let mut store = CommentStore::open(MemorySlotStore::new());
        let id = ArticleId::derive("notes.md");

        let first = store.add(&id, Some("Ada"), "One").unwrap();
        let second = store.add(&id, Some("Ada"), "Two").unwrap();
        let third = store.add(&id, Some("Ada"), "Three").unwrap();
        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }
}
