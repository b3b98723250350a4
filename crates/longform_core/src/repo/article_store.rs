//! Article store with a write-through durable mirror.
//!
//! # Responsibility
//! - Own the in-memory store-origin article collection.
//! - Mirror every mutation wholesale into the `articles` slot.
//! - Seed the fixed default set on first ever load.
//!
//! # Invariants
//! - Store-origin ids are allocated as current maximum + 1, starting at 1.
//! - `update` preserves the existing id no matter what the patch carries.
//! - After construction the mirror never observes an empty collection.
//! - Mirror failures are logged, never propagated; in-memory state is the
//!   source of truth for the rest of the session.

use crate::model::article::{Article, ArticleDraft, ArticlePatch, Cover};
use crate::model::identity::ArticleId;
use crate::repo::slot_store::SlotStore;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Durable slot holding the serialized article array.
pub const ARTICLES_SLOT: &str = "articles";

pub type StoreResult<T> = Result<T, StoreError>;

/// Semantic store error. Delete is deliberately non-throwing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(ArticleId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "article not found: {id}"),
        }
    }
}

impl Error for StoreError {}

/// In-memory article collection mirrored to a durable slot.
pub struct ArticleStore<S: SlotStore> {
    slots: S,
    articles: Vec<Article>,
}

impl<S: SlotStore> ArticleStore<S> {
    /// Opens the store, loading the mirror or seeding the default set.
    ///
    /// An empty, unreadable or corrupt mirror yields the fixed seed
    /// articles, which are persisted immediately so the mirror never holds
    /// a transient empty state.
    pub fn open(slots: S) -> Self {
        let mut store = Self {
            slots,
            articles: Vec::new(),
        };
        store.reload();
        store
    }

    /// Discards the in-memory collection and re-reads the mirror.
    ///
    /// Used to resynchronize after out-of-band changes to the slot.
    pub fn reload(&mut self) {
        match self.load_mirror() {
            Some(articles) => {
                info!(
                    "event=store_load module=store status=ok count={}",
                    articles.len()
                );
                self.articles = articles;
            }
            None => {
                self.articles = seed_articles();
                self.persist();
                info!(
                    "event=store_seed module=store status=ok count={}",
                    self.articles.len()
                );
            }
        }
    }

    /// Returns the current collection in insertion order.
    pub fn list(&self) -> &[Article] {
        &self.articles
    }

    pub fn get_by_id(&self, id: &ArticleId) -> Option<&Article> {
        self.articles.iter().find(|article| &article.id == id)
    }

    /// Creates a new store-origin article with the next sequential id.
    ///
    /// Mirror write failure is logged and does not roll back the creation.
    pub fn create(&mut self, draft: ArticleDraft) -> Article {
        let next_id = self
            .articles
            .iter()
            .filter_map(|article| match &article.id {
                ArticleId::Store(value) => Some(*value),
                ArticleId::File(_) => None,
            })
            .max()
            .map_or(1, |max| max + 1);

        let article = Article::from_draft(ArticleId::Store(next_id), draft);
        self.articles.push(article.clone());
        self.persist();
        info!("event=article_create module=store status=ok id={next_id}");
        article
    }

    /// Merges `patch` over the article with `id`, preserving its identity.
    ///
    /// File-origin ids are never present in the store and report
    /// `NotFound`; they are re-synthesized from their sources on every scan
    /// and written back through the publish flow instead.
    pub fn update(&mut self, id: &ArticleId, patch: ArticlePatch) -> StoreResult<Article> {
        if !id.is_store_origin() {
            return Err(StoreError::NotFound(id.clone()));
        }

        let index = self
            .articles
            .iter()
            .position(|article| &article.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        patch.apply(&mut self.articles[index]);
        self.persist();
        info!("event=article_update module=store status=ok id={id}");
        Ok(self.articles[index].clone())
    }

    /// Removes the article if present and reports whether a removal
    /// occurred. Missing ids are not an error.
    pub fn delete(&mut self, id: &ArticleId) -> bool {
        let Some(index) = self.articles.iter().position(|article| &article.id == id) else {
            return false;
        };

        self.articles.remove(index);
        self.persist();
        info!("event=article_delete module=store status=ok id={id}");
        true
    }

    fn load_mirror(&self) -> Option<Vec<Article>> {
        let body = match self.slots.read_slot(ARTICLES_SLOT) {
            Ok(Some(body)) => body,
            Ok(None) => return None,
            Err(err) => {
                error!("event=mirror_read module=store status=error error={err}");
                return None;
            }
        };

        match serde_json::from_str::<Vec<Article>>(&body) {
            Ok(articles) if !articles.is_empty() => Some(articles),
            Ok(_) => None,
            Err(err) => {
                warn!("event=mirror_parse module=store status=error error={err}");
                None
            }
        }
    }

    fn persist(&mut self) {
        let body = match serde_json::to_string(&self.articles) {
            Ok(body) => body,
            Err(err) => {
                error!("event=mirror_serialize module=store status=error error={err}");
                return;
            }
        };

        if let Err(err) = self.slots.write_slot(ARTICLES_SLOT, &body) {
            error!("event=mirror_write module=store status=error error={err}");
        }
    }
}

/// Fixed default article set used to seed an empty store.
pub fn seed_articles() -> Vec<Article> {
    vec![
        Article {
            id: ArticleId::Store(1),
            title: "Markdown to visual cards: a lighter design workflow".to_string(),
            description: "A lightweight card design tool that turns plain markdown into \
                          shareable visuals without any design background."
                .to_string(),
            content: "# Background\nOne-click conversion from markdown to visual cards.\n\n\
                      ## Highlights\n- Multiple templates and theme colors\n\
                      - Automatic layout and grids for posts and summaries\n\
                      - High-resolution export in several sizes\n\n\
                      ## Roadmap\n- Custom templates and brand colors\n\
                      - Draft polishing and translation\n- One-click publishing"
                .to_string(),
            category_key: "product".to_string(),
            tag: "Design".to_string(),
            badge: Some("Beta".to_string()),
            date: "2025-12-12".to_string(),
            platform: "Web".to_string(),
            cover: Cover::Gradient(
                "linear-gradient(135deg, #0a0f26 0%, #0c1a4d 35%, #032c5f 65%, #0c1a4d 100%)"
                    .to_string(),
            ),
        },
        Article {
            id: ArticleId::Store(2),
            title: "The site is live: notes from building the first version".to_string(),
            description: "First release notes: information architecture, reading experience, \
                          and what comes next."
                .to_string(),
            content: "# Launch notes\nThe first version focuses on navigation, the article \
                      list and dark mode.\n\n## Shipped\n- Article list and detail pages\n\
                      - Language switching\n- Light and dark themes\n\n## Next\n\
                      - A portfolio section\n- Comments and subscriptions\n- A build log"
                .to_string(),
            category_key: "product".to_string(),
            tag: "Meta".to_string(),
            badge: Some("1.0".to_string()),
            date: "2025-12-11".to_string(),
            platform: "Web".to_string(),
            cover: Cover::Gradient(
                "linear-gradient(135deg, #0d121f 0%, #132642 50%, #243c5a 100%)".to_string(),
            ),
        },
        Article {
            id: ArticleId::Store(3),
            title: "Field notes: fragments and collected ideas".to_string(),
            description: "Loose notes on making things: recent ideas, half-formed thoughts \
                          and an ever-growing to-do list."
                .to_string(),
            content: "# Preface\nA loose notebook of fragments and travel thoughts.\n\n\
                      ## Currently writing\n- Idea collection: scattered thoughts and material\n\
                      - Travel notes: routes and places worth a detour\n\
                      - Small experiments worth trying\n\n## Plans\n\
                      - Split into themed series\n- Add photos and maps\n- Finer tags"
                .to_string(),
            category_key: "note".to_string(),
            tag: "Notes".to_string(),
            badge: None,
            date: "2025-11-28".to_string(),
            platform: "Web".to_string(),
            cover: Cover::Gradient(
                "linear-gradient(135deg, #101820 0%, #1f1f2f 50%, #2c2c3b 100%)".to_string(),
            ),
        },
    ]
}
