//! Article editing use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points over the article store.
//! - Implement editor submit semantics: validate, then create or update
//!   depending on whether the buffer carries an identity.
//!
//! # Invariants
//! - Submit never performs a partial write; a failed validation leaves the
//!   store untouched.
//! - String ids parse leniently, so an unknown or non-numeric id surfaces
//!   as `NotFound` rather than a parse error.

use crate::model::article::{Article, ArticleDraft, ArticlePatch, EditBuffer, ValidationError};
use crate::model::identity::ArticleId;
use crate::repo::article_store::{ArticleStore, StoreError, StoreResult};
use crate::repo::slot_store::SlotStore;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Editor submit error.
#[derive(Debug)]
pub enum SubmitError {
    /// One entry per violated required field; nothing was written.
    Validation(Vec<ValidationError>),
    Store(StoreError),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => {
                write!(f, "validation failed for {} field(s)", errors.len())
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for SubmitError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case facade over the article store.
pub struct ArticleService<S: SlotStore> {
    store: ArticleStore<S>,
}

impl<S: SlotStore> ArticleService<S> {
    pub fn new(store: ArticleStore<S>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> &[Article] {
        self.store.list()
    }

    pub fn get(&self, id: &ArticleId) -> Option<&Article> {
        self.store.get_by_id(id)
    }

    /// Looks an article up by its string identity.
    pub fn get_by_str(&self, id: &str) -> Option<&Article> {
        self.store.get_by_id(&ArticleId::parse(id))
    }

    pub fn create(&mut self, draft: ArticleDraft) -> Article {
        self.store.create(draft)
    }

    pub fn update(&mut self, id: &ArticleId, patch: ArticlePatch) -> StoreResult<Article> {
        self.store.update(id, patch)
    }

    /// Updates by string identity, with lenient parsing.
    pub fn update_by_str(&mut self, id: &str, patch: ArticlePatch) -> StoreResult<Article> {
        self.store.update(&ArticleId::parse(id), patch)
    }

    pub fn delete(&mut self, id: &ArticleId) -> bool {
        self.store.delete(id)
    }

    /// Resynchronizes the in-memory collection from the durable mirror.
    pub fn reload(&mut self) {
        self.store.reload();
    }

    /// Submits an edit buffer: create when it has no identity, full-field
    /// update when it does.
    pub fn submit(&mut self, buffer: &EditBuffer) -> Result<Article, SubmitError> {
        if let Err(errors) = buffer.draft.validate() {
            return Err(SubmitError::Validation(errors));
        }

        match &buffer.id {
            Some(id) => Ok(self
                .store
                .update(id, ArticlePatch::from(buffer.draft.clone()))?),
            None => Ok(self.store.create(buffer.draft.clone())),
        }
    }
}
