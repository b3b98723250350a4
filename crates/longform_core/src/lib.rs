//! Core domain logic for longform, an article authoring system.
//! This crate is the single source of truth for article identity, storage
//! and publish semantics.

pub mod capability;
pub mod db;
pub mod frontmatter;
pub mod logging;
pub mod model;
pub mod outline;
pub mod repo;
pub mod scan;
pub mod service;

pub use capability::{
    Acquisition, CapabilityCache, CapabilityHost, DirectoryCapability, FsCapabilityHost,
    WriteCapability,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::article::{
    Article, ArticleDraft, ArticlePatch, Cover, EditBuffer, ValidationError,
};
pub use model::identity::ArticleId;
pub use repo::article_store::{ArticleStore, StoreError, StoreResult, ARTICLES_SLOT};
pub use repo::comment_store::{Comment, CommentStore, ANONYMOUS_AUTHOR, COMMENTS_SLOT};
pub use repo::slot_store::{MemorySlotStore, SlotError, SlotResult, SlotStore, SqliteSlotStore};
pub use service::article_service::{ArticleService, SubmitError};
pub use service::publish_service::{PublishError, PublishOutcome, Publisher};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
