//! Domain model for long-form articles.
//!
//! # Responsibility
//! - Define the canonical article record shared by store and file origins.
//! - Keep identity derivation and field validation next to the data.
//!
//! # Invariants
//! - Every article is identified by a stable `ArticleId`.
//! - Store-origin and file-origin identities never share an id space.

pub mod article;
pub mod identity;
