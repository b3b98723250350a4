//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, cache and host calls into use-case level APIs.
//! - Keep UI embeddings decoupled from storage and capability details.

pub mod article_service;
pub mod publish_service;
