//! Persistence layer: named durable slots and the stores built on them.
//!
//! # Responsibility
//! - Define the slot-storage contract and its SQLite/in-memory backends.
//! - Own the in-memory article collection, its comment threads and their
//!   write-through mirrors.
//!
//! # Invariants
//! - Slot writes replace the whole payload; there are no partial updates.
//! - Mirror failures never crash the store; in-memory state stays
//!   authoritative for the rest of the session.

pub mod article_store;
pub mod comment_store;
pub mod slot_store;
