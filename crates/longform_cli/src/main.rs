//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `longform_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use longform_core::{ArticleStore, MemorySlotStore};

fn main() {
    println!("longform_core version={}", longform_core::core_version());

    // A throwaway in-memory backend is enough to prove store wiring and
    // show the seeded default set.
    let store = ArticleStore::open(MemorySlotStore::new());
    println!("seeded articles={}", store.list().len());
    for article in store.list() {
        println!("[{}] {} ({})", article.id, article.title, article.date);
    }
}
