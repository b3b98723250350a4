//! Stable article identity.
//!
//! # Responsibility
//! - Define the two-origin identity space for articles.
//! - Derive deterministic content-name hashes for file-origin sources.
//!
//! # Invariants
//! - An `ArticleId` is immutable once assigned to an article.
//! - `derive` depends only on the source name, never on the body, so a
//!   rename changes identity and an edit does not.
//! - Store-origin ids are plain sequential integers; file-origin ids carry
//!   the `md-` namespace prefix, so the two populations cannot collide.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const FILE_ID_PREFIX: &str = "md-";
const SOURCE_SUFFIX: &str = ".md";

/// Stable identifier for one article.
///
/// Store-origin articles use sequential numeric identities allocated by the
/// store; file-origin articles use a hash of their source file name. The
/// variants are kept as an explicit sum type so callers pattern-match on
/// origin instead of sniffing string prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArticleId {
    /// Sequential store-origin identity.
    Store(u64),
    /// Hash-derived file-origin identity, `md-` prefixed.
    File(String),
}

impl ArticleId {
    /// Derives the stable file-origin identity for a source name.
    ///
    /// The name is normalized by stripping one `.md` suffix, folded through
    /// a rolling shift-and-subtract hash over its UTF-16 code units with
    /// 32-bit wrapping truncation, then rendered in base 36. The result is
    /// deterministic within and across processes; an empty name yields the
    /// degenerate `md-0`.
    pub fn derive(source_name: &str) -> Self {
        let stem = source_name
            .strip_suffix(SOURCE_SUFFIX)
            .unwrap_or(source_name);

        let mut hash: i32 = 0;
        for unit in stem.encode_utf16() {
            hash = hash
                .wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit));
        }

        Self::File(format!("{FILE_ID_PREFIX}{}", to_base36(hash.unsigned_abs())))
    }

    /// Parses an identity from its string form.
    ///
    /// Lenient by design: all-digit input becomes a store identity, anything
    /// else a file identity. Lookups against the store then surface unknown
    /// strings as not-found instead of parse errors.
    pub fn parse(value: &str) -> Self {
        Self::from(value.to_string())
    }

    /// Returns whether this is a store-origin (mutable) identity.
    pub fn is_store_origin(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl Display for ArticleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(value) => write!(f, "{value}"),
            Self::File(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for ArticleId {
    fn from(value: String) -> Self {
        match value.parse::<u64>() {
            Ok(numeric) => Self::Store(numeric),
            Err(_) => Self::File(value),
        }
    }
}

impl From<ArticleId> for String {
    fn from(value: ArticleId) -> Self {
        value.to_string()
    }
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut reversed = String::new();
    while value > 0 {
        reversed.push(char::from(DIGITS[(value % 36) as usize]));
        value /= 36;
    }
    reversed.chars().rev().collect()
}
