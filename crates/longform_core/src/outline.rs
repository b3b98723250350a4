//! Heading outline extraction and anchor slugs.
//!
//! # Responsibility
//! - Provide the table-of-contents shape shared with the rendering layer.
//! - Slugify heading text into anchor ids, disambiguating repeats with a
//!   numeric suffix per unique slug within one pass.
//!
//! HTML rendering itself lives outside this crate; only the outline
//! contract and anchor allocation are owned here.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static SLUG_STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid slug strip regex"));
static SLUG_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid space regex"));

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Anchor id, unique within one extraction pass.
    pub anchor_id: String,
    /// Raw heading text.
    pub text: String,
    /// Heading level, 1 through 6.
    pub level: u8,
}

/// Converts text into a URL-friendly slug.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = SLUG_STRIP_RE.replace_all(lowered.trim(), "");
    SLUG_SPACE_RE.replace_all(stripped.trim(), "-").into_owned()
}

/// Allocates unique anchor ids within one render/extraction pass.
///
/// The first occurrence of a slug is used verbatim; repeats get a numeric
/// suffix (`slug`, `slug-1`, `slug-2`, ...).
#[derive(Debug, Default)]
pub struct SlugAllocator {
    counts: HashMap<String, u32>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.counts.entry(base.clone()).or_insert(0);
        let anchor = if *count == 0 {
            base.clone()
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        anchor
    }
}

/// Extracts the ATX-heading outline of a markdown body.
///
/// Headings inside fenced code blocks are ignored.
pub fn extract_outline(content: &str) -> Vec<TocEntry> {
    let mut allocator = SlugAllocator::new();
    let mut entries = Vec::new();
    let mut in_fence = false;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let level = trimmed.chars().take_while(|ch| *ch == '#').count();
        if level == 0 || level > 6 {
            continue;
        }
        let rest = &trimmed[level..];
        if !rest.starts_with(' ') && !rest.is_empty() {
            continue;
        }

        let text = rest.trim().trim_end_matches('#').trim_end().to_string();
        entries.push(TocEntry {
            anchor_id: allocator.allocate(&text),
            text,
            level: level as u8,
        });
    }

    entries
}
