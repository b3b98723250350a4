//! Front-matter resolution and serialization for markdown sources.
//!
//! # Responsibility
//! - Split raw source text into a typed metadata block and a body.
//! - Resolve every article field through front-matter, then the file name,
//!   then system defaults.
//! - Serialize an article back into front-matter plus body (the exporter
//!   used by the publish flow).
//!
//! # Invariants
//! - Parsing is a pure transform; malformed blocks degrade to "no metadata"
//!   with the whole input treated as body, never an error.
//! - `resolve` followed by `serialize` reproduces every explicitly set
//!   field; omitted fields are filled with the documented defaults.

use crate::model::article::{
    is_calendar_date, today, Article, Cover, DEFAULT_CATEGORY, DEFAULT_PLATFORM,
};
use crate::model::identity::ArticleId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Upper bound on a derived description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 100;

const BLOCK_DELIMITER: &str = "---";
const SOURCE_SUFFIX: &str = ".md";

static FILE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})[-_ ]*(.*)$").expect("valid file date regex")
});
static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Typed front-matter parse result.
///
/// Recognized keys land in typed fields; `date` is kept only when it parses
/// as a calendar date, `cover` is classified into its variant. Unrecognized
/// keys are retained opaquely and ignored by resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_key: Option<String>,
    pub tag: Option<String>,
    pub badge: Option<String>,
    pub date: Option<String>,
    pub platform: Option<String>,
    pub cover: Option<Cover>,
    /// Keys this resolver does not know, kept as declared.
    pub extra: BTreeMap<String, String>,
}

/// Date and title tokens inferable from a source file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileNameInfo {
    pub date: Option<String>,
    pub title: Option<String>,
}

impl FileNameInfo {
    /// Extracts a leading `YYYY-MM-DD` token and the residual title from a
    /// file name such as `2025-06-01-first-post.md`.
    pub fn extract(file_name: &str) -> Self {
        let stem = file_name
            .strip_suffix(SOURCE_SUFFIX)
            .unwrap_or(file_name);

        if let Some(captures) = FILE_DATE_RE.captures(stem) {
            let date = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .filter(|value| is_calendar_date(value));
            if date.is_some() {
                let title = captures
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|value| !value.is_empty());
                return Self { date, title };
            }
        }

        Self {
            date: None,
            title: Some(stem.to_string()).filter(|value| !value.is_empty()),
        }
    }
}

/// Splits raw source text into front-matter and body.
///
/// The block must open on the first line with `---` and close with a later
/// `---` line; anything else degrades to empty front-matter with the whole
/// input as body. Unparsable lines inside a well-formed block are skipped.
pub fn parse(raw: &str) -> (FrontMatter, String) {
    let lines: Vec<&str> = raw.lines().collect();

    let opens = lines
        .first()
        .map(|line| line.trim_end() == BLOCK_DELIMITER)
        .unwrap_or(false);
    if !opens {
        return (FrontMatter::default(), raw.to_string());
    }

    let Some(close) = lines
        .iter()
        .skip(1)
        .position(|line| line.trim_end() == BLOCK_DELIMITER)
        .map(|offset| offset + 1)
    else {
        return (FrontMatter::default(), raw.to_string());
    };

    let mut matter = FrontMatter::default();
    for line in &lines[1..close] {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            continue;
        }

        match key {
            "title" => matter.title = non_empty(value),
            "description" => matter.description = non_empty(value),
            "categoryKey" => matter.category_key = non_empty(value),
            "tag" => matter.tag = non_empty(value),
            "badge" => matter.badge = non_empty(value),
            "date" => matter.date = non_empty(value).filter(|date| is_calendar_date(date)),
            "platform" => matter.platform = non_empty(value),
            "cover" => matter.cover = non_empty(value).map(Cover::from),
            other => {
                matter.extra.insert(other.to_string(), value.to_string());
            }
        }
    }

    let body = lines[close + 1..].join("\n");
    (matter, body)
}

/// Resolves a raw markdown source into a file-origin article.
///
/// Per-field resolution order: front-matter value, then a value inferable
/// from the file name, then the system default. The identity is derived
/// from the file name alone.
pub fn resolve(file_name: &str, raw: &str) -> Article {
    let (matter, body) = parse(raw);
    let info = FileNameInfo::extract(file_name);
    let stem = file_name
        .strip_suffix(SOURCE_SUFFIX)
        .unwrap_or(file_name)
        .to_string();

    let description = matter
        .description
        .or_else(|| derive_description(&body))
        .unwrap_or_default();

    Article {
        id: ArticleId::derive(file_name),
        title: matter.title.or(info.title).unwrap_or(stem),
        description,
        content: body.trim().to_string(),
        category_key: matter.category_key.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        tag: matter.tag.unwrap_or_default(),
        badge: matter.badge,
        date: matter.date.or(info.date).unwrap_or_else(today),
        platform: matter.platform.unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
        cover: matter.cover.unwrap_or_default(),
    }
}

/// Serializes an article into front-matter plus body.
///
/// The inverse of `resolve` for every explicitly set field; `badge` is
/// emitted only when present. The article id is not part of the text, it
/// is always re-derived from the destination file name.
pub fn serialize(article: &Article) -> String {
    let mut out = String::new();
    out.push_str(BLOCK_DELIMITER);
    out.push('\n');
    let _ = writeln!(out, "title: {}", article.title);
    let _ = writeln!(out, "description: {}", article.description);
    let _ = writeln!(out, "categoryKey: {}", article.category_key);
    let _ = writeln!(out, "tag: {}", article.tag);
    if let Some(badge) = &article.badge {
        let _ = writeln!(out, "badge: {badge}");
    }
    let _ = writeln!(out, "date: {}", article.date);
    let _ = writeln!(out, "platform: {}", article.platform);
    let _ = writeln!(out, "cover: {}", article.cover.as_str());
    out.push_str(BLOCK_DELIMITER);
    out.push_str("\n\n");
    out.push_str(&article.content);
    if !article.content.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Derives a description from the first meaningful body paragraph.
///
/// Headings, blank lines and code fences are skipped; the paragraph is
/// stripped of markdown symbols, whitespace-normalized and capped at
/// `DESCRIPTION_MAX_CHARS` characters.
pub fn derive_description(body: &str) -> Option<String> {
    let mut in_fence = false;
    let mut paragraph: Vec<&str> = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.is_empty() {
            if paragraph.is_empty() {
                continue;
            }
            break;
        }
        if trimmed.starts_with('#') {
            if paragraph.is_empty() {
                continue;
            }
            break;
        }
        paragraph.push(trimmed);
    }

    if paragraph.is_empty() {
        return None;
    }

    let joined = paragraph.join(" ");
    let without_images = MARKDOWN_IMAGE_RE.replace_all(&joined, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(DESCRIPTION_MAX_CHARS).collect())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
