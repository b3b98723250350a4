//! Article record, drafts, patches and validation.
//!
//! # Responsibility
//! - Define the canonical `Article` shape persisted to the durable mirror.
//! - Provide the draft/patch shapes used by the editor and the store.
//! - Validate required fields with the complete violation list.
//!
//! # Invariants
//! - `Article::id` is immutable once assigned; a patch cannot express an
//!   id change by construction.
//! - `date` is a `YYYY-MM-DD` calendar date on every validated article.

use crate::model::identity::ArticleId;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Default category assigned when no source declares one.
pub const DEFAULT_CATEGORY: &str = "note";
/// Default publishing platform.
pub const DEFAULT_PLATFORM: &str = "Web";
/// Default cover gradient used when no source declares one.
pub const DEFAULT_COVER: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cover artwork reference: either a CSS gradient descriptor or an image.
///
/// Persisted as the raw string; the variant is recovered from the string
/// shape on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Cover {
    /// CSS gradient descriptor, e.g. `linear-gradient(...)`.
    Gradient(String),
    /// Image reference (URL or path).
    Image(String),
}

impl Cover {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gradient(value) | Self::Image(value) => value,
        }
    }
}

impl From<String> for Cover {
    fn from(value: String) -> Self {
        let trimmed = value.trim_start();
        if trimmed.starts_with("linear-gradient(")
            || trimmed.starts_with("radial-gradient(")
            || trimmed.starts_with("conic-gradient(")
        {
            Self::Gradient(value)
        } else {
            Self::Image(value)
        }
    }
}

impl From<Cover> for String {
    fn from(value: Cover) -> Self {
        match value {
            Cover::Gradient(inner) | Cover::Image(inner) => inner,
        }
    }
}

impl Default for Cover {
    fn default() -> Self {
        Self::from(DEFAULT_COVER.to_string())
    }
}

/// Canonical article record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Stable identity; store-origin or file-origin, never reassigned.
    pub id: ArticleId,
    pub title: String,
    pub description: String,
    /// Raw markdown body.
    pub content: String,
    pub category_key: String,
    pub tag: String,
    /// Optional badge label such as "Beta".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Publication date in `YYYY-MM-DD` form.
    pub date: String,
    pub platform: String,
    pub cover: Cover,
}

impl Article {
    /// Combines an allocated identity with draft data into a full record.
    pub fn from_draft(id: ArticleId, draft: ArticleDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            content: draft.content,
            category_key: draft.category_key,
            tag: draft.tag,
            badge: draft.badge,
            date: draft.date,
            platform: draft.platform,
            cover: draft.cover,
        }
    }
}

/// Article data without identity, used for creation and edit buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    pub category_key: String,
    pub tag: String,
    pub badge: Option<String>,
    pub date: String,
    pub platform: String,
    pub cover: Cover,
}

impl Default for ArticleDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            content: String::new(),
            category_key: DEFAULT_CATEGORY.to_string(),
            tag: String::new(),
            badge: None,
            date: today(),
            platform: DEFAULT_PLATFORM.to_string(),
            cover: Cover::default(),
        }
    }
}

impl ArticleDraft {
    /// Validates all required fields and reports every violation.
    ///
    /// Each required field contributes at most one entry; validation never
    /// stops at the first failure so the caller can surface the full list.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(ValidationError::empty("title"));
        }
        if self.description.trim().is_empty() {
            errors.push(ValidationError::empty("description"));
        }
        if self.content.trim().is_empty() {
            errors.push(ValidationError::empty("content"));
        }
        if self.category_key.trim().is_empty() {
            errors.push(ValidationError::empty("category"));
        }
        if self.tag.trim().is_empty() {
            errors.push(ValidationError::empty("tag"));
        }
        if self.date.trim().is_empty() {
            errors.push(ValidationError::empty("date"));
        } else if !is_calendar_date(&self.date) {
            errors.push(ValidationError {
                field: "date",
                message: "must be a calendar date in YYYY-MM-DD form",
            });
        }
        if self.platform.trim().is_empty() {
            errors.push(ValidationError::empty("platform"));
        }
        if self.cover.as_str().trim().is_empty() {
            errors.push(ValidationError::empty("cover"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<Article> for ArticleDraft {
    fn from(article: Article) -> Self {
        Self {
            title: article.title,
            description: article.description,
            content: article.content,
            category_key: article.category_key,
            tag: article.tag,
            badge: article.badge,
            date: article.date,
            platform: article.platform,
            cover: article.cover,
        }
    }
}

/// Partial update applied over an existing article.
///
/// There is deliberately no `id` field: a patch cannot reassign identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub category_key: Option<String>,
    pub tag: Option<String>,
    /// `Some(None)` clears the badge; `None` leaves it untouched.
    pub badge: Option<Option<String>>,
    pub date: Option<String>,
    pub platform: Option<String>,
    pub cover: Option<Cover>,
}

impl ArticlePatch {
    /// Merges this patch over an article in place, preserving its id.
    pub fn apply(self, article: &mut Article) {
        if let Some(title) = self.title {
            article.title = title;
        }
        if let Some(description) = self.description {
            article.description = description;
        }
        if let Some(content) = self.content {
            article.content = content;
        }
        if let Some(category_key) = self.category_key {
            article.category_key = category_key;
        }
        if let Some(tag) = self.tag {
            article.tag = tag;
        }
        if let Some(badge) = self.badge {
            article.badge = badge;
        }
        if let Some(date) = self.date {
            article.date = date;
        }
        if let Some(platform) = self.platform {
            article.platform = platform;
        }
        if let Some(cover) = self.cover {
            article.cover = cover;
        }
    }
}

impl From<ArticleDraft> for ArticlePatch {
    /// Full-replacement patch carrying every draft field, badge included.
    fn from(draft: ArticleDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            content: Some(draft.content),
            category_key: Some(draft.category_key),
            tag: Some(draft.tag),
            badge: Some(draft.badge),
            date: Some(draft.date),
            platform: Some(draft.platform),
            cover: Some(draft.cover),
        }
    }
}

/// Transient editing shape consumed by submit and publish flows.
///
/// Carries identity only in edit mode; a fresh article has `id: None` until
/// the store allocates one or the publish flow derives a file-origin id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub id: Option<ArticleId>,
    pub draft: ArticleDraft,
}

impl EditBuffer {
    /// Loads an existing article into an edit buffer.
    pub fn from_article(article: Article) -> Self {
        Self {
            id: Some(article.id.clone()),
            draft: ArticleDraft::from(article),
        }
    }
}

/// One violated required field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn empty(field: &'static str) -> Self {
        Self {
            field,
            message: "must not be empty",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "field `{}` {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Returns whether `value` parses as a `YYYY-MM-DD` calendar date.
pub fn is_calendar_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).is_ok()
}

/// Returns today's date in `YYYY-MM-DD` form.
pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}
