//! Source-directory scan for file-origin articles.
//!
//! # Responsibility
//! - Discover `*.md` sources in a directory and resolve each into a
//!   file-origin article.
//! - Sort results by date, newest first.
//!
//! # Invariants
//! - A failure to load one source is logged and that source skipped; the
//!   scan itself never aborts.
//! - File-origin articles are synthesized afresh on every scan, never
//!   stored or mutated in place.

use crate::frontmatter;
use crate::model::article::Article;
use chrono::NaiveDate;
use log::{error, info, warn};
use std::fs;
use std::path::Path;

/// Scans `dir` for markdown sources and resolves them into articles,
/// sorted by date descending (stable for equal dates).
pub fn scan_articles(dir: &Path) -> Vec<Article> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            error!(
                "event=scan module=scan status=error dir={} error={err}",
                dir.display()
            );
            return Vec::new();
        }
    };

    let mut articles = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("event=scan_skip module=scan status=error error={err}");
                continue;
            }
        };

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            continue;
        }
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };

        match fs::read_to_string(&path) {
            Ok(raw) => articles.push(frontmatter::resolve(&file_name, &raw)),
            Err(err) => {
                warn!("event=scan_skip module=scan status=error file={file_name} error={err}");
            }
        }
    }

    articles.sort_by(|a, b| date_key(&b.date).cmp(&date_key(&a.date)));
    info!(
        "event=scan module=scan status=ok dir={} count={}",
        dir.display(),
        articles.len()
    );
    articles
}

fn date_key(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
}
