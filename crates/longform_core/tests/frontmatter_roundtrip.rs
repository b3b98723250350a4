use longform_core::frontmatter::{resolve, serialize};
use longform_core::model::article::{
    today, Article, Cover, DEFAULT_CATEGORY, DEFAULT_PLATFORM,
};
use longform_core::ArticleId;

fn full_article(file_name: &str) -> Article {
    Article {
        id: ArticleId::derive(file_name),
        title: "A complete article".to_string(),
        description: "Hand-written description.".to_string(),
        content: "# Intro\n\nFirst paragraph of the body.\n\nMore text.".to_string(),
        category_key: "product".to_string(),
        tag: "Design".to_string(),
        badge: Some("Beta".to_string()),
        date: "2025-06-01".to_string(),
        platform: "Web".to_string(),
        cover: Cover::Gradient("linear-gradient(90deg, #000 0%, #fff 100%)".to_string()),
    }
}

#[test]
fn serialize_then_resolve_reproduces_every_explicit_field() {
    let file_name = "2025-06-01-a-complete-article.md";
    let original = full_article(file_name);

    let text = serialize(&original);
    let restored = resolve(file_name, &text);

    assert_eq!(restored, original);
}

#[test]
fn serialize_omits_the_badge_when_absent_and_round_trips() {
    let file_name = "badgeless.md";
    let original = Article {
        badge: None,
        ..full_article(file_name)
    };

    let text = serialize(&original);
    assert!(!text.contains("badge:"));

    let restored = resolve(file_name, &text);
    assert_eq!(restored.badge, None);
    assert_eq!(restored, Article { id: ArticleId::derive(file_name), ..original });
}

#[test]
fn omitted_fields_are_filled_with_documented_defaults_not_left_absent() {
    let raw = "# Only a body\n\nOpening paragraph for the description.";
    let article = resolve("2025-03-05-spring-notes.md", raw);

    assert_eq!(article.id, ArticleId::derive("2025-03-05-spring-notes.md"));
    assert_eq!(article.title, "spring-notes");
    assert_eq!(article.date, "2025-03-05");
    assert_eq!(article.category_key, DEFAULT_CATEGORY);
    assert_eq!(article.platform, DEFAULT_PLATFORM);
    assert!(matches!(article.cover, Cover::Gradient(_)));
    assert!(article
        .description
        .starts_with("Opening paragraph for the description."));
}

#[test]
fn front_matter_values_win_over_filename_tokens() {
    let raw = "---\ntitle: Declared title\ndate: 2024-01-01\n---\nBody.";
    let article = resolve("2025-03-05-ignored-name.md", raw);

    assert_eq!(article.title, "Declared title");
    assert_eq!(article.date, "2024-01-01");
}

#[test]
fn a_dateless_source_defaults_to_today() {
    let article = resolve("undated-notes.md", "Body only.");
    assert_eq!(article.title, "undated-notes");
    assert_eq!(article.date, today());
}

#[test]
fn a_malformed_block_degrades_to_body_only() {
    let raw = "---\ntitle: Never closed\n\nStill just body text.";
    let article = resolve("broken.md", raw);

    assert_eq!(article.title, "broken");
    assert_eq!(article.content, raw);
}

#[test]
fn identity_is_stable_and_independent_of_content() {
    let a = resolve("stable.md", "First version.");
    let b = resolve("stable.md", "# Completely different\n\nSecond version.");
    assert_eq!(a.id, b.id);

    let renamed = resolve("stable-renamed.md", "First version.");
    assert_ne!(renamed.id, a.id);
}
