//! Integration tests for kkucrawl-wiki
//!
//! These tests require network access and are marked #[ignore] by default.
//! Run with: cargo test -p kkucrawl-wiki --test integration -- --ignored

use kkucrawl_wiki::{WikiConfig, category_members, fetch_wikitext};

/// Walk one live category and check the payload shape.
/// Run with: cargo test -p kkucrawl-wiki --test integration -- --ignored live_category_walk
#[test]
#[ignore]
fn live_category_walk() {
    let mut cfg = WikiConfig::default();
    cfg.max_pages = 3;

    let mut payloads = 0;
    for payload in category_members(&cfg, "분류:단어") {
        let payload = match payload {
            Ok(p) => p,
            // hitting the page cap is fine on a large category
            Err(kkucrawl_core::CrawlError::Extract(_)) => break,
            Err(e) => panic!("pagination failed: {e}"),
        };
        assert!(
            payload.get("categorymembers").is_some(),
            "query payload without categorymembers: {payload}"
        );
        payloads += 1;
    }
    assert!(payloads >= 1, "expected at least one query payload");
}

/// Fetch one live page's wikitext.
#[test]
#[ignore]
fn live_wikitext_fetch() {
    let cfg = WikiConfig::default();
    let text = fetch_wikitext(&cfg, "대문").expect("parse fetch should succeed");
    assert!(!text.is_empty());
}
