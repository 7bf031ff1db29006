//! kkucrawl wiki - MediaWiki query client and wikitext extractors
//!
//! Paginated categorymembers walking, action=parse wikitext fetch, and the
//! 단어 template / word-list table extractors.

pub mod client;
pub mod record;
pub mod table;
pub mod template;

// Re-exports for convenience
pub use client::{CategoryMembers, WikiConfig, category_members, fetch_wikitext};
pub use record::{Extraction, Injeong, WordFields, WordListPage, WordRow};
pub use table::{TableSpec, extract_word_tables, strip_brackets};
pub use template::{TemplateSpec, extract_word_template};
