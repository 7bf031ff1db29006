//! Crawl subcommands

use std::path::PathBuf;
use std::time::Duration;

use kkucrawl_core::SharedProgress;
use kkucrawl_wiki::WikiConfig;

pub mod categories;
pub mod word_list;
pub mod words;

/// Effective run settings after merging config file and CLI overrides.
pub struct RunContext {
    pub wiki: WikiConfig,
    pub max_retry: u32,
    pub backoff: Duration,
    pub save_every: u32,
    pub out_dir: PathBuf,
    pub progress: SharedProgress,
}

impl RunContext {
    /// Input file for a run: `<out_dir>/<name>.targets` unless overridden.
    pub fn targets_path(&self, name: &str, explicit: Option<&PathBuf>) -> PathBuf {
        match explicit {
            Some(path) => path.clone(),
            None => self.out_dir.join(format!("{name}.targets")),
        }
    }

    /// Output artifact path: `<out_dir>/<name><suffix>`.
    pub fn artifact_path(&self, name: &str, suffix: &str) -> PathBuf {
        self.out_dir.join(format!("{name}{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn ctx() -> RunContext {
        RunContext {
            wiki: WikiConfig::default(),
            max_retry: 10,
            backoff: Duration::from_secs(3),
            save_every: 5,
            out_dir: PathBuf::from("/data"),
            progress: Arc::new(kkucrawl_core::ProgressContext::new()),
        }
    }

    #[test]
    fn targets_path_derived_from_name() {
        assert_eq!(
            ctx().targets_path("words", None),
            PathBuf::from("/data/words.targets")
        );
    }

    #[test]
    fn targets_path_explicit_override() {
        let explicit = PathBuf::from("/tmp/custom.targets");
        assert_eq!(ctx().targets_path("words", Some(&explicit)), explicit);
    }

    #[test]
    fn artifact_paths_use_suffix_convention() {
        let ctx = ctx();
        assert_eq!(
            ctx.artifact_path("word-list", ".words.json"),
            PathBuf::from("/data/word-list.words.json")
        );
        assert_eq!(
            ctx.artifact_path("word-list", ".nodes.json"),
            PathBuf::from("/data/word-list.nodes.json")
        );
    }
}
