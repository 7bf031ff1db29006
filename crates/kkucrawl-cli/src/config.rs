//! Configuration loading from TOML files

use std::path::PathBuf;

use anyhow::{Context, Result};
use kkucrawl_wiki::WikiConfig;
use serde::Deserialize;

/// Global configuration for kkucrawl
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub wiki: WikiSection,
    pub crawl: CrawlSection,
    pub output: OutputSection,
    pub categories: CategoriesSection,
    pub words: WordsSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikiSection {
    pub endpoint: String,
    pub page_limit: u32,
    pub max_pages: u32,
}

impl Default for WikiSection {
    fn default() -> Self {
        let wiki = WikiConfig::default();
        Self {
            endpoint: wiki.endpoint,
            page_limit: wiki.page_limit,
            max_pages: wiki.max_pages,
        }
    }
}

impl WikiSection {
    pub fn to_wiki_config(&self) -> WikiConfig {
        WikiConfig {
            endpoint: self.endpoint.clone(),
            page_limit: self.page_limit,
            max_pages: self.max_pages,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CrawlSection {
    /// Total attempts per target before giving up
    pub max_retry: u32,
    /// Fixed delay between attempts, in seconds
    pub backoff_secs: u64,
    /// Checkpoint flush every N targets processed
    pub save_every: u32,
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            max_retry: 10,
            backoff_secs: 3,
            save_every: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub default_dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            default_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategoriesSection {
    /// Member titles starting with any of these prefixes are dropped
    /// (template and category namespace pages)
    pub title_blacklist: Vec<String>,
}

impl Default for CategoriesSection {
    fn default() -> Self {
        Self {
            title_blacklist: vec!["틀:".to_string(), "분류:".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WordsSection {
    /// Template parameters dropped from word records
    pub param_blacklist: Vec<String>,
}

impl Default for WordsSection {
    fn default() -> Self {
        Self {
            param_blacklist: kkucrawl_wiki::TemplateSpec::default().blacklist,
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./kkucrawl.toml (current directory)
    /// 2. ~/.config/kkucrawl/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("kkucrawl.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "kkucrawl") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
