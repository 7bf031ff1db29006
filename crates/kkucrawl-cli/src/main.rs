//! kkucrawl - KkukoWiki crawl pipelines
//!
//! Pulls category membership lists, 단어 template records, and tabular word
//! lists from a MediaWiki wiki and writes checkpointed JSON snapshots.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use cmd::RunContext;
use config::Config;

#[derive(Parser)]
#[command(name = "kkucrawl")]
#[command(about = "KkukoWiki crawler: categories, word templates, word-list tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./kkucrawl.toml or ~/.config/kkucrawl/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Wiki api.php endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Total attempts per target before giving up
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Fixed backoff between attempts, in seconds
    #[arg(long, global = true)]
    backoff_secs: Option<u64>,

    /// Checkpoint flush every N targets
    #[arg(long, global = true)]
    save_every: Option<u32>,

    /// Output directory
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List category members into a titles array
    Categories(cmd::categories::CategoriesArgs),
    /// Crawl 단어 template fields per page
    Words(cmd::words::WordsArgs),
    /// Crawl tabular word-list pages
    WordList(cmd::word_list::WordListArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(kkucrawl_core::ProgressContext::new());

    // TTY: route log lines through the progress bars; non-TTY: plain lines
    let multi = if progress.is_tty() {
        Some(progress.multi())
    } else {
        None
    };
    kkucrawl_core::init_logging(cli.debug, multi);

    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Config file defaults, CLI overrides
    let mut wiki = config.wiki.to_wiki_config();
    if let Some(endpoint) = cli.endpoint {
        wiki.endpoint = endpoint;
    }
    let ctx = RunContext {
        wiki,
        max_retry: cli.max_retries.unwrap_or(config.crawl.max_retry),
        backoff: Duration::from_secs(cli.backoff_secs.unwrap_or(config.crawl.backoff_secs)),
        save_every: cli.save_every.unwrap_or(config.crawl.save_every),
        out_dir: cli
            .out_dir
            .unwrap_or_else(|| config.output.default_dir.clone()),
        progress,
    };
    std::fs::create_dir_all(&ctx.out_dir).context("Cannot create output directory")?;

    match cli.command {
        Command::Categories(args) => {
            cmd::categories::run(&args, &ctx, &config.categories.title_blacklist)
        }
        Command::Words(args) => cmd::words::run(&args, &ctx, &config.words.param_blacklist),
        Command::WordList(args) => cmd::word_list::run(&args, &ctx),
        Command::Config => {
            print_config(&ctx, &config);
            Ok(())
        }
    }
}

fn print_config(ctx: &RunContext, config: &Config) {
    use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec!["Endpoint", &ctx.wiki.endpoint]);
    table.add_row(vec!["Page limit", &ctx.wiki.page_limit.to_string()]);
    table.add_row(vec!["Max pages", &ctx.wiki.max_pages.to_string()]);
    table.add_row(vec!["Max retry", &ctx.max_retry.to_string()]);
    table.add_row(vec!["Backoff", &format!("{:?}", ctx.backoff)]);
    table.add_row(vec!["Save every", &ctx.save_every.to_string()]);
    table.add_row(vec![
        "Output directory",
        &ctx.out_dir.display().to_string(),
    ]);
    table.add_row(vec![
        "Title blacklist",
        &config.categories.title_blacklist.join(", "),
    ]);
    table.add_row(vec![
        "Param blacklist",
        &config.words.param_blacklist.join(", "),
    ]);

    eprintln!("\n{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_retries_flag_parses() {
        let cli = Cli::try_parse_from(["kkucrawl", "config", "--max-retries", "7"]).unwrap();
        assert_eq!(cli.max_retries, Some(7));
    }

    #[test]
    fn old_flag_spelling_rejected() {
        assert!(Cli::try_parse_from(["kkucrawl", "config", "--max-retry", "7"]).is_err());
    }
}
