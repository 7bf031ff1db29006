//! `word-list` subcommand: tabular word-list page crawl.
//!
//! Default output is one flat array of row records plus the distinct
//! terminal-node set. `--partition` instead splits the words into three
//! disjoint sets by acceptance.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context;
use kkucrawl_core::{CrawlError, Countdown, JsonSink, fmt_num, load_targets, retry_fixed};
use kkucrawl_wiki::{Extraction, Injeong, TableSpec, WordListPage, WordRow, fetch_wikitext};

use super::RunContext;

#[derive(clap::Args, Debug)]
pub struct WordListArgs {
    /// Target list file (default: <out_dir>/<name>.targets)
    #[arg(long)]
    pub targets: Option<PathBuf>,

    /// Run name; output goes to <out_dir>/<name>.words.json etc.
    #[arg(long, default_value = "word-list")]
    pub name: String,

    /// Partition words into unknown/accepted/rejected sets instead of one
    /// flat words array
    #[arg(long)]
    pub partition: bool,
}

/// In-memory accumulators and their sinks for one word-list run.
enum Collector {
    Flat {
        rows: Vec<WordRow>,
        sink: JsonSink,
    },
    Partitioned {
        unknown: BTreeSet<String>,
        accepted: BTreeSet<String>,
        rejected: BTreeSet<String>,
        sinks: [JsonSink; 3],
    },
}

impl Collector {
    fn create(args: &WordListArgs, ctx: &RunContext) -> anyhow::Result<Self> {
        let sink = |suffix: &str| {
            let path = ctx.artifact_path(&args.name, suffix);
            JsonSink::create(&path).with_context(|| format!("Cannot create {}", path.display()))
        };
        if args.partition {
            Ok(Self::Partitioned {
                unknown: BTreeSet::new(),
                accepted: BTreeSet::new(),
                rejected: BTreeSet::new(),
                sinks: [
                    sink(".unknown.json")?,
                    sink(".accepted.json")?,
                    sink(".rejected.json")?,
                ],
            })
        } else {
            Ok(Self::Flat {
                rows: Vec::new(),
                sink: sink(".words.json")?,
            })
        }
    }

    fn add(&mut self, page_rows: Vec<WordRow>) {
        match self {
            Self::Flat { rows, .. } => rows.extend(page_rows),
            Self::Partitioned {
                unknown,
                accepted,
                rejected,
                ..
            } => {
                for row in page_rows {
                    let set = match row.injeong {
                        Injeong::Unknown => &mut *unknown,
                        Injeong::Accepted => &mut *accepted,
                        Injeong::Rejected => &mut *rejected,
                    };
                    set.insert(row.word);
                }
            }
        }
    }

    fn word_count(&self) -> usize {
        match self {
            Self::Flat { rows, .. } => rows.len(),
            Self::Partitioned {
                unknown,
                accepted,
                rejected,
                ..
            } => unknown.len() + accepted.len() + rejected.len(),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Flat { rows, sink } => sink.flush_records(rows),
            Self::Partitioned {
                unknown,
                accepted,
                rejected,
                sinks,
            } => {
                sinks[0].flush_records(unknown)?;
                sinks[1].flush_records(accepted)?;
                sinks[2].flush_records(rejected)
            }
        }
    }
}

pub fn run(args: &WordListArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let targets_path = ctx.targets_path(&args.name, args.targets.as_ref());
    let targets = load_targets(&targets_path)
        .with_context(|| format!("Cannot read targets from {}", targets_path.display()))?;

    let mut collector = Collector::create(args, ctx)?;
    let nodes_path = ctx.artifact_path(&args.name, ".nodes.json");
    let mut nodes_sink = JsonSink::create(&nodes_path)
        .with_context(|| format!("Cannot create {}", nodes_path.display()))?;

    let spec = TableSpec::default();
    let mut nodes: BTreeSet<String> = BTreeSet::new();
    let mut countdown = Countdown::new(ctx.save_every);
    let mut abandoned = 0usize;
    let pb = ctx.progress.target_bar(&args.name, targets.len() as u64);

    for target in &targets {
        pb.set_message(target.clone());
        match retry_fixed(target, ctx.max_retry, ctx.backoff, || {
            crawl_word_list(ctx, target, &spec)
        }) {
            Ok(page) => {
                log::info!("{target}: {} rows done", page.rows.len());
                collector.add(page.rows);
                nodes.extend(page.nodes);
            }
            Err(e) => {
                log::error!("{target}: giving up after {} attempts: {e}", ctx.max_retry);
                abandoned += 1;
            }
        }
        pb.inc(1);
        if countdown.tick() {
            log::info!("checkpoint: {} words", fmt_num(collector.word_count()));
            collector.flush()?;
            nodes_sink.flush_records(&nodes)?;
        }
    }

    collector.flush()?;
    nodes_sink.flush_records(&nodes)?;
    pb.finish_and_clear();

    // The nodes artifact exists only when terminal-node columns were seen
    if nodes.is_empty() {
        drop(nodes_sink);
        std::fs::remove_file(&nodes_path)
            .with_context(|| format!("Cannot remove empty {}", nodes_path.display()))?;
    }

    log::info!(
        "{}: {} words, {} nodes ({abandoned} abandoned)",
        args.name,
        fmt_num(collector.word_count()),
        fmt_num(nodes.len())
    );
    Ok(())
}

/// One retry unit: fetch the page and extract every word-list table.
///
/// A page without word-list tables is an empty success, matching pages that
/// only carry prose; malformed rows are retryable.
fn crawl_word_list(
    ctx: &RunContext,
    target: &str,
    spec: &TableSpec,
) -> Result<WordListPage, CrawlError> {
    let text = fetch_wikitext(&ctx.wiki, target)?;
    match kkucrawl_wiki::extract_word_tables(&text, spec) {
        Extraction::Found(page) => Ok(page),
        Extraction::NotFound => {
            log::debug!("{target}: no word-list tables");
            Ok(WordListPage::default())
        }
        Extraction::Malformed(reason) => Err(CrawlError::Extract(reason)),
    }
}
