//! `words` subcommand: per-page 단어 template crawl.

use std::path::PathBuf;

use anyhow::Context;
use kkucrawl_core::{CrawlError, Countdown, JsonSink, fmt_num, load_targets, retry_fixed};
use kkucrawl_wiki::{Extraction, TemplateSpec, WordFields, fetch_wikitext};
use serde_json::Value;

use super::RunContext;

#[derive(clap::Args, Debug)]
pub struct WordsArgs {
    /// Target list file (default: <out_dir>/<name>.targets)
    #[arg(long)]
    pub targets: Option<PathBuf>,

    /// Run name; output goes to <out_dir>/<name>.json
    #[arg(long, default_value = "words")]
    pub name: String,
}

pub fn run(args: &WordsArgs, ctx: &RunContext, param_blacklist: &[String]) -> anyhow::Result<()> {
    let targets_path = ctx.targets_path(&args.name, args.targets.as_ref());
    let targets = load_targets(&targets_path)
        .with_context(|| format!("Cannot read targets from {}", targets_path.display()))?;

    let out_path = ctx.artifact_path(&args.name, ".json");
    let mut sink = JsonSink::create(&out_path)
        .with_context(|| format!("Cannot create {}", out_path.display()))?;

    let spec = TemplateSpec {
        blacklist: param_blacklist.to_vec(),
        ..TemplateSpec::default()
    };

    let (records, abandoned) = collect_words(
        &targets,
        ctx,
        &args.name,
        &spec.title_param,
        &mut sink,
        |target| crawl_word_template(ctx, target, &spec),
    )?;

    log::info!(
        "{}: {} word records ({abandoned} abandoned) -> {}",
        args.name,
        fmt_num(records.len()),
        out_path.display()
    );
    Ok(())
}

/// Collector loop: retry-wrapped fetch per target, a full snapshot flush
/// every `save_every` targets, and one final flush.
fn collect_words(
    targets: &[String],
    ctx: &RunContext,
    name: &str,
    title_param: &str,
    sink: &mut JsonSink,
    mut fetch: impl FnMut(&str) -> Result<WordFields, CrawlError>,
) -> std::io::Result<(Vec<WordFields>, usize)> {
    let mut records: Vec<WordFields> = Vec::new();
    let mut countdown = Countdown::new(ctx.save_every);
    let mut abandoned = 0usize;
    let pb = ctx.progress.target_bar(name, targets.len() as u64);

    for target in targets {
        pb.set_message(target.clone());
        match retry_fixed(target, ctx.max_retry, ctx.backoff, || fetch(target)) {
            Ok(fields) => {
                let title = fields
                    .get(title_param)
                    .and_then(Value::as_str)
                    .unwrap_or(target);
                log::info!("'{title}' done");
                records.push(fields);
            }
            Err(e) => {
                log::error!("{target}: giving up after {} attempts: {e}", ctx.max_retry);
                abandoned += 1;
            }
        }
        pb.inc(1);
        if countdown.tick() {
            log::info!("checkpoint: {} records", fmt_num(records.len()));
            sink.flush_records(&records)?;
        }
    }

    sink.flush_records(&records)?;
    pb.finish_and_clear();
    Ok((records, abandoned))
}

/// One retry unit: fetch the page and pull its word template.
///
/// `NotFound` becomes a retryable extraction error: a record without a title
/// is unusable, and a transient render glitch looks exactly like absence.
fn crawl_word_template(
    ctx: &RunContext,
    target: &str,
    spec: &TemplateSpec,
) -> Result<WordFields, CrawlError> {
    let text = fetch_wikitext(&ctx.wiki, target)?;
    match kkucrawl_wiki::extract_word_template(&text, spec) {
        Extraction::Found(fields) => Ok(fields),
        Extraction::NotFound => Err(CrawlError::Extract(format!(
            "no {} template on page",
            spec.name
        ))),
        Extraction::Malformed(reason) => Err(CrawlError::Extract(reason)),
    }
}
