//! `categories` subcommand: category membership listing.
//!
//! Walks categorymembers pages for each target category and collects member
//! titles, minus namespace pages (틀:, 분류:).

use std::path::PathBuf;

use anyhow::Context;
use kkucrawl_core::{CrawlError, Countdown, JsonSink, fmt_num, load_targets, retry_fixed};
use kkucrawl_wiki::{WikiConfig, category_members};
use serde_json::Value;

use super::RunContext;

#[derive(clap::Args, Debug)]
pub struct CategoriesArgs {
    /// Target list file (default: <out_dir>/<name>.targets)
    #[arg(long)]
    pub targets: Option<PathBuf>,

    /// Run name; output goes to <out_dir>/<name>.json
    #[arg(long, default_value = "categories")]
    pub name: String,
}

pub fn run(args: &CategoriesArgs, ctx: &RunContext, title_blacklist: &[String]) -> anyhow::Result<()> {
    let targets_path = ctx.targets_path(&args.name, args.targets.as_ref());
    let targets = load_targets(&targets_path)
        .with_context(|| format!("Cannot read targets from {}", targets_path.display()))?;

    let out_path = ctx.artifact_path(&args.name, ".json");
    let mut sink = JsonSink::create(&out_path)
        .with_context(|| format!("Cannot create {}", out_path.display()))?;

    let mut titles: Vec<String> = Vec::new();
    let mut countdown = Countdown::new(ctx.save_every);
    let mut abandoned = 0usize;
    let pb = ctx.progress.target_bar(&args.name, targets.len() as u64);

    for target in &targets {
        pb.set_message(target.clone());
        match retry_fixed(target, ctx.max_retry, ctx.backoff, || {
            collect_members(&ctx.wiki, target, title_blacklist)
        }) {
            Ok(mut members) => {
                log::info!("{target}: {} members", members.len());
                titles.append(&mut members);
            }
            Err(e) => {
                log::error!("{target}: giving up after {} attempts: {e}", ctx.max_retry);
                abandoned += 1;
            }
        }
        pb.inc(1);
        if countdown.tick() {
            log::info!("checkpoint: {} titles", fmt_num(titles.len()));
            sink.flush_records(&titles)?;
        }
    }

    sink.flush_records(&titles)?;
    pb.finish_and_clear();
    log::info!(
        "{}: {} titles from {} categories ({abandoned} abandoned) -> {}",
        args.name,
        fmt_num(titles.len()),
        targets.len(),
        out_path.display()
    );
    Ok(())
}

/// One retry unit: walk every member page of one category.
fn collect_members(
    wiki: &WikiConfig,
    target: &str,
    title_blacklist: &[String],
) -> Result<Vec<String>, CrawlError> {
    filter_members(category_members(wiki, target), title_blacklist)
}

/// Pull non-blacklisted member titles out of a sequence of query payloads.
fn filter_members(
    pages: impl Iterator<Item = Result<Value, CrawlError>>,
    title_blacklist: &[String],
) -> Result<Vec<String>, CrawlError> {
    let mut out = Vec::new();
    for payload in pages {
        let payload = payload?;
        let members = payload
            .get("categorymembers")
            .and_then(Value::as_array)
            .ok_or_else(|| CrawlError::Extract("no categorymembers in query payload".to_string()))?;
        for member in members {
            let title = member
                .get("title")
                .and_then(Value::as_str)
                .ok_or_else(|| CrawlError::Extract("member without title".to_string()))?
                .trim();
            if !title_blacklist.iter().any(|p| title.starts_with(p.as_str())) {
                out.push(title.to_string());
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blacklist() -> Vec<String> {
        vec!["틀:".to_string(), "분류:".to_string()]
    }

    fn payloads(values: Vec<Value>) -> impl Iterator<Item = Result<Value, CrawlError>> {
        values.into_iter().map(Ok)
    }

    #[test]
    fn namespace_titles_dropped_and_trimmed() {
        let pages = payloads(vec![json!({"categorymembers": [
            {"title": "사자"},
            {"title": "틀:동물 정보"},
            {"title": "분류:포유류"},
            {"title": " 호랑이 "},
        ]})]);
        let titles = filter_members(pages, &blacklist()).unwrap();
        assert_eq!(titles, vec!["사자", "호랑이"]);
    }

    #[test]
    fn titles_accumulate_across_pages_in_order() {
        let pages = payloads(vec![
            json!({"categorymembers": [{"title": "가위"}]}),
            json!({"categorymembers": [{"title": "바늘"}]}),
        ]);
        let titles = filter_members(pages, &blacklist()).unwrap();
        assert_eq!(titles, vec!["가위", "바늘"]);
    }

    #[test]
    fn pagination_error_propagates() {
        let pages = vec![
            Ok(json!({"categorymembers": [{"title": "가위"}]})),
            Err(CrawlError::Query(json!({"code": "invalidcategory"}))),
        ]
        .into_iter();
        assert!(filter_members(pages, &blacklist()).is_err());
    }

    #[test]
    fn payload_without_members_is_extract_error() {
        let pages = payloads(vec![json!({"pages": {}})]);
        assert!(matches!(
            filter_members(pages, &blacklist()),
            Err(CrawlError::Extract(_))
        ));
    }

    #[test]
    fn member_without_title_is_extract_error() {
        let pages = payloads(vec![json!({"categorymembers": [{"pageid": 5}]})]);
        assert!(matches!(
            filter_members(pages, &blacklist()),
            Err(CrawlError::Extract(_))
        ));
    }
}
