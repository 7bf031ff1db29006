//! Target list loading

use std::io;
use std::path::Path;

/// Load crawl targets from a UTF-8 file, one title per line.
///
/// Surrounding whitespace is trimmed; blank lines are skipped rather than
/// fetched as empty titles.
pub fn load_targets(path: &Path) -> io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let mut blank = 0usize;
    let targets: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| {
            if l.is_empty() {
                blank += 1;
            }
            !l.is_empty()
        })
        .map(String::from)
        .collect();
    if blank > 0 {
        log::debug!("{}: skipped {blank} blank lines", path.display());
    }
    log::info!("{}: {} targets", path.display(), targets.len());
    Ok(targets)
}
