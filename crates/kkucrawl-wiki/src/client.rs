//! MediaWiki query API client: paginated category listing and wikitext fetch.
//!
//! The page fetch is injected as a closure so the pagination state machine
//! can be driven with canned JSON in tests; [`category_members`] binds it to
//! the real HTTP layer.

use kkucrawl_core::CrawlError;
use serde_json::Value;

/// Wiki endpoint settings.
#[derive(Clone, Debug)]
pub struct WikiConfig {
    /// api.php endpoint URL
    pub endpoint: String,
    /// cmlimit per query page
    pub page_limit: u32,
    /// Hard cap on continuation pages per category; a server that always
    /// returns `continue` becomes a reportable failure instead of a hang
    pub max_pages: u32,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://kkukowiki.kr/api.php".to_string(),
            page_limit: 50,
            max_pages: 1000,
        }
    }
}

/// Lazy sequence of `query` payloads for one category's members.
///
/// Each request is the base parameter set with the previous response's
/// `continue` mapping merged on top. Iteration ends when a response lacks
/// `continue`, or with an error item on an API `error` payload, a transport
/// failure, or the `max_pages` guard.
pub struct CategoryMembers<F> {
    base: Vec<(String, String)>,
    cont: Vec<(String, String)>,
    fetch: F,
    pages: u32,
    max_pages: u32,
    done: bool,
}

impl<F> CategoryMembers<F>
where
    F: FnMut(&[(String, String)]) -> Result<Value, CrawlError>,
{
    pub fn new(title: &str, cfg: &WikiConfig, fetch: F) -> Self {
        let base = vec![
            ("action".to_string(), "query".to_string()),
            ("list".to_string(), "categorymembers".to_string()),
            ("cmtitle".to_string(), title.to_string()),
            ("cmlimit".to_string(), cfg.page_limit.to_string()),
            ("format".to_string(), "json".to_string()),
        ];
        Self {
            base,
            cont: Vec::new(),
            fetch,
            pages: 0,
            max_pages: cfg.max_pages,
            done: false,
        }
    }
}

impl<F> Iterator for CategoryMembers<F>
where
    F: FnMut(&[(String, String)]) -> Result<Value, CrawlError>,
{
    type Item = Result<Value, CrawlError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if self.pages >= self.max_pages {
                self.done = true;
                return Some(Err(CrawlError::Extract(format!(
                    "pagination exceeded {} pages",
                    self.max_pages
                ))));
            }

            let mut params = self.base.clone();
            params.extend(self.cont.iter().cloned());
            let result = match (self.fetch)(&params) {
                Ok(v) => v,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            self.pages += 1;

            if let Some(err) = result.get("error") {
                self.done = true;
                return Some(Err(CrawlError::Query(err.clone())));
            }
            if let Some(warnings) = result.get("warnings") {
                log::warn!("API warnings: {warnings}");
            }

            let query = result.get("query").cloned();
            match result.get("continue").and_then(Value::as_object) {
                Some(cont) => {
                    self.cont = cont
                        .iter()
                        .map(|(k, v)| (k.clone(), param_value(v)))
                        .collect();
                }
                None => self.done = true,
            }

            // A continuation artifact without `query` yields nothing for
            // this page but pagination goes on
            if let Some(q) = query {
                return Some(Ok(q));
            }
        }
    }
}

/// Continuation values echo back as plain strings.
fn param_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Category member pages over the live wiki.
pub fn category_members(
    cfg: &WikiConfig,
    title: &str,
) -> CategoryMembers<impl FnMut(&[(String, String)]) -> Result<Value, CrawlError>> {
    let endpoint = cfg.endpoint.clone();
    CategoryMembers::new(title, cfg, move |params| {
        kkucrawl_core::get_json(&endpoint, params)
    })
}

/// Fetch a page's raw wikitext via `action=parse`.
pub fn fetch_wikitext(cfg: &WikiConfig, title: &str) -> Result<String, CrawlError> {
    let params = [
        ("action".to_string(), "parse".to_string()),
        ("page".to_string(), title.to_string()),
        ("prop".to_string(), "wikitext".to_string()),
        ("format".to_string(), "json".to_string()),
    ];
    let result = kkucrawl_core::get_json(&cfg.endpoint, &params)?;
    if let Some(err) = result.get("error") {
        return Err(CrawlError::Query(err.clone()));
    }
    result
        .pointer("/parse/wikitext/*")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| CrawlError::Extract("no wikitext in parse response".to_string()))
}
