//! 단어 (word) template extraction from raw wikitext.
//!
//! Wikitext is scanned on raw bytes with depth-aware `{{ }}` matching; byte
//! offsets stay valid with non-ASCII text since the delimiters are ASCII.

use crate::record::{Extraction, WordFields};

/// Which template to pull and which parameters to drop.
#[derive(Clone, Debug)]
pub struct TemplateSpec {
    /// Template name, e.g. 단어
    pub name: String,
    /// Parameter that identifies a real word template, e.g. 제목
    pub title_param: String,
    /// Parameter names dropped from the record
    pub blacklist: Vec<String>,
}

impl Default for TemplateSpec {
    fn default() -> Self {
        Self {
            name: "단어".to_string(),
            title_param: "제목".to_string(),
            blacklist: vec!["이미지".to_string(), "원제".to_string()],
        }
    }
}

/// Extract the first 단어 template instance that carries the title parameter.
///
/// Every `name=value` parameter becomes a field, minus the blacklist, with
/// trailing newlines stripped from names and values. Positional parameters
/// carry no field name and are skipped.
pub fn extract_word_template(text: &str, spec: &TemplateSpec) -> Extraction<WordFields> {
    let bytes = text.as_bytes();
    let mut search_from = 0;

    while let Some(pos) = find_open(&bytes[search_from..]) {
        let abs = search_from + pos;
        // Advance past this `{{` either way so nested instances get scanned
        search_from = abs + 2;

        let Some(close) = find_matching_close(bytes, abs) else {
            if template_name(&text[abs + 2..]) == spec.name {
                return Extraction::Malformed(format!("unclosed {} template", spec.name));
            }
            continue;
        };

        let inner = &text[abs + 2..close];
        let segments = split_at_depth_zero(inner);
        let Some((name, params)) = segments.split_first() else {
            continue;
        };
        if name.trim() != spec.name {
            continue;
        }

        let mut fields = WordFields::new();
        for segment in params {
            let Some(eq) = segment.find('=') else {
                continue;
            };
            let name = segment[..eq].trim_end_matches('\n');
            let value = segment[eq + 1..].trim_end_matches('\n');
            if !spec.blacklist.iter().any(|b| b == name) {
                fields.insert(name.to_string(), value.into());
            }
        }

        // First instance with the title parameter wins; templates without it
        // are transclusions of something else
        if fields.contains_key(&spec.title_param) {
            return Extraction::Found(fields);
        }
    }

    Extraction::NotFound
}

fn find_open(bytes: &[u8]) -> Option<usize> {
    bytes.windows(2).position(|w| w == b"{{")
}

/// Byte offset of the `}}` closing the `{{` at `start`, depth-aware.
fn find_matching_close(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth: i32 = 0;
    let mut i = start;
    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            depth += 1;
            i += 2;
        } else if bytes[i] == b'}' && bytes[i + 1] == b'}' {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    None
}

/// Template name of an (possibly unclosed) invocation body.
fn template_name(inner: &str) -> &str {
    inner
        .split(['|', '}'])
        .next()
        .unwrap_or("")
        .trim()
}

/// Splits on `|` at depth 0, respecting nested `{{ }}` and `[[ ]]`.
fn split_at_depth_zero(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut segments = Vec::new();
    let mut depth: i32 = 0;
    let mut last_split = 0;
    let mut i = 0;

    while i < bytes.len() {
        if i + 1 < bytes.len() && (&bytes[i..i + 2] == b"{{" || &bytes[i..i + 2] == b"[[") {
            depth += 1;
            i += 2;
        } else if i + 1 < bytes.len() && (&bytes[i..i + 2] == b"}}" || &bytes[i..i + 2] == b"]]") {
            depth -= 1;
            i += 2;
        } else if bytes[i] == b'|' && depth == 0 {
            segments.push(&content[last_split..i]);
            last_split = i + 1;
            i += 1;
        } else {
            i += 1;
        }
    }
    segments.push(&content[last_split..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> TemplateSpec {
        TemplateSpec::default()
    }

    #[test]
    fn extracts_fields_and_drops_blacklist() {
        let text = "{{단어\n|제목=사과\n|원제=Apple\n|어원=라틴어\n}}";
        match extract_word_template(text, &spec()) {
            Extraction::Found(fields) => {
                assert_eq!(fields.get("제목"), Some(&json!("사과")));
                assert_eq!(fields.get("어원"), Some(&json!("라틴어")));
                assert!(!fields.contains_key("원제"), "blacklisted param kept");
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn no_template_is_not_found() {
        assert_eq!(
            extract_word_template("평범한 문서 내용", &spec()),
            Extraction::NotFound
        );
    }

    #[test]
    fn other_templates_ignored() {
        let text = "{{넘겨주기|사과나무}}\n{{각주}}";
        assert_eq!(extract_word_template(text, &spec()), Extraction::NotFound);
    }

    #[test]
    fn skips_instance_without_title_param() {
        let text = "{{단어|분류=과일}}\n{{단어|제목=사과|분류=과일}}";
        match extract_word_template(text, &spec()) {
            Extraction::Found(fields) => {
                assert_eq!(fields.get("제목"), Some(&json!("사과")));
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn first_matching_instance_wins() {
        let text = "{{단어|제목=첫째}}{{단어|제목=둘째}}";
        match extract_word_template(text, &spec()) {
            Extraction::Found(fields) => assert_eq!(fields.get("제목"), Some(&json!("첫째"))),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn fields_serialize_in_template_source_order() {
        let text = "{{단어|제목=하나|가나=둘}}";
        match extract_word_template(text, &spec()) {
            Extraction::Found(fields) => {
                let raw = serde_json::to_string(&fields).unwrap();
                assert!(
                    raw.find("제목").unwrap() < raw.find("가나").unwrap(),
                    "fields reordered: {raw}"
                );
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn trailing_newlines_stripped_not_spaces() {
        let text = "{{단어\n|제목=사과\n\n|뜻= 둥근 과일 \n}}";
        match extract_word_template(text, &spec()) {
            Extraction::Found(fields) => {
                assert_eq!(fields.get("제목"), Some(&json!("사과")));
                assert_eq!(fields.get("뜻"), Some(&json!(" 둥근 과일 ")));
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn nested_template_in_value_kept_whole() {
        let text = "{{단어|제목=사과|출처={{링크|kkuko|주소}}}}";
        match extract_word_template(text, &spec()) {
            Extraction::Found(fields) => {
                assert_eq!(fields.get("출처"), Some(&json!("{{링크|kkuko|주소}}")));
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn piped_wikilink_in_value_not_split() {
        let text = "{{단어|제목=사과|관련=[[배 (과일)|배]]}}";
        match extract_word_template(text, &spec()) {
            Extraction::Found(fields) => {
                assert_eq!(fields.get("관련"), Some(&json!("[[배 (과일)|배]]")));
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_word_template_is_malformed() {
        let text = "{{단어|제목=사과";
        assert!(matches!(
            extract_word_template(text, &spec()),
            Extraction::Malformed(_)
        ));
    }

    #[test]
    fn word_template_found_inside_unclosed_other_template() {
        let text = "{{각주|깨진 구문\n\n{{단어|제목=사과}}";
        match extract_word_template(text, &spec()) {
            Extraction::Found(fields) => assert_eq!(fields.get("제목"), Some(&json!("사과"))),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn idempotent() {
        let text = "{{단어|제목=사과|어원=라틴어}}";
        assert_eq!(
            extract_word_template(text, &spec()),
            extract_word_template(text, &spec())
        );
    }
}
