use crate::config::RouterConfig;
use regex::Regex;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("static regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Lower-case, strip everything but ASCII letters, digits and whitespace,
/// then collapse whitespace runs into single spaces.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_ALPHANUMERIC.replace_all(&lowered, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Content words of an already normalized query.
///
/// Stopwords, easy-difficulty terms, tokens carrying a cooking verb
/// ("goreng", "digoreng") and tokens shorter than `min_keyword_len` are
/// dropped; order of first appearance is kept.
pub fn keywords<'a>(normalized: &'a str, config: &RouterConfig) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for word in normalized.split(' ') {
        if word.chars().count() < config.min_keyword_len
            || config.is_stopword(word)
            || config.is_easy_term(word)
            || config.mentions_method(word)
            || out.contains(&word)
        {
            continue;
        }
        out.push(word);
    }
    out
}
