//! Canonical text representation shared by the rule scorer and the
//! statistical feature transformer.
//!
//! Pipeline: lowercase → strip addresses and URLs → strip non-letters →
//! keep content-word lemmas.

use std::sync::LazyLock;

use regex::Regex;

use super::lemma::lemmatize;
use super::stop_words::is_closed_class;

static EMAIL_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S*@\S*\s?").unwrap());

static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());

/// Pure, stateless text normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize raw text into whitespace-joined lemmas.
    ///
    /// Never fails: degenerate input yields an empty string.
    pub fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let without_addresses = EMAIL_ADDRESS.replace_all(&lowered, "");
        let without_urls = URL.replace_all(&without_addresses, "");
        let letters: String = without_urls
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            .collect();

        letters
            .split_whitespace()
            .filter_map(content_lemma)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Missing input normalizes to an empty string.
    pub fn clean_opt(&self, text: Option<&str>) -> String {
        text.map(|t| self.clean(t)).unwrap_or_default()
    }

    /// Non-string JSON values normalize to an empty string.
    pub fn clean_value(&self, value: &serde_json::Value) -> String {
        self.clean_opt(value.as_str())
    }

    /// Normalize an email's subject and body, subject first.
    pub fn clean_email(&self, subject: &str, body: &str) -> String {
        self.clean(&format!("{subject} {body}"))
    }
}

/// Keep a token only if it is a content word; return its lemma.
fn content_lemma(token: &str) -> Option<String> {
    if token.len() < 2 || is_closed_class(token) {
        return None;
    }
    let lemma = lemmatize(token);
    if lemma.len() < 2 || is_closed_class(&lemma) {
        return None;
    }
    Some(lemma)
}
