//! Reading raw email corpora and reading/writing labeled datasets.
//!
//! Raw emails come either as JSON Lines (one `Email` object per line) or as
//! a directory of RFC 822 `.eml` files. Labeled datasets are JSON Lines of
//! `{"text": ..., "category": ...}`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use mail_parser::MessageParser;
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::CorpusError;
use crate::model::trainer::LabeledExample;
use crate::pipeline::types::Email;

// ── Raw emails ──────────────────────────────────────────────────────

/// Headers already carried by dedicated `Email` fields.
const FIELD_HEADERS: &[&str] = &["Subject", "From", "Message-ID"];

/// Read emails from a `.eml` directory or a JSON Lines file.
pub fn read_emails(path: &Path) -> Result<Vec<Email>, CorpusError> {
    if path.is_dir() {
        read_eml_dir(path)
    } else {
        read_jsonl(path)
    }
}

/// Parse every `.eml` file in `dir`, in file-name order.
///
/// Files mail-parser cannot make sense of are skipped with a warning.
pub fn read_eml_dir(dir: &Path) -> Result<Vec<Email>, CorpusError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("eml")))
        .collect();
    paths.sort();

    let mut emails = Vec::with_capacity(paths.len());
    for path in &paths {
        let raw = std::fs::read(path)?;
        match parse_eml(&raw) {
            Some(email) => emails.push(email),
            None => warn!(path = %path.display(), "Skipping unparsable message"),
        }
    }

    info!(dir = %dir.display(), count = emails.len(), "Read .eml corpus");
    Ok(emails)
}

/// Parse one RFC 822 message.
pub fn parse_eml(raw: &[u8]) -> Option<Email> {
    let parsed = MessageParser::default().parse(raw)?;

    let id = parsed
        .message_id()
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("gen-{}", Uuid::new_v4()));
    let subject = parsed.subject().unwrap_or_default().to_string();
    let sender = parsed
        .from()
        .and_then(|addr| addr.first())
        .and_then(|a| a.address())
        .map(|s| s.to_string())
        .unwrap_or_default();

    let body = match parsed.body_text(0) {
        Some(text) => text.to_string(),
        None => parsed
            .body_html(0)
            .map(|html| strip_html(&html))
            .unwrap_or_default(),
    };

    let mut email = Email::new(id, subject, body).with_sender(sender);
    for header in parsed.headers() {
        let name = header.name();
        if FIELD_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name)) {
            continue;
        }
        if let Some(value) = header.value().as_text() {
            email = email.with_header(name, value);
        }
    }
    Some(email)
}

/// Drop tags and collapse whitespace.
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                result.push(' ');
            }
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Labeled datasets ────────────────────────────────────────────────

pub fn read_labeled(path: &Path) -> Result<Vec<LabeledExample>, CorpusError> {
    let examples: Vec<LabeledExample> = read_jsonl(path)?;
    info!(path = %path.display(), count = examples.len(), "Read labeled dataset");
    Ok(examples)
}

pub fn write_labeled(path: &Path, examples: &[LabeledExample]) -> Result<(), CorpusError> {
    write_jsonl(path, examples)?;
    info!(path = %path.display(), count = examples.len(), "Wrote labeled dataset");
    Ok(())
}

// ── JSON Lines ──────────────────────────────────────────────────────

/// Read one JSON value per non-blank line.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CorpusError> {
    let reader = BufReader::new(File::open(path)?);
    let mut items = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|e| CorpusError::InvalidLine {
            line: idx + 1,
            reason: e.to_string(),
        })?;
        items.push(item);
    }
    Ok(items)
}

pub fn write_jsonl<T: serde::Serialize>(path: &Path, items: &[T]) -> Result<(), CorpusError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_EML: &str = "From: Billing <billing@invoice.acme.com>\r\n\
To: me@example.com\r\n\
Subject: Invoice due\r\n\
Message-ID: <inv-1@acme.com>\r\n\
X-Category: Finance\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Please pay your invoice.\r\n";

    #[test]
    fn parses_eml_fields() {
        let email = parse_eml(SAMPLE_EML.as_bytes()).unwrap();
        assert_eq!(email.id, "inv-1@acme.com");
        assert_eq!(email.subject, "Invoice due");
        assert_eq!(email.sender, "billing@invoice.acme.com");
        assert!(email.body.contains("Please pay your invoice"));
        assert_eq!(email.headers.get("X-Category").map(String::as_str), Some("Finance"));
        assert!(!email.headers.contains_key("Subject"));
    }

    #[test]
    fn eml_without_message_id_gets_generated_id() {
        let raw = "From: a@b.com\r\nSubject: Hi\r\n\r\nbody\r\n";
        let email = parse_eml(raw.as_bytes()).unwrap();
        assert!(email.id.starts_with("gen-"));
    }

    #[test]
    fn reads_eml_directory_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.eml"), SAMPLE_EML).unwrap();
        std::fs::write(
            dir.path().join("a.eml"),
            "From: x@shop.com\r\nSubject: Order shipped\r\nMessage-ID: <o-1@shop.com>\r\n\r\nTracking inside\r\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let emails = read_emails(dir.path()).unwrap();
        let ids: Vec<&str> = emails.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["o-1@shop.com", "inv-1@acme.com"]);
    }

    #[test]
    fn reads_jsonl_emails_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emails.jsonl");
        std::fs::write(
            &path,
            "{\"id\":\"1\",\"subject\":\"Invoice\",\"body\":\"pay\"}\n\n{\"message_id\":\"2\",\"subject\":\"Order\"}\n",
        )
        .unwrap();
        let emails = read_emails(&path).unwrap();
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[1].id, "2");
        assert!(emails[1].body.is_empty());
    }

    #[test]
    fn invalid_jsonl_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        std::fs::write(&path, "{\"id\":\"1\"}\nnot json\n").unwrap();
        let err = read_emails(&path).unwrap_err();
        assert!(matches!(err, CorpusError::InvalidLine { line: 2, .. }));
    }

    #[test]
    fn labeled_dataset_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("labeled.jsonl");
        let examples = vec![
            LabeledExample::new("invoice pay", "FINANCE"),
            LabeledExample::new("order ship", "SHOPPING"),
        ];
        write_labeled(&path, &examples).unwrap();
        assert_eq!(read_labeled(&path).unwrap(), examples);
    }

    #[test]
    fn strip_html_drops_tags() {
        assert_eq!(strip_html("<p>Your <b>order</b></p><p>shipped</p>"), "Your order shipped");
    }
}
