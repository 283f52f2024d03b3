//! Transcript export.
//!
//! Serializes the conversation into a portable Markdown document: a header
//! block (date, page title, page url) followed by each message's display
//! text, entries separated by horizontal rules.

use chrono::{DateTime, Local};
use shared::page::ActiveDocument;
use shared::transcript::Transcript;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FILENAME_PREFIX: &str = "pagechat";

#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to export. Surfaced as a blocking alert, never written to
    /// the transcript.
    #[error("no conversation history to export")]
    Empty,

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Render the export document.
pub fn render_export(
    transcript: &Transcript,
    document: Option<&ActiveDocument>,
    now: DateTime<Local>,
) -> String {
    let mut out = String::from("# Page Chat History\n\n");
    out.push_str(&format!("- **Date**: {}\n", now.format("%Y-%m-%d %H:%M")));
    if let Some(doc) = document {
        if !doc.title.is_empty() {
            out.push_str(&format!("- **Page**: {}\n", doc.title));
        }
        out.push_str(&format!("- **URL**: {}\n", doc.url));
    }
    out.push_str("\n---\n\n");

    for msg in transcript.iter() {
        out.push_str(&format!(
            "**{}**:\n{}\n\n---\n\n",
            msg.sender.display_name(),
            msg.raw_text
        ));
    }
    out
}

/// Timestamp-derived filename, e.g. `pagechat_20260805_1412.md`.
pub fn export_filename(now: DateTime<Local>) -> String {
    format!("{}_{}.md", FILENAME_PREFIX, now.format("%Y%m%d_%H%M"))
}

/// Write the transcript to a file in `dir`.
pub fn write_export(
    dir: &Path,
    transcript: &Transcript,
    document: Option<&ActiveDocument>,
) -> Result<PathBuf, ExportError> {
    if transcript.is_empty() {
        return Err(ExportError::Empty);
    }

    let now = Local::now();
    fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(now));
    fs::write(&path, render_export(transcript, document, now))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::transcript::{Message, Sender};

    fn sample_document() -> ActiveDocument {
        ActiveDocument {
            url: "https://example.com/article".to_string(),
            title: "Example Article".to_string(),
            icon_url: None,
        }
    }

    fn sample_transcript(n: usize) -> Transcript {
        let mut t = Transcript::new();
        for i in 0..n {
            t.append(Message::new(Sender::User, format!("question {i}"), ""));
        }
        t
    }

    #[test]
    fn test_empty_transcript_refuses_export() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_export(dir.path(), &Transcript::new(), None);
        assert!(matches!(result, Err(ExportError::Empty)));
        // No file was produced.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_render_contains_header_and_entries() {
        let transcript = sample_transcript(3);
        let doc = sample_document();
        let out = render_export(&transcript, Some(&doc), Local::now());

        assert!(out.starts_with("# Page Chat History"));
        assert!(out.contains("- **Page**: Example Article"));
        assert!(out.contains("- **URL**: https://example.com/article"));
        assert_eq!(out.matches("**You**:").count(), 3);
        // One rule after the header plus one after each entry.
        assert_eq!(out.matches("---").count(), 4);
    }

    #[test]
    fn test_filename_pattern() {
        let now = Local::now();
        let name = export_filename(now);
        assert!(name.starts_with("pagechat_"));
        assert!(name.ends_with(".md"));
        // pagechat_YYYYMMDD_HHmm.md
        assert_eq!(name.len(), "pagechat_".len() + 8 + 1 + 4 + ".md".len());
    }

    #[test]
    fn test_write_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = sample_transcript(2);

        let path = write_export(dir.path(), &transcript, Some(&sample_document())).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("question 0"));
        assert!(content.contains("question 1"));
    }
}
