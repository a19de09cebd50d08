//! Note records and their conversion to Markdown.
//!
//! The decrypted config stores notes as records whose `document` field is
//! a base64-encoded JSON document tree. This module decodes records into
//! [`ParsedNote`]s: title sanitized for use in filenames, document
//! rendered to Markdown, timestamp parsed to UTC.
//!
//! Batch parsing is tolerant: records that are incomplete or fail to
//! parse are logged and skipped so one bad note cannot sink an export.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::DocumentNode;
use crate::error::{RayError, Result};
use crate::markdown;

/// Characters replaced with `-` when sanitizing a title for a filename.
const RESERVED_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Maximum length of a sanitized title, in characters.
const MAX_TITLE_LENGTH: usize = 150;

/// A raw note record as stored in the decrypted config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    /// Stable note identifier
    #[serde(default)]
    pub id: String,
    /// Display title (may be empty)
    #[serde(default)]
    pub title: String,
    /// Base64-encoded JSON document tree
    #[serde(default)]
    pub document: String,
    /// Last modification time, RFC 3339
    #[serde(default)]
    pub modified_at: String,
}

impl NoteRecord {
    /// Whether the record carries everything needed to parse it.
    ///
    /// `id`, `document`, and `modifiedAt` are required; an empty title is
    /// fine and handled downstream by [`note_filename`].
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.document.is_empty() && !self.modified_at.is_empty()
    }
}

/// A note after decoding: Markdown content and typed metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedNote {
    /// Stable note identifier
    pub id: String,
    /// Sanitized title, safe for use in a filename
    pub title: String,
    /// Rendered Markdown
    pub content: String,
    /// Last modification time
    pub modified_at: DateTime<Utc>,
}

/// Decode a single note record.
///
/// # Errors
///
/// - `RayError::InvalidBase64` if the `document` field is not base64
/// - `RayError::InvalidNoteJson` if the decoded bytes are not a document tree
/// - `RayError::InvalidTimestamp` if `modifiedAt` is not RFC 3339
pub fn parse_note(record: &NoteRecord) -> Result<ParsedNote> {
    let raw = BASE64.decode(&record.document)?;
    let root: DocumentNode = serde_json::from_slice(&raw)
        .map_err(|e| RayError::InvalidNoteJson(e.to_string()))?;

    let modified_at = DateTime::parse_from_rfc3339(&record.modified_at)
        .map_err(|e| RayError::InvalidTimestamp(format!("{}: {}", record.modified_at, e)))?
        .with_timezone(&Utc);

    Ok(ParsedNote {
        id: record.id.clone(),
        title: sanitize_title(&record.title),
        content: markdown::render(&root),
        modified_at,
    })
}

/// Decode a batch of note records, skipping the ones that cannot be parsed.
///
/// Records missing a required field are dropped silently; records that
/// fail decoding are logged at `warn` and dropped. Output order follows
/// input order. This function never fails as a whole.
pub fn parse_all_notes(records: &[NoteRecord]) -> Vec<ParsedNote> {
    records
        .iter()
        .filter(|record| record.is_valid())
        .filter_map(|record| match parse_note(record) {
            Ok(note) => Some(note),
            Err(err) => {
                warn!(
                    "skipping note {}-{}: {}",
                    record.id, record.title, err
                );
                None
            }
        })
        .collect()
}

/// Make a title safe for use in a filename.
///
/// Replaces each of `/ \ : * ? " < > |` with `-`, caps the result at 150
/// characters, and trims surrounding whitespace (in that order).
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if RESERVED_FILENAME_CHARS.contains(&c) { '-' } else { c })
        .take(MAX_TITLE_LENGTH)
        .collect();
    replaced.trim().to_string()
}

/// Filename for a parsed note: `{id}-{title}.md`, falling back to
/// `untitled` when the sanitized title is empty.
pub fn note_filename(note: &ParsedNote) -> String {
    let title = if note.title.is_empty() {
        "untitled"
    } else {
        note.title.as_str()
    };
    format!("{}-{}.md", note.id, title)
}
