//! History log entries.

use crate::MediaPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a history entry records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum HistoryKind {
    /// Generated storyboard text
    Storyboard,
    /// Generated or edited scene image
    Image,
    /// Generated scene video
    Video,
}

/// Result recorded with a history entry.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryResult {
    /// Text result
    Text(String),
    /// Media result
    Media(MediaPayload),
}

/// One successful generation, appended to the history log.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct HistoryEntry {
    kind: HistoryKind,
    prompt_summary: String,
    result: HistoryResult,
    created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Entry for a text result.
    pub fn text(kind: HistoryKind, prompt_summary: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            prompt_summary: prompt_summary.into(),
            result: HistoryResult::Text(text.into()),
            created_at: Utc::now(),
        }
    }

    /// Entry for a media result.
    pub fn media(kind: HistoryKind, prompt_summary: impl Into<String>, payload: MediaPayload) -> Self {
        Self {
            kind,
            prompt_summary: prompt_summary.into(),
            result: HistoryResult::Media(payload),
            created_at: Utc::now(),
        }
    }
}

/// Number of characters of source text kept in a prompt summary.
const SUMMARY_CHARS: usize = 50;

/// `"<prefix><first 50 chars of text>..."`, cut on a character boundary.
///
/// # Examples
///
/// ```
/// use reelsmith_core::summarize;
///
/// assert_eq!(summarize("Scene 1: ", "A dog runs."), "Scene 1: A dog runs....");
/// assert_eq!(summarize("", &"x".repeat(80)).len(), 53);
/// ```
pub fn summarize(prefix: &str, text: &str) -> String {
    let head: String = text.chars().take(SUMMARY_CHARS).collect();
    format!("{prefix}{head}...")
}
