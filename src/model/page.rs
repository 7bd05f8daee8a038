//! Per-page extraction output.

use serde::{Deserialize, Serialize};

/// Final or preview extraction output for one page.
///
/// Immutable after creation; one instance is produced per page per
/// extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageExtraction {
    /// Page number (1-indexed).
    pub page_number: u32,

    /// Reconstructed page text (possibly truncated in preview mode).
    pub text: String,

    /// Whitespace-separated word count of the reconstructed text.
    pub word_count: usize,

    /// Whether the page yielded any text at all.
    pub has_text: bool,
}

impl PageExtraction {
    /// Build a page record from reconstructed text.
    pub fn from_text(page_number: u32, text: String) -> Self {
        let word_count = text.split_whitespace().count();
        let has_text = !text.trim().is_empty();
        Self {
            page_number,
            text,
            word_count,
            has_text,
        }
    }

    /// A page that produced no text (empty or unreadable).
    pub fn empty(page_number: u32) -> Self {
        Self {
            page_number,
            text: String::new(),
            word_count: 0,
            has_text: false,
        }
    }

    /// Truncate the text to at most `max_chars` characters, on a character
    /// boundary.
    pub fn truncated(mut self, max_chars: usize) -> Self {
        if let Some((idx, _)) = self.text.char_indices().nth(max_chars) {
            self.text.truncate(idx);
        }
        self
    }
}

/// Preview-mode output: true page count plus snippets for the first pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagePreviews {
    /// True document page count, even when fewer pages were previewed.
    pub total_pages: u32,

    /// Preview records in ascending page order.
    pub previews: Vec<PageExtraction>,
}
