//! Extraction options.

use crate::config::{
    MAX_FILE_SIZE_BYTES, PREVIEW_MAX_PAGES, PREVIEW_TEXT_LEN, SCANNED_CHAR_THRESHOLD,
    SCANNED_SAMPLE_PAGES,
};

/// Options for PDF text extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum accepted file size in bytes.
    pub max_file_size: u64,

    /// Maximum number of pages rendered in preview mode.
    pub preview_max_pages: usize,

    /// Preview snippet length in characters.
    pub preview_text_len: usize,

    /// Pages sampled by the scanned-document heuristic.
    pub scanned_sample_pages: u32,

    /// Average characters per sampled page below which the document is
    /// classified as likely scanned.
    pub scanned_char_threshold: f32,
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum accepted file size in bytes.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Set the preview page cap.
    pub fn with_preview_pages(mut self, pages: usize) -> Self {
        self.preview_max_pages = pages;
        self
    }

    /// Set the preview snippet length.
    pub fn with_preview_text_len(mut self, chars: usize) -> Self {
        self.preview_text_len = chars;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE_BYTES,
            preview_max_pages: PREVIEW_MAX_PAGES,
            preview_text_len: PREVIEW_TEXT_LEN,
            scanned_sample_pages: SCANNED_SAMPLE_PAGES,
            scanned_char_threshold: SCANNED_CHAR_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = ExtractOptions::new()
            .with_max_file_size(10 * 1024 * 1024)
            .with_preview_pages(50)
            .with_preview_text_len(120);

        assert_eq!(options.max_file_size, 10 * 1024 * 1024);
        assert_eq!(options.preview_max_pages, 50);
        assert_eq!(options.preview_text_len, 120);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.preview_max_pages, PREVIEW_MAX_PAGES);
        assert_eq!(options.scanned_sample_pages, SCANNED_SAMPLE_PAGES);
    }
}
