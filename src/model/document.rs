//! Document-level types.

use super::PageExtraction;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Best-effort document metadata.
///
/// Produced by [`crate::parser::document_info`], which fills in what it can
/// and leaves the rest at defaults rather than failing: metadata display is
/// non-critical.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Page count; 0 when the document could not be parsed.
    pub num_pages: u32,

    /// Document title, if present.
    pub title: Option<String>,

    /// Document author, if present.
    pub author: Option<String>,

    /// Application that created the original document.
    pub creator: Option<String>,

    /// Application that produced the PDF.
    pub producer: Option<String>,

    /// Creation timestamp, if present and parseable.
    pub created: Option<DateTime<Utc>>,

    /// Last-modified timestamp, if present and parseable.
    pub modified: Option<DateTime<Utc>>,

    /// Whether the document is encrypted.
    pub encrypted: bool,

    /// PDF header version (e.g. "1.7").
    pub version: Option<String>,

    /// File size in bytes, when read from disk.
    pub file_size: Option<u64>,

    /// File name, when read from disk.
    pub file_name: Option<String>,
}

/// Aggregate result of one extraction run.
///
/// Owned by the caller for the duration of one request and discarded after
/// the combined text is handed off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentExtractionResult {
    /// Per-page records in ascending page order, including empty pages.
    pub pages: Vec<PageExtraction>,

    /// True document page count.
    pub total_pages: u32,

    /// Whether the sampled pages suggest an image-only (scanned) document.
    pub is_likely_scanned: bool,
}

impl DocumentExtractionResult {
    /// Concatenate the text of all non-empty pages, separated by blank
    /// lines. Empty pages are skipped but still counted in `total_pages`.
    pub fn combined_text(&self) -> String {
        self.pages
            .iter()
            .filter(|p| p.has_text)
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSS...`) into a UTC timestamp.
///
/// Timezone suffixes are ignored; the date is taken at face value.
pub(crate) fn parse_pdf_date(raw: &str) -> Option<DateTime<Utc>> {
    let digits: String = raw
        .trim_start_matches("D:")
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.len() < 8 {
        return None;
    }

    // Pad missing time components with midnight
    let padded = format!("{:0<14}", digits);
    NaiveDateTime::parse_from_str(&padded, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_combined_text_skips_empty_pages() {
        let result = DocumentExtractionResult {
            pages: vec![
                PageExtraction::from_text(1, "first".to_string()),
                PageExtraction::empty(2),
                PageExtraction::from_text(3, "third".to_string()),
            ],
            total_pages: 3,
            is_likely_scanned: false,
        };
        assert_eq!(result.combined_text(), "first\n\nthird");
        assert_eq!(result.total_pages, 3);
    }

    #[test]
    fn test_parse_pdf_date_full() {
        let date = parse_pdf_date("D:20240315123000+01'00'").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_pdf_date_date_only() {
        let date = parse_pdf_date("D:20230101").unwrap();
        assert_eq!(date.year(), 2023);
    }

    #[test]
    fn test_parse_pdf_date_garbage() {
        assert!(parse_pdf_date("not a date").is_none());
        assert!(parse_pdf_date("D:2024").is_none());
    }
}
