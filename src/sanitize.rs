//! Text normalization for extracted and pasted input.
//!
//! Handles the two dirt sources this pipeline actually sees: HTML fragments
//! pasted from rich editors, and mis-decoded byte sequences from PDF text
//! layers that were written as Latin-1 and read as UTF-8.

use crate::config::{MAX_TEXT_LENGTH, MIN_TEXT_LENGTH};
use crate::error::{Error, Result};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Text normalizer with pre-compiled patterns.
pub struct TextSanitizer {
    br_re: Regex,
    para_re: Regex,
    tag_re: Regex,
    control_re: Regex,
    newline_re: Regex,
    space_re: Regex,
    mojibake: Vec<(&'static str, &'static str)>,
}

impl TextSanitizer {
    /// Create a sanitizer.
    pub fn new() -> Self {
        Self {
            br_re: Regex::new(r"(?i)<br\s*/?>").unwrap(),
            para_re: Regex::new(r"(?i)</p>\s*<p[^>]*>").unwrap(),
            tag_re: Regex::new(r"<[^>]*>").unwrap(),
            control_re: Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap(),
            newline_re: Regex::new(r"\n{3,}").unwrap(),
            space_re: Regex::new(r"[ \t]+").unwrap(),
            // UTF-8 punctuation read as Latin-1. Longer sequences first; the
            // bare "â€" remnant must stay last because it prefixes the others.
            mojibake: vec![
                ("\u{00E2}\u{20AC}\u{2122}", "'"),        // right single quote
                ("\u{00E2}\u{20AC}\u{0153}", "\""),       // left double quote
                ("\u{00E2}\u{20AC}\u{00A2}", "\u{2022}"), // bullet
                ("\u{00E2}\u{20AC}\u{201C}", "\u{2013}"), // en dash
                ("\u{00E2}\u{20AC}\u{201D}", "\u{2014}"), // em dash
                ("\u{00E2}\u{20AC}", "\""),               // right double quote remnant
            ],
        }
    }

    /// Normalize a raw string into analysis-ready plain text.
    ///
    /// Total and pure: never fails, returns `""` for empty input, and is
    /// idempotent on its own output.
    pub fn normalize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let text = self.br_re.replace_all(raw, "\n");
        let text = self.para_re.replace_all(&text, "\n\n");
        let mut text = self.tag_re.replace_all(&text, "").to_string();

        text = text
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&nbsp;", " ");

        for (broken, repaired) in &self.mojibake {
            text = text.replace(broken, repaired);
        }

        text = text.replace('\u{FFFD}', " ");
        let text = self.control_re.replace_all(&text, " ");

        let text: String = text.nfc().collect();

        let text = self.newline_re.replace_all(&text, "\n\n");
        let text = self.space_re.replace_all(&text, " ");

        text.trim().to_string()
    }

    /// Normalize and check length bounds for detection submission.
    ///
    /// Returns the normalized text, or [`Error::TextTooShort`] /
    /// [`Error::TextTooLong`] when it falls outside
    /// [`MIN_TEXT_LENGTH`]..=[`MAX_TEXT_LENGTH`] characters.
    pub fn validate_for_analysis(&self, raw: &str) -> Result<String> {
        let text = self.normalize(raw);
        let len = text.chars().count();

        if len < MIN_TEXT_LENGTH {
            return Err(Error::TextTooShort(len));
        }
        if len > MAX_TEXT_LENGTH {
            return Err(Error::TextTooLong(len));
        }

        Ok(text)
    }
}

impl Default for TextSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
