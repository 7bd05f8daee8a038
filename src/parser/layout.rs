//! Reading-order reconstruction for one page.
//!
//! PDF content streams store text runs in drawing order, not reading order.
//! This module turns an unordered bag of positioned fragments into paragraph
//! text: fragments are grouped into baselines, baselines ordered top to
//! bottom, and the flattened text regrouped into sentence-based paragraph
//! blocks, since the geometry alone carries no paragraph structure.

use crate::config::{LINE_TOLERANCE, SENTENCES_PER_PARAGRAPH, WORD_GAP_THRESHOLD};

/// One atomic text run from a page content stream, with baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    /// The text content.
    pub text: String,
    /// X position (left edge).
    pub x: f32,
    /// Y position (baseline). PDF y grows upward.
    pub y: f32,
    /// Estimated advance width.
    pub width: f32,
}

impl TextFragment {
    /// Create a fragment.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
        }
    }
}

/// Fragments sharing a baseline, ordered left to right once finished.
///
/// Transient: lives for one page's reconstruction pass.
#[derive(Debug, Clone)]
pub struct ReconstructedLine {
    /// Member fragments.
    pub fragments: Vec<TextFragment>,
    /// Baseline y of the first fragment assigned to this line.
    pub y: f32,
}

impl ReconstructedLine {
    fn new(fragment: TextFragment) -> Self {
        let y = fragment.y;
        Self {
            fragments: vec![fragment],
            y,
        }
    }

    /// Concatenate the line's fragments left to right, inserting a single
    /// space where the horizontal gap between consecutive fragments exceeds
    /// the word-gap threshold. This recovers word boundaries the renderer
    /// expressed purely through positioning.
    pub fn text(&self) -> String {
        let mut fragments: Vec<&TextFragment> = self.fragments.iter().collect();
        fragments.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        let mut result = String::new();
        let mut prev_end: Option<f32> = None;

        for fragment in fragments {
            if let Some(end) = prev_end {
                let gap = fragment.x - end;
                if gap > WORD_GAP_THRESHOLD
                    && !result.ends_with(' ')
                    && !fragment.text.starts_with(' ')
                {
                    result.push(' ');
                }
            }
            result.push_str(&fragment.text);
            prev_end = Some(fragment.x + fragment.width);
        }

        result
    }
}

/// Reconstruct readable paragraph text from one page's fragments.
///
/// Empty and whitespace-only fragments are discarded; a page with no
/// remaining fragments yields `""`.
pub fn reconstruct_page_text(fragments: Vec<TextFragment>) -> String {
    let lines = group_into_lines(fragments);
    if lines.is_empty() {
        return String::new();
    }

    let raw = lines
        .iter()
        .map(|line| line.text())
        .collect::<Vec<_>>()
        .join("\n");

    paragraphs_from_raw(&raw)
}

/// Group fragments into baselines.
///
/// A fragment joins the most recent line whose baseline differs by less than
/// the tolerance; otherwise it starts a new line. The returned lines are
/// sorted top to bottom (descending y).
pub fn group_into_lines(fragments: Vec<TextFragment>) -> Vec<ReconstructedLine> {
    let mut lines: Vec<ReconstructedLine> = Vec::new();

    for fragment in fragments {
        if fragment.text.trim().is_empty() {
            continue;
        }

        match lines
            .iter_mut()
            .rev()
            .find(|line| (fragment.y - line.y).abs() < LINE_TOLERANCE)
        {
            Some(line) => line.fragments.push(fragment),
            None => lines.push(ReconstructedLine::new(fragment)),
        }
    }

    lines.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal));
    lines
}

/// Collapse whitespace, split into sentences, and regroup every
/// [`SENTENCES_PER_PARAGRAPH`] sentences into a blank-line-separated block.
fn paragraphs_from_raw(raw: &str) -> String {
    let flattened = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.is_empty() {
        return String::new();
    }

    let sentences = split_sentences(&flattened);

    sentences
        .chunks(SENTENCES_PER_PARAGRAPH)
        .map(|group| group.join(" "))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split text on `.`, `!`, `?` boundaries, keeping the terminator with its
/// sentence. Trailing text without a terminator forms a final sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}
