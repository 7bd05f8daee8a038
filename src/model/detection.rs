//! Detection-side types: tasks, results, text statistics, chunks.

use crate::config::READING_WPM;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One remote detection job.
///
/// Created on submit, moves through exactly one `Pending -> Done` or
/// `Pending -> Error` transition, then is discarded. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionTask {
    /// Opaque id assigned by the detection service.
    pub task_id: String,

    /// The exact normalized text that was submitted. Text statistics are
    /// computed from this, never from the response.
    pub submitted_text: String,

    /// Current lifecycle state.
    pub status: TaskStatus,
}

/// Lifecycle state of a [`DetectionTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Submitted, awaiting a result.
    Pending,
    /// Scored successfully.
    Done,
    /// Terminally failed.
    Error,
}

/// Normalized authorship score plus statistics about the submitted text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Probability (0-100) that the text is AI-generated.
    pub ai_probability: u8,

    /// `100 - ai_probability`.
    pub human_probability: u8,

    /// Derived confidence score, clamped to 0-100.
    pub confidence_score: u8,

    /// Per-tool scores when the service returned the detailed shape.
    pub tool_scores: Option<BTreeMap<String, f64>>,

    /// Statistics computed from the submitted text.
    pub stats: TextStats,
}

/// Word, character, sentence, and reading-time statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    /// Whitespace-separated word count.
    pub word_count: usize,

    /// Character count.
    pub char_count: usize,

    /// Sentence count, split on `.`, `!`, `?` runs.
    pub sentence_count: usize,

    /// Reading time in minutes at 200 words per minute, rounded up.
    pub reading_time_minutes: usize,
}

impl TextStats {
    /// Measure a piece of text.
    pub fn measure(text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        let char_count = text.chars().count();
        let sentence_count = text
            .split(['.', '!', '?'])
            .filter(|s| !s.trim().is_empty())
            .count();
        let reading_time_minutes = word_count.div_ceil(READING_WPM);
        Self {
            word_count,
            char_count,
            sentence_count,
            reading_time_minutes,
        }
    }
}

/// A contiguous, word-bounded slice of the input text.
///
/// Chunks preserve input order and are scored independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    /// Zero-based position within the chunk sequence.
    pub index: usize,

    /// The chunk text.
    pub text: String,

    /// Number of words in this chunk.
    pub word_count: usize,
}

/// Outcome of scoring one chunk: a result, or the error that chunk hit.
///
/// A failed chunk never aborts the remaining chunks, so a mixed sequence of
/// successes and failures is a valid end state.
#[derive(Debug)]
pub struct ChunkOutcome {
    /// Zero-based chunk index.
    pub index: usize,

    /// Score for this chunk, or the failure it ran into.
    pub result: Result<DetectionResult, Error>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_stats_basic() {
        let stats = TextStats::measure("One two three. Four five! Six?");
        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.sentence_count, 3);
        assert_eq!(stats.reading_time_minutes, 1);
    }

    #[test]
    fn test_text_stats_sentence_runs() {
        // Trailing punctuation runs don't create phantom sentences
        let stats = TextStats::measure("Wait... what?! Really.");
        assert_eq!(stats.sentence_count, 3);
    }

    #[test]
    fn test_text_stats_reading_time_rounds_up() {
        let text = "word ".repeat(201);
        let stats = TextStats::measure(&text);
        assert_eq!(stats.word_count, 201);
        assert_eq!(stats.reading_time_minutes, 2);
    }

    #[test]
    fn test_text_stats_empty() {
        let stats = TextStats::measure("");
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.sentence_count, 0);
        assert_eq!(stats.reading_time_minutes, 0);
    }
}
