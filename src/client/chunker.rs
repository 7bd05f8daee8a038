//! Chunked detection for oversized input.
//!
//! Chunk boundaries are purely word-count based: a sentence can straddle two
//! chunks and be scored in halves. That skew is an accepted approximation —
//! the alternative (sentence-aware splitting) would change chunk sizes the
//! rest of the pipeline is calibrated around.

use crate::config::MAX_CHUNK_WORDS;
use crate::model::{ChunkOutcome, TextChunk};
use crate::progress::{ProgressEvent, ProgressObserver, ProgressStep};

use super::detection::DetectionClient;

/// Split text into word-bounded chunks of at most `max_words` words.
///
/// Words are whitespace-separated; order is preserved and the concatenation
/// of all chunks reproduces the original word sequence. The last chunk may
/// be shorter.
pub fn split_by_word_limit(text: &str, max_words: usize) -> Vec<TextChunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || max_words == 0 {
        return Vec::new();
    }

    words
        .chunks(max_words)
        .enumerate()
        .map(|(index, chunk)| TextChunk {
            index,
            text: chunk.join(" "),
            word_count: chunk.len(),
        })
        .collect()
}

/// Runs oversized input through the detection client chunk by chunk.
pub struct ChunkedDetector<'a> {
    client: &'a DetectionClient,
    max_words: usize,
}

impl<'a> ChunkedDetector<'a> {
    /// Create an orchestrator with the default chunk size.
    pub fn new(client: &'a DetectionClient) -> Self {
        Self {
            client,
            max_words: MAX_CHUNK_WORDS,
        }
    }

    /// Set the maximum words per chunk.
    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    /// Detect each chunk sequentially, recording per-chunk failures and
    /// continuing to the next chunk. Partial success is a valid end state.
    pub async fn detect(
        &self,
        text: &str,
        observer: &mut dyn ProgressObserver,
    ) -> Vec<ChunkOutcome> {
        let chunks = split_by_word_limit(text, self.max_words);
        let total = chunks.len();
        let mut outcomes = Vec::with_capacity(total);

        for chunk in chunks {
            observer.on_progress(ProgressEvent::new(
                ProgressStep::Part,
                format!("Processing part {} of {total}", chunk.index + 1),
            ));

            let result = self.client.detect(&chunk.text, observer).await;
            if let Err(err) = &result {
                log::warn!("chunk {} failed: {err}", chunk.index);
            }
            outcomes.push(ChunkOutcome {
                index: chunk.index,
                result,
            });
        }

        outcomes
    }
}
