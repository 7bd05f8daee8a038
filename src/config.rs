//! Recognized configuration constants.
//!
//! Callers that need different limits (e.g. a stricter upload cap) override
//! them through the relevant options or config structs; these are the
//! defaults those structs start from.

/// Maximum normalized text length accepted for analysis, in characters.
pub const MAX_TEXT_LENGTH: usize = 50_000;

/// Minimum normalized text length accepted for analysis, in characters.
pub const MIN_TEXT_LENGTH: usize = 10;

/// Maximum poll attempts per detection task.
pub const MAX_POLL_ATTEMPTS: u32 = 20;

/// Delay between poll attempts, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 2_000;

/// Per-request timeout for submit and poll calls, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Maximum accepted PDF file size, in bytes (50 MB). Stricter callers may
/// lower this to 10 MB via [`crate::parser::ExtractOptions`].
pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Maximum words per detection chunk.
pub const MAX_CHUNK_WORDS: usize = 8_000;

/// Default number of pages rendered as previews.
pub const PREVIEW_MAX_PAGES: usize = 20;

/// Preview snippet length, in characters.
pub const PREVIEW_TEXT_LEN: usize = 200;

/// Pages sampled by the scanned-document heuristic.
pub const SCANNED_SAMPLE_PAGES: u32 = 3;

/// Average extracted characters per sampled page below which a document is
/// classified as likely scanned.
pub const SCANNED_CHAR_THRESHOLD: f32 = 50.0;

/// Reading speed used for the reading-time statistic, in words per minute.
pub const READING_WPM: usize = 200;

/// Baseline tolerance when grouping text fragments into lines, in layout units.
pub const LINE_TOLERANCE: f32 = 2.0;

/// Horizontal gap between fragments above which a word boundary is inserted,
/// in layout units.
pub const WORD_GAP_THRESHOLD: f32 = 5.0;

/// Sentences grouped into one paragraph block during page reconstruction.
pub const SENTENCES_PER_PARAGRAPH: usize = 4;

/// Default base URL of the detection service.
pub const DEFAULT_BASE_URL: &str = "https://semenjana.biz.id/allin";
