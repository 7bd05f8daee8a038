//! # veritext
//!
//! Layout-aware PDF text extraction and AI-authorship detection.
//!
//! veritext takes a document (or pasted text) and produces an AI-vs-human
//! authorship probability. It has two halves:
//!
//! - **Extraction**: reconstructs reading-order text from a PDF's low-level
//!   content streams — grouping positioned fragments into lines and
//!   paragraphs, repairing encodings, and flagging likely-scanned documents.
//! - **Detection**: submits text to a remote scoring service and polls for
//!   the result, chunking oversized input and tolerating both response
//!   schemas the service has shipped.
//!
//! ## Quick start
//!
//! ```no_run
//! use veritext::{DetectionClient, NoProgress};
//!
//! #[tokio::main]
//! async fn main() -> veritext::Result<()> {
//!     let text = veritext::extract_text("paper.pdf")?;
//!     let client = DetectionClient::new()?;
//!     let result = client.detect(&text, &mut NoProgress).await?;
//!     println!("AI: {}%  Human: {}%", result.ai_probability, result.human_probability);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod progress;
pub mod sanitize;
pub mod validate;

// Re-export commonly used types
pub use client::{ChunkedDetector, DetectionClient, DetectorConfig};
pub use error::{Error, ErrorClass, Result};
pub use model::{
    ChunkOutcome, DetectionResult, DetectionTask, DocumentExtractionResult, DocumentMetadata,
    PageExtraction, PagePreviews, PageSelectionModel, TaskStatus, TextChunk, TextStats,
};
pub use parser::{document_info, ExtractOptions, PdfExtractor, TextFragment};
pub use progress::{NoProgress, ProgressEvent, ProgressFn, ProgressObserver, ProgressStep};
pub use sanitize::TextSanitizer;

use std::path::Path;

/// Extract reading-order text from a PDF file.
///
/// # Example
///
/// ```no_run
/// let text = veritext::extract_text("document.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    extract_text_with_progress(path, &mut NoProgress)
}

/// Extract reading-order text from a PDF file, reporting progress.
///
/// Emits the full `reading -> parsing -> extracting -> cleaning ->
/// completed` sequence; [`PdfExtractor::extract_full`] starts at
/// `extracting` when the document is already open.
pub fn extract_text_with_progress<P: AsRef<Path>>(
    path: P,
    observer: &mut dyn ProgressObserver,
) -> Result<String> {
    let path = path.as_ref();

    observer.on_progress(ProgressEvent::new(ProgressStep::Reading, "Reading PDF file"));
    validate::check_file(path, config::MAX_FILE_SIZE_BYTES)?;
    let data = std::fs::read(path)?;

    observer.on_progress(ProgressEvent::new(
        ProgressStep::Parsing,
        "Parsing PDF document",
    ));
    let extractor = PdfExtractor::from_bytes(&data)?;

    extractor.extract_full(observer)
}

/// Extract a subset of pages from a PDF file, reporting progress.
pub fn extract_pages_with_progress<P: AsRef<Path>>(
    path: P,
    pages: &std::collections::BTreeSet<u32>,
    observer: &mut dyn ProgressObserver,
) -> Result<String> {
    let path = path.as_ref();

    observer.on_progress(ProgressEvent::new(ProgressStep::Reading, "Reading PDF file"));
    validate::check_file(path, config::MAX_FILE_SIZE_BYTES)?;
    let data = std::fs::read(path)?;

    observer.on_progress(ProgressEvent::new(
        ProgressStep::Parsing,
        "Parsing PDF document",
    ));
    let extractor = PdfExtractor::from_bytes(&data)?;

    extractor.extract_pages(pages, observer)
}
