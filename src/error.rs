//! Error types for the veritext library.

use std::io;
use thiserror::Error;

/// Result type alias for veritext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during extraction or detection.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The input file or text failed validation before processing.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Normalized text is below the minimum length for analysis.
    #[error("Text too short for analysis ({0} characters, minimum 10)")]
    TextTooShort(usize),

    /// Normalized text exceeds the maximum length for analysis.
    #[error("Text too long for analysis ({0} characters, maximum 50000)")]
    TextTooLong(usize),

    /// The PDF structure is corrupted or unparsable.
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// The PDF document is password-protected.
    #[error("Document is encrypted")]
    Encrypted,

    /// Extraction produced no text for the whole document.
    #[error("No extractable text in document")]
    EmptyDocument,

    /// The requested page set is empty or entirely out of range.
    #[error("Invalid page selection: {0}")]
    InvalidSelection(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Transport-level failure talking to the detection service.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The detection service throttled the request (HTTP 429).
    #[error("Detection service rate limit reached, try again later")]
    RateLimited,

    /// The detection service refused the request (HTTP 403).
    #[error("Access to detection service forbidden")]
    Forbidden,

    /// The detection service rejected a submission.
    #[error("Submission rejected: {0}")]
    SubmitRejected(String),

    /// The detection service does not know the task id.
    #[error("Detection task not found")]
    TaskNotFound,

    /// The poll loop exhausted its attempts without a result.
    #[error("Timed out waiting for detection result")]
    PollTimeout,

    /// The detection service reported its own analysis failure.
    #[error("Detection service reported failure: {0}")]
    RemoteAnalysis(String),
}

/// Coarse classification used to pick user-facing messaging:
/// fix the input, retry later, or report a service problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller's input is at fault; retrying without changes won't help.
    Input,
    /// Transient condition; retrying later may succeed.
    Transient,
    /// The remote service failed; retrying is unlikely to help soon.
    Service,
}

impl Error {
    /// Classify this error for retry-vs-abort messaging.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Io(_)
            | Error::UnknownFormat
            | Error::InvalidInput(_)
            | Error::TextTooShort(_)
            | Error::TextTooLong(_)
            | Error::InvalidPdf(_)
            | Error::Encrypted
            | Error::EmptyDocument
            | Error::InvalidSelection(_)
            | Error::PageOutOfRange(_, _) => ErrorClass::Input,
            Error::Network(_) | Error::RateLimited | Error::PollTimeout => ErrorClass::Transient,
            Error::Forbidden
            | Error::SubmitRejected(_)
            | Error::TaskNotFound
            | Error::RemoteAnalysis(_) => ErrorClass::Service,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::InvalidPdf(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_classification() {
        assert_eq!(Error::TextTooShort(3).class(), ErrorClass::Input);
        assert_eq!(Error::Encrypted.class(), ErrorClass::Input);
        assert_eq!(Error::RateLimited.class(), ErrorClass::Transient);
        assert_eq!(Error::PollTimeout.class(), ErrorClass::Transient);
        assert_eq!(Error::TaskNotFound.class(), ErrorClass::Service);
        assert_eq!(
            Error::RemoteAnalysis("upstream died".into()).class(),
            ErrorClass::Service
        );
    }
}
