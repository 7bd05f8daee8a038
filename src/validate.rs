//! PDF file validation.
//!
//! Cheap checks that run before any real parsing: magic bytes, header
//! version, extension, and size limits.

use crate::config::MAX_FILE_SIZE_BYTES;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: `%PDF-`.
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g. "1.7"

/// PDF header information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version from the header (e.g. "1.7", "2.0").
    pub version: String,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Detect the PDF header from raw bytes.
///
/// Needs at least the first 8 bytes of the file. Returns
/// [`Error::UnknownFormat`] when the magic is missing or the version string
/// is malformed.
pub fn detect_format(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnknownFormat);
    }

    Ok(PdfFormat { version })
}

fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check whether bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format(data).is_ok()
}

/// Validate a PDF file on disk before parsing: extension, non-empty, size
/// limit, and header magic.
pub fn check_file<P: AsRef<Path>>(path: P, max_size: u64) -> Result<PdfFormat> {
    let path = path.as_ref();

    let has_pdf_ext = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !has_pdf_ext {
        return Err(Error::InvalidInput(
            "file must have a .pdf extension".to_string(),
        ));
    }

    let size = std::fs::metadata(path)?.len();
    if size == 0 {
        return Err(Error::InvalidInput("file is empty".to_string()));
    }
    if size > max_size {
        return Err(Error::InvalidInput(format!(
            "file is too large ({} bytes, maximum {})",
            size, max_size
        )));
    }

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let read = reader.read(&mut header)?;
    detect_format(&header[..read])
}

/// Validate a PDF held in memory: non-empty, size limit, header magic.
pub fn check_bytes(data: &[u8], max_size: u64) -> Result<PdfFormat> {
    if data.is_empty() {
        return Err(Error::InvalidInput("file is empty".to_string()));
    }
    if data.len() as u64 > max_size {
        return Err(Error::InvalidInput(format!(
            "file is too large ({} bytes, maximum {})",
            data.len(),
            max_size
        )));
    }
    detect_format(data)
}

/// Convenience check with the default size limit.
pub fn is_valid_pdf<P: AsRef<Path>>(path: P) -> bool {
    check_file(path, MAX_FILE_SIZE_BYTES).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        let format = detect_format(data).unwrap();
        assert_eq!(format.version, "1.7");
    }

    #[test]
    fn test_detect_pdf_2_0() {
        let data = b"%PDF-2.0\n%\xe2\xe3\xcf\xd3";
        let format = detect_format(data).unwrap();
        assert_eq!(format.version, "2.0");
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        let result = detect_format(b"%PDF");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\ntest"));
        assert!(!is_pdf_bytes(b"Not a PDF file"));
        assert!(!is_pdf_bytes(b""));
    }

    #[test]
    fn test_check_bytes_size_limit() {
        let data = b"%PDF-1.4\n0123456789";
        assert!(check_bytes(data, 1024).is_ok());
        let result = check_bytes(data, 4);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_check_file_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-1.4\n")
            .unwrap();

        let result = check_file(&path, MAX_FILE_SIZE_BYTES);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_check_file_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        std::fs::File::create(&path).unwrap();

        let result = check_file(&path, MAX_FILE_SIZE_BYTES);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
