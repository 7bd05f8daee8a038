//! Whole-document extraction built on lopdf.
//!
//! [`PdfExtractor`] owns the parsed document and orchestrates per-page
//! reconstruction. Per-page failures degrade that page to empty text and a
//! logged warning; only document-level problems (corrupt file, encryption,
//! nothing extractable at all) surface as errors.

use std::collections::BTreeSet;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{
    parse_pdf_date, DocumentExtractionResult, DocumentMetadata, PageExtraction, PagePreviews,
};
use crate::progress::{ProgressEvent, ProgressObserver, ProgressStep};
use crate::sanitize::TextSanitizer;
use crate::validate;

use super::layout::{reconstruct_page_text, TextFragment};
use super::options::ExtractOptions;

/// PDF text extractor.
///
/// Owns the document handle; dropping the extractor releases it on every
/// exit path, including early failure.
pub struct PdfExtractor {
    doc: LopdfDocument,
    options: ExtractOptions,
    sanitizer: TextSanitizer,
}

impl PdfExtractor {
    /// Open a PDF file, validating extension, size, and header first.
    ///
    /// Fails with [`Error::Encrypted`] for password-protected documents and
    /// [`Error::InvalidPdf`] for corrupt ones; both are terminal for the
    /// whole document.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        validate::check_file(&path, options.max_file_size)?;
        let doc = LopdfDocument::load(path).map_err(Error::from)?;
        Self::from_document(doc, options)
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Parse a PDF held in memory with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        validate::check_bytes(data, options.max_file_size)?;
        let doc = LopdfDocument::load_mem(data).map_err(Error::from)?;
        Self::from_document(doc, options)
    }

    fn from_document(doc: LopdfDocument, options: ExtractOptions) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self {
            doc,
            options,
            sanitizer: TextSanitizer::new(),
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Document metadata from the trailer info dictionary.
    pub fn metadata(&self) -> DocumentMetadata {
        let mut metadata = DocumentMetadata {
            num_pages: self.page_count(),
            version: Some(self.doc.version.clone()),
            ..Default::default()
        };

        if let Ok(info) = self.doc.trailer.get(b"Info") {
            if let Ok(info_ref) = info.as_reference() {
                if let Ok(info_dict) = self.doc.get_dictionary(info_ref) {
                    metadata.title = dict_string(info_dict, b"Title");
                    metadata.author = dict_string(info_dict, b"Author");
                    metadata.creator = dict_string(info_dict, b"Creator");
                    metadata.producer = dict_string(info_dict, b"Producer");
                    metadata.created =
                        dict_string(info_dict, b"CreationDate").and_then(|d| parse_pdf_date(&d));
                    metadata.modified =
                        dict_string(info_dict, b"ModDate").and_then(|d| parse_pdf_date(&d));
                }
            }
        }

        metadata
    }

    /// Extract one page, degrading to an empty record on failure.
    ///
    /// A failure here never aborts extraction of other pages.
    pub fn extract_page(&self, page_number: u32) -> PageExtraction {
        match self.page_fragments(page_number) {
            Ok(fragments) => {
                PageExtraction::from_text(page_number, reconstruct_page_text(fragments))
            }
            Err(err) => {
                log::warn!("failed to extract text from page {page_number}: {err}");
                PageExtraction::empty(page_number)
            }
        }
    }

    /// Extract every page and classify the document.
    pub fn extract_document(
        &self,
        observer: &mut dyn ProgressObserver,
    ) -> Result<DocumentExtractionResult> {
        let total_pages = self.page_count();
        observer.on_progress(ProgressEvent::new(
            ProgressStep::Extracting,
            format!("Extracting text from {total_pages} pages"),
        ));

        let mut pages = Vec::with_capacity(total_pages as usize);
        for page_number in 1..=total_pages {
            pages.push(self.extract_page(page_number));

            let percent = (page_number * 100 / total_pages.max(1)) as u8;
            observer.on_progress(ProgressEvent::with_percent(
                ProgressStep::Extracting,
                format!("Extracting text ({page_number}/{total_pages} pages)"),
                percent,
            ));
        }

        let is_likely_scanned = self.classify_scanned(&pages);

        Ok(DocumentExtractionResult {
            pages,
            total_pages,
            is_likely_scanned,
        })
    }

    /// Extract and sanitize the whole document into one text.
    ///
    /// Fails with [`Error::EmptyDocument`] when the sanitized result is
    /// empty (image-only or unreadable document).
    pub fn extract_full(&self, observer: &mut dyn ProgressObserver) -> Result<String> {
        let result = self.extract_document(observer)?;
        self.finish(result.combined_text(), observer)
    }

    /// Extract and sanitize a subset of pages, consumed in ascending order
    /// regardless of how the selection was assembled.
    ///
    /// Fails with [`Error::InvalidSelection`] when the set is empty or no
    /// member falls within the document.
    pub fn extract_pages(
        &self,
        pages: &BTreeSet<u32>,
        observer: &mut dyn ProgressObserver,
    ) -> Result<String> {
        if pages.is_empty() {
            return Err(Error::InvalidSelection("no pages selected".to_string()));
        }

        let total_pages = self.page_count();
        let wanted: Vec<u32> = pages
            .iter()
            .copied()
            .filter(|p| (1..=total_pages).contains(p))
            .collect();
        if wanted.is_empty() {
            return Err(Error::InvalidSelection(format!(
                "no selected page within 1..={total_pages}"
            )));
        }

        observer.on_progress(ProgressEvent::new(
            ProgressStep::Extracting,
            format!("Extracting text from {} selected pages", wanted.len()),
        ));

        let mut extracted = Vec::with_capacity(wanted.len());
        for (index, page_number) in wanted.iter().enumerate() {
            extracted.push(self.extract_page(*page_number));

            let percent = ((index + 1) * 100 / wanted.len()) as u8;
            observer.on_progress(ProgressEvent::with_percent(
                ProgressStep::Extracting,
                format!("Extracting text ({}/{} pages)", index + 1, wanted.len()),
                percent,
            ));
        }

        let combined = extracted
            .iter()
            .filter(|p| p.has_text)
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        self.finish(combined, observer)
    }

    fn finish(&self, combined: String, observer: &mut dyn ProgressObserver) -> Result<String> {
        observer.on_progress(ProgressEvent::new(
            ProgressStep::Cleaning,
            "Cleaning extracted text",
        ));

        let text = self.sanitizer.normalize(&combined);
        if text.is_empty() {
            return Err(Error::EmptyDocument);
        }

        observer.on_progress(ProgressEvent::new(
            ProgressStep::Completed,
            "Extraction finished",
        ));
        Ok(text)
    }

    /// Reconstruct preview snippets for at most `max_pages` pages.
    ///
    /// `total_pages` always reflects the true page count, even when fewer
    /// pages were previewed.
    pub fn page_previews(&self, max_pages: usize) -> PagePreviews {
        let total_pages = self.page_count();
        let preview_count = (total_pages as usize).min(max_pages);

        let previews = (1..=preview_count as u32)
            .map(|page_number| {
                self.extract_page(page_number)
                    .truncated(self.options.preview_text_len)
            })
            .collect();

        PagePreviews {
            total_pages,
            previews,
        }
    }

    /// Heuristic for image-only documents: sample the first few pages and
    /// report true when the average extracted character count stays below
    /// the configured threshold.
    pub fn is_likely_scanned(&self) -> bool {
        let total_pages = self.page_count();
        if total_pages == 0 {
            return false;
        }

        let sample: Vec<PageExtraction> = (1..=total_pages.min(self.options.scanned_sample_pages))
            .map(|page_number| self.extract_page(page_number))
            .collect();
        self.classify_scanned(&sample)
    }

    fn classify_scanned(&self, pages: &[PageExtraction]) -> bool {
        let sample_count = pages
            .len()
            .min(self.options.scanned_sample_pages as usize);
        if sample_count == 0 {
            return false;
        }

        let total_chars: usize = pages[..sample_count]
            .iter()
            .map(|p| p.text.chars().count())
            .sum();
        (total_chars as f32 / sample_count as f32) < self.options.scanned_char_threshold
    }

    /// Positioned text fragments for one page, in drawing order.
    fn page_fragments(&self, page_number: u32) -> Result<Vec<TextFragment>> {
        let pages = self.doc.get_pages();
        let page_id = *pages
            .get(&page_number)
            .ok_or(Error::PageOutOfRange(page_number, pages.len() as u32))?;

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::InvalidPdf(e.to_string()))?;

        let content = self.page_content(page_id)?;
        self.parse_content_stream(&content, &fonts)
    }

    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::InvalidPdf(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::InvalidPdf(e.to_string()))?;

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => s
                    .decompressed_content()
                    .map_err(|e| Error::InvalidPdf(e.to_string())),
                _ => Err(Error::InvalidPdf("invalid content stream".to_string())),
            },
            Object::Stream(s) => s
                .decompressed_content()
                .map_err(|e| Error::InvalidPdf(e.to_string())),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::InvalidPdf("invalid content stream".to_string())),
        }
    }

    /// Walk the content-stream operators and collect positioned fragments.
    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &std::collections::BTreeMap<Vec<u8>, &Dictionary>,
    ) -> Result<Vec<TextFragment>> {
        let content = Content::decode(content).map_err(|e| Error::InvalidPdf(e.to_string()))?;

        let mut fragments = Vec::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            current_font_name = name.clone();
                        }
                        current_font_size = number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = number(&op.operands[0]).unwrap_or(0.0);
                        let ty = number(&op.operands[1]).unwrap_or(0.0);
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            number(&op.operands[0]).unwrap_or(1.0),
                            number(&op.operands[1]).unwrap_or(0.0),
                            number(&op.operands[2]).unwrap_or(0.0),
                            number(&op.operands[3]).unwrap_or(1.0),
                            number(&op.operands[4]).unwrap_or(0.0),
                            number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if !in_text_block {
                        continue;
                    }
                    let text = if op.operator == "TJ" {
                        self.decode_tj_array(op.operands.first(), fonts, &current_font_name)
                    } else {
                        match op.operands.first() {
                            Some(Object::String(bytes, _)) => {
                                self.decode_string(bytes, fonts, &current_font_name)
                            }
                            _ => String::new(),
                        }
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = matrix.position();
                        let size = current_font_size * matrix.scale();
                        fragments.push(TextFragment::new(
                            text.clone(),
                            x,
                            y,
                            estimate_width(&text, size),
                        ));
                    }
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if !in_text_block {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = self.decode_string(bytes, fonts, &current_font_name);
                        if !text.trim().is_empty() {
                            let (x, y) = matrix.position();
                            let size = current_font_size * matrix.scale();
                            fragments.push(TextFragment::new(
                                text.clone(),
                                x,
                                y,
                                estimate_width(&text, size),
                            ));
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(fragments)
    }

    /// TJ operand: array of strings interleaved with kerning adjustments in
    /// 1/1000 text-space units. Large negative adjustments are word spaces
    /// the renderer expressed as positioning.
    fn decode_tj_array(
        &self,
        operand: Option<&Object>,
        fonts: &std::collections::BTreeMap<Vec<u8>, &Dictionary>,
        font_name: &[u8],
    ) -> String {
        let Some(Object::Array(items)) = operand else {
            return String::new();
        };

        let space_threshold = 200.0;
        let mut combined = String::new();

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    combined.push_str(&self.decode_string(bytes, fonts, font_name));
                }
                Object::Integer(n) => {
                    if -(*n as f32) > space_threshold && !combined.ends_with(' ') {
                        combined.push(' ');
                    }
                }
                Object::Real(n) => {
                    if -n > space_threshold && !combined.ends_with(' ') {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }

        combined
    }

    fn decode_string(
        &self,
        bytes: &[u8],
        fonts: &std::collections::BTreeMap<Vec<u8>, &Dictionary>,
        font_name: &[u8],
    ) -> String {
        let encoding = fonts
            .get(font_name)
            .and_then(|f| f.get_font_encoding(&self.doc).ok());

        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        }
    }
}

/// Best-effort document metadata for a file on disk.
///
/// Never fails: a document that cannot be parsed yields `num_pages: 0`
/// (and `encrypted: true` for password-protected files), since metadata
/// display is non-critical.
pub fn document_info<P: AsRef<Path>>(path: P) -> DocumentMetadata {
    let path = path.as_ref();

    let mut metadata = match PdfExtractor::open(path) {
        Ok(extractor) => extractor.metadata(),
        Err(Error::Encrypted) => DocumentMetadata {
            encrypted: true,
            ..Default::default()
        },
        Err(err) => {
            log::warn!("failed to read metadata from {}: {err}", path.display());
            DocumentMetadata::default()
        }
    };

    if let Ok(fs_meta) = std::fs::metadata(path) {
        metadata.file_size = Some(fs_meta.len());
    }
    metadata.file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    metadata
}

/// Text matrix tracking the current drawing position.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // x translation
    f: f32, // y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; a TL operator would refine this
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Read a string value out of a PDF dictionary.
fn dict_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        _ => None,
    })
}

/// Helper to extract a number from a PDF object.
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Advance-width estimate when the font carries no usable metrics:
/// half an em per character.
fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

/// Decoding fallback when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"hello"), "hello");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_decode_text_simple_latin1_fallback() {
        // 0xE9 alone is invalid UTF-8 but valid Latin-1 ('é')
        assert_eq!(decode_text_simple(&[0x63, 0x61, 0x66, 0xE9]), "café");
    }

    #[test]
    fn test_estimate_width() {
        assert!((estimate_width("Hello", 12.0) - 30.0).abs() < f32::EPSILON);
        assert_eq!(estimate_width("", 12.0), 0.0);
    }

    #[test]
    fn test_text_matrix_translate() {
        let mut m = TextMatrix::default();
        m.translate(10.0, 20.0);
        assert_eq!(m.position(), (10.0, 20.0));
        m.translate(5.0, -2.0);
        assert_eq!(m.position(), (15.0, 18.0));
    }

    #[test]
    fn test_text_matrix_set_and_scale() {
        let mut m = TextMatrix::default();
        m.set(2.0, 0.0, 0.0, 2.0, 30.0, 40.0);
        assert_eq!(m.position(), (30.0, 40.0));
        assert!((m.scale() - 2.0).abs() < f32::EPSILON);
    }
}
