//! PDF parsing and reading-order text reconstruction.

mod extractor;
mod layout;
mod options;

pub use extractor::{document_info, PdfExtractor};
pub use layout::{group_into_lines, reconstruct_page_text, ReconstructedLine, TextFragment};
pub use options::ExtractOptions;
