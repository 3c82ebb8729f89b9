//! Ingest module - input discovery and text extraction
//!
//! [`discover`] finds candidate documents under the input root and a
//! [`ReaderRegistry`] turns each one into raw text by extension.

pub mod discovery;
pub mod readers;

pub use discovery::{discover, InputDocument, ACCEPTED_EXTENSIONS};
pub use readers::{DocumentReader, DocxReader, PdfReader, ReaderRegistry, TextReader};
