//! Format-specific document readers

use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::error::IngestError;

/// Reads a document from disk and returns its raw text
pub trait DocumentReader: Send + Sync {
    /// Lowercase extensions handled by this reader
    fn extensions(&self) -> &'static [&'static str];

    fn read(&self, path: &Path) -> Result<String, IngestError>;
}

/// Plain text. Invalid UTF-8 sequences are replaced, not rejected.
pub struct TextReader;

impl DocumentReader for TextReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["txt"]
    }

    fn read(&self, path: &Path) -> Result<String, IngestError> {
        let bytes = read_bytes(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// PDF text layer via `pdf-extract`
pub struct PdfReader;

impl DocumentReader for PdfReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn read(&self, path: &Path) -> Result<String, IngestError> {
        let data = read_bytes(path)?;
        if data.len() < 5 || &data[0..4] != b"%PDF" {
            return Err(IngestError::Pdf {
                path: path.to_path_buf(),
                message: "missing %PDF header".to_string(),
            });
        }

        // pdf-extract panics on some malformed inputs
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&data)
        }))
        .map_err(|_| IngestError::Pdf {
            path: path.to_path_buf(),
            message: "extractor panicked".to_string(),
        })?;

        extracted.map_err(|e| IngestError::Pdf {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Word-processor documents (Office Open XML)
pub struct DocxReader;

const DOCX_BODY: &str = "word/document.xml";

impl DocumentReader for DocxReader {
    fn extensions(&self) -> &'static [&'static str] {
        &["docx"]
    }

    fn read(&self, path: &Path) -> Result<String, IngestError> {
        let docx_err = |message: String| IngestError::Docx {
            path: path.to_path_buf(),
            message,
        };

        let file = fs::File::open(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| docx_err(e.to_string()))?;
        let mut body = archive
            .by_name(DOCX_BODY)
            .map_err(|e| docx_err(format!("{DOCX_BODY}: {e}")))?;

        let mut xml = String::new();
        body.read_to_string(&mut xml)
            .map_err(|e| docx_err(e.to_string()))?;

        docx_paragraphs(&xml).map_err(docx_err)
    }
}

/// Extract the text of each non-empty paragraph, joined with newlines
pub fn docx_paragraphs(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, IngestError> {
    fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Dispatches to a reader by file extension
pub struct ReaderRegistry {
    readers: Vec<Box<dyn DocumentReader>>,
}

impl ReaderRegistry {
    pub fn new(readers: Vec<Box<dyn DocumentReader>>) -> Self {
        Self { readers }
    }

    /// Find the reader for a path's extension
    pub fn reader_for(&self, path: &Path) -> Option<&dyn DocumentReader> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.readers
            .iter()
            .find(|r| r.extensions().contains(&ext.as_str()))
            .map(|r| r.as_ref())
    }

    /// Read a document with the matching reader
    pub fn read(&self, path: &Path) -> Result<String, IngestError> {
        self.reader_for(path)
            .ok_or_else(|| IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            })?
            .read(path)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::new(vec![
            Box::new(TextReader),
            Box::new(PdfReader),
            Box::new(DocxReader),
        ])
    }
}
