use crate::file::r#trait::{measure_size, DocumentSource};
use crate::utils::bytes_to_mb;
use std::io::{self, Cursor};

/// A file received from a client: its declared name and a seekable body
#[derive(Debug)]
pub struct UploadedFile<R> {
    filename: String,
    reader: R,
}

impl<R: DocumentSource> UploadedFile<R> {
    pub fn new(filename: impl Into<String>, reader: R) -> Self {
        Self {
            filename: filename.into(),
            reader,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Size in bytes; the read position is reset to the start afterwards
    pub fn size(&mut self) -> io::Result<u64> {
        measure_size(&mut self.reader)
    }

    pub fn source(&mut self) -> &mut dyn DocumentSource {
        &mut self.reader
    }
}

impl UploadedFile<Cursor<Vec<u8>>> {
    /// Wrap an in-memory upload
    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(filename, Cursor::new(bytes))
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    filename: String,
    size_bytes: u64,
    content: String,
    file_type: String,
    full_path: String,
}

impl UploadOutcome {
    pub fn new(
        filename: String,
        size_bytes: u64,
        content: String,
        file_type: String,
        full_path: String,
    ) -> Self {
        Self {
            filename,
            size_bytes,
            content,
            file_type,
            full_path,
        }
    }

    /// Sanitized filename
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Size in MiB rounded to 2 decimals
    pub fn file_size_mb(&self) -> f64 {
        bytes_to_mb(self.size_bytes)
    }

    /// Extracted text, already truncated to the preview cap
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Where the upload was stored, or a `temporary-` placeholder
    pub fn full_path(&self) -> &str {
        &self.full_path
    }
}
