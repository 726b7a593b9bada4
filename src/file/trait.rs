use crate::error::PipelineError;
use std::io::{self, Read, Seek, SeekFrom};

/// A readable, rewindable upload body
pub trait DocumentSource: Read + Seek {}

impl<T: Read + Seek> DocumentSource for T {}

/// Measure the total size of a source, leaving its cursor at byte 0
pub fn measure_size(source: &mut dyn DocumentSource) -> io::Result<u64> {
    let size = source.seek(SeekFrom::End(0))?;
    source.seek(SeekFrom::Start(0))?;
    Ok(size)
}

/// Read a whole source from byte 0, whatever its current position
pub fn read_from_start(source: &mut dyn DocumentSource) -> io::Result<Vec<u8>> {
    source.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Trait for format-specific text extractors
pub trait TextExtractor: Send + Sync {
    /// Extract text from the complete document bytes (internal implementation)
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String, PipelineError>;

    /// Build the processing error reported for failures outside the document itself
    fn processing_error(&self, detail: String) -> PipelineError;

    /// Extension handled by this extractor (lowercase, without the dot)
    fn extension(&self) -> &'static str;

    /// Extract text from a source (public API, always reads from byte 0)
    fn extract(&self, source: &mut dyn DocumentSource) -> Result<String, PipelineError> {
        let bytes = read_from_start(source).map_err(|e| self.processing_error(e.to_string()))?;
        self.extract_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_measure_size_rewinds() {
        let mut cursor = Cursor::new(b"twelve bytes".to_vec());
        cursor.seek(SeekFrom::Start(4)).unwrap();

        assert_eq!(measure_size(&mut cursor).unwrap(), 12);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_read_from_start_ignores_cursor() {
        let mut cursor = Cursor::new(b"abcdef".to_vec());
        cursor.seek(SeekFrom::End(0)).unwrap();

        assert_eq!(read_from_start(&mut cursor).unwrap(), b"abcdef");
    }
}
