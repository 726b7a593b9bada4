use crate::constants::TEMPORARY_PATH_PREFIX;
use crate::file::DocumentSource;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, SeekFrom};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Best-effort store for uploaded files
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write the whole source to `<dir>/<filename>`, replacing any existing file
    ///
    /// `filename` must already be sanitized.
    pub fn save(&self, source: &mut dyn DocumentSource, filename: &str) -> Result<PathBuf> {
        if filename.is_empty() {
            bail!("Sanitized filename is empty");
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create storage dir: {}", self.dir.display()))?;

        let path = self.dir.join(filename);
        source.seek(SeekFrom::Start(0))?;
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        if let Err(e) = io::copy(source, &mut file) {
            drop(file);
            // A partial copy must not be left behind
            if let Err(remove_err) = std::fs::remove_file(&path) {
                debug!(path = %path.display(), error = %remove_err, "could not remove partial upload");
            }
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to write file: {}", path.display())));
        }

        Ok(path)
    }

    /// Save the source, or return a `temporary-<filename>` placeholder on any failure
    pub fn save_or_placeholder(&self, source: &mut dyn DocumentSource, filename: &str) -> String {
        match self.save(source, filename) {
            Ok(path) => {
                debug!(path = %path.display(), "stored upload");
                path.display().to_string()
            }
            Err(e) => {
                warn!(filename, error = %format!("{:#}", e), "could not store upload, continuing without it");
                format!("{}{}", TEMPORARY_PATH_PREFIX, filename)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read, Seek};

    /// Source whose reads fail after the first chunk
    struct InterruptedSource {
        inner: Cursor<Vec<u8>>,
        reads: usize,
    }

    impl Read for InterruptedSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.reads > 1 {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away"));
            }
            let len = buf.len().min(4);
            self.inner.read(&mut buf[..len])
        }
    }

    impl Seek for InterruptedSource {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_save_writes_full_content() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("uploads"));
        let mut source = Cursor::new(b"%PDF-1.5 body".to_vec());
        source.seek(SeekFrom::End(0)).unwrap();

        let path = store.save(&mut source, "resume.pdf").unwrap();
        assert_eq!(path, dir.path().join("uploads").join("resume.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5 body");
    }

    #[test]
    fn test_save_rejects_empty_name() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let mut source = Cursor::new(b"data".to_vec());

        assert!(store.save(&mut source, "").is_err());
    }

    #[test]
    fn test_placeholder_when_dir_unwritable() {
        // A regular file cannot hold a storage directory
        let blocker = NamedTempFile::new().unwrap();
        let store = FileStore::new(blocker.path().join("uploads"));
        let mut source = Cursor::new(b"data".to_vec());

        let path = store.save_or_placeholder(&mut source, "resume.pdf");
        assert_eq!(path, "temporary-resume.pdf");
    }

    #[test]
    fn test_save_or_placeholder_returns_stored_path() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let mut source = Cursor::new(b"data".to_vec());

        let path = store.save_or_placeholder(&mut source, "cv.docx");
        assert_eq!(path, dir.path().join("cv.docx").display().to_string());
    }

    #[test]
    fn test_failed_copy_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let mut source = InterruptedSource {
            inner: Cursor::new(b"%PDF-1.5 body".to_vec()),
            reads: 0,
        };

        assert!(store.save(&mut source, "resume.pdf").is_err());
        assert!(!dir.path().join("resume.pdf").exists());

        source.reads = 0;
        let path = store.save_or_placeholder(&mut source, "resume.pdf");
        assert_eq!(path, "temporary-resume.pdf");
        assert!(!dir.path().join("resume.pdf").exists());
    }
}
