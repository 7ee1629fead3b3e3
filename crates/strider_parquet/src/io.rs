//! Byte sources for reading column chunks.
use std::fmt::Debug;
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use strider_error::{ErrorKind, Result, StriderError};

/// A seekable source of bytes for a parquet file.
///
/// Every column reader gets its own fork of the source so that columns can be
/// read independently (and from different threads) without sharing a cursor.
pub trait ChunkSource: Read + Seek + Send + Sync + Debug {
    /// Create a new handle to the same underlying bytes.
    ///
    /// The returned handle has its own position, starting at the beginning.
    /// Seeking or reading on one handle never moves another.
    fn fork(&self) -> Result<Box<dyn ChunkSource>>;
}

/// Source over in-memory bytes.
#[derive(Debug, Clone)]
pub struct MemorySource {
    inner: Cursor<Bytes>,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        MemorySource {
            inner: Cursor::new(data.into()),
        }
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }
}

impl Read for MemorySource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for MemorySource {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl ChunkSource for MemorySource {
    fn fork(&self) -> Result<Box<dyn ChunkSource>> {
        // Cloning bytes is just a ref count bump.
        Ok(Box::new(MemorySource::new(self.inner.get_ref().clone())))
    }
}

/// Source over a local file.
///
/// Forks re-open the file so each handle gets its own OS level file offset.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: File,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| {
            StriderError::with_source(format!("Failed to open {}", path.display()), Box::new(e))
                .with_kind(ErrorKind::Io)
        })?;
        Ok(FileSource { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for FileSource {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

impl ChunkSource for FileSource {
    fn fork(&self) -> Result<Box<dyn ChunkSource>> {
        Ok(Box::new(FileSource::open(&self.path)?))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn memory_forks_independent() {
        let mut source = MemorySource::new(Bytes::from_static(b"abcdef"));
        source.seek(SeekFrom::Start(4)).unwrap();

        let mut fork = source.fork().unwrap();
        let mut buf = [0; 2];
        fork.read_exact(&mut buf).unwrap();
        assert_eq!(b"ab", &buf);

        source.read_exact(&mut buf).unwrap();
        assert_eq!(b"ef", &buf);
        assert_eq!(6, source.position());
    }

    #[test]
    fn file_forks_independent() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"0123456789").unwrap();
        tmp.flush().unwrap();

        let mut source = FileSource::open(tmp.path()).unwrap();
        let mut fork = source.fork().unwrap();

        source.seek(SeekFrom::Start(8)).unwrap();
        fork.seek(SeekFrom::Start(2)).unwrap();

        let mut buf = [0; 2];
        source.read_exact(&mut buf).unwrap();
        assert_eq!(b"89", &buf);
        fork.read_exact(&mut buf).unwrap();
        assert_eq!(b"23", &buf);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::open(dir.path().join("missing.parquet")).unwrap_err();
        assert_eq!(ErrorKind::Io, err.kind());
        assert!(err.to_string().contains("missing.parquet"));
    }
}
