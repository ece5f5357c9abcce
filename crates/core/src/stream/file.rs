//! Local file byte-stream source

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

use super::{ByteStream, DirEntry};

/// Byte-stream source backed by a local file or directory
///
/// A regular file supports reads, seeks, and a known size. A directory
/// supports only [`read_dir`](ByteStream::read_dir), which is how directory
/// listings enter a filter chain.
pub struct FileStream {
    path: PathBuf,
    size: Option<u64>,
    kind: Kind,
}

enum Kind {
    File(File),
    Directory,
}

impl FileStream {
    /// Open a stream over the file or directory at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let meta = std::fs::metadata(&path)?;
        if meta.is_dir() {
            Ok(Self {
                path,
                size: None,
                kind: Kind::Directory,
            })
        } else {
            let file = File::open(&path)?;
            Ok(Self {
                path,
                size: Some(meta.len()),
                kind: Kind::File(file),
            })
        }
    }

    /// Path this stream was opened on
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `file://` URL for this stream
    pub fn url(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

impl ByteStream for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match &mut self.kind {
            Kind::File(file) => Ok(file.read(buf)?),
            Kind::Directory => Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot read bytes from a directory",
            ))),
        }
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        match &mut self.kind {
            Kind::File(file) => {
                file.seek(SeekFrom::Start(position))?;
                Ok(())
            }
            Kind::Directory => Err(Error::NotSeekable),
        }
    }

    fn can_seek(&self) -> bool {
        matches!(self.kind, Kind::File(_))
    }

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn read_dir(&mut self) -> Result<Vec<DirEntry>> {
        match self.kind {
            Kind::Directory => {
                let mut entries = Vec::new();
                for entry in std::fs::read_dir(&self.path)? {
                    let entry = entry?;
                    let name = entry.file_name().to_string_lossy().into_owned();
                    let url = format!("file://{}", entry.path().display());
                    entries.push(DirEntry { name, url });
                }
                // Directory iteration order is platform-dependent
                entries.sort_by(|a, b| a.name.cmp(&b.name));
                Ok(entries)
            }
            Kind::File(_) => Err(Error::NotADirectory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_read_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let mut stream = FileStream::open(&path).unwrap();
        assert!(stream.can_seek());
        assert_eq!(stream.size(), Some(10));

        stream.seek(5).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(stream.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"56789");
    }

    #[test]
    fn test_directory_listing_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"b").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let mut stream = FileStream::open(dir.path()).unwrap();
        assert!(!stream.can_seek());

        let entries = stream.read_dir().unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
        assert!(entries[0].url.starts_with("file://"));
    }

    #[test]
    fn test_file_has_no_listing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"x").unwrap();

        let mut stream = FileStream::open(&path).unwrap();
        assert!(matches!(stream.read_dir(), Err(Error::NotADirectory)));
    }
}
