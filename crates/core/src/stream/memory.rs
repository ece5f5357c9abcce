//! In-memory byte-stream source

use std::io::Cursor;

use crate::Result;

use super::ByteStream;

/// Seekable in-memory byte-stream source
///
/// Mostly useful for tests and for feeding already-buffered payloads
/// through a filter chain.
pub struct MemoryStream {
    cursor: Cursor<Vec<u8>>,
}

impl MemoryStream {
    /// Create a stream over the given bytes, positioned at the start
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            cursor: Cursor::new(data.into()),
        }
    }
}

impl ByteStream for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = std::io::Read::read(&mut self.cursor, buf)?;
        Ok(n)
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        self.cursor.set_position(position);
        Ok(())
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn size(&self) -> Option<u64> {
        Some(self.cursor.get_ref().len() as u64)
    }
}
