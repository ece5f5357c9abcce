//! Gzip decompression filter
//!
//! Auto-probed by magic-byte sniffing: any stream starting with the gzip
//! magic gets transparently decompressed. The member header is consumed on
//! the first read; payload bytes then stream through a raw deflate decoder.
//! Only the first member of a multi-member file is exposed.

use flate2::{Decompress, FlushDecompress, Status};

use crate::stream::StreamHandle;
use crate::{Error, Result};

use super::{FilterPlugin, StreamFilter};

/// Gzip member magic (RFC 1952)
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Deflate compression method id in the member header
const CM_DEFLATE: u8 = 8;

// Member header flag bits
const FHCRC: u8 = 1 << 1;
const FEXTRA: u8 = 1 << 2;
const FNAME: u8 = 1 << 3;
const FCOMMENT: u8 = 1 << 4;

const INPUT_CHUNK: usize = 8 * 1024;

/// Plugin for the `gzip` filter
pub struct GzipPlugin;

impl FilterPlugin for GzipPlugin {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn open(&self, source: &mut StreamHandle) -> Result<Box<dyn StreamFilter>> {
        let magic = source.peek(GZIP_MAGIC.len())?;
        if magic != &GZIP_MAGIC[..] {
            return Err(Error::Decompress("not a gzip stream".to_string()));
        }
        Ok(Box::new(GzipFilter::new()))
    }
}

/// Streaming gzip decompressor over the inner handle
pub struct GzipFilter {
    decoder: Decompress,
    input: Vec<u8>,
    start: usize,
    end: usize,
    /// Inner handle reached end of stream
    eof: bool,
    /// Member header fully consumed
    header_done: bool,
    /// Deflate stream fully decoded; the trailer is ignored
    finished: bool,
}

impl GzipFilter {
    fn new() -> Self {
        Self {
            decoder: Decompress::new(false),
            input: vec![0; INPUT_CHUNK],
            start: 0,
            end: 0,
            eof: false,
            header_done: false,
            finished: false,
        }
    }
}

impl StreamFilter for GzipFilter {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn read(&mut self, source: &mut StreamHandle, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() || self.finished {
            return Ok(0);
        }
        if !self.header_done {
            read_member_header(source)?;
            self.header_done = true;
        }
        loop {
            if self.start == self.end && !self.eof {
                let n = source.read(&mut self.input)?;
                self.start = 0;
                self.end = n;
                if n == 0 {
                    self.eof = true;
                }
            }

            let before_in = self.decoder.total_in();
            let before_out = self.decoder.total_out();
            let status = self
                .decoder
                .decompress(&self.input[self.start..self.end], buf, FlushDecompress::None)
                .map_err(|e| Error::Decompress(e.to_string()))?;
            self.start += (self.decoder.total_in() - before_in) as usize;
            let produced = (self.decoder.total_out() - before_out) as usize;

            if let Status::StreamEnd = status {
                self.finished = true;
                return Ok(produced);
            }
            if produced > 0 {
                return Ok(produced);
            }
            if self.eof {
                return Err(Error::Decompress("truncated deflate stream".to_string()));
            }
        }
    }

    fn seek(&mut self, _source: &mut StreamHandle, _position: u64) -> Result<()> {
        Err(Error::NotSeekable)
    }

    fn can_seek(&self, _source: &StreamHandle) -> bool {
        false
    }

    fn size(&self, _source: &StreamHandle) -> Option<u64> {
        // Decompressed size is unknown without reading to the trailer
        None
    }
}

/// Consume one member header from `source` (RFC 1952 §2.3)
fn read_member_header(source: &mut StreamHandle) -> Result<()> {
    let mut fixed = [0u8; 10];
    read_full(source, &mut fixed)?;

    if fixed[..2] != GZIP_MAGIC || fixed[2] != CM_DEFLATE {
        return Err(Error::Decompress("unsupported gzip header".to_string()));
    }

    let flags = fixed[3];
    if flags & FEXTRA != 0 {
        let mut len = [0u8; 2];
        read_full(source, &mut len)?;
        let mut skip = u16::from_le_bytes(len) as usize;
        let mut scratch = [0u8; 256];
        while skip > 0 {
            let n = skip.min(scratch.len());
            read_full(source, &mut scratch[..n])?;
            skip -= n;
        }
    }
    if flags & FNAME != 0 {
        skip_zero_terminated(source)?;
    }
    if flags & FCOMMENT != 0 {
        skip_zero_terminated(source)?;
    }
    if flags & FHCRC != 0 {
        let mut crc = [0u8; 2];
        read_full(source, &mut crc)?;
    }
    Ok(())
}

fn read_full(source: &mut StreamHandle, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = source.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(Error::Decompress("truncated gzip header".to_string()));
        }
        filled += n;
    }
    Ok(())
}

fn skip_zero_terminated(source: &mut StreamHandle) -> Result<()> {
    let mut byte = [0u8; 1];
    loop {
        read_full(source, &mut byte)?;
        if byte[0] == 0 {
            return Ok(());
        }
    }
}
