//! Recording tee filter
//!
//! Passes every operation through to the inner handle while appending each
//! byte read to a dump file. Never auto-probed: it applies to any stream,
//! so it is only bound when requested by name (typically via the record
//! flag of [`build_filter_chain`](super::build_filter_chain)).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::stream::StreamHandle;
use crate::Result;

use super::{FilterPlugin, StreamFilter};

/// Plugin for the `record` filter
///
/// Dump files are created in the sink directory, one per bound filter,
/// named `record-<uuid>.dump`.
pub struct RecordPlugin {
    sink_dir: PathBuf,
}

impl RecordPlugin {
    /// Create a plugin writing dumps into `sink_dir`
    pub fn new(sink_dir: impl Into<PathBuf>) -> Self {
        Self {
            sink_dir: sink_dir.into(),
        }
    }
}

impl Default for RecordPlugin {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl FilterPlugin for RecordPlugin {
    fn name(&self) -> &'static str {
        "record"
    }

    fn auto_probe(&self) -> bool {
        false
    }

    fn open(&self, _source: &mut StreamHandle) -> Result<Box<dyn StreamFilter>> {
        let path = self.sink_dir.join(format!("record-{}.dump", Uuid::new_v4()));
        let file = File::create(&path)?;
        tracing::debug!(path = %path.display(), "recording stream");
        Ok(Box::new(RecordFilter {
            writer: BufWriter::new(file),
            path,
        }))
    }
}

/// Tee of every byte read, appended to a dump file
pub struct RecordFilter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl RecordFilter {
    /// Path of the dump file this filter writes
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StreamFilter for RecordFilter {
    fn name(&self) -> &'static str {
        "record"
    }

    fn read(&mut self, source: &mut StreamHandle, buf: &mut [u8]) -> Result<usize> {
        let n = source.read(buf)?;
        if n > 0 {
            self.writer.write_all(&buf[..n])?;
        }
        Ok(n)
    }

    fn close(&mut self, _source: &mut StreamHandle) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to flush record dump");
        }
    }
}
