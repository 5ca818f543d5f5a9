//! File sink implementation

use crate::core::{PipelineError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only file sink.
///
/// The file is opened once at startup; an open failure is fatal and reported
/// before any pipeline thread is spawned. The batch writer does its own
/// buffering, so flushed chunks go straight to the file handle.
#[derive(Debug)]
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FileSink {
    /// Open `path` for appending, creating it if missing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| PipelineError::open_output(path.display().to_string(), e))?;

        Ok(Self { file, path })
    }

    /// Path this sink writes to
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write_chunk(&mut self, bytes: &[u8]) -> Result<()> {
        self.file.write_all(bytes).map_err(|e| {
            PipelineError::io_operation(format!("writing to '{}'", self.path.display()), e)
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush().map_err(|e| {
            PipelineError::io_operation(format!("flushing '{}'", self.path.display()), e)
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Push any OS-level buffering out before the handle closes
        let _ = self.file.flush();
    }
}
