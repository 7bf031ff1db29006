//! Checkpointed JSON output.
//!
//! Each flush rewrites the whole file from the accumulator, so the file on
//! disk is always a complete snapshot of everything collected so far. The
//! handle is opened once at run start and held for the run, guaranteeing all
//! flushes land in the same file.

use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

/// JSON array output file with full-overwrite flush semantics.
pub struct JsonSink {
    file: File,
    path: PathBuf,
}

impl JsonSink {
    /// Create (truncating) the output file and hold the handle open.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with the full serialized contents of `records`.
    ///
    /// Non-ASCII text is written literally; the wiki content is mostly
    /// Korean and escaped output would be unreadable.
    pub fn flush_records<T: Serialize + ?Sized>(&mut self, records: &T) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.set_len(0)?;
        serde_json::to_writer(&mut self.file, records).map_err(io::Error::other)?;
        self.file.flush()
    }
}

/// Checkpoint countdown: flush every `every` targets processed.
///
/// `tick` counts successes and abandoned targets alike, and resets after
/// signalling so checkpoints stay periodic for the whole run.
pub struct Countdown {
    every: u32,
    left: u32,
}

impl Countdown {
    pub fn new(every: u32) -> Self {
        // every == 0 would flush on every target; treat it as 1
        let every = every.max(1);
        Self { every, left: every }
    }

    /// Count one processed target. Returns true when a checkpoint is due.
    pub fn tick(&mut self) -> bool {
        self.left -= 1;
        if self.left == 0 {
            self.left = self.every;
            true
        } else {
            false
        }
    }
}
