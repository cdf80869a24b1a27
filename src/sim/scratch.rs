use std::fs;
use std::path::PathBuf;

use crate::error::Result;

/// Root directory for per-run scratch files. One text input and one
/// rendered output per worker slot; slot names are reused across batches,
/// which is safe because slots are cleaned up only after the batch
/// barrier has confirmed their contents were decoded.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Acquire the scratch handle for one worker slot within a batch.
    pub fn slot(&self, index: usize) -> ScratchSlot {
        ScratchSlot {
            input: self.root.join(format!("run_{index}.txt")),
            output: self.root.join(format!("run_{index}.gif")),
        }
    }
}

/// Scoped handle to one worker's scratch files. Dropping the slot removes
/// both files, including when the worker failed.
#[derive(Debug)]
pub struct ScratchSlot {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Drop for ScratchSlot {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.input);
        let _ = fs::remove_file(&self.output);
    }
}
