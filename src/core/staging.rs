use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::process::Stdio;

use crate::core::errors::StagingError;

/// Scratch file holding the input of the test being run.
///
/// Staging overwrites whatever was there before. The file lives as long as
/// the staging value and is removed by the OS once the last handle closes.
#[derive(Debug)]
pub struct InputStaging {
    file: File,
}

impl InputStaging {
    pub fn new() -> Result<Self, StagingError> {
        let file = tempfile::tempfile().map_err(StagingError::Create)?;
        Ok(Self { file })
    }

    /// Replaces the staged content with `data` and returns a handle to it.
    ///
    /// Text is staged as its UTF-8 bytes.
    pub fn stage(&mut self, data: impl AsRef<[u8]>) -> Result<StagedInput, StagingError> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.set_len(0)?;
        self.file.write_all(data.as_ref())?;
        self.file.flush()?;
        self.handle()
    }

    /// A fresh handle on the currently staged data, positioned at its start.
    pub fn handle(&mut self) -> Result<StagedInput, StagingError> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(StagedInput {
            file: self.file.try_clone()?,
        })
    }
}

/// Read end of the staged input, ready to become a child's stdin.
///
/// Handles share the file offset with the staging, so only the most recent
/// handle is meaningful.
#[derive(Debug)]
pub struct StagedInput {
    file: File,
}

impl From<StagedInput> for Stdio {
    fn from(input: StagedInput) -> Self {
        Stdio::from(input.file)
    }
}

impl From<StagedInput> for File {
    fn from(input: StagedInput) -> Self {
        input.file
    }
}
