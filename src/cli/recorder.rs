use std::path::PathBuf;

use clap::Parser;

use crate::{prelude::*, recorder::FileRecorder};

#[derive(Parser)]
pub struct RecorderArgs {
    /// Statistics file, created on the first import.
    #[clap(long = "recorder-path", env = "RECORDER_PATH", default_value = "statistics.toml")]
    path: PathBuf,
}

impl RecorderArgs {
    pub fn open(&self) -> Result<FileRecorder> {
        FileRecorder::open(&self.path)
    }
}
