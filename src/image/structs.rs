use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use derive_setters::Setters;

/// Everything one conversion needs.
#[derive(Debug, Clone, Setters)]
pub struct ConvertOptions {
    #[setters(generate = false)]
    pub transfer_list: PathBuf,
    #[setters(generate = false)]
    pub new_data: PathBuf,
    #[setters(generate = false)]
    pub output: PathBuf,
    /// Write into a temporary file next to `output` and move it into place on success.
    pub staged: bool,
    #[setters(strip_option)]
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ConvertOptions {
    pub fn new(
        transfer_list: impl Into<PathBuf>,
        new_data: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            transfer_list: transfer_list.into(),
            new_data: new_data.into(),
            output: output.into(),
            staged: true,
            cancel: None,
        }
    }
}

/// Counters from one run of the copy engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub commands: usize,
    pub new_ranges: usize,
    pub blocks_written: u64,
    pub bytes_written: u64,
    /// Largest block end referenced by any command.
    pub max_block_end: u64,
}

/// Result of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub version: u32,
    pub stats: Stats,
    pub image_len: u64,
    pub output: PathBuf,
}
