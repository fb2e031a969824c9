//! Rebuilding a full image from a transfer list and its new-data stream.

mod engine;
mod structs;
mod writer;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

pub use engine::*;
pub use structs::*;
pub use writer::*;

use crate::transfer::{BLOCK_SIZE, ParseError, Platform, TransferList};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid transfer list: {0}")]
    Parse(#[from] ParseError),
    #[error("New data ended early: needed {needed} bytes, stream holds {available}")]
    TruncatedInput { needed: u64, available: u64 },
    #[error("The output file {0} already exists. Remove it, rename it, or choose a different file name.")]
    OutputAlreadyExists(PathBuf),
    #[error("Unable to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error while reading or writing image data: {0}")]
    Io(#[from] std::io::Error),
    #[error("Block {block} is beyond the addressable image size")]
    BlockOffsetOverflow { block: u64 },
    #[error("Conversion cancelled")]
    Cancelled,
}

type Result<T> = color_eyre::Result<T, EngineError>;

/// Rebuilds the image described by `opts`.
///
/// An existing file at the output path fails the run before anything is read.
pub fn convert(opts: &ConvertOptions) -> Result<Report> {
    ensure_absent(&opts.output)?;

    let list_file = open(&opts.transfer_list)?;
    let list = TransferList::from_reader(BufReader::new(list_file))?;

    let platform = list.platform();
    match platform {
        Platform::Unknown => tracing::warn!("Unknown Android version {}!", list.version),
        _ => tracing::info!("{} detected!", platform),
    }
    if list.commands.is_empty() {
        tracing::warn!("Transfer list holds no commands, the image will be empty");
    }

    let max_block_end = list.max_block_end();
    let image_len = max_block_end
        .checked_mul(BLOCK_SIZE)
        .ok_or(EngineError::BlockOffsetOverflow {
            block: max_block_end,
        })?;

    let mut writer = ImageWriter::create(&opts.output, opts.staged)?;
    let new_data = open(&opts.new_data)?;

    let stats = {
        let mut engine = BlockCopyEngine::new(new_data, writer.file_mut());
        if let Some(cancel) = &opts.cancel {
            engine = engine.with_cancel(cancel.clone());
        }
        let stats = engine.run(&list.commands)?;
        tracing::debug!("Read {} bytes of new data", engine.consumed());
        stats
    };

    debug_assert_eq!(stats.blocks_written, list.new_block_count());
    if stats.blocks_written != list.declared_new_blocks {
        tracing::debug!(
            "Transfer list declares {} new blocks, {} were written",
            list.declared_new_blocks,
            stats.blocks_written
        );
    }

    let output = writer.finish(image_len)?;
    let shown = fs::canonicalize(&output).unwrap_or_else(|_| output.clone());
    tracing::info!("Done! Output image: {}", shown.display());
    tracing::debug!(?stats, image_len, "Conversion summary");

    Ok(Report {
        version: list.version,
        stats,
        image_len,
        output,
    })
}

fn open(path: &std::path::Path) -> Result<File> {
    File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })
}
