mod cli;
mod errors;
pub mod image;
mod logging;
pub mod transfer;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::{cli::Cli, image::ConvertOptions};

fn main() -> color_eyre::Result<()> {
    crate::errors::init()?;
    let cli = Cli::parse();
    crate::logging::init(cli.verbose)?;

    let cancel = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        // A second signal exits at once instead of waiting for the current command.
        signal_hook::flag::register_conditional_shutdown(signal, 1, Arc::clone(&cancel))?;
        signal_hook::flag::register(signal, Arc::clone(&cancel))?;
    }

    let opts = ConvertOptions::from(&cli).cancel(cancel);
    tracing::debug!(?opts, "Starting conversion");
    let report = image::convert(&opts)?;
    let stats = report.stats;
    tracing::info!(
        "Transfer list v{}: {} commands, {} new ranges, {} blocks ({} bytes) written",
        report.version,
        stats.commands,
        stats.new_ranges,
        stats.blocks_written,
        stats.bytes_written
    );
    tracing::info!(
        "{} is {} bytes ({} blocks)",
        report.output.display(),
        report.image_len,
        stats.max_block_end
    );

    Ok(())
}
