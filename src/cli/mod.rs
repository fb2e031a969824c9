use clap::Parser;
use std::path::{Path, PathBuf};

use crate::image::ConvertOptions;


pub const DEFAULT_OUTPUT: &str = "system.img";

/// Rebuild a raw image from `<name>.transfer.list` and `<name>.new.dat`.
///
/// If TRANSFER_LIST is a directory, NEW_DATA is read as the partition name and
/// both inputs are looked up inside that directory.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Transfer list file, or a directory holding the OTA payload
    pub transfer_list: PathBuf,
    /// New data file, or the partition name in directory mode
    pub new_data: PathBuf,
    /// Output image [default: system.img, or <dir>/<name>.img in directory mode]
    pub output: Option<PathBuf>,
    /// Write straight to OUTPUT instead of staging in a temporary file
    #[arg(long, default_value_t = false)]
    pub direct: bool,
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl From<&Cli> for ConvertOptions {
    fn from(cli: &Cli) -> Self {
        let opts = if cli.transfer_list.is_dir() {
            from_directory(&cli.transfer_list, &cli.new_data, cli.output.clone())
        } else {
            ConvertOptions::new(
                cli.transfer_list.clone(),
                cli.new_data.clone(),
                cli.output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            )
        };
        opts.staged(!cli.direct)
    }
}

fn from_directory(dir: &Path, name: &Path, output: Option<PathBuf>) -> ConvertOptions {
    let name = name.to_string_lossy();
    ConvertOptions::new(
        dir.join(format!("{name}.transfer.list")),
        dir.join(format!("{name}.new.dat")),
        output.unwrap_or_else(|| dir.join(format!("{name}.img"))),
    )
}
