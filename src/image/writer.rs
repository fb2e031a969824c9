use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{EngineError, Result};

enum Sink {
    Staged(NamedTempFile),
    Direct(File),
}

/// Output image file. Never replaces a file that is already there.
///
/// In staged mode the bytes go to a temporary file in the destination directory,
/// which is renamed onto the destination by [`ImageWriter::finish`]. Dropping the
/// writer before that removes the temporary file.
pub struct ImageWriter {
    target: PathBuf,
    sink: Sink,
}

impl ImageWriter {
    pub fn create(target: &Path, staged: bool) -> Result<Self> {
        ensure_absent(target)?;

        let sink = if staged {
            let dir = match target.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let file = tempfile::Builder::new()
                .prefix(".oxide_sdat-")
                .suffix(".part")
                .tempfile_in(dir)
                .map_err(|source| EngineError::Open {
                    path: dir.to_path_buf(),
                    source,
                })?;
            tracing::debug!("Staging image at {}", file.path().display());
            Sink::Staged(file)
        } else {
            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(target)
                .map_err(|source| match source.kind() {
                    io::ErrorKind::AlreadyExists => {
                        EngineError::OutputAlreadyExists(target.to_path_buf())
                    }
                    _ => EngineError::Open {
                        path: target.to_path_buf(),
                        source,
                    },
                })?;
            Sink::Direct(file)
        };

        Ok(Self {
            target: target.to_path_buf(),
            sink,
        })
    }

    pub fn file_mut(&mut self) -> &mut File {
        match &mut self.sink {
            Sink::Staged(file) => file.as_file_mut(),
            Sink::Direct(file) => file,
        }
    }

    /// Sets the final length, zero-extending any unwritten tail, and puts the
    /// image at its destination. Returns the destination path.
    pub fn finish(mut self, len: u64) -> Result<PathBuf> {
        let file = self.file_mut();
        if file.metadata()?.len() != len {
            file.set_len(len)?;
        }
        file.sync_all()?;

        match self.sink {
            Sink::Direct(_) => {}
            Sink::Staged(file) => {
                file.persist_noclobber(&self.target).map_err(|e| {
                    match e.error.kind() {
                        io::ErrorKind::AlreadyExists => {
                            EngineError::OutputAlreadyExists(self.target.clone())
                        }
                        _ => EngineError::Io(e.error),
                    }
                })?;
            }
        }

        Ok(self.target)
    }
}

/// Fails with [`EngineError::OutputAlreadyExists`] if anything, even a dangling link, sits at `path`.
pub fn ensure_absent(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(_) => Err(EngineError::OutputAlreadyExists(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(EngineError::Io(e)),
    }
}
