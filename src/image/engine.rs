use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::transfer::{BLOCK_SIZE, BlockRange, Command};

use super::{EngineError, Result, Stats};

/// Blocks moved per read/write round trip.
pub const COPY_CHUNK_BLOCKS: usize = 64;

/// Replays `new` commands from a sequential data stream into a seekable image.
///
/// The input is read strictly front to back, one range after the other, in the
/// order ranges appear across all `new` commands. Ranges only decide where the
/// bytes land in the output.
pub struct BlockCopyEngine<R: Read, W: Write + Seek> {
    input: R,
    output: W,
    consumed: u64,
    buf: Box<[u8]>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<R: Read, W: Write + Seek> BlockCopyEngine<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            consumed: 0,
            buf: vec![0u8; COPY_CHUNK_BLOCKS * BLOCK_SIZE as usize].into_boxed_slice(),
            cancel: None,
        }
    }

    /// Polled before every command; once set, the run stops with [`EngineError::Cancelled`].
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Bytes taken from the input so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn run(&mut self, commands: &[Command]) -> Result<Stats> {
        let mut stats = Stats::default();

        for command in commands {
            if self.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            stats.commands += 1;

            if let Some(end) = command.ranges().max_end() {
                stats.max_block_end = stats.max_block_end.max(end);
            }

            match command {
                Command::New(ranges) => {
                    for range in ranges {
                        let written = self.copy_range(*range)?;
                        stats.new_ranges += 1;
                        stats.blocks_written += range.block_count();
                        stats.bytes_written += written;
                    }
                }
                Command::Zero(ranges) | Command::Erase(ranges) => {
                    tracing::debug!(
                        "Skipping command {} ({} ranges)...",
                        command.kind(),
                        ranges.len()
                    );
                }
            }
        }

        self.output.flush()?;
        Ok(stats)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn copy_range(&mut self, range: BlockRange) -> Result<u64> {
        let offset = range
            .byte_offset()
            .ok_or(EngineError::BlockOffsetOverflow { block: range.start })?;
        let total = range
            .byte_len()
            .ok_or(EngineError::BlockOffsetOverflow { block: range.end })?;
        if range.end < range.start {
            tracing::warn!("Range {} is reversed, nothing to copy", range);
        }
        tracing::debug!(
            "Copying {} blocks into position {}...",
            range.block_count(),
            range.start
        );

        self.output.seek(SeekFrom::Start(offset))?;

        let mut remaining = total;
        while remaining > 0 {
            let want = remaining.min(self.buf.len() as u64) as usize;
            let got = read_full(&mut self.input, &mut self.buf[..want])?;
            if got < want {
                return Err(EngineError::TruncatedInput {
                    needed: self.consumed + remaining,
                    available: self.consumed + got as u64,
                });
            }
            self.output.write_all(&self.buf[..want])?;
            self.consumed += want as u64;
            remaining -= want as u64;
        }

        Ok(total)
    }
}

/// Fills `buf` as far as the reader allows, returning how many bytes were read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
