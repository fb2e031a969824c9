//! Transfer list decoding.
//!
//! A transfer list is the text half of an Android block-based OTA: a short header
//! followed by one command per line, each naming a set of block ranges.

mod parser;
mod rangeset;
mod structs;
#[cfg(test)]
mod tests;

pub use rangeset::*;
pub use structs::*;

/// Size of one addressable block of the image, in bytes.
pub const BLOCK_SIZE: u64 = 4096;

#[derive(Debug, thiserror::Error)]
pub enum RangeSetError {
    #[error("Range set is empty")]
    Empty,
    #[error("Invalid integer `{token}` in range set")]
    InvalidInteger { token: String },
    #[error("Range set declares {declared} values but carries {actual}")]
    CountMismatch { declared: u64, actual: usize },
    #[error("Range set carries {count} values, which cannot be paired into ranges")]
    UnpairedBound { count: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Transfer list ended before the {0} line")]
    MissingHeader(HeaderField),
    #[error("Invalid {field} line in transfer list: `{value}`")]
    InvalidHeader { field: HeaderField, value: String },
    #[error("Malformed range set on line {line}: {source}")]
    MalformedRangeSet {
        line: usize,
        #[source]
        source: RangeSetError,
    },
    #[error("Unknown command `{command}` on line {line}")]
    UnknownCommand { line: usize, command: String },
    #[error("Error while reading the transfer list: {0}")]
    Io(#[from] std::io::Error),
}

type Result<T> = std::result::Result<T, ParseError>;
