use std::io::{BufRead, Cursor};
use std::str::FromStr;

use super::{
    Command, CommandKind, HeaderField, ParseError, Platform, RangeSet, Result, TransferList,
};

struct NumberedLines<R: BufRead> {
    lines: std::io::Lines<R>,
    number: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            number: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        match self.lines.next() {
            Some(line) => {
                self.number += 1;
                Ok(Some((self.number, line?)))
            }
            None => Ok(None),
        }
    }

    fn header<T: FromStr>(&mut self, field: HeaderField) -> Result<T> {
        let (_, line) = self
            .next_line()?
            .ok_or(ParseError::MissingHeader(field))?;
        line.trim()
            .parse()
            .map_err(|_| ParseError::InvalidHeader {
                field,
                value: line.trim().to_owned(),
            })
    }
}

impl TransferList {
    /// Reads a transfer list line by line.
    ///
    /// Lines naming `new`, `zero` or `erase` become commands, in file order. Other
    /// lines are skipped unless they start with a digit, which is an error.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = NumberedLines::new(reader);

        let version: u32 = lines.header(HeaderField::Version)?;
        let declared_new_blocks: u64 = lines.header(HeaderField::NewBlocks)?;

        let platform = Platform::from_version(version);
        if platform.has_stash_header() {
            // Stash entry count, then the maximum number of stashed blocks.
            for _ in 0..2 {
                lines.next_line()?;
            }
        }

        let mut commands = Vec::new();
        while let Some((number, line)) = lines.next_line()? {
            if let Some(command) = parse_command(number, &line)? {
                commands.push(command);
            }
        }

        Ok(Self {
            version,
            declared_new_blocks,
            commands,
        })
    }

    pub fn parse_str(src: &str) -> Result<Self> {
        Self::from_reader(Cursor::new(src))
    }
}

impl FromStr for TransferList {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

fn parse_command(number: usize, line: &str) -> Result<Option<Command>> {
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    match name.parse::<CommandKind>() {
        Ok(kind) => {
            let text = rest.split_whitespace().next().unwrap_or_default();
            let ranges = RangeSet::parse(text).map_err(|source| ParseError::MalformedRangeSet {
                line: number,
                source,
            })?;
            if ranges.is_empty() {
                tracing::debug!("Command {} on line {} names no blocks", kind, number);
            }
            Ok(Some(Command::new(kind, ranges)))
        }
        Err(_) if name.starts_with(|c: char| c.is_ascii_digit()) => {
            Err(ParseError::UnknownCommand {
                line: number,
                command: name.to_owned(),
            })
        }
        Err(_) => {
            if !name.is_empty() {
                tracing::debug!("Skipping unsupported command `{}` on line {}", name, number);
            }
            Ok(None)
        }
    }
}
