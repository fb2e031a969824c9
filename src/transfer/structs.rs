use strum::{Display, EnumString};

use super::RangeSet;

/// Command keywords the image rebuilder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CommandKind {
    New,
    Zero,
    Erase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New(RangeSet),
    Zero(RangeSet),
    Erase(RangeSet),
}

impl Command {
    pub fn new(kind: CommandKind, ranges: RangeSet) -> Self {
        match kind {
            CommandKind::New => Command::New(ranges),
            CommandKind::Zero => Command::Zero(ranges),
            CommandKind::Erase => Command::Erase(ranges),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::New(_) => CommandKind::New,
            Command::Zero(_) => CommandKind::Zero,
            Command::Erase(_) => CommandKind::Erase,
        }
    }

    pub fn ranges(&self) -> &RangeSet {
        match self {
            Command::New(ranges) | Command::Zero(ranges) | Command::Erase(ranges) => ranges,
        }
    }
}

/// Header lines of a transfer list, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HeaderField {
    #[strum(to_string = "version")]
    Version,
    #[strum(to_string = "total new blocks")]
    NewBlocks,
}

/// Android release a transfer list version was introduced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Platform {
    #[strum(to_string = "Android Lollipop 5.0")]
    Lollipop50,
    #[strum(to_string = "Android Lollipop 5.1")]
    Lollipop51,
    #[strum(to_string = "Android Marshmallow 6.x")]
    Marshmallow,
    #[strum(to_string = "Android Nougat 7.x / Oreo 8.x")]
    NougatOreo,
    #[strum(to_string = "unknown Android version")]
    Unknown,
}

impl Platform {
    pub fn from_version(version: u32) -> Self {
        match version {
            1 => Platform::Lollipop50,
            2 => Platform::Lollipop51,
            3 => Platform::Marshmallow,
            4 => Platform::NougatOreo,
            _ => Platform::Unknown,
        }
    }

    /// Whether the header carries the two stash lines after the block count.
    /// Only the first format lacks them; unknown versions get the newer shape.
    pub fn has_stash_header(&self) -> bool {
        !matches!(self, Platform::Lollipop50)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferList {
    pub version: u32,
    pub declared_new_blocks: u64,
    pub commands: Vec<Command>,
}

impl TransferList {
    pub fn platform(&self) -> Platform {
        Platform::from_version(self.version)
    }

    /// Largest block end referenced by any command, or 0 when there are none.
    pub fn max_block_end(&self) -> u64 {
        self.commands
            .iter()
            .filter_map(|command| command.ranges().max_end())
            .max()
            .unwrap_or(0)
    }

    pub fn new_block_count(&self) -> u64 {
        self.commands
            .iter()
            .filter(|command| matches!(command, Command::New(_)))
            .map(|command| command.ranges().block_count())
            .sum()
    }
}
