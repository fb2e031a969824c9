use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use super::{BLOCK_SIZE, RangeSetError};

/// Half-open interval of blocks, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl BlockRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of blocks covered. A reversed range covers nothing.
    pub fn block_count(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Byte offset of the first block, or `None` if it does not fit in a `u64`.
    pub fn byte_offset(&self) -> Option<u64> {
        self.start.checked_mul(BLOCK_SIZE)
    }

    pub fn byte_len(&self) -> Option<u64> {
        self.block_count().checked_mul(BLOCK_SIZE)
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Block ranges in the order the transfer list lists them. Nothing is sorted or merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<BlockRange>,
}

impl RangeSet {
    /// Parses the compact `count,s0,e0,s1,e1,...` encoding.
    ///
    /// The leading integer must equal the number of integers after it. The
    /// remaining integers are paired up left to right; `start < end` is not checked.
    pub fn parse(src: &str) -> Result<Self, RangeSetError> {
        if src.trim().is_empty() {
            return Err(RangeSetError::Empty);
        }

        let nums = src
            .split(',')
            .map(|token| {
                token
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| RangeSetError::InvalidInteger {
                        token: token.trim().to_owned(),
                    })
            })
            .collect::<Result<Vec<u64>, _>>()?;

        let (&declared, bounds) = nums.split_first().ok_or(RangeSetError::Empty)?;
        if declared != bounds.len() as u64 {
            return Err(RangeSetError::CountMismatch {
                declared,
                actual: bounds.len(),
            });
        }
        if bounds.len() % 2 != 0 {
            return Err(RangeSetError::UnpairedBound {
                count: bounds.len(),
            });
        }

        let ranges = bounds
            .iter()
            .copied()
            .tuples()
            .map(|(start, end)| BlockRange::new(start, end))
            .collect();
        Ok(Self { ranges })
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockRange> {
        self.ranges.iter()
    }

    /// Largest `end` over all ranges, `None` for an empty set.
    pub fn max_end(&self) -> Option<u64> {
        self.iter().map(|range| range.end).max()
    }

    pub fn block_count(&self) -> u64 {
        self.iter().map(BlockRange::block_count).sum()
    }
}

impl FromStr for RangeSet {
    type Err = RangeSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a BlockRange;
    type IntoIter = std::slice::Iter<'a, BlockRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl FromIterator<BlockRange> for RangeSet {
    fn from_iter<I: IntoIterator<Item = BlockRange>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}
