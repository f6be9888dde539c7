use core::ops::RangeInclusive;

/// An inclusive range of blocks `[from, to]`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("[{from}, {to}]")]
pub struct BlockRange {
    /// The first block of the range.
    pub from: u64,
    /// The last block of the range.
    pub to: u64,
}

impl BlockRange {
    /// Returns a new instance of [`BlockRange`]. Returns [`None`] if `to < from`.
    pub const fn new(from: u64, to: u64) -> Option<Self> {
        if to < from {
            return None;
        }
        Some(Self { from, to })
    }

    /// Returns the number of blocks in the range.
    pub const fn len(&self) -> u64 {
        self.to - self.from + 1
    }

    /// A [`BlockRange`] always holds at least one block.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if the block is in the range.
    pub const fn contains(&self, block: u64) -> bool {
        self.from <= block && block <= self.to
    }

    /// Splits the range into consecutive windows of at most `page_size` blocks.
    ///
    /// Window boundaries are aligned on multiples of `page_size` so that the same windows are
    /// produced regardless of where the range starts.
    pub fn windows(&self, page_size: u64) -> Vec<Self> {
        let page_size = page_size.max(1);
        let mut windows = Vec::new();
        let mut from = self.from;
        loop {
            let aligned_end = (from / page_size)
                .saturating_add(1)
                .saturating_mul(page_size)
                .saturating_sub(1);
            let to = aligned_end.min(self.to);
            windows.push(Self { from, to });
            if to == self.to {
                break;
            }
            from = to + 1;
        }
        windows
    }

    /// Returns the sub-ranges of `self` which are not covered by the provided ranges.
    pub fn subtract(&self, covered: &[Self]) -> Vec<Self> {
        let mut covered: Vec<_> = covered.iter().filter(|r| r.overlaps(self)).copied().collect();
        covered.sort_by_key(|r| r.from);

        let mut gaps = Vec::new();
        let mut cursor = self.from;
        for range in covered {
            if range.from > cursor {
                gaps.push(Self { from: cursor, to: range.from - 1 });
            }
            if range.to >= cursor {
                match range.to.checked_add(1) {
                    Some(next) => cursor = next,
                    None => return gaps,
                }
            }
            if cursor > self.to {
                return gaps;
            }
        }
        gaps.push(Self { from: cursor, to: self.to });
        gaps
    }

    /// Returns true if the two ranges share at least one block.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.from <= other.to && other.from <= self.to
    }
}

impl From<BlockRange> for RangeInclusive<u64> {
    fn from(value: BlockRange) -> Self {
        value.from..=value.to
    }
}
