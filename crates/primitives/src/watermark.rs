/// The next block a redeemer instance will scan from.
///
/// Every block strictly below the watermark is fully processed: all the messages it holds reached
/// a terminal state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
pub struct Watermark(u64);

impl Watermark {
    /// Returns a new [`Watermark`] starting at the provided block.
    pub const fn new(start_block: u64) -> Self {
        Self(start_block)
    }

    /// Returns the first block the next scan should include.
    pub const fn next_block(&self) -> u64 {
        self.0
    }

    /// Returns the watermark after a pass over the range ending at `to_block`.
    ///
    /// `lowest_pending` is the lowest block which still holds a message that is not terminal. The
    /// watermark never moves backwards.
    pub fn advance(self, to_block: u64, lowest_pending: Option<u64>) -> Self {
        let candidate = match lowest_pending {
            Some(block) => block,
            None => to_block.saturating_add(1),
        };
        Self(self.0.max(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::Watermark;

    #[test]
    fn test_should_move_past_range_when_all_terminal() {
        let watermark = Watermark::new(10).advance(20, None);
        assert_eq!(watermark.next_block(), 21);
    }

    #[test]
    fn test_should_stop_at_lowest_pending_block() {
        let watermark = Watermark::new(10).advance(20, Some(15));
        assert_eq!(watermark.next_block(), 15);
    }

    #[test]
    fn test_should_never_move_backwards() {
        let watermark = Watermark::new(10).advance(20, Some(3));
        assert_eq!(watermark.next_block(), 10);
    }
}
