use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Most rows a single lock can complete: one per piece row.
pub const MAX_LINES_PER_LOCK: usize = 4;

/// Game statistics tracking score, cleared lines, and piece count.
///
/// - **Score**: one point per cleared row
/// - **Completed pieces**: pieces that locked without ending the game
/// - **Line clear distribution**: locks that cleared 0, 1, 2, 3 or 4 rows
/// - **Duration**: play time measured from the session's tick timestamps
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 2);
/// assert_eq!(stats.line_cleared_counter()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; MAX_LINES_PER_LOCK + 1],
    duration: Duration,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; MAX_LINES_PER_LOCK + 1],
            duration: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by the number of rows they cleared.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; MAX_LINES_PER_LOCK + 1] {
        &self.line_cleared_counter
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Updates statistics after a piece locks and its rows are cleared.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        self.score += cleared_lines;
    }

    pub(crate) fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_counts_cleared_rows() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(1);
        stats.complete_piece_drop(4);

        assert_eq!(stats.score(), 5);
        assert_eq!(stats.total_cleared_lines(), 5);
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 0, 0, 1]);
    }

    #[test]
    fn test_zero_line_drop_keeps_score() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        assert_eq!(stats.score(), 0);
    }
}
