//! Scoring module - match bonuses and puzzle completion
//!
//! Score only ever grows. The turn controller is the single writer: it
//! scores each distinct match, then the objective cells a clear removes, and
//! finally the completion bonus when the last objective goes.

use crate::types::{COMPLETION_BONUS, MATCH_BONUSES, MIN_RUN, OBJECTIVE_CELL_BONUS};

/// Bonus for one match of `size` cells
///
/// Indexed by `size - 3` into [`MATCH_BONUSES`]; longer runs use the last
/// entry. Anything below three cells is not a match and scores nothing.
pub fn match_bonus(size: usize) -> u32 {
    if size < MIN_RUN {
        return 0;
    }
    let idx = (size - MIN_RUN).min(MATCH_BONUSES.len() - 1);
    MATCH_BONUSES[idx]
}

/// Bonus for clearing `count` cells that still carried an objective flag
pub fn objective_cells_bonus(count: usize) -> u32 {
    OBJECTIVE_CELL_BONUS.saturating_mul(count as u32)
}

/// Running total for one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTracker {
    total: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Add the bonus for one match, returning the points awarded
    pub fn score_match(&mut self, size: usize) -> u32 {
        self.add(match_bonus(size))
    }

    /// Add `count` objective cells worth of bonus, returning the points awarded
    pub fn score_cleared_objective_cells(&mut self, count: usize) -> u32 {
        self.add(objective_cells_bonus(count))
    }

    /// Add the completion bonus, returning the points awarded
    pub fn score_completion(&mut self) -> u32 {
        self.add(COMPLETION_BONUS)
    }

    fn add(&mut self, points: u32) -> u32 {
        self.total = self.total.saturating_add(points);
        points
    }
}
