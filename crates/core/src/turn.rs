//! Turn controller - sequences one player interaction
//!
//! A turn goes pick -> move -> swap -> match check -> cascade or revert ->
//! settle. Once a move is accepted the controller is locked (`Resolving`)
//! and ignores further input until the turn settles.
//!
//! Resolution is driven one mutation at a time through [`TurnController::step`].
//! Each step returns the [`TurnEvent`] a renderer has to present before the
//! next step runs, which is where a host suspends to play its animation.
//! Headless callers can use [`TurnController::resolve`] instead.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::config::{ConfigError, GridConfig};
use crate::grid::{Cell, Grid, MatchSet};
use crate::rng::{SimpleRng, TokenSource};
use crate::scoring::ScoreTracker;
use crate::snapshot::TurnSnapshot;
use crate::types::Coordinate;

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnState {
    /// Waiting for a pick
    Idle,
    /// A cell is selected and a move toward a target is expected
    Focused(Coordinate),
    /// A move is being resolved; input is locked out
    Resolving,
    /// Every objective is cleared; input is ignored for good
    Solved,
}

/// Result of [`TurnController::pick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Focused,
    /// Locked, solved or out of bounds
    Ignored,
}

/// Result of [`TurnController::attempt_move`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Resolution started; drive it with `step` or `resolve`
    Accepted {
        first: Coordinate,
        second: Coordinate,
    },
    /// The neighbour toward the target is not a valid swap partner; focus dropped
    Abandoned,
    /// Nothing focused, locked, target off the board, or zero displacement
    Ignored,
}

/// How a resolved move ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnOutcome {
    /// No match; the swap was undone
    Reverted,
    Matched {
        /// Clear/fall rounds, the first one included
        cascades: u32,
        /// Cells cleared across all rounds
        cleared: usize,
    },
}

/// Summary emitted when a turn settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub first: Coordinate,
    pub second: Coordinate,
    pub outcome: TurnOutcome,
    /// Points earned by this turn (completion bonus included)
    pub points: u32,
    /// The turn cleared the last objective
    pub solved: bool,
}

/// One presentable step of a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// Tokens exchanged; cells hold their new tokens
    Swapped { a: Cell, b: Cell },
    /// No match, tokens exchanged back
    Reverted { a: Cell, b: Cell },
    /// Matched cells as they were just before clearing
    Cleared { cells: Vec<Cell>, points: u32 },
    /// Cells touched by gravity and refill, with their fall distances
    Fell { cells: Vec<Cell> },
    /// Resolution finished; the controller is unlocked (or solved)
    Settled(TurnReport),
}

#[derive(Debug, Clone)]
enum Step {
    Swap,
    Revert,
    Clear(Vec<MatchSet>),
    Fall,
    Settle(TurnOutcome),
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    cascades: u32,
    cleared: usize,
    points: u32,
}

#[derive(Debug, Clone)]
struct Resolution {
    first: Coordinate,
    second: Coordinate,
    step: Step,
    tally: Tally,
}

/// Drives the grid through player turns
#[derive(Debug, Clone)]
pub struct TurnController<R = SimpleRng> {
    grid: Grid,
    score: ScoreTracker,
    source: R,
    state: TurnState,
    resolution: Option<Resolution>,
    /// Set by the first accepted move
    started: bool,
}

impl TurnController<SimpleRng> {
    /// Create a controller over a freshly generated board
    pub fn new(config: GridConfig, seed: u32) -> Result<Self, ConfigError> {
        let mut grid = Grid::new(config)?;
        let mut rng = SimpleRng::new(seed);
        grid.fill(&mut rng);
        Ok(Self::with_grid(grid, rng))
    }
}

impl<R: TokenSource> TurnController<R> {
    /// Wrap a prepared board; `source` supplies refill tokens
    pub fn with_grid(grid: Grid, source: R) -> Self {
        Self {
            grid,
            score: ScoreTracker::new(),
            source,
            state: TurnState::Idle,
            resolution: None,
            started: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score.total()
    }

    pub fn token_source(&self) -> &R {
        &self.source
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// True while a move is being resolved
    pub fn is_locked(&self) -> bool {
        self.state == TurnState::Resolving
    }

    pub fn is_solved(&self) -> bool {
        self.state == TurnState::Solved
    }

    /// True once a move has been accepted
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Select the cell a move starts from
    pub fn pick(&mut self, coord: Coordinate) -> PickOutcome {
        if matches!(self.state, TurnState::Resolving | TurnState::Solved) {
            trace!(?coord, state = ?self.state, "pick ignored");
            return PickOutcome::Ignored;
        }
        if !self.grid.in_bounds(coord) {
            trace!(?coord, "pick out of bounds");
            return PickOutcome::Ignored;
        }
        self.state = TurnState::Focused(coord);
        PickOutcome::Focused
    }

    /// Try to swap the focused cell with its neighbour toward `target`.
    ///
    /// Only the dominant direction counts (horizontal first), so a drag of
    /// any length moves one cell. A target off the board is ignored and the
    /// focus is kept.
    #[instrument(skip(self), level = "debug")]
    pub fn attempt_move(&mut self, target: Coordinate) -> MoveOutcome {
        let TurnState::Focused(first) = self.state else {
            return MoveOutcome::Ignored;
        };
        if !self.grid.in_bounds(target) {
            trace!(?target, "move target out of bounds");
            return MoveOutcome::Ignored;
        }
        let Some(dir) = first.direction_toward(target) else {
            return MoveOutcome::Ignored;
        };

        let second = first.offset(dir);
        if !first.is_adjacent(second) || !self.grid.in_bounds(second) {
            debug!(?first, ?second, "move abandoned");
            self.state = TurnState::Idle;
            return MoveOutcome::Abandoned;
        }

        self.state = TurnState::Resolving;
        self.started = true;
        self.resolution = Some(Resolution {
            first,
            second,
            step: Step::Swap,
            tally: Tally::default(),
        });
        debug!(?first, ?second, "move accepted");
        MoveOutcome::Accepted { first, second }
    }

    /// Drop the focus without moving. Returns false if nothing was focused.
    pub fn cancel(&mut self) -> bool {
        if let TurnState::Focused(_) = self.state {
            self.state = TurnState::Idle;
            return true;
        }
        false
    }

    /// Apply the next mutation of the move being resolved.
    ///
    /// Returns `None` when no move is in progress. The final step returns
    /// [`TurnEvent::Settled`] and releases the lock.
    pub fn step(&mut self) -> Option<TurnEvent> {
        let Resolution {
            first,
            second,
            step,
            mut tally,
        } = self.resolution.take()?;

        let (event, next) = match step {
            Step::Swap => {
                self.grid.swap(first, second);
                let event = TurnEvent::Swapped {
                    a: self.cell(first),
                    b: self.cell(second),
                };
                let matches = self.live_matches(&[first, second]);
                let next = if matches.is_empty() {
                    Step::Revert
                } else {
                    Step::Clear(matches)
                };
                (event, next)
            }
            Step::Revert => {
                self.grid.swap(first, second);
                let event = TurnEvent::Reverted {
                    a: self.cell(first),
                    b: self.cell(second),
                };
                (event, Step::Settle(TurnOutcome::Reverted))
            }
            Step::Clear(matches) => {
                let mut points = 0;
                let mut union: Vec<Coordinate> = Vec::new();
                for set in &matches {
                    points += self.score.score_match(set.len());
                    for &c in set.coordinates() {
                        if !union.contains(&c) {
                            union.push(c);
                        }
                    }
                }

                let cells: Vec<Cell> = union.iter().map(|&c| self.cell(c)).collect();
                let objectives = self.grid.clear_objectives(&union);
                points += self.score.score_cleared_objective_cells(objectives);
                self.grid.clear(&union);

                tally.cascades += 1;
                tally.cleared += union.len();
                tally.points += points;
                trace!(
                    cascade = tally.cascades,
                    matches = matches.len(),
                    cleared = union.len(),
                    objectives,
                    points,
                    "cleared"
                );
                (TurnEvent::Cleared { cells, points }, Step::Fall)
            }
            Step::Fall => {
                let cells = self.grid.compact_and_refill(&mut self.source);
                let origins: Vec<Coordinate> = cells.iter().map(|cell| cell.position).collect();
                let matches = self.live_matches(&origins);
                let next = if matches.is_empty() {
                    Step::Settle(TurnOutcome::Matched {
                        cascades: tally.cascades,
                        cleared: tally.cleared,
                    })
                } else {
                    Step::Clear(matches)
                };
                (TurnEvent::Fell { cells }, next)
            }
            Step::Settle(outcome) => {
                let before = self.score.total();
                let solved = self.check_completion();
                if !solved {
                    self.state = TurnState::Idle;
                }
                tally.points += self.score.total() - before;

                let report = TurnReport {
                    first,
                    second,
                    outcome,
                    points: tally.points,
                    solved,
                };
                debug!(?outcome, points = report.points, solved, "turn settled");
                return Some(TurnEvent::Settled(report));
            }
        };

        self.resolution = Some(Resolution {
            first,
            second,
            step: next,
            tally,
        });
        Some(event)
    }

    /// Run the move in progress to completion without presenting it
    pub fn resolve(&mut self) -> Option<TurnReport> {
        loop {
            if let TurnEvent::Settled(report) = self.step()? {
                return Some(report);
            }
        }
    }

    /// Enter `Solved` if objectives are tracked and none remain.
    ///
    /// Awards the completion bonus exactly once. Has no effect while a move
    /// is being resolved.
    pub fn check_completion(&mut self) -> bool {
        if self.state == TurnState::Solved {
            return true;
        }
        if self.resolution.is_some() || !self.grid.tracks_objectives() {
            return false;
        }
        if self.grid.objective_count() > 0 {
            return false;
        }
        self.state = TurnState::Solved;
        self.score.score_completion();
        debug!(score = self.score.total(), "puzzle solved");
        true
    }

    pub fn snapshot(&self) -> TurnSnapshot {
        let mut s = TurnSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Fill `out` in place, reusing its buffers
    pub fn snapshot_into(&self, out: &mut TurnSnapshot) {
        out.size = self.grid.size();
        out.rows.clear();
        out.rows.extend(self.grid.rows());
        out.objectives = self.grid.objective_count();
        out.tracks_objectives = self.grid.tracks_objectives();
        out.score = self.score.total();
        out.state = self.state;
        out.started = self.started;
    }

    /// Copy of an in-bounds cell (internal coordinates only)
    fn cell(&self, c: Coordinate) -> Cell {
        match self.grid.cell(c) {
            Some(cell) => *cell,
            None => unreachable!("coordinate {:?} outside the grid", c),
        }
    }

    /// Non-empty matches through `origins`, identical sets reported once
    fn live_matches(&self, origins: &[Coordinate]) -> Vec<MatchSet> {
        let mut live: Vec<MatchSet> = Vec::new();
        for set in self.grid.matches_at(origins) {
            if set.is_empty() || live.iter().any(|seen| seen.same_cells(&set)) {
                continue;
            }
            live.push(set);
        }
        live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Token, DEFAULT_GRID_SIZE};

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y)
    }

    /// Refill source that cycles through a fixed list
    struct Cycle(Vec<Token>, usize);

    impl TokenSource for Cycle {
        fn next_token(&mut self, _palette: usize) -> Token {
            let token = self.0[self.1 % self.0.len()];
            self.1 += 1;
            token
        }
    }

    fn fixture(rows: &[&str], refill: &[Token]) -> TurnController<Cycle> {
        let grid = Grid::from_rows(rows).unwrap();
        TurnController::with_grid(grid, Cycle(refill.to_vec(), 0))
    }

    #[test]
    fn test_new_controller_is_idle_and_at_rest() {
        let controller = TurnController::new(GridConfig::default(), 42).unwrap();
        assert_eq!(controller.state(), TurnState::Idle);
        assert_eq!(controller.score(), 0);
        assert!(!controller.has_started());
        assert_eq!(controller.grid().size(), DEFAULT_GRID_SIZE);
        assert!(!controller.grid().has_match());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GridConfig { size: 1, palette: 5 };
        assert!(TurnController::new(config, 1).is_err());
    }

    #[test]
    fn test_pick_focuses_in_bounds_only() {
        let mut controller = fixture(&["RGB", "GBR", "BRG"], &[Token::Red]);
        assert_eq!(controller.pick(c(5, 0)), PickOutcome::Ignored);
        assert_eq!(controller.state(), TurnState::Idle);
        assert_eq!(controller.pick(c(1, 1)), PickOutcome::Focused);
        assert_eq!(controller.state(), TurnState::Focused(c(1, 1)));
    }

    #[test]
    fn test_cancel_only_affects_focus() {
        let mut controller = fixture(&["RGB", "GBR", "BRG"], &[Token::Red]);
        assert!(!controller.cancel());
        controller.pick(c(0, 0));
        assert!(controller.cancel());
        assert_eq!(controller.state(), TurnState::Idle);
    }

    #[test]
    fn test_move_without_focus_is_ignored() {
        let mut controller = fixture(&["RGB", "GBR", "BRG"], &[Token::Red]);
        assert_eq!(controller.attempt_move(c(1, 0)), MoveOutcome::Ignored);
        assert_eq!(controller.step(), None);
    }

    #[test]
    fn test_zero_displacement_keeps_focus() {
        let mut controller = fixture(&["RGB", "GBR", "BRG"], &[Token::Red]);
        controller.pick(c(1, 1));
        assert_eq!(controller.attempt_move(c(1, 1)), MoveOutcome::Ignored);
        assert_eq!(controller.state(), TurnState::Focused(c(1, 1)));
    }

    #[test]
    fn test_target_off_the_board_keeps_focus() {
        let mut controller = fixture(&["RGB", "GBR", "BRG"], &[Token::Red]);
        controller.pick(c(0, 1));
        assert_eq!(controller.attempt_move(c(-4, 1)), MoveOutcome::Ignored);
        assert_eq!(controller.state(), TurnState::Focused(c(0, 1)));
        assert!(!controller.has_started());

        // Still on the board toward the target, but the target itself is not.
        controller.pick(c(1, 1));
        assert_eq!(controller.attempt_move(c(1, 40)), MoveOutcome::Ignored);
        assert_eq!(controller.state(), TurnState::Focused(c(1, 1)));
        assert_eq!(controller.step(), None);

        // The kept focus still accepts a valid target.
        assert_eq!(
            controller.attempt_move(c(1, 2)),
            MoveOutcome::Accepted {
                first: c(1, 1),
                second: c(1, 2)
            }
        );
    }

    #[test]
    fn test_long_drag_moves_one_cell() {
        let mut controller = fixture(&["RGBY", "GBYR", "BYRG", "YRGB"], &[Token::Red]);
        controller.pick(c(0, 0));
        assert_eq!(
            controller.attempt_move(c(3, 3)),
            MoveOutcome::Accepted {
                first: c(0, 0),
                second: c(1, 0)
            }
        );
    }

    #[test]
    fn test_revert_step_sequence() {
        let mut controller = fixture(&["RGB", "GBR", "BRG"], &[Token::Red]);
        controller.pick(c(0, 0));
        controller.attempt_move(c(1, 0));
        assert!(controller.is_locked());

        assert!(matches!(controller.step(), Some(TurnEvent::Swapped { .. })));
        assert!(matches!(controller.step(), Some(TurnEvent::Reverted { .. })));
        match controller.step() {
            Some(TurnEvent::Settled(report)) => {
                assert_eq!(report.outcome, TurnOutcome::Reverted);
                assert_eq!(report.points, 0);
            }
            other => panic!("expected settle, got {:?}", other),
        }
        assert_eq!(controller.state(), TurnState::Idle);
        assert_eq!(controller.step(), None);
    }

    #[test]
    fn test_input_ignored_while_resolving() {
        let mut controller = fixture(&["RGB", "GBR", "BRG"], &[Token::Red]);
        controller.pick(c(0, 0));
        controller.attempt_move(c(1, 0));
        controller.step();

        assert_eq!(controller.pick(c(2, 2)), PickOutcome::Ignored);
        assert_eq!(controller.attempt_move(c(2, 1)), MoveOutcome::Ignored);
        assert!(!controller.cancel());
        assert!(controller.is_locked());

        controller.resolve();
        assert_eq!(controller.pick(c(2, 2)), PickOutcome::Focused);
    }

    #[test]
    fn test_duplicate_match_sets_scored_once() {
        let controller = fixture(&["RRR", "GBG", "BGB"], &[Token::Red]);
        let live = controller.live_matches(&[c(0, 0), c(1, 0), c(2, 0)]);
        assert_eq!(live.len(), 1);
    }

    #[test]
    fn test_completion_requires_tracked_objectives() {
        let mut controller = fixture(&["RGB", "GBR", "BRG"], &[Token::Red]);
        assert!(!controller.check_completion());
        assert_eq!(controller.state(), TurnState::Idle);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut controller = fixture(&["RGB", "GBR", "BRG"], &[Token::Red]);
        controller.pick(c(2, 1));
        let snap = controller.snapshot();
        assert_eq!(snap.size, 3);
        assert_eq!(snap.rows, vec!["RGB", "GBR", "BRG"]);
        assert_eq!(snap.state, TurnState::Focused(c(2, 1)));
        assert!(!snap.tracks_objectives);
    }
}
