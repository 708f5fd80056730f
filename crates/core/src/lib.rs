//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the tile-matching puzzle: the board, match
//! detection, gravity with refill, scoring, and the turn state machine.
//! It has **no dependency** on rendering, input devices, or wall-clock time:
//!
//! - **Deterministic**: a seed (or any injected [`TokenSource`]) fully
//!   determines generation and refills
//! - **Testable**: boards can be built from fixture rows
//! - **Portable**: the host presents each resolution step however it likes
//!
//! # Module Structure
//!
//! - [`config`]: board size and palette size, with validation
//! - [`grid`]: `N x N` board, swaps, match detection, clear, gravity and refill
//! - [`rng`]: seeded LCG and the token source seam
//! - [`scoring`]: match bonus table and the running score
//! - [`turn`]: pick / move / resolve state machine with its input lock
//! - [`snapshot`]: serializable observation for hosts
//!
//! # Game Rules
//!
//! - A match is three or more identical tokens in a row or column
//! - A swap is only kept if one of the two swapped cells now matches
//! - Cleared cells are filled by the tokens above them, then by new tokens
//! - Refilled cells are checked again, repeating until nothing matches
//!
//! # Example
//!
//! ```
//! use match_three_core::{GridConfig, TurnController, TurnState};
//! use match_three_core::types::Coordinate;
//!
//! let mut game = TurnController::new(GridConfig::default(), 12345).unwrap();
//!
//! game.pick(Coordinate::new(3, 3));
//! game.attempt_move(Coordinate::new(4, 3));
//! let report = game.resolve().unwrap();
//!
//! assert_eq!(report.second, Coordinate::new(4, 3));
//! assert_eq!(game.state(), TurnState::Idle);
//! assert!(!game.grid().has_match());
//! ```

pub mod config;
pub mod grid;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod turn;

pub use match_three_types as types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, GridConfig};
pub use grid::{Cell, Grid, MatchSet};
pub use rng::{SimpleRng, TokenSource};
pub use scoring::{match_bonus, ScoreTracker};
pub use snapshot::TurnSnapshot;
pub use turn::{
    MoveOutcome, PickOutcome, TurnController, TurnEvent, TurnOutcome, TurnReport, TurnState,
};
