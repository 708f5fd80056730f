//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental value types used throughout the puzzle.
//! Everything here is plain data: no board state, no randomness, no timing,
//! so it can be shared between the grid engine, the turn controller and any
//! host that renders or drives the game.
//!
//! # Grid Dimensions
//!
//! The board is always square (`N x N`), fixed at construction:
//!
//! - **Default size**: 8 (indexed 0-7 on both axes)
//! - **Allowed sizes**: 3 to 16 inclusive
//! - **Orientation**: `y = 0` is the top row, `y = N - 1` the bottom row
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MATCH_BONUSES` | 1, 3, 5, 8, 13 | Bonus per match of size 3, 4, 5, 6, 7+ |
//! | `OBJECTIVE_CELL_BONUS` | 10 | Per cleared cell still flagged as objective |
//! | `COMPLETION_BONUS` | 1000 | Awarded once when every objective is cleared |
//!
//! # Timer Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TIMER_TICK_MS` | 100 | Interval between timer ticks |
//! | `TIMER_INITIAL_TICKS` | 5 | Tick count the timer starts from |
//!
//! # Examples
//!
//! ```
//! use match_three_types::{Coordinate, Direction, Token, DEFAULT_GRID_SIZE};
//!
//! // Offsetting never checks bounds
//! let origin = Coordinate::new(0, 0);
//! assert_eq!(origin.offset(Direction::Left), Coordinate::new(-1, 0));
//!
//! // Dominant direction toward a drag target (horizontal wins)
//! let target = Coordinate::new(3, -5);
//! assert_eq!(origin.direction_toward(target), Some(Direction::Right));
//!
//! // Tokens parse from single characters
//! assert_eq!(Token::from_char('r'), Some(Token::Red));
//! assert!(Token::Empty.is_empty());
//!
//! assert_eq!(DEFAULT_GRID_SIZE, 8);
//! ```

use serde::{Deserialize, Serialize};

/// Default board size (8 x 8)
pub const DEFAULT_GRID_SIZE: usize = 8;

/// Smallest board that can hold a run of three
pub const MIN_GRID_SIZE: usize = 3;

/// Largest supported board (bounds the per-origin match buffers)
pub const MAX_GRID_SIZE: usize = 16;

/// Default number of colours in play
pub const DEFAULT_PALETTE_SIZE: usize = 5;

/// Fewest colours that keep conflict-free generation satisfiable
pub const MIN_PALETTE_SIZE: usize = 3;

/// Minimum number of identical tokens in a line that counts as a match
pub const MIN_RUN: usize = 3;

/// Upper bound on the coordinates one origin can report:
/// a full row and a full column sharing the origin.
pub const MAX_MATCH_CELLS: usize = 2 * MAX_GRID_SIZE - 1;

/// Match bonus table indexed by `match size - 3`
///
/// Runs longer than the table covers use the last entry.
pub const MATCH_BONUSES: [u32; 5] = [1, 3, 5, 8, 13];

/// Bonus per cleared cell that still carried its objective flag
pub const OBJECTIVE_CELL_BONUS: u32 = 10;

/// Bonus awarded once when the last objective flag is cleared
pub const COMPLETION_BONUS: u32 = 1000;

/// Score timer tick interval in milliseconds
pub const TIMER_TICK_MS: u64 = 100;

/// Tick count the score timer starts from
pub const TIMER_INITIAL_TICKS: u32 = 5;

/// The four orthogonal directions
///
/// `Up` points toward row 0 (the top of the board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions in scan order: the row axis first, then the column axis
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit offset `(dx, dy)` for this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    /// The direction pointing the other way
    ///
    /// # Examples
    ///
    /// ```
    /// use match_three_types::Direction;
    ///
    /// assert_eq!(Direction::Left.opposite(), Direction::Right);
    /// assert_eq!(Direction::Up.opposite(), Direction::Down);
    /// ```
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// A cell position in grid space
///
/// Coordinates are plain values: equality is structural and offsetting
/// produces a new coordinate. Bounds are a grid concern, so negative or
/// oversized values are representable (raw input can produce them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate one step away in `dir` (no bounds checking)
    pub fn offset(&self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Dominant direction from `self` toward `target`
    ///
    /// Horizontal displacement takes priority over vertical when both are
    /// non-zero. Returns `None` when the two coordinates are equal.
    ///
    /// # Examples
    ///
    /// ```
    /// use match_three_types::{Coordinate, Direction};
    ///
    /// let from = Coordinate::new(4, 4);
    /// assert_eq!(from.direction_toward(Coordinate::new(1, 7)), Some(Direction::Left));
    /// assert_eq!(from.direction_toward(Coordinate::new(4, 0)), Some(Direction::Up));
    /// assert_eq!(from.direction_toward(from), None);
    /// ```
    pub fn direction_toward(&self, target: Coordinate) -> Option<Direction> {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        if dx < 0 {
            Some(Direction::Left)
        } else if dx > 0 {
            Some(Direction::Right)
        } else if dy < 0 {
            Some(Direction::Up)
        } else if dy > 0 {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// True when `other` is exactly one orthogonal step away
    pub fn is_adjacent(&self, other: Coordinate) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

/// The value a cell holds
///
/// `Empty` is a sentinel meaning "no token present, pending refill"; it is
/// never part of the palette and never matches anything, itself included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Token {
    #[default]
    Empty,
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl Token {
    /// Every real (non-empty) token, in palette order
    ///
    /// A palette of size `n` uses the first `n` entries.
    pub const PALETTE: [Token; 5] = [
        Token::Red,
        Token::Green,
        Token::Blue,
        Token::Yellow,
        Token::Purple,
    ];

    pub fn is_empty(&self) -> bool {
        matches!(self, Token::Empty)
    }

    /// Parse a token from its fixture character (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match_three_types::Token;
    ///
    /// assert_eq!(Token::from_char('B'), Some(Token::Blue));
    /// assert_eq!(Token::from_char('.'), Some(Token::Empty));
    /// assert_eq!(Token::from_char('x'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            '.' => Some(Token::Empty),
            'r' => Some(Token::Red),
            'g' => Some(Token::Green),
            'b' => Some(Token::Blue),
            'y' => Some(Token::Yellow),
            'p' => Some(Token::Purple),
            _ => None,
        }
    }

    /// Fixture character for this token (uppercase, `.` for empty)
    pub fn as_char(&self) -> char {
        match self {
            Token::Empty => '.',
            Token::Red => 'R',
            Token::Green => 'G',
            Token::Blue => 'B',
            Token::Yellow => 'Y',
            Token::Purple => 'P',
        }
    }
}
