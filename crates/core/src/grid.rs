//! Grid module - board state, match detection and gravity
//!
//! The grid is an `N x N` square of cells stored in a flat array, row-major
//! (`y * N + x`). Cells never move inside the array: swaps, clears and
//! gravity only rewrite token values, so a cell's identity is its position.
//!
//! Coordinates: `(x, y)` with `x` the column (left to right) and `y` the row,
//! `y = 0` at the top. Gravity pulls tokens toward `y = N - 1`.

use std::fmt;

use arrayvec::ArrayVec;

use crate::config::{ConfigError, GridConfig};
use crate::rng::TokenSource;
use crate::types::{Coordinate, Direction, Token, MAX_GRID_SIZE, MAX_MATCH_CELLS, MIN_RUN};

/// Reroll budget per cell during fill before falling back to a palette scan
const MAX_FILL_REROLLS: usize = 16;

/// Cells reached from an origin in one direction (never includes the origin)
type Run = ArrayVec<Coordinate, MAX_GRID_SIZE>;

/// A single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub position: Coordinate,
    pub token: Token,
    /// Rows the current token fell during the last gravity pass.
    ///
    /// Scratch data for the renderer; zero for cells the pass did not touch.
    /// Spawned tokens count from above the board, so the `k`-th spawn in a
    /// column starts `k` rows above row 0.
    pub fall_distance: i32,
    /// Cell still needs to be cleared for the puzzle to be complete
    pub objective: bool,
}

impl Cell {
    fn new(position: Coordinate) -> Self {
        Self {
            position,
            token: Token::Empty,
            fall_distance: 0,
            objective: false,
        }
    }

    /// Row the current token started falling from (negative when it spawned
    /// above the board)
    pub fn fall_from(&self) -> i32 {
        self.position.y - self.fall_distance
    }
}

/// Coordinates matched through one origin
///
/// Holds the row run, then the column run, then the origin itself. Empty
/// when the origin has no qualifying run on either axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet {
    origin: Coordinate,
    cells: ArrayVec<Coordinate, MAX_MATCH_CELLS>,
}

impl MatchSet {
    fn empty(origin: Coordinate) -> Self {
        Self {
            origin,
            cells: ArrayVec::new(),
        }
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.cells
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.cells.contains(&coord)
    }

    /// Same coordinates regardless of order or origin
    pub fn same_cells(&self, other: &MatchSet) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut a = self.cells.clone();
        let mut b = other.cells.clone();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

/// The puzzle board
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    palette: usize,
    cells: Vec<Cell>,
    tracks_objectives: bool,
}

impl Grid {
    /// Create an empty board (every cell `Empty`)
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = config.size;
        let cells = (0..size * size)
            .map(|i| Cell::new(Coordinate::new((i % size) as i32, (i / size) as i32)))
            .collect();
        Ok(Self {
            size,
            palette: config.palette,
            cells,
            tracks_objectives: false,
        })
    }

    /// Build a board from rows of token characters (see [`Token::from_char`]).
    ///
    /// Returns `None` if the rows are not square, contain an unknown
    /// character, or the size is out of range. The default palette is used
    /// for refills and no objective flags are set.
    ///
    /// ```
    /// use match_three_core::Grid;
    /// use match_three_core::types::{Coordinate, Token};
    ///
    /// let grid = Grid::from_rows(&["RGB", "GBR", "BRG"]).unwrap();
    /// assert_eq!(grid.token(Coordinate::new(2, 0)), Some(Token::Blue));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let config = GridConfig {
            size: rows.len(),
            ..GridConfig::default()
        };
        let mut grid = Self::new(config).ok()?;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != grid.size {
                return None;
            }
            for (x, c) in row.chars().enumerate() {
                let idx = grid.idx(x, y);
                grid.cells[idx].token = Token::from_char(c)?;
            }
        }
        Some(grid)
    }

    /// Flat index for in-range column/row pairs
    #[inline(always)]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// Flat index for a coordinate, `None` when out of bounds
    #[inline]
    pub fn index(&self, c: Coordinate) -> Option<usize> {
        if !self.in_bounds(c) {
            return None;
        }
        Some(self.idx(c.x as usize, c.y as usize))
    }

    pub fn in_bounds(&self, c: Coordinate) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as usize) < self.size && (c.y as usize) < self.size
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of colours used for generation and refill
    pub fn palette(&self) -> usize {
        self.palette
    }

    pub fn cell(&self, c: Coordinate) -> Option<&Cell> {
        self.index(c).map(|idx| &self.cells[idx])
    }

    pub fn token(&self, c: Coordinate) -> Option<Token> {
        self.cell(c).map(|cell| cell.token)
    }

    /// Returns false if out of bounds
    pub fn set_token(&mut self, c: Coordinate, token: Token) -> bool {
        match self.index(c) {
            Some(idx) => {
                self.cells[idx].token = token;
                true
            }
            None => false,
        }
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Exchange the tokens held at `a` and `b`.
    ///
    /// No-op returning false if either coordinate is out of bounds. Does not
    /// look for matches.
    pub fn swap(&mut self, a: Coordinate, b: Coordinate) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        let token = self.cells[ia].token;
        self.cells[ia].token = self.cells[ib].token;
        self.cells[ib].token = token;
        true
    }

    /// Cells sharing the origin's token, walking away from it in `dir`.
    fn run(&self, origin: Coordinate, dir: Direction) -> Run {
        let mut run = Run::new();
        let Some(token) = self.token(origin).filter(|t| !t.is_empty()) else {
            return run;
        };
        let mut cursor = origin.offset(dir);
        while self.token(cursor) == Some(token) {
            run.push(cursor);
            cursor = cursor.offset(dir);
        }
        run
    }

    /// Match through a single origin.
    ///
    /// Each axis qualifies when the runs on both sides of the origin add up
    /// to at least two cells (three including the origin). The origin is
    /// included whenever either axis qualifies.
    pub fn match_at(&self, origin: Coordinate) -> MatchSet {
        let mut set = MatchSet::empty(origin);
        let mut matched = false;

        for dir in [Direction::Left, Direction::Up] {
            let first = self.run(origin, dir);
            let second = self.run(origin, dir.opposite());
            if first.len() + second.len() + 1 >= MIN_RUN {
                set.cells.extend(first);
                set.cells.extend(second);
                matched = true;
            }
        }

        if matched {
            set.cells.push(origin);
        }
        set
    }

    /// One [`MatchSet`] per origin, in order.
    ///
    /// Origins are evaluated independently; overlapping runs are reported by
    /// every origin that reaches them.
    pub fn matches_at(&self, origins: &[Coordinate]) -> Vec<MatchSet> {
        origins.iter().map(|&origin| self.match_at(origin)).collect()
    }

    /// True if any cell on the board is part of a qualifying run
    pub fn has_match(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| !self.match_at(cell.position).is_empty())
    }

    /// Set every given cell to `Empty` (out-of-bounds coordinates are skipped)
    pub fn clear(&mut self, coords: &[Coordinate]) {
        for &c in coords {
            self.set_token(c, Token::Empty);
        }
    }

    /// Gravity pass: compact every column downward and refill from above.
    ///
    /// Columns are scanned bottom to top. Each `Empty` cell takes the token
    /// of the nearest filled cell above it (which becomes `Empty`), or a new
    /// token from `source` when nothing is left above. Returns every touched
    /// cell, column by column, bottom to top within a column.
    pub fn compact_and_refill<R: TokenSource + ?Sized>(&mut self, source: &mut R) -> Vec<Cell> {
        for cell in &mut self.cells {
            cell.fall_distance = 0;
        }

        let mut touched = Vec::new();
        for x in 0..self.size {
            let mut spawned = 0;
            for y in (0..self.size).rev() {
                let idx = self.idx(x, y);
                if !self.cells[idx].token.is_empty() {
                    continue;
                }

                match self.nearest_filled_above(x, y) {
                    Some(src_y) => {
                        let src = self.idx(x, src_y);
                        self.cells[idx].token = self.cells[src].token;
                        self.cells[src].token = Token::Empty;
                        self.cells[idx].fall_distance = (y - src_y) as i32;
                    }
                    None => {
                        spawned += 1;
                        self.cells[idx].token = source.next_token(self.palette);
                        self.cells[idx].fall_distance = y as i32 + spawned;
                    }
                }
                touched.push(self.cells[idx]);
            }
        }
        touched
    }

    fn nearest_filled_above(&self, x: usize, y: usize) -> Option<usize> {
        (0..y)
            .rev()
            .find(|&row| !self.cells[self.idx(x, row)].token.is_empty())
    }

    /// Generate a fresh board with no qualifying run anywhere.
    ///
    /// Cells are assigned column by column; a token that would complete a
    /// run with already-assigned neighbours is rerolled. Every cell is
    /// flagged as an objective.
    pub fn fill<R: TokenSource + ?Sized>(&mut self, source: &mut R) {
        for cell in &mut self.cells {
            cell.token = Token::Empty;
            cell.fall_distance = 0;
            cell.objective = true;
        }
        self.tracks_objectives = true;

        for x in 0..self.size {
            for y in 0..self.size {
                let idx = self.idx(x, y);
                let position = self.cells[idx].position;

                let mut placed = false;
                for _ in 0..MAX_FILL_REROLLS {
                    self.cells[idx].token = source.next_token(self.palette);
                    if self.match_at(position).is_empty() {
                        placed = true;
                        break;
                    }
                }
                if placed {
                    continue;
                }

                // At most two colours conflict (one per axis), so with three
                // or more in the palette a scan always finds one.
                for &token in &Token::PALETTE[..self.palette] {
                    self.cells[idx].token = token;
                    if self.match_at(position).is_empty() {
                        break;
                    }
                }
            }
        }
    }

    /// True once objective flags are in use (after [`Grid::fill`] or
    /// [`Grid::set_objective`])
    pub fn tracks_objectives(&self) -> bool {
        self.tracks_objectives
    }

    /// Returns false if out of bounds
    pub fn set_objective(&mut self, c: Coordinate, objective: bool) -> bool {
        match self.index(c) {
            Some(idx) => {
                self.cells[idx].objective = objective;
                self.tracks_objectives = true;
                true
            }
            None => false,
        }
    }

    /// Number of cells still flagged as objectives
    pub fn objective_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.objective).count()
    }

    /// Un-set the objective flag on the given cells.
    ///
    /// Returns how many of them were still flagged.
    pub fn clear_objectives(&mut self, coords: &[Coordinate]) -> usize {
        let mut cleared = 0;
        for &c in coords {
            if let Some(idx) = self.index(c) {
                if self.cells[idx].objective {
                    self.cells[idx].objective = false;
                    cleared += 1;
                }
            }
        }
        cleared
    }

    /// Rows as token characters, top to bottom
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|cell| cell.token.as_char()).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
