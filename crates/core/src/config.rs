//! Grid configuration
//!
//! The only tunables are the board size and the number of colours in play,
//! both fixed when a board is built.

use std::env;

use thiserror::Error;

use crate::types::{
    Token, DEFAULT_GRID_SIZE, DEFAULT_PALETTE_SIZE, MAX_GRID_SIZE, MIN_GRID_SIZE,
    MIN_PALETTE_SIZE,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size {0} outside {min}..={max}", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    GridSize(usize),
    #[error("palette size {0} outside {min}..={max}", min = MIN_PALETTE_SIZE, max = Token::PALETTE.len())]
    PaletteSize(usize),
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Board construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    /// Side length `N` of the square board
    pub size: usize,
    /// Number of colours drawn from [`Token::PALETTE`]
    pub palette: usize,
}

impl GridConfig {
    pub fn new(size: usize, palette: usize) -> Result<Self, ConfigError> {
        let config = Self { size, palette };
        config.validate()?;
        Ok(config)
    }

    /// Load from `MATCH3_GRID_SIZE` / `MATCH3_PALETTE_SIZE`.
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let size = read_var("MATCH3_GRID_SIZE")?.unwrap_or(DEFAULT_GRID_SIZE);
        let palette = read_var("MATCH3_PALETTE_SIZE")?.unwrap_or(DEFAULT_PALETTE_SIZE);
        Self::new(size, palette)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.size) {
            return Err(ConfigError::GridSize(self.size));
        }
        // Two colours can leave a cell with no conflict-free choice during fill.
        if !(MIN_PALETTE_SIZE..=Token::PALETTE.len()).contains(&self.palette) {
            return Err(ConfigError::PaletteSize(self.palette));
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            palette: DEFAULT_PALETTE_SIZE,
        }
    }
}

fn read_var(var: &'static str) -> Result<Option<usize>, ConfigError> {
    match env::var(var) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue { var, value })
        }
        Err(_) => Ok(None),
    }
}
