//! Tile-matching puzzle (workspace facade crate).
//!
//! This package exposes `match_three::{core,engine,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use match_three_core as core;
pub use match_three_engine as engine;
pub use match_three_types as types;
