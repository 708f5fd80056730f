use serde::{Deserialize, Serialize};

use crate::turn::TurnState;

/// Host-facing observation of a controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub size: usize,
    /// Token characters, top row first
    pub rows: Vec<String>,
    /// Cells still flagged as objectives
    pub objectives: usize,
    pub tracks_objectives: bool,
    pub score: u32,
    pub state: TurnState,
    pub started: bool,
}

impl TurnSnapshot {
    pub fn clear(&mut self) {
        self.size = 0;
        self.rows.clear();
        self.objectives = 0;
        self.tracks_objectives = false;
        self.score = 0;
        self.state = TurnState::Idle;
        self.started = false;
    }

    /// Input would currently be accepted
    pub fn playable(&self) -> bool {
        !matches!(self.state, TurnState::Resolving | TurnState::Solved)
    }
}

impl Default for TurnSnapshot {
    fn default() -> Self {
        Self {
            size: 0,
            rows: Vec::new(),
            objectives: 0,
            tracks_objectives: false,
            score: 0,
            state: TurnState::Idle,
            started: false,
        }
    }
}
