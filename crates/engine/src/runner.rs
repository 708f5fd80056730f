//! Async turn runner
//!
//! Bridges the step-wise core controller with a rendering collaborator that
//! needs time to animate each step.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use tracing::{debug, warn};

use crate::core::{
    Cell, MoveOutcome, PickOutcome, SimpleRng, TokenSource, TurnController, TurnEvent, TurnReport,
    TurnSnapshot,
};
use crate::timer::ScoreTimer;
use crate::types::Coordinate;

/// Rendering collaborator.
///
/// Each call is awaited before the controller takes its next step.
#[allow(async_fn_in_trait)]
pub trait Presenter {
    /// Two cells exchanged tokens (also used when a swap is reverted)
    async fn on_swap(&mut self, a: &Cell, b: &Cell) -> Result<()>;

    /// Matched cells, as they were before being cleared
    async fn on_clear(&mut self, cells: &[Cell]) -> Result<()>;

    /// Cells moved or spawned by gravity, carrying their fall distances
    async fn on_fall(&mut self, cells: &[Cell]) -> Result<()>;
}

/// Presenter that shows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    async fn on_swap(&mut self, _a: &Cell, _b: &Cell) -> Result<()> {
        Ok(())
    }

    async fn on_clear(&mut self, _cells: &[Cell]) -> Result<()> {
        Ok(())
    }

    async fn on_fall(&mut self, _cells: &[Cell]) -> Result<()> {
        Ok(())
    }
}

/// Result of [`TurnRunner::attempt_move`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// Input did not start a move (`Ignored` or `Abandoned`)
    Rejected(MoveOutcome),
    /// The move was resolved, kept or reverted
    Resolved(TurnReport),
}

/// Owns one controller and its score timer
#[derive(Debug)]
pub struct TurnRunner<R = SimpleRng> {
    controller: Rc<RefCell<TurnController<R>>>,
    timer: RefCell<ScoreTimer>,
}

impl<R: TokenSource> TurnRunner<R> {
    pub fn new(controller: TurnController<R>) -> Self {
        Self::with_timer(controller, ScoreTimer::new())
    }

    pub fn with_timer(controller: TurnController<R>, timer: ScoreTimer) -> Self {
        Self {
            controller: Rc::new(RefCell::new(controller)),
            timer: RefCell::new(timer),
        }
    }

    /// Shared handle to the controller, for input handlers on the same thread
    pub fn controller(&self) -> Rc<RefCell<TurnController<R>>> {
        Rc::clone(&self.controller)
    }

    pub fn pick(&self, coord: Coordinate) -> PickOutcome {
        self.controller.borrow_mut().pick(coord)
    }

    pub fn cancel(&self) -> bool {
        self.controller.borrow_mut().cancel()
    }

    pub fn snapshot(&self) -> TurnSnapshot {
        self.controller.borrow().snapshot()
    }

    /// Ticks counted by the score timer
    pub fn elapsed_ticks(&self) -> u32 {
        self.timer.borrow().ticks()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.borrow().is_running()
    }

    /// Attempt a move and present its whole resolution.
    ///
    /// The first accepted move starts the score timer; solving the puzzle
    /// stops it. If the presenter fails, the rest of the turn is resolved
    /// without presentation so the board is left at rest and unlocked, and
    /// the presenter's error is returned.
    ///
    /// Must run inside a tokio runtime (the timer spawns a task).
    pub async fn attempt_move<P: Presenter>(
        &self,
        target: Coordinate,
        presenter: &mut P,
    ) -> Result<MoveResult> {
        let (outcome, first_move) = {
            let mut controller = self.controller.borrow_mut();
            let started = controller.has_started();
            (controller.attempt_move(target), !started)
        };
        if !matches!(outcome, MoveOutcome::Accepted { .. }) {
            return Ok(MoveResult::Rejected(outcome));
        }
        if first_move {
            self.timer.borrow_mut().start();
        }

        loop {
            let event = self.controller.borrow_mut().step();
            let Some(event) = event else {
                return Err(anyhow!("resolution ended without settling"));
            };

            let presented = match &event {
                TurnEvent::Swapped { a, b } | TurnEvent::Reverted { a, b } => {
                    presenter.on_swap(a, b).await
                }
                TurnEvent::Cleared { cells, .. } => presenter.on_clear(cells).await,
                TurnEvent::Fell { cells } => presenter.on_fall(cells).await,
                TurnEvent::Settled(report) => {
                    self.finish(report);
                    return Ok(MoveResult::Resolved(*report));
                }
            };

            if let Err(err) = presented {
                warn!(error = %err, "presenter failed, finishing turn headless");
                let report = self.controller.borrow_mut().resolve();
                if let Some(report) = report {
                    self.finish(&report);
                }
                return Err(err.context("presenting turn"));
            }
        }
    }

    fn finish(&self, report: &TurnReport) {
        if report.solved {
            self.timer.borrow_mut().stop();
        }
        debug!(
            outcome = ?report.outcome,
            points = report.points,
            solved = report.solved,
            "turn presented"
        );
    }
}
