//! Host-side turn driving.
//!
//! The core resolves a move one step at a time and never waits on anything.
//! This crate is the layer that does: it hands every step to a [`Presenter`]
//! (the rendering collaborator), awaits it, and only then asks the core for
//! the next step. It also owns the score timer, which the core must not.
//!
//! Everything here is single-threaded: the controller lives in an
//! `Rc<RefCell<_>>` and is never borrowed across an await, so input handlers
//! sharing it are answered by the controller's own lock while an animation
//! is in flight.

pub mod runner;
pub mod timer;

pub use match_three_core as core;
pub use match_three_types as types;

pub use runner::{MoveResult, NullPresenter, Presenter, TurnRunner};
pub use timer::ScoreTimer;
