//! The hand/game engine: a pure event-sourced No-Limit Texas Hold'em core.
//!
//! `events` defines the closed append-only vocabulary; `apply` folds events
//! into a `GameState` (derive/replay); `rules`/`legals` validate and advertise
//! legal actions; `pots` computes side pots and showdown payouts; `orchestrator`
//! turns a user command into a plan of events against the current state.
//! Grounded throughout on the teacher's `engine::nl` module.

pub mod apply;
pub mod clock;
pub mod deck;
pub mod errors;
pub mod events;
pub mod legals;
pub mod orchestrator;
pub mod pots;
pub mod rules;
pub mod seating;
pub mod state;
pub mod types;

pub use apply::{apply as apply_event, derive, derive_from_snapshot};
pub use errors::{ActionError, OrchestratorError, Rejection, StateError};
pub use events::{BlindKind, GameEvent, HoleCardDeal, Payout, StoredEvent};
pub use legals::{legal_actions_for, LegalActions};
pub use state::GameState;
pub use types::{
    ActionKind, Chips, GameConfig, GameStatus, PlayerId, PlayerStatus, Pot, Round, Seat, SeatId,
    TableStakes,
};
