//! Engine error taxonomy (§7), grounded on the teacher's `engine::nl::errors`
//! (`ActionError`/`StateError`) and widened to the full command surface.

use thiserror::Error;

use super::types::SeatId;

/// Errors rejecting a single betting action (§4.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not this seat's turn")]
    NotPlayersTurn,
    #[error("seat cannot act")]
    ActorCannotAct,
    #[error("action not legal in current state")]
    IllegalAction,
    #[error("cannot check while facing a bet")]
    CannotCheckFacingBet,
    #[error("cannot bet when the pot is already opened")]
    CannotBetWhenOpened,
    #[error("raise is below the minimum raise size")]
    RaiseBelowMinimum,
    #[error("amount exceeds seat's chip stack")]
    InsufficientChips,
    #[error("amount must be provided for this action")]
    AmountRequired,
    #[error("betting is closed for this street")]
    ActionFinished,
    #[error("hand is at showdown")]
    AtShowdown,
}

/// Errors from the pure reducer / state machine (§4.5, §8).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid round transition")]
    InvalidTransition,
    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),
}

/// Command-layer taxonomy (§7), surfaced unchanged to callers.
#[derive(Clone, Debug, Error)]
pub enum OrchestratorError {
    #[error("not found")]
    NotFound,
    #[error("not authenticated")]
    Unauthenticated,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage unavailable")]
    StorageUnavailable,
    #[error("internal error")]
    Internal,
}

impl From<ActionError> for OrchestratorError {
    fn from(err: ActionError) -> Self {
        OrchestratorError::InvalidState(err.to_string())
    }
}

impl From<StateError> for OrchestratorError {
    fn from(err: StateError) -> Self {
        OrchestratorError::InvalidState(err.to_string())
    }
}

/// Rejection returned by the betting validator (§4.3), distinct from
/// `ActionError` in that it always names the offending seat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub seat: SeatId,
    pub kind: ActionError,
    pub reason: String,
}
