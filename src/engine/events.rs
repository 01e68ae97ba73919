//! Closed event vocabulary (§4.5), grounded on the teacher's
//! `engine::nl::events::GameEvent` shape but widened to the full
//! orchestrator-level command surface instead of just action application.

use serde::{Deserialize, Serialize};

use crate::showdown::Card;

use super::types::{Chips, GameConfig, PlayerId, Pot, Round, SeatId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleCardDeal {
    pub seat: SeatId,
    pub cards: [Card; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlindKind {
    Small,
    Big,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub seat: SeatId,
    pub amount: Chips,
}

/// One event in a game's append-only log. `seq` is strictly increasing per
/// game (§3.1 Event).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub seq: u64,
    pub hand_no: u64,
    pub kind: GameEvent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    GameCreated {
        room_code: String,
        config: GameConfig,
        seed: u64,
    },
    PlayerJoined {
        seat: SeatId,
        player_id: PlayerId,
        name: String,
        starting_chips: Chips,
    },
    HandStart {
        hand_number: u64,
        dealer: SeatId,
        small_blind_seat: SeatId,
        big_blind_seat: SeatId,
        deck_remainder: Vec<Card>,
        hole_cards: Vec<HoleCardDeal>,
    },
    PostBlind {
        seat: SeatId,
        kind: BlindKind,
        amount: Chips,
    },
    Check {
        seat: SeatId,
    },
    Call {
        seat: SeatId,
        amount: Chips,
    },
    Bet {
        seat: SeatId,
        amount: Chips,
    },
    Raise {
        seat: SeatId,
        to: Chips,
        amount: Chips,
    },
    Fold {
        seat: SeatId,
    },
    AllIn {
        seat: SeatId,
        /// Seat's `current_bet` after the all-in commitment.
        to: Chips,
        /// Chips moved from the seat's stack into the pot.
        delta: Chips,
        /// `None` when the all-in only calls (or under-calls) the existing
        /// bet; `Some(is_full_raise)` when it raises the bet, so `apply`
        /// can update `last_raise`/`last_full_aggressor` correctly.
        raises: Option<bool>,
    },
    DealCommunity {
        round: Round,
        cards: Vec<Card>,
        deck_remainder: Vec<Card>,
    },
    AdvanceRound {
        round: Round,
    },
    Showdown,
    AwardPot {
        pots: Vec<Pot>,
        payouts: Vec<Payout>,
    },
    HandComplete,
    RevealCards {
        seat: SeatId,
    },
}
