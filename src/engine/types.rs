//! Core value types shared across the engine (§3.1 Data model).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::showdown::Card;

pub type Chips = u64;
/// Seat index within a game, `0..N-1`.
pub type SeatId = u8;
/// Stable per-seat identity, independent of seat index.
pub type PlayerId = Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
    Out,
    SittingOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
    pub position: SeatId,
    pub chips: Chips,
    pub current_bet: Chips,
    pub total_bet: Chips,
    pub hole_cards: Vec<Card>,
    pub status: PlayerStatus,
    pub last_action: Option<ActionKind>,
    pub show_cards: bool,
}

impl Seat {
    pub fn new(id: PlayerId, name: String, position: SeatId, chips: Chips) -> Self {
        Self {
            id,
            name,
            position,
            chips,
            current_bet: 0,
            total_bet: 0,
            hole_cards: Vec::new(),
            status: PlayerStatus::SittingOut,
            last_action: None,
            show_cards: false,
        }
    }

    pub fn is_dealt_in(&self) -> bool {
        !matches!(self.status, PlayerStatus::Out | PlayerStatus::SittingOut)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: Vec<SeatId>,
    pub winners: Option<Vec<SeatId>>,
    pub winning_rank_label: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub stakes: TableStakes,
    pub starting_chips: Chips,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Playing,
    Complete,
}
