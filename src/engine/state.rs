//! The authoritative, derived game state (§3.1 Hand state / Game), produced
//! by folding events through `apply` (§4.5). Grounded on the teacher's
//! `engine::nl::state::BettingState` field set, flattened to match the
//! wire-projection shape of §6.3 directly instead of nesting a separate
//! betting struct.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::showdown::Card;

use super::types::{Chips, GameConfig, GameStatus, Pot, Round, Seat, SeatId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub id: Uuid,
    pub room_code: String,
    pub config: GameConfig,
    pub seed: u64,
    pub status: GameStatus,

    pub hand_number: u64,
    pub round: Round,
    pub dealer_position: SeatId,
    pub small_blind_seat: SeatId,
    pub big_blind_seat: SeatId,
    pub current_player_position: Option<SeatId>,

    pub current_bet: Chips,
    pub last_raise: Chips,
    /// Seat that made the last full-size raise/bet this street; used only to
    /// decide whether that *same* seat may re-raise after a short all-in
    /// that did not reopen the action (§4.3 raise rule, §9 redesign note).
    pub last_full_aggressor: Option<SeatId>,
    /// Whether a *voluntary* bet or raise has happened this street, as
    /// opposed to only the mandatory blind post. The big blind's preflop
    /// option turn sets `last_full_aggressor` to themselves without this
    /// ever becoming true, so their own re-raise check below isn't mistaken
    /// for re-raising into their own uncontested blind.
    pub voluntary_bet_opened: bool,

    pub community_cards: Vec<Card>,
    pub pot: Chips,
    pub pots: Vec<Pot>,
    pub deck: Vec<Card>,
    pub action_finished: bool,

    pub seats: Vec<Seat>,
    pub revision: u64,
}

impl GameState {
    pub fn new(id: Uuid, room_code: String, config: GameConfig, seed: u64) -> Self {
        Self {
            id,
            room_code,
            config,
            seed,
            status: GameStatus::Waiting,
            hand_number: 0,
            round: Round::Preflop,
            dealer_position: 0,
            small_blind_seat: 0,
            big_blind_seat: 0,
            current_player_position: None,
            current_bet: 0,
            last_raise: 0,
            last_full_aggressor: None,
            voluntary_bet_opened: false,
            community_cards: Vec::new(),
            pot: 0,
            pots: Vec::new(),
            deck: Vec::new(),
            action_finished: false,
            seats: Vec::new(),
            revision: 0,
        }
    }

    pub fn seat(&self, position: SeatId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.position == position)
    }

    pub fn seat_mut(&mut self, position: SeatId) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.position == position)
    }

    pub fn seats_with_chips_count(&self) -> usize {
        self.seats.iter().filter(|s| s.chips > 0 || s.total_bet > 0).count()
    }

    pub fn recompute_pot_total(&mut self) {
        self.pot = self.pots.iter().map(|p| p.amount).sum();
    }

    /// §4.4.2: a street ends when every still-active (non-all-in) seat has
    /// matched `current_bet` and has acted this street. Used by `advance_turn`
    /// to decide when nobody is left to act, independent of whether
    /// `action_finished` (a stronger, hand-wide condition) also holds.
    pub fn street_closed(&self) -> bool {
        self.seats.iter().all(|s| {
            if s.status != super::types::PlayerStatus::Active {
                return true;
            }
            s.current_bet == self.current_bet && s.last_action.is_some()
        })
    }

    /// Whether every still-active seat has matched `current_bet`, without
    /// requiring `last_action` to be set. A fresh street (just dealt by
    /// `AdvanceRound`) resets every seat's `last_action` to `None`, so this
    /// is the weaker check `compute_action_finished` needs for the lone
    /// active seat in an all-in runout, who has nothing left to match.
    fn active_bets_equalized(&self) -> bool {
        self.seats.iter().all(|s| {
            s.status != super::types::PlayerStatus::Active || s.current_bet == self.current_bet
        })
    }

    /// §4.4.2: betting cannot meaningfully continue.
    pub fn compute_action_finished(&self) -> bool {
        let active_count = self
            .seats
            .iter()
            .filter(|s| s.status == super::types::PlayerStatus::Active)
            .count();
        let all_in_count = self
            .seats
            .iter()
            .filter(|s| s.status == super::types::PlayerStatus::AllIn)
            .count();

        // One seat left who could still act, everyone else all-in, and bets
        // equalized: nothing left to decide even mid-runout, when a fresh
        // `AdvanceRound` has just cleared everyone's `last_action`.
        if active_count <= 1 && all_in_count >= 1 && self.active_bets_equalized() {
            return true;
        }
        if !self.street_closed() {
            return false;
        }
        active_count == 0 || (active_count <= 1 && all_in_count >= 1)
    }
}
