//! `LegalActions` — the UI-hinting structure returned by `LegalActions` (§4.3,
//! §6.1), grounded on the teacher's `engine::nl::legals::LegalActions`.

use serde::{Deserialize, Serialize};

use super::rules::price_to_call;
use super::state::GameState;
use super::types::{Chips, PlayerStatus, Round, SeatId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub may_fold: bool,
    pub may_check: bool,
    pub may_call: bool,
    pub call_amount: Chips,
    pub may_bet: bool,
    pub min_bet: Option<Chips>,
    pub may_raise: bool,
    pub min_raise: Option<Chips>,
    pub max_raise: Option<Chips>,
    pub may_all_in: bool,
    /// §4.3 last paragraph: affordance surfaced when betting can't continue
    /// on this street (`action_finished`) or when it's nobody's turn outside
    /// showdown (between streets).
    pub can_advance: bool,
}

pub fn legal_actions_for(state: &GameState, seat_pos: SeatId) -> LegalActions {
    let mut legals = LegalActions::default();

    legals.can_advance = state.action_finished
        || (state.current_player_position.is_none() && state.round != Round::Showdown);

    let Some(seat) = state.seat(seat_pos) else {
        return legals;
    };

    if state.action_finished
        || state.round == Round::Showdown
        || state.current_player_position != Some(seat_pos)
        || seat.status != PlayerStatus::Active
    {
        return legals;
    }

    let price = price_to_call(state, seat_pos);
    legals.may_check = price == 0;
    legals.may_call = price > 0;
    legals.call_amount = price.min(seat.chips);
    legals.may_fold = true;
    legals.may_all_in = seat.chips > 0;

    if state.current_bet == 0 {
        legals.may_bet = seat.chips >= state.config.stakes.big_blind;
        if legals.may_bet {
            legals.min_bet = Some(state.config.stakes.big_blind);
        }
    } else {
        let is_bb_preflop_option = state.round == Round::Preflop
            && !state.voluntary_bet_opened
            && seat_pos == state.big_blind_seat;
        let can_reopen = state.last_full_aggressor != Some(seat_pos) || is_bb_preflop_option;
        if can_reopen {
            let min_raise_to = state.current_bet + state.last_raise.max(state.config.stakes.big_blind);
            let max_raise_to = seat.current_bet + seat.chips;
            if max_raise_to > state.current_bet {
                legals.may_raise = max_raise_to >= min_raise_to || seat.chips > 0;
                legals.min_raise = Some(min_raise_to.min(max_raise_to));
                legals.max_raise = Some(max_raise_to);
            }
        }
    }

    legals
}
