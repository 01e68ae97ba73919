//! Betting validator (§4.3), grounded on the teacher's
//! `engine::nl::rules::NoLimitRules` and `engine::nl::engine::apply_action`,
//! generalized onto this spec's flattened `GameState`.

use super::errors::{ActionError, Rejection};
use super::state::GameState;
use super::types::{ActionKind, Chips, PlayerStatus, Round, SeatId};

pub fn price_to_call(state: &GameState, seat_pos: SeatId) -> Chips {
    match state.seat(seat_pos) {
        Some(seat) if seat.status == PlayerStatus::Active => {
            state.current_bet.saturating_sub(seat.current_bet)
        }
        _ => 0,
    }
}

/// The concrete effect of a validated action, ready to be turned into an
/// event and applied to the seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validated {
    Fold,
    Check,
    Call { amount: Chips, all_in: bool },
    Bet { to: Chips, all_in: bool },
    Raise { to: Chips, amount: Chips, all_in: bool },
}

fn reject(seat: SeatId, kind: ActionError) -> Rejection {
    Rejection {
        seat,
        reason: kind.to_string(),
        kind,
    }
}

/// Validates an attempted action against the current hand state (§4.3).
pub fn validate_action(
    state: &GameState,
    seat_pos: SeatId,
    kind: ActionKind,
    amount: Option<Chips>,
) -> Result<Validated, Rejection> {
    if state.action_finished {
        return Err(reject(seat_pos, ActionError::ActionFinished));
    }
    if state.round == Round::Showdown {
        return Err(reject(seat_pos, ActionError::AtShowdown));
    }
    if state.current_player_position != Some(seat_pos) {
        return Err(reject(seat_pos, ActionError::NotPlayersTurn));
    }
    let seat = state
        .seat(seat_pos)
        .ok_or_else(|| reject(seat_pos, ActionError::ActorCannotAct))?;
    if seat.status != PlayerStatus::Active {
        return Err(reject(seat_pos, ActionError::ActorCannotAct));
    }

    let price = price_to_call(state, seat_pos);

    match kind {
        ActionKind::Fold => Ok(Validated::Fold),

        ActionKind::Check => {
            if seat.current_bet != state.current_bet {
                return Err(reject(seat_pos, ActionError::CannotCheckFacingBet));
            }
            Ok(Validated::Check)
        }

        ActionKind::Call => {
            if state.current_bet <= seat.current_bet {
                return Err(reject(seat_pos, ActionError::IllegalAction));
            }
            let movement = price.min(seat.chips);
            Ok(Validated::Call {
                amount: movement,
                all_in: movement == seat.chips,
            })
        }

        ActionKind::Bet => {
            if state.current_bet != 0 {
                return Err(reject(seat_pos, ActionError::CannotBetWhenOpened));
            }
            let to = amount.ok_or_else(|| reject(seat_pos, ActionError::AmountRequired))?;
            if to < state.config.stakes.big_blind || to > seat.chips {
                return Err(reject(seat_pos, ActionError::InsufficientChips));
            }
            Ok(Validated::Bet {
                to,
                all_in: to == seat.chips,
            })
        }

        ActionKind::Raise => {
            if state.current_bet == 0 {
                return Err(reject(seat_pos, ActionError::IllegalAction));
            }
            let to = amount.ok_or_else(|| reject(seat_pos, ActionError::AmountRequired))?;
            let max_to = seat.current_bet + seat.chips;
            if to > max_to {
                return Err(reject(seat_pos, ActionError::InsufficientChips));
            }
            let increment = to.saturating_sub(state.current_bet);
            let min_increment = state.last_raise.max(state.config.stakes.big_blind);
            let is_all_in = to == max_to;
            if increment < min_increment && !is_all_in {
                return Err(reject(seat_pos, ActionError::RaiseBelowMinimum));
            }
            // Posting the big blind sets `last_full_aggressor` to the BB
            // seat without a voluntary bet ever having opened the street, so
            // the BB's own preflop option turn must not be mistaken for them
            // re-raising into a street they already opened.
            let is_bb_preflop_option = state.round == Round::Preflop
                && !state.voluntary_bet_opened
                && seat_pos == state.big_blind_seat;
            if state.last_full_aggressor == Some(seat_pos) && !is_bb_preflop_option {
                return Err(reject(seat_pos, ActionError::IllegalAction));
            }
            Ok(Validated::Raise {
                to,
                amount: increment,
                all_in: is_all_in,
            })
        }

        ActionKind::AllIn => {
            if seat.chips == 0 {
                return Err(reject(seat_pos, ActionError::IllegalAction));
            }
            let to = seat.current_bet + seat.chips;
            if to <= state.current_bet {
                Ok(Validated::Call { amount: seat.chips, all_in: true })
            } else if state.current_bet == 0 {
                Ok(Validated::Bet { to, all_in: true })
            } else {
                let amount = to - state.current_bet;
                Ok(Validated::Raise { to, amount, all_in: true })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{GameConfig, GameStatus, Seat, TableStakes};
    use uuid::Uuid;

    fn base_state() -> GameState {
        let mut state = GameState::new(
            Uuid::new_v4(),
            "ABCDEF".to_string(),
            GameConfig {
                stakes: TableStakes { small_blind: 10, big_blind: 20 },
                starting_chips: 500,
            },
            1,
        );
        state.status = GameStatus::Playing;
        state.round = Round::Preflop;
        state.current_bet = 20;
        state.last_raise = 20;
        state.current_player_position = Some(0);
        state.seats = vec![
            Seat::new(Uuid::new_v4(), "Alice".into(), 0, 490),
            Seat::new(Uuid::new_v4(), "Bob".into(), 1, 480),
        ];
        state.seats[0].status = PlayerStatus::Active;
        state.seats[0].current_bet = 10;
        state.seats[1].status = PlayerStatus::Active;
        state.seats[1].current_bet = 20;
        state
    }

    #[test]
    fn check_rejected_when_facing_a_bet() {
        let state = base_state();
        let err = validate_action(&state, 0, ActionKind::Check, None).unwrap_err();
        assert_eq!(err.kind, ActionError::CannotCheckFacingBet);
    }

    #[test]
    fn call_moves_min_of_price_and_stack() {
        let state = base_state();
        let v = validate_action(&state, 0, ActionKind::Call, None).unwrap();
        assert_eq!(v, Validated::Call { amount: 10, all_in: false });
    }

    #[test]
    fn raise_below_minimum_rejected() {
        let state = base_state();
        let err = validate_action(&state, 0, ActionKind::Raise, Some(25)).unwrap_err();
        assert_eq!(err.kind, ActionError::RaiseBelowMinimum);
    }

    #[test]
    fn not_players_turn_rejected() {
        let state = base_state();
        let err = validate_action(&state, 1, ActionKind::Fold, None).unwrap_err();
        assert_eq!(err.kind, ActionError::NotPlayersTurn);
    }

    #[test]
    fn big_blind_may_raise_on_unopened_preflop_option() {
        // Heads-up: SB (seat 0) calls the big blind, action returns to seat
        // 1's option with nobody having voluntarily bet yet.
        let mut state = base_state();
        state.big_blind_seat = 1;
        state.current_player_position = Some(1);
        state.last_full_aggressor = Some(1);
        state.voluntary_bet_opened = false;
        state.seats[1].current_bet = 20;

        let v = validate_action(&state, 1, ActionKind::Raise, Some(40)).unwrap();
        assert_eq!(v, Validated::Raise { to: 40, amount: 20, all_in: false });
    }

    #[test]
    fn big_blind_cannot_re_raise_after_their_own_voluntary_raise() {
        let mut state = base_state();
        state.big_blind_seat = 1;
        state.current_player_position = Some(1);
        state.last_full_aggressor = Some(1);
        state.voluntary_bet_opened = true;
        state.seats[1].current_bet = 20;

        let err = validate_action(&state, 1, ActionKind::Raise, Some(40)).unwrap_err();
        assert_eq!(err.kind, ActionError::IllegalAction);
    }
}
