//! Pure reducer (§4.5), grounded on the teacher's
//! `domain::game_state::GameState::apply_row` / `::from_transcript` fold
//! shape, converted from stringly-typed `(Category, &str)` matching to the
//! closed `GameEvent` enum.

use super::events::{BlindKind, GameEvent};
use super::pots::compute_pots;
use super::seating::next_active_seat;
use super::state::GameState;
use super::types::{ActionKind, GameConfig, GameStatus, PlayerStatus, Round, Seat};

/// `apply(state, event) -> state`: total, pure, and side-effect free.
pub fn apply(mut state: GameState, event: &GameEvent) -> GameState {
    match event {
        GameEvent::GameCreated { room_code, config, seed } => {
            state.room_code = room_code.clone();
            state.config = *config;
            state.seed = *seed;
            state.status = GameStatus::Waiting;
        }

        GameEvent::PlayerJoined { seat, player_id, name, starting_chips } => {
            let mut s = Seat::new(*player_id, name.clone(), *seat, *starting_chips);
            s.status = PlayerStatus::SittingOut;
            state.seats.push(s);
        }

        GameEvent::HandStart {
            hand_number,
            dealer,
            small_blind_seat,
            big_blind_seat,
            deck_remainder,
            hole_cards,
        } => {
            state.status = GameStatus::Playing;
            state.hand_number = *hand_number;
            state.round = Round::Preflop;
            state.dealer_position = *dealer;
            state.small_blind_seat = *small_blind_seat;
            state.big_blind_seat = *big_blind_seat;
            state.deck = deck_remainder.clone();
            state.community_cards.clear();
            state.pots.clear();
            state.pot = 0;
            state.current_bet = 0;
            state.last_raise = 0;
            state.last_full_aggressor = None;
            state.voluntary_bet_opened = false;
            state.current_player_position = None;
            state.action_finished = false;

            for seat in state.seats.iter_mut() {
                seat.current_bet = 0;
                seat.total_bet = 0;
                seat.last_action = None;
                seat.show_cards = false;
                seat.hole_cards.clear();
                seat.status = if seat.chips > 0 {
                    PlayerStatus::SittingOut
                } else {
                    PlayerStatus::Out
                };
            }
            for deal in hole_cards {
                if let Some(seat) = state.seat_mut(deal.seat) {
                    seat.hole_cards = vec![deal.cards[0], deal.cards[1]];
                    seat.status = PlayerStatus::Active;
                }
            }
        }

        GameEvent::PostBlind { seat, kind, amount } => {
            if let Some(s) = state.seat_mut(*seat) {
                let amount = (*amount).min(s.chips);
                s.chips -= amount;
                s.current_bet += amount;
                s.total_bet += amount;
                if s.chips == 0 {
                    s.status = PlayerStatus::AllIn;
                }
            }
            state.current_bet = state.seats.iter().map(|s| s.current_bet).max().unwrap_or(0);
            if *kind == BlindKind::Big {
                state.last_raise = state.config.stakes.big_blind;
                state.last_full_aggressor = Some(*seat);
                state.current_player_position = next_active_seat(&state.seats, *seat);
                refresh_pots(&mut state);
                state.action_finished = state.compute_action_finished();
            }
        }

        GameEvent::Check { seat } => {
            if let Some(s) = state.seat_mut(*seat) {
                s.last_action = Some(ActionKind::Check);
            }
            advance_turn(&mut state, *seat);
        }

        GameEvent::Call { seat, amount } => {
            if let Some(s) = state.seat_mut(*seat) {
                s.chips -= *amount;
                s.current_bet += *amount;
                s.total_bet += *amount;
                s.last_action = Some(ActionKind::Call);
                if s.chips == 0 {
                    s.status = PlayerStatus::AllIn;
                }
            }
            advance_turn(&mut state, *seat);
        }

        GameEvent::Bet { seat, amount } => {
            if let Some(s) = state.seat_mut(*seat) {
                s.chips -= *amount;
                s.current_bet = *amount;
                s.total_bet += *amount;
                s.last_action = Some(ActionKind::Bet);
                if s.chips == 0 {
                    s.status = PlayerStatus::AllIn;
                }
            }
            state.current_bet = *amount;
            state.last_raise = *amount;
            state.last_full_aggressor = Some(*seat);
            state.voluntary_bet_opened = true;
            advance_turn(&mut state, *seat);
        }

        GameEvent::Raise { seat, to, amount } => {
            let full = *amount >= state.last_raise.max(state.config.stakes.big_blind);
            if let Some(s) = state.seat_mut(*seat) {
                let delta = to.saturating_sub(s.current_bet);
                s.chips -= delta;
                s.current_bet = *to;
                s.total_bet += delta;
                s.last_action = Some(ActionKind::Raise);
                if s.chips == 0 {
                    s.status = PlayerStatus::AllIn;
                }
            }
            state.current_bet = *to;
            state.voluntary_bet_opened = true;
            if full {
                state.last_raise = *amount;
                state.last_full_aggressor = Some(*seat);
            }
            advance_turn(&mut state, *seat);
        }

        GameEvent::Fold { seat } => {
            if let Some(s) = state.seat_mut(*seat) {
                s.status = PlayerStatus::Folded;
                s.last_action = Some(ActionKind::Fold);
            }
            advance_turn(&mut state, *seat);
        }

        GameEvent::AllIn { seat, to, delta, raises } => {
            let old_current_bet = state.current_bet;
            if let Some(s) = state.seat_mut(*seat) {
                s.chips = 0;
                s.current_bet = *to;
                s.total_bet += *delta;
                s.status = PlayerStatus::AllIn;
                s.last_action = Some(ActionKind::AllIn);
            }
            if let Some(is_full) = raises {
                state.current_bet = (*to).max(old_current_bet);
                state.voluntary_bet_opened = true;
                if *is_full {
                    state.last_raise = to.saturating_sub(old_current_bet);
                    state.last_full_aggressor = Some(*seat);
                }
            }
            advance_turn(&mut state, *seat);
        }

        GameEvent::DealCommunity { round, cards, deck_remainder } => {
            state.round = *round;
            state.community_cards.extend(cards.iter().copied());
            state.deck = deck_remainder.clone();
        }

        GameEvent::AdvanceRound { round } => {
            state.round = *round;
            state.current_bet = 0;
            state.last_raise = 0;
            state.last_full_aggressor = None;
            state.voluntary_bet_opened = false;
            for seat in state.seats.iter_mut() {
                seat.current_bet = 0;
                seat.last_action = None;
            }
            state.current_player_position =
                super::seating::first_to_act(&state.seats, state.dealer_position, state.big_blind_seat, *round);
            state.action_finished = state.compute_action_finished();
        }

        GameEvent::Showdown => {
            state.round = Round::Showdown;
            state.current_player_position = None;
            for pot in state.pots.iter() {
                if pot.eligible.len() != 1 {
                    for seat in state.seats.iter_mut() {
                        if pot.eligible.contains(&seat.position) {
                            seat.show_cards = true;
                        }
                    }
                }
            }
        }

        GameEvent::AwardPot { pots, payouts } => {
            state.pots = pots.clone();
            for payout in payouts {
                if let Some(seat) = state.seat_mut(payout.seat) {
                    seat.chips += payout.amount;
                }
            }
            state.recompute_pot_total();
        }

        GameEvent::HandComplete => {
            for seat in state.seats.iter_mut() {
                seat.current_bet = 0;
                seat.total_bet = 0;
                seat.last_action = None;
                if seat.chips == 0 {
                    seat.status = PlayerStatus::Out;
                }
            }
            state.current_player_position = None;
            if state.seats.iter().filter(|s| s.chips > 0).count() <= 1 {
                state.status = GameStatus::Complete;
            } else {
                state.status = GameStatus::Waiting;
            }
        }

        GameEvent::RevealCards { seat } => {
            if let Some(s) = state.seat_mut(*seat) {
                s.show_cards = true;
            }
        }
    }

    state.revision += 1;
    state
}

fn advance_turn(state: &mut GameState, from_seat: super::types::SeatId) {
    refresh_pots(state);
    state.action_finished = state.compute_action_finished();
    if state.street_closed() {
        state.current_player_position = None;
    } else {
        state.current_player_position = next_active_seat(&state.seats, from_seat);
    }
}

fn refresh_pots(state: &mut GameState) {
    state.pots = compute_pots(&state.seats);
    state.recompute_pot_total();
}

/// `derive(config, events) -> state`: folds `apply` over the full event log
/// in sequence-number order, starting from an empty state.
pub fn derive(
    id: uuid::Uuid,
    room_code: String,
    config: GameConfig,
    seed: u64,
    events: &[GameEvent],
) -> GameState {
    let initial = GameState::new(id, room_code, config, seed);
    events.iter().fold(initial, |state, event| apply(state, event))
}

/// Resumes replay from a snapshot, applying only events with `seq >
/// snapshot.last_seq` (§4.5 snapshot acceleration).
pub fn derive_from_snapshot(snapshot: GameState, tail_events: &[GameEvent]) -> GameState {
    tail_events.iter().fold(snapshot, |state, event| apply(state, event))
}
