//! Hand orchestrator (§4.4): command handlers that validate a command
//! against the current state and *plan* the event(s) it would append.
//! Planning is pure — it never mutates `state` — so the caller (the
//! per-game command lane, §5) can apply the plan, persist it, and only then
//! swap it in, satisfying §4.4.5's transactional guarantee. Grounded on the
//! teacher's `engine::nl::engine::BettingEngine::apply_action`/`advance_street`
//! for the per-action mechanics and `ledger::worker::LedgerWorker` for the
//! single-consumer command-lane shape (realized one level up, in `registry`).

use uuid::Uuid;

use crate::showdown::Card;

use super::apply::{apply, derive};
use super::deck::Deck;
use super::errors::OrchestratorError;
use super::events::{BlindKind, GameEvent, HoleCardDeal, Payout};
use super::pots::distribute_pot;
use super::rules::validate_action;
use super::seating::{next_active_seat, next_seat_with_chips};
use super::state::GameState;
use super::types::{ActionKind, Chips, GameStatus, PlayerId, PlayerStatus, Round, SeatId};

fn hand_seed(base_seed: u64, hand_number: u64) -> u64 {
    base_seed ^ hand_number.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// `JoinGame` (§4.4.1): the game must not have started its first hand yet.
pub fn plan_join_game(
    state: &GameState,
    player_id: PlayerId,
    name: &str,
) -> Result<Vec<GameEvent>, OrchestratorError> {
    if state.status != GameStatus::Waiting || state.hand_number != 0 {
        return Err(OrchestratorError::InvalidState(
            "game already underway".into(),
        ));
    }
    if state.seats.iter().any(|s| s.name == name) {
        return Err(OrchestratorError::Conflict(format!(
            "seat name '{name}' already taken"
        )));
    }
    let position = state.seats.len() as SeatId;
    Ok(vec![GameEvent::PlayerJoined {
        seat: position,
        player_id,
        name: name.to_string(),
        starting_chips: state.config.starting_chips,
    }])
}

fn seats_in_hand_order(state: &GameState, dealer: SeatId) -> Vec<SeatId> {
    let eligible: Vec<SeatId> = state
        .seats
        .iter()
        .filter(|s| s.chips > 0)
        .map(|s| s.position)
        .collect();
    let mut ordered = Vec::with_capacity(eligible.len());
    let mut cursor = dealer;
    for _ in 0..eligible.len() {
        if let Some(next) = next_seat_with_chips(&state.seats, cursor) {
            if !ordered.contains(&next) {
                ordered.push(next);
            }
            cursor = next;
        }
    }
    ordered
}

fn blind_seats(order: &[SeatId], dealer: SeatId) -> (SeatId, SeatId) {
    if order.len() == 2 {
        // Heads-up: dealer posts the small blind.
        let other = order.iter().copied().find(|s| *s != dealer).unwrap_or(dealer);
        (dealer, other)
    } else {
        let sb_idx = order.iter().position(|s| *s == dealer).map(|i| (i + 1) % order.len()).unwrap_or(0);
        let bb_idx = (sb_idx + 1) % order.len();
        (order[sb_idx], order[bb_idx])
    }
}

fn deal_hand_events(state: &GameState, hand_number: u64, dealer: SeatId) -> Vec<GameEvent> {
    let order = seats_in_hand_order(state, dealer);
    let mut deck = Deck::shuffled(hand_seed(state.seed, hand_number));

    let mut hole: Vec<(SeatId, [Card; 2])> = order
        .iter()
        .map(|s| (*s, [Card::new(2, crate::showdown::Suit::Clubs); 2]))
        .collect();
    for round in 0..2 {
        for (_, cards) in hole.iter_mut() {
            let card = deck.draw().expect("deck has enough cards for this table size");
            cards[round] = card;
        }
    }

    let (sb_seat, bb_seat) = blind_seats(&order, dealer);
    let sb_amount = state
        .seat(sb_seat)
        .map(|s| s.chips.min(state.config.stakes.small_blind))
        .unwrap_or(0);
    let bb_amount = state
        .seat(bb_seat)
        .map(|s| s.chips.min(state.config.stakes.big_blind))
        .unwrap_or(0);

    vec![
        GameEvent::HandStart {
            hand_number,
            dealer,
            small_blind_seat: sb_seat,
            big_blind_seat: bb_seat,
            deck_remainder: deck.into_remaining(),
            hole_cards: hole
                .into_iter()
                .map(|(seat, cards)| HoleCardDeal { seat, cards })
                .collect(),
        },
        GameEvent::PostBlind {
            seat: sb_seat,
            kind: BlindKind::Small,
            amount: sb_amount,
        },
        GameEvent::PostBlind {
            seat: bb_seat,
            kind: BlindKind::Big,
            amount: bb_amount,
        },
    ]
}

/// `StartHand` (§4.4.1): only ever the game's very first hand. Later hands
/// go through `NextHand`, which rotates the dealer (§4.4.1, §4.6).
pub fn plan_start_hand(state: &GameState) -> Result<Vec<GameEvent>, OrchestratorError> {
    if state.hand_number != 0 {
        return Err(OrchestratorError::InvalidState(
            "hand already started; use NextHand".into(),
        ));
    }
    let seated_with_chips = state.seats.iter().filter(|s| s.chips > 0).count();
    if seated_with_chips < 2 {
        return Err(OrchestratorError::InvalidState(
            "need at least 2 seats with chips to start".into(),
        ));
    }
    let dealer = state
        .seats
        .iter()
        .filter(|s| s.chips > 0)
        .map(|s| s.position)
        .min()
        .unwrap_or(0);
    Ok(deal_hand_events(state, 1, dealer))
}

/// `NextHand` (§4.4.1): rotates the dealer clockwise to the next seat with chips.
pub fn plan_next_hand(state: &GameState) -> Result<Vec<GameEvent>, OrchestratorError> {
    if state.status != GameStatus::Waiting || state.hand_number == 0 {
        return Err(OrchestratorError::InvalidState(
            "current hand has not completed".into(),
        ));
    }
    if state.seats.iter().filter(|s| s.chips > 0).count() < 2 {
        return Err(OrchestratorError::InvalidState(
            "game has ended: at most one seat still has chips".into(),
        ));
    }
    let dealer = next_seat_with_chips(&state.seats, state.dealer_position)
        .ok_or_else(|| OrchestratorError::InvalidState("no seat available to deal to".into()))?;
    Ok(deal_hand_events(state, state.hand_number + 1, dealer))
}

fn seats_still_in(state: &GameState) -> Vec<SeatId> {
    state
        .seats
        .iter()
        .filter(|s| matches!(s.status, PlayerStatus::Active | PlayerStatus::AllIn))
        .map(|s| s.position)
        .collect()
}

/// Builds the terminal `Showdown`/`AwardPot`/`HandComplete` sequence once the
/// hand has nothing left to decide — either because only one seat remains
/// in the hand (§4.4.1 `Act`'s fold-to-one short-circuit) or because the
/// river has been dealt (§4.4.4).
fn terminal_events(state: &GameState) -> Vec<GameEvent> {
    let mut pots = state.pots.clone();
    let mut payouts: Vec<Payout> = Vec::new();
    for pot in pots.iter_mut() {
        for (seat, amount) in distribute_pot(pot, &state.seats, &state.community_cards, state.dealer_position) {
            if let Some(p) = payouts.iter_mut().find(|p| p.seat == seat) {
                p.amount += amount;
            } else {
                payouts.push(Payout { seat, amount });
            }
        }
    }
    vec![
        GameEvent::Showdown,
        GameEvent::AwardPot { pots, payouts },
        GameEvent::HandComplete,
    ]
}

/// `Act` (§4.4.1): validates then applies a single betting action.
pub fn plan_act(
    state: &GameState,
    seat: SeatId,
    kind: ActionKind,
    amount: Option<Chips>,
) -> Result<Vec<GameEvent>, OrchestratorError> {
    let validated = validate_action(state, seat, kind, amount).map_err(|rejection| {
        OrchestratorError::InvalidState(rejection.reason)
    })?;

    let event = match validated {
        super::rules::Validated::Fold => GameEvent::Fold { seat },
        super::rules::Validated::Check => GameEvent::Check { seat },
        super::rules::Validated::Call { amount, all_in } => {
            if all_in {
                GameEvent::AllIn { seat, to: state.seat(seat).unwrap().current_bet + amount, delta: amount, raises: None }
            } else {
                GameEvent::Call { seat, amount }
            }
        }
        super::rules::Validated::Bet { to, all_in } => {
            if all_in {
                GameEvent::AllIn { seat, to, delta: to, raises: Some(true) }
            } else {
                GameEvent::Bet { seat, amount: to }
            }
        }
        super::rules::Validated::Raise { to, amount, all_in } => {
            let full = amount >= state.last_raise.max(state.config.stakes.big_blind);
            if all_in {
                let delta = to.saturating_sub(state.seat(seat).unwrap().current_bet);
                GameEvent::AllIn { seat, to, delta, raises: Some(full) }
            } else {
                GameEvent::Raise { seat, to, amount }
            }
        }
    };

    let mut events = vec![event.clone()];
    let after = apply(state.clone(), &event);

    if matches!(event, GameEvent::Fold { .. }) {
        let remaining = seats_still_in(&after);
        if remaining.len() == 1 {
            events.extend(terminal_events(&after));
            return Ok(events);
        }
    }

    Ok(events)
}

fn next_round(round: Round) -> Option<Round> {
    match round {
        Round::Preflop => Some(Round::Flop),
        Round::Flop => Some(Round::Turn),
        Round::Turn => Some(Round::River),
        Round::River | Round::Showdown => None,
    }
}

fn deal_count(round: Round) -> usize {
    match round {
        Round::Flop => 3,
        Round::Turn | Round::River => 1,
        _ => 0,
    }
}

/// `Advance` (§4.4.1, §4.4.3): deals the next street, or at the river runs
/// showdown and awards the pot.
pub fn plan_advance(state: &GameState) -> Result<Vec<GameEvent>, OrchestratorError> {
    if state.round == Round::Showdown {
        return Err(OrchestratorError::InvalidState("hand is already at showdown".into()));
    }
    if !state.action_finished && state.current_player_position.is_some() {
        return Err(OrchestratorError::InvalidState(
            "board must be advanced before more betting — street is not finished".into(),
        ));
    }

    // River betting has already closed with all five community cards on the
    // board: nothing left to deal, go straight to showdown.
    if state.round == Round::River {
        return Ok(terminal_events(state));
    }

    let next = next_round(state.round)
        .expect("round is Preflop/Flop/Turn here, so a next street always exists");

    let mut deck = Deck::from_remaining(state.deck.clone());
    let n = deal_count(next);
    let cards = deck.burn_and_deal(n);
    let deal_event = GameEvent::DealCommunity {
        round: next,
        cards,
        deck_remainder: deck.into_remaining(),
    };
    let mut events = vec![deal_event.clone()];

    let after_deal = apply(state.clone(), &deal_event);
    let advance_event = GameEvent::AdvanceRound { round: next };
    events.push(advance_event.clone());
    let after_advance = apply(after_deal, &advance_event);

    if after_advance.action_finished {
        if next == Round::River {
            events.extend(terminal_events(&after_advance));
            return Ok(events);
        }
        // §4.4.2: closure persists past Advance (everyone left is all-in) ->
        // reveal remaining hands now; later Advance calls will deal the rest
        // of the board without further betting.
        for seat_pos in seats_still_in(&after_advance) {
            events.push(GameEvent::RevealCards { seat: seat_pos });
        }
    }

    Ok(events)
}

/// `RevealCard` (§4.4.1, §9 open question): only legal heads-up-with-all-in,
/// with round ∈ {flop, turn, river}, and only the sole remaining chip holder
/// may invoke it. Emits the same deal/advance/showdown events `Advance`
/// would, but (per §9's resolution) also toggles `show_cards` for the
/// invoking seat explicitly rather than relying solely on the automatic
/// reveal-on-closure behavior.
pub fn plan_reveal_card(state: &GameState, seat: SeatId) -> Result<Vec<GameEvent>, OrchestratorError> {
    if !state.action_finished {
        return Err(OrchestratorError::InvalidState("betting has not closed".into()));
    }
    if !matches!(state.round, Round::Flop | Round::Turn | Round::River) {
        return Err(OrchestratorError::InvalidState("wrong street for RevealCard".into()));
    }
    let non_all_in: Vec<SeatId> = state
        .seats
        .iter()
        .filter(|s| s.status == PlayerStatus::Active)
        .map(|s| s.position)
        .collect();
    if non_all_in.len() != 1 || non_all_in[0] != seat {
        return Err(OrchestratorError::Forbidden(
            "only the sole remaining chip holder may reveal".into(),
        ));
    }

    if state.round == Round::River {
        let mut events = terminal_events(state);
        events.push(GameEvent::RevealCards { seat });
        return Ok(events);
    }

    let next = next_round(state.round)
        .expect("round is Flop/Turn here, so a next street always exists");
    let mut deck = Deck::from_remaining(state.deck.clone());
    let cards = deck.burn_and_deal(deal_count(next));
    let deal_event = GameEvent::DealCommunity { round: next, cards, deck_remainder: deck.into_remaining() };
    let after_deal = apply(state.clone(), &deal_event);
    let advance_event = GameEvent::AdvanceRound { round: next };
    let after_advance = apply(after_deal, &advance_event);

    let mut events = vec![deal_event, advance_event, GameEvent::RevealCards { seat }];

    if next == Round::River {
        events.extend(terminal_events(&after_advance));
    }
    Ok(events)
}

/// Creates a fresh game state seed for `GameCreated` (§4.4.1 precursor,
/// invoked by the registry rather than a user-facing command).
pub fn new_game_id() -> Uuid {
    Uuid::new_v4()
}

/// Turn-aware helper exposed for `LegalActions`'s `canAdvance` affordance
/// (§4.3 last paragraph) without duplicating the betting-closure logic.
pub fn current_actor_or_none(state: &GameState) -> Option<SeatId> {
    if state.action_finished {
        None
    } else {
        state.current_player_position.or_else(|| next_active_seat(&state.seats, state.dealer_position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::pots::compute_pots;
    use crate::engine::types::{GameConfig, Seat, TableStakes};
    use uuid::Uuid;

    fn new_game(room_code: &str, seed: u64, stakes: TableStakes, starting_chips: Chips) -> (Uuid, GameConfig, GameState) {
        let id = Uuid::new_v4();
        let config = GameConfig { stakes, starting_chips };
        let created = GameEvent::GameCreated { room_code: room_code.to_string(), config, seed };
        let state = apply(GameState::new(id, room_code.to_string(), config, seed), &created);
        (id, config, state)
    }

    fn join_all(mut state: GameState, names: &[&str]) -> GameState {
        for name in names {
            let events = plan_join_game(&state, PlayerId::new_v4(), name).unwrap();
            state = events.iter().fold(state, |s, e| apply(s, e));
        }
        state
    }

    fn act(state: &GameState, seat: SeatId, kind: ActionKind, amount: Option<Chips>) -> (GameState, Vec<GameEvent>) {
        let events = plan_act(state, seat, kind, amount).unwrap();
        let next = events.iter().fold(state.clone(), |s, e| apply(s, e));
        (next, events)
    }

    fn total_chips(state: &GameState) -> Chips {
        state.seats.iter().map(|s| s.chips).sum()
    }

    /// Scenario 1: heads-up, both seats shove preflop for equal stacks. The
    /// board runs out with nobody left to act, and the whole stake must end
    /// up distributed between the two seats with nothing lost or invented.
    #[test]
    fn heads_up_all_in_preflop_runs_to_completion_and_conserves_chips() {
        let stakes = TableStakes { small_blind: 10, big_blind: 20 };
        let (_, _, state) = new_game("HU0001", 1, stakes, 100);
        let state = join_all(state, &["Alice", "Bob"]);
        let events = plan_start_hand(&state).unwrap();
        let state = events.iter().fold(state, |s, e| apply(s, e));

        let acting_seat = state.current_player_position.expect("someone to act preflop");
        let (state, _) = act(&state, acting_seat, ActionKind::AllIn, None);
        let other_seat = state.current_player_position.expect("the other seat must call or fold");
        let (mut state, _) = act(&state, other_seat, ActionKind::AllIn, None);

        assert!(state.action_finished);
        assert_eq!(total_chips(&state), 200);

        // Flop, turn, river: nobody left to act, so each Advance deals the
        // next street until the river triggers showdown.
        for _ in 0..3 {
            let events = plan_advance(&state).unwrap();
            state = events.iter().fold(state, |s, e| apply(s, e));
        }

        assert_ne!(state.status, GameStatus::Playing);
        assert_eq!(total_chips(&state), 200);
    }

    /// Scenarios 2/3: three uneven stacks all shove preflop, producing a
    /// main pot and two side pots, and the whole stake must survive the
    /// split exactly (§4.2 steps 1-4, exercised end-to-end through `apply`
    /// rather than only through `compute_pots` directly).
    #[test]
    fn three_way_all_in_preflop_produces_side_pots_and_conserves_chips() {
        let stakes = TableStakes { small_blind: 10, big_blind: 20 };
        let id = Uuid::new_v4();
        let config = GameConfig { stakes, starting_chips: 200 };
        let mut state = GameState::new(id, "TWPOT1".to_string(), config, 7);
        state.status = GameStatus::Playing;
        state.hand_number = 1;
        state.round = Round::Preflop;
        state.dealer_position = 0;
        state.small_blind_seat = 1;
        state.big_blind_seat = 2;

        let mut deck = Deck::shuffled(7);
        let mut seats = vec![
            Seat::new(Uuid::new_v4(), "Btn".into(), 0, 200),
            Seat::new(Uuid::new_v4(), "Sb".into(), 1, 50),
            Seat::new(Uuid::new_v4(), "Bb".into(), 2, 100),
        ];
        for seat in seats.iter_mut() {
            seat.status = PlayerStatus::Active;
            seat.hole_cards = vec![deck.draw().unwrap(), deck.draw().unwrap()];
        }
        seats[1].chips -= 10;
        seats[1].current_bet = 10;
        seats[1].total_bet = 10;
        seats[2].chips -= 20;
        seats[2].current_bet = 20;
        seats[2].total_bet = 20;

        state.seats = seats;
        state.current_bet = 20;
        state.last_raise = 20;
        state.last_full_aggressor = Some(2);
        state.current_player_position = Some(0);
        state.deck = deck.into_remaining();
        state.pots = compute_pots(&state.seats);
        state.action_finished = false;

        let (state, _) = act(&state, 0, ActionKind::AllIn, None); // BTN shoves for 200
        let (state, _) = act(&state, 1, ActionKind::AllIn, None); // SB is short, calls for 40 more
        let (mut state, _) = act(&state, 2, ActionKind::AllIn, None); // BB calls for 80 more

        assert!(state.action_finished);
        assert_eq!(state.pots.iter().map(|p| p.amount).sum::<Chips>(), 350);
        assert_eq!(state.pots.len(), 3, "unequal all-ins must split into main + two side pots");
        assert_eq!(state.pots[0].eligible, vec![0, 1, 2]);
        assert_eq!(state.pots[1].eligible, vec![0, 2]);
        assert_eq!(state.pots[2].eligible, vec![0]);

        for _ in 0..3 {
            let events = plan_advance(&state).unwrap();
            state = events.iter().fold(state, |s, e| apply(s, e));
        }

        assert_eq!(total_chips(&state), 350);
        assert_ne!(state.status, GameStatus::Playing);
    }

    /// Scenario 4: everyone but one seat folds preflop; `Act`'s fold-to-one
    /// short-circuit must award the whole pot without a showdown.
    #[test]
    fn fold_to_one_awards_pot_without_showdown() {
        let stakes = TableStakes { small_blind: 10, big_blind: 20 };
        let (_, _, state) = new_game("FOLD001", 3, stakes, 200);
        let state = join_all(state, &["Alice", "Bob", "Cara"]);
        let events = plan_start_hand(&state).unwrap();
        let state = events.iter().fold(state, |s, e| apply(s, e));

        let first = state.current_player_position.expect("someone to act preflop");
        let (state, _) = act(&state, first, ActionKind::Fold, None);
        let second = state.current_player_position.expect("next seat to act");
        let (state, fold_events) = act(&state, second, ActionKind::Fold, None);

        // The fold-to-one short circuit bundles Showdown/AwardPot/HandComplete
        // into the same plan as the deciding fold.
        assert!(fold_events.iter().any(|e| matches!(e, GameEvent::HandComplete)));
        assert_eq!(state.status, GameStatus::Waiting);
        assert_eq!(total_chips(&state), 600);

        let winner = state
            .seats
            .iter()
            .find(|s| s.chips > 200)
            .expect("the seat that never folded wins the blinds");
        assert_eq!(winner.chips, 210);
    }

    /// Scenario 5: replaying the fold-to-one hand's full event log through
    /// `derive` from an empty state must reproduce exactly the state the
    /// command lane built incrementally (§8 replay equivalence).
    #[test]
    fn derive_from_full_event_log_matches_incremental_apply() {
        let stakes = TableStakes { small_blind: 10, big_blind: 20 };
        let (id, config, state) = new_game("REPLAY1", 3, stakes, 200);
        let mut log = vec![GameEvent::GameCreated {
            room_code: "REPLAY1".to_string(),
            config,
            seed: 3,
        }];

        let mut state = state;
        for name in ["Alice", "Bob", "Cara"] {
            let events = plan_join_game(&state, PlayerId::new_v4(), name).unwrap();
            state = events.iter().fold(state, |s, e| apply(s, e));
            log.extend(events);
        }

        let events = plan_start_hand(&state).unwrap();
        state = events.iter().fold(state, |s, e| apply(s, e));
        log.extend(events);

        let first = state.current_player_position.expect("someone to act preflop");
        let events = plan_act(&state, first, ActionKind::Fold, None).unwrap();
        state = events.iter().fold(state, |s, e| apply(s, e));
        log.extend(events);

        let second = state.current_player_position.expect("next seat to act");
        let events = plan_act(&state, second, ActionKind::Fold, None).unwrap();
        state = events.iter().fold(state, |s, e| apply(s, e));
        log.extend(events);

        let derived = super::derive(id, "REPLAY1".to_string(), config, 3, &log);

        assert_eq!(
            serde_json::to_value(&derived).unwrap(),
            serde_json::to_value(&state).unwrap(),
        );
    }

    /// Scenario 6: three active (non-all-in) seats call preflop and check
    /// every street down to showdown. Regression for the street-closure bug
    /// where `current_player_position` stayed set after a normal check/call
    /// close, wedging the hand: each street here must null the actor once
    /// everyone has matched the bet and acted, letting `Advance` proceed.
    #[test]
    fn multiway_check_down_runs_to_showdown() {
        let stakes = TableStakes { small_blind: 10, big_blind: 20 };
        let (_, _, state) = new_game("CHKDWN1", 9, stakes, 200);
        let state = join_all(state, &["Alice", "Bob", "Cara"]);
        let events = plan_start_hand(&state).unwrap();
        let mut state = events.iter().fold(state, |s, e| apply(s, e));

        // Drive one street to closure by repeatedly checking/calling the
        // current actor until `current_player_position` nulls out.
        let act_street_down = |mut state: GameState| {
            let mut guard = 0;
            while let Some(seat_pos) = state.current_player_position {
                guard += 1;
                assert!(guard <= 10, "street never closed");
                let price = super::super::rules::price_to_call(&state, seat_pos);
                let kind = if price == 0 { ActionKind::Check } else { ActionKind::Call };
                let (next, _) = act(&state, seat_pos, kind, None);
                state = next;
            }
            state
        };

        state = act_street_down(state);
        assert!(state.current_player_position.is_none(), "preflop must close with nobody left to act");
        assert!(!state.action_finished, "no seat is all-in, so the hand must keep going");

        // Flop, then turn, then river: each Advance deals the next card(s)
        // and hands the action to a seat, which the check-around must close
        // again before the next Advance is legal.
        for _ in 0..3 {
            let events = plan_advance(&state).unwrap();
            state = events.iter().fold(state, |s, e| apply(s, e));
            assert!(state.current_player_position.is_some(), "each new street must hand the action to a seat");
            state = act_street_down(state);
            assert!(state.current_player_position.is_none(), "street must close again after the check-around");
        }

        // River betting is closed; the next Advance runs showdown.
        let events = plan_advance(&state).unwrap();
        state = events.iter().fold(state, |s, e| apply(s, e));

        assert_ne!(state.status, GameStatus::Playing);
        assert_eq!(total_chips(&state), 600);
    }
}
