//! Dispatch & Sanitizer (§4.7): per-subscriber projection of `GameState`,
//! fanned out over the game's revision-ordered update broadcast. Grounded on
//! the teacher's `server::demo::stream`/`stream_event` SSE-event shape,
//! adapted from ark-curve-generic ledger envelopes to this engine's own
//! `GameState`, and delivered as typed messages instead of raw SSE text.

use serde::Serialize;

use crate::engine::{Chips, GameState, PlayerStatus, Pot, Round, Seat, SeatId};

/// Which projection a subscriber receives (§4.7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionMode {
    Table,
    Player { seat: SeatId },
}

/// Wire projection of a single seat (§6.3). Hole cards are populated only
/// when the projection policy allows it for *this* viewer.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: uuid::Uuid,
    pub name: String,
    pub position: SeatId,
    pub chips: Chips,
    pub current_bet: Chips,
    pub total_bet: Chips,
    pub status: PlayerStatus,
    pub last_action: Option<crate::engine::ActionKind>,
    pub hole_cards: Vec<crate::showdown::Card>,
    pub show_cards: bool,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
}

/// Exact wire projection fields from §6.3, serialized as the `GameState`
/// payload of a `Subscribe` push.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateProjection {
    pub id: uuid::Uuid,
    pub room_code: String,
    pub status: crate::engine::GameStatus,
    pub current_round: Round,
    pub pot: Chips,
    pub pots: Vec<Pot>,
    pub current_bet: Chips,
    pub current_player_position: Option<SeatId>,
    pub hand_number: u64,
    pub community_cards: Vec<crate::showdown::Card>,
    pub winners: Vec<SeatId>,
    pub dealer_position: SeatId,
    /// Kept snake_case on the wire (§6.3 lists it verbatim alongside the
    /// rest of the camelCase field set).
    #[serde(rename = "action_finished")]
    pub action_finished: bool,
    pub players: Vec<PlayerView>,
}

fn may_see_hole_cards(seat: &Seat, state: &GameState, mode: SubscriptionMode) -> bool {
    if state.round == Round::Showdown || seat.show_cards {
        return true;
    }
    matches!(mode, SubscriptionMode::Player { seat: viewer } if viewer == seat.position)
}

fn project_seat(seat: &Seat, state: &GameState, mode: SubscriptionMode) -> PlayerView {
    let hole_cards = if may_see_hole_cards(seat, state, mode) {
        seat.hole_cards.clone()
    } else {
        Vec::new()
    };
    PlayerView {
        id: seat.id,
        name: seat.name.clone(),
        position: seat.position,
        chips: seat.chips,
        current_bet: seat.current_bet,
        total_bet: seat.total_bet,
        status: seat.status,
        last_action: seat.last_action,
        hole_cards,
        show_cards: seat.show_cards,
        is_dealer: seat.position == state.dealer_position,
        is_small_blind: seat.position == state.small_blind_seat,
        is_big_blind: seat.position == state.big_blind_seat,
    }
}

/// Produces the table or seat-scoped projection of `state` (§4.7). Pots
/// carry winners/rank labels only at showdown — `compute_pots` leaves them
/// `None` until `AwardPot` fills them in, so this is naturally enforced by
/// just passing `state.pots` through.
pub fn project(state: &GameState, mode: SubscriptionMode) -> GameStateProjection {
    let pots = if state.round == Round::Showdown {
        state.pots.clone()
    } else {
        state
            .pots
            .iter()
            .map(|p| Pot { winners: None, winning_rank_label: None, ..p.clone() })
            .collect()
    };
    let winners = pots
        .iter()
        .flat_map(|p| p.winners.clone().unwrap_or_default())
        .collect();

    GameStateProjection {
        id: state.id,
        room_code: state.room_code.clone(),
        status: state.status,
        current_round: state.round,
        pot: state.pot,
        pots,
        current_bet: state.current_bet,
        current_player_position: state.current_player_position,
        hand_number: state.hand_number,
        community_cards: state.community_cards.clone(),
        winners,
        dealer_position: state.dealer_position,
        action_finished: state.action_finished,
        players: state.seats.iter().map(|s| project_seat(s, state, mode)).collect(),
    }
}

/// Messages pushed over a `Subscribe` stream (§6.1). `Hello` opens the
/// stream, `Subscribed` confirms the mode took effect (optionally with an
/// immediate snapshot), `GameState` carries subsequent revisions, `Error`
/// reports a stream-level problem without closing the connection.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubscriptionMessage {
    Hello { room_code: String },
    Subscribed { mode: &'static str, snapshot: Option<GameStateProjection> },
    GameState { state: GameStateProjection, revision: u64, reason: &'static str },
    Error { message: String },
}

impl SubscriptionMode {
    pub fn label(self) -> &'static str {
        match self {
            SubscriptionMode::Table => "table",
            SubscriptionMode::Player { .. } => "player",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{GameConfig, Seat, TableStakes};
    use crate::showdown::{Card, Suit};
    use uuid::Uuid;

    fn sample_state() -> GameState {
        let mut state = GameState::new(
            Uuid::new_v4(),
            "ABCDEF".into(),
            GameConfig { stakes: TableStakes { small_blind: 1, big_blind: 2 }, starting_chips: 100 },
            1,
        );
        let mut a = Seat::new(Uuid::new_v4(), "Alice".into(), 0, 98);
        a.hole_cards = vec![Card::new(14, Suit::Spades), Card::new(13, Suit::Spades)];
        a.status = PlayerStatus::Active;
        let mut b = Seat::new(Uuid::new_v4(), "Bob".into(), 1, 98);
        b.hole_cards = vec![Card::new(2, Suit::Clubs), Card::new(3, Suit::Clubs)];
        b.status = PlayerStatus::Active;
        state.seats = vec![a, b];
        state.round = Round::Flop;
        state
    }

    #[test]
    fn table_projection_hides_all_hole_cards_mid_hand() {
        let state = sample_state();
        let projected = project(&state, SubscriptionMode::Table);
        assert!(projected.players.iter().all(|p| p.hole_cards.is_empty()));
    }

    #[test]
    fn player_projection_reveals_only_the_viewers_own_cards() {
        let state = sample_state();
        let projected = project(&state, SubscriptionMode::Player { seat: 0 });
        assert_eq!(projected.players[0].hole_cards.len(), 2);
        assert!(projected.players[1].hole_cards.is_empty());
    }

    #[test]
    fn showdown_reveals_everyone_regardless_of_mode() {
        let mut state = sample_state();
        state.round = Round::Showdown;
        let projected = project(&state, SubscriptionMode::Table);
        assert!(projected.players.iter().all(|p| p.hole_cards.len() == 2));
    }

    #[test]
    fn show_cards_flag_reveals_even_mid_hand() {
        let mut state = sample_state();
        state.seats[1].show_cards = true;
        let projected = project(&state, SubscriptionMode::Table);
        assert_eq!(projected.players[1].hole_cards.len(), 2);
        assert!(projected.players[0].hole_cards.is_empty());
    }
}
