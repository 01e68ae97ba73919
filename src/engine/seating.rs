//! Dealer rotation and first-to-act computation (§4.4.3), grounded on the
//! teacher's `engine::nl::seating::Seating` clockwise-iteration idiom.

use super::types::{PlayerStatus, Round, Seat, SeatId};

/// Returns the seat index clockwise from `from` (exclusive) whose status is
/// `Active`, wrapping modulo the seat count. Returns `None` if no seat
/// qualifies.
pub fn next_active_seat(seats: &[Seat], from: SeatId) -> Option<SeatId> {
    next_matching(seats, from, |s| s.status == PlayerStatus::Active)
}

/// Public variant of the clockwise-scan helper, used by `pots::distribute_amount`
/// to award remainder chips in clockwise order.
pub fn next_matching_from(seats: &[Seat], from: SeatId, pred: impl Fn(&Seat) -> bool) -> Option<SeatId> {
    next_matching(seats, from, pred)
}

fn next_matching(seats: &[Seat], from: SeatId, pred: impl Fn(&Seat) -> bool) -> Option<SeatId> {
    if seats.is_empty() {
        return None;
    }
    let n = seats.len() as SeatId;
    for step in 1..=n {
        let candidate = (from + step) % n;
        if let Some(seat) = seats.iter().find(|s| s.position == candidate) {
            if pred(seat) {
                return Some(candidate);
            }
        }
    }
    None
}

/// First actor for a street (§4.4.3): big blind's left preflop, dealer's
/// left on every later street.
pub fn first_to_act(seats: &[Seat], dealer: SeatId, big_blind_seat: SeatId, round: Round) -> Option<SeatId> {
    match round {
        Round::Preflop => next_active_seat(seats, big_blind_seat),
        _ => next_active_seat(seats, dealer),
    }
}

/// The next seat with chips, clockwise from `from` (exclusive), used to
/// rotate the dealer button (§4.4.1 `NextHand`). Seats that are `Out` are
/// skipped.
pub fn next_seat_with_chips(seats: &[Seat], from: SeatId) -> Option<SeatId> {
    next_matching(seats, from, |s| s.chips > 0 && s.status != PlayerStatus::Out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn seat(position: SeatId, status: PlayerStatus, chips: u64) -> Seat {
        Seat {
            id: Uuid::new_v4(),
            name: format!("seat{position}"),
            position,
            chips,
            current_bet: 0,
            total_bet: 0,
            hole_cards: vec![],
            status,
            last_action: None,
            show_cards: false,
        }
    }

    #[test]
    fn wraps_around_table() {
        let seats = vec![
            seat(0, PlayerStatus::Folded, 100),
            seat(1, PlayerStatus::Active, 100),
            seat(2, PlayerStatus::Active, 100),
        ];
        assert_eq!(next_active_seat(&seats, 2), Some(1));
    }

    #[test]
    fn skips_folded_and_out() {
        let seats = vec![
            seat(0, PlayerStatus::Active, 100),
            seat(1, PlayerStatus::Folded, 0),
            seat(2, PlayerStatus::Out, 0),
            seat(3, PlayerStatus::Active, 50),
        ];
        assert_eq!(next_active_seat(&seats, 0), Some(3));
    }
}
