//! Session issuance (§6.2): a token binds `seatId` and `gameId` once a
//! player has joined. Password hashing itself lives on `registry::Room`
//! (it's room-scoped state); this module is the process-wide token table
//! authenticated commands look tokens up against. Grounded on the teacher's
//! `ledger::identity` module for the "stable id, independent lookup table"
//! shape, using `dashmap` the way the rest of this crate does for
//! concurrent keyed state.

use dashmap::DashMap;
use uuid::Uuid;

use crate::engine::{PlayerId, SeatId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(pub Uuid);

impl SessionToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The claims a token resolves to: which room, which player, and — once
/// `JoinGame` has assigned them a seat — which seat. `Subscribe` in
/// player mode requires `seat` to be `Some` (§6.2 last sentence).
#[derive(Clone, Debug)]
pub struct SessionClaims {
    pub player_id: PlayerId,
    pub room_code: String,
    pub game_id: Uuid,
    pub seat: Option<SeatId>,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionToken, SessionClaims>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, player_id: PlayerId, room_code: String, game_id: Uuid) -> SessionToken {
        let token = SessionToken::new();
        self.sessions.insert(
            token,
            SessionClaims { player_id, room_code, game_id, seat: None },
        );
        token
    }

    pub fn bind_seat(&self, token: SessionToken, seat: SeatId) {
        if let Some(mut claims) = self.sessions.get_mut(&token) {
            claims.seat = Some(seat);
        }
    }

    pub fn resolve(&self, token: SessionToken) -> Option<SessionClaims> {
        self.sessions.get(&token).map(|entry| entry.clone())
    }

    pub fn revoke(&self, token: SessionToken) {
        self.sessions.remove(&token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_resolves_without_a_seat() {
        let store = SessionStore::new();
        let token = store.issue(PlayerId::new_v4(), "ABCDEF".into(), Uuid::new_v4());
        let claims = store.resolve(token).expect("token should resolve");
        assert!(claims.seat.is_none());
    }

    #[test]
    fn binding_a_seat_updates_existing_claims() {
        let store = SessionStore::new();
        let token = store.issue(PlayerId::new_v4(), "ABCDEF".into(), Uuid::new_v4());
        store.bind_seat(token, 2);
        assert_eq!(store.resolve(token).unwrap().seat, Some(2));
    }

    #[test]
    fn revoked_token_no_longer_resolves() {
        let store = SessionStore::new();
        let token = store.issue(PlayerId::new_v4(), "ABCDEF".into(), Uuid::new_v4());
        store.revoke(token);
        assert!(store.resolve(token).is_none());
    }
}
