//! In-memory storage backend, used by tests and the local single-process
//! demo binary. Grounded on the teacher's
//! `ledger::lobby::storage::in_memory::InMemoryLobbyStorage`, which holds its
//! rows behind a `parking_lot::Mutex<HashMap<..>>` rather than a real
//! database connection.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::engine::{GameEvent, GameState};

use super::{EventStore, PersistedEvent, SnapshotStore};

#[derive(Default)]
struct GameLog {
    events: Vec<PersistedEvent>,
}

#[derive(Default)]
pub struct InMemoryEventStore {
    games: Mutex<HashMap<Uuid, GameLog>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append_events(
        &self,
        game_id: Uuid,
        hand_no: u64,
        events: &[GameEvent],
    ) -> anyhow::Result<Vec<PersistedEvent>> {
        let mut games = self.games.lock();
        let log = games.entry(game_id).or_default();
        let mut next_seq = log.events.last().map(|e| e.seq + 1).unwrap_or(0);
        let mut persisted = Vec::with_capacity(events.len());
        for event in events {
            let row = PersistedEvent {
                seq: next_seq,
                hand_no,
                event: event.clone(),
            };
            log.events.push(row.clone());
            persisted.push(row);
            next_seq += 1;
        }
        Ok(persisted)
    }

    async fn read_events(&self, game_id: Uuid, from_seq: Option<u64>) -> anyhow::Result<Vec<PersistedEvent>> {
        let games = self.games.lock();
        let Some(log) = games.get(&game_id) else {
            return Ok(Vec::new());
        };
        let from = from_seq.unwrap_or(0);
        Ok(log
            .events
            .iter()
            .filter(|e| e.seq >= from)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshots: Mutex<HashMap<Uuid, (GameState, u64)>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn write_snapshot(&self, game_id: Uuid, _hand_no: u64, last_seq: u64, state: &GameState) -> anyhow::Result<()> {
        self.snapshots.lock().insert(game_id, (state.clone(), last_seq));
        Ok(())
    }

    async fn read_snapshot(&self, game_id: Uuid, _hand_no: Option<u64>) -> anyhow::Result<Option<(GameState, u64)>> {
        Ok(self.snapshots.lock().get(&game_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_assigns_increasing_sequence_numbers() {
        let store = InMemoryEventStore::new();
        let game_id = Uuid::new_v4();
        let first = store
            .append_events(game_id, 1, &[GameEvent::Check { seat: 0 }])
            .await
            .unwrap();
        let second = store
            .append_events(game_id, 1, &[GameEvent::Check { seat: 1 }, GameEvent::Check { seat: 0 }])
            .await
            .unwrap();
        assert_eq!(first[0].seq, 0);
        assert_eq!(second[0].seq, 1);
        assert_eq!(second[1].seq, 2);
    }

    #[tokio::test]
    async fn read_events_respects_from_seq() {
        let store = InMemoryEventStore::new();
        let game_id = Uuid::new_v4();
        store
            .append_events(game_id, 1, &[GameEvent::Check { seat: 0 }, GameEvent::Check { seat: 1 }])
            .await
            .unwrap();
        let tail = store.read_events(game_id, Some(1)).await.unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].seq, 1);
    }
}
