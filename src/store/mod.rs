//! Storage interface (§6.4): the engine's only external collaborator other
//! than the clock. Grounded on the teacher's `ledger::store::{EventStore,
//! SnapshotStore}` trait split, generalized from curve-generic envelopes to
//! this engine's `GameEvent`/`GameState`.

pub mod memory;
pub mod sea_orm_store;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::engine::{GameEvent, GameState};

pub type SharedEventStore = Arc<dyn EventStore>;
pub type SharedSnapshotStore = Arc<dyn SnapshotStore>;

/// One event as persisted: `seq` is assigned by the store itself so
/// concurrent appenders for different games never collide, and is strictly
/// increasing per `game_id` (§3.1 Event).
#[derive(Clone, Debug)]
pub struct PersistedEvent {
    pub seq: u64,
    pub hand_no: u64,
    pub event: GameEvent,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends `events` atomically, assigning sequence numbers starting just
    /// after the game's current tail. Returns the persisted rows with their
    /// assigned `seq`s, in order.
    async fn append_events(
        &self,
        game_id: Uuid,
        hand_no: u64,
        events: &[GameEvent],
    ) -> anyhow::Result<Vec<PersistedEvent>>;

    /// Ordered events for `game_id`, optionally starting strictly after
    /// `from_seq` (§6.4 `ReadEvents`).
    async fn read_events(&self, game_id: Uuid, from_seq: Option<u64>) -> anyhow::Result<Vec<PersistedEvent>>;
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// §6.4 `WriteSnapshot`: an optional performance aid, never required for
    /// correctness since `read_events` always has the full log.
    async fn write_snapshot(&self, game_id: Uuid, hand_no: u64, last_seq: u64, state: &GameState) -> anyhow::Result<()>;

    /// §6.4 `ReadSnapshot`: the most recent snapshot for `game_id`, optionally
    /// pinned to a specific `hand_no`.
    async fn read_snapshot(&self, game_id: Uuid, hand_no: Option<u64>) -> anyhow::Result<Option<(GameState, u64)>>;
}
