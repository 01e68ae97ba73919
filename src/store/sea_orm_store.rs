//! sea-orm backed storage, grounded on the teacher's
//! `ledger::store::event::SeaOrmEventStore` / `ledger::store::snapshot`
//! (transactional insert, `ColumnTrait`/`QueryOrder` reads).

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::db::entity::{events, snapshots};
use crate::engine::clock::{Clock, SystemClock};
use crate::engine::{GameEvent, GameState};

use super::{EventStore, PersistedEvent, SnapshotStore};

pub struct SeaOrmEventStore {
    conn: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl SeaOrmEventStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self::with_clock(conn, Arc::new(SystemClock))
    }

    /// Lets callers pin the row-insertion clock, e.g. `FixedClock` in a
    /// deterministic persistence test.
    pub fn with_clock(conn: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { conn, clock }
    }
}

fn event_kind_label(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::GameCreated { .. } => "game_created",
        GameEvent::PlayerJoined { .. } => "player_joined",
        GameEvent::HandStart { .. } => "hand_start",
        GameEvent::PostBlind { .. } => "post_blind",
        GameEvent::Check { .. } => "check",
        GameEvent::Call { .. } => "call",
        GameEvent::Bet { .. } => "bet",
        GameEvent::Raise { .. } => "raise",
        GameEvent::Fold { .. } => "fold",
        GameEvent::AllIn { .. } => "all_in",
        GameEvent::DealCommunity { .. } => "deal_community",
        GameEvent::AdvanceRound { .. } => "advance_round",
        GameEvent::Showdown => "showdown",
        GameEvent::AwardPot { .. } => "award_pot",
        GameEvent::HandComplete => "hand_complete",
        GameEvent::RevealCards { .. } => "reveal_cards",
    }
}

#[async_trait]
impl EventStore for SeaOrmEventStore {
    async fn append_events(
        &self,
        game_id: Uuid,
        hand_no: u64,
        new_events: &[GameEvent],
    ) -> anyhow::Result<Vec<PersistedEvent>> {
        let txn = self.conn.begin().await?;

        let tail = events::Entity::find()
            .filter(events::Column::GameId.eq(game_id))
            .order_by_desc(events::Column::Seq)
            .one(&txn)
            .await?;
        let mut next_seq = tail.map(|row| row.seq + 1).unwrap_or(0);

        let mut persisted = Vec::with_capacity(new_events.len());
        for event in new_events {
            let payload = serde_json::to_value(event)?;
            let active = events::ActiveModel {
                game_id: Set(game_id),
                seq: Set(next_seq),
                hand_no: Set(hand_no as i64),
                kind: Set(event_kind_label(event).to_string()),
                payload: Set(payload),
                created_at: Set(self.clock.now()),
                ..Default::default()
            };
            active.insert(&txn).await?;
            persisted.push(PersistedEvent {
                seq: next_seq as u64,
                hand_no,
                event: event.clone(),
            });
            next_seq += 1;
        }

        txn.commit().await?;
        Ok(persisted)
    }

    async fn read_events(&self, game_id: Uuid, from_seq: Option<u64>) -> anyhow::Result<Vec<PersistedEvent>> {
        let mut query = events::Entity::find()
            .filter(events::Column::GameId.eq(game_id))
            .order_by_asc(events::Column::Seq);
        if let Some(from) = from_seq {
            query = query.filter(events::Column::Seq.gte(from as i64));
        }
        let rows = query.all(&self.conn).await?;
        rows.into_iter()
            .map(|row| {
                let event: GameEvent = serde_json::from_value(row.payload)?;
                Ok(PersistedEvent {
                    seq: row.seq as u64,
                    hand_no: row.hand_no as u64,
                    event,
                })
            })
            .collect()
    }
}

pub struct SeaOrmSnapshotStore {
    conn: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl SeaOrmSnapshotStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self::with_clock(conn, Arc::new(SystemClock))
    }

    pub fn with_clock(conn: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { conn, clock }
    }
}

#[async_trait]
impl SnapshotStore for SeaOrmSnapshotStore {
    async fn write_snapshot(&self, game_id: Uuid, hand_no: u64, last_seq: u64, state: &GameState) -> anyhow::Result<()> {
        let payload = serde_json::to_value(state)?;
        let existing = snapshots::Entity::find_by_id(game_id).one(&self.conn).await?;
        let active = snapshots::ActiveModel {
            game_id: Set(game_id),
            hand_no: Set(hand_no as i64),
            last_seq: Set(last_seq as i64),
            state: Set(payload),
            updated_at: Set(self.clock.now()),
        };
        match existing {
            Some(_) => {
                active.update(&self.conn).await?;
            }
            None => {
                active.insert(&self.conn).await?;
            }
        }
        Ok(())
    }

    async fn read_snapshot(&self, game_id: Uuid, hand_no: Option<u64>) -> anyhow::Result<Option<(GameState, u64)>> {
        let row = snapshots::Entity::find_by_id(game_id).one(&self.conn).await?;
        let Some(row) = row else { return Ok(None) };
        if let Some(expected) = hand_no {
            if row.hand_no as u64 != expected {
                return Ok(None);
            }
        }
        let state: GameState = serde_json::from_value(row.state)?;
        Ok(Some((state, row.last_seq as u64)))
    }
}
