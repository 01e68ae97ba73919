//! Room/Game Registry (§4.6): maps room codes to rooms, each owning 0..1
//! active game. Grounded on the teacher's `ledger::lobby::service` module
//! shape (host/join/commence), stripped of its ZK-specific shuffler/curve
//! machinery, and on `dashmap::DashMap` for the concurrent room map (the
//! teacher reaches for `dashmap` elsewhere for exactly this kind of
//! low-contention keyed registry).

pub mod error;
pub mod room;

use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::engine::GameConfig;
use crate::store::{SharedEventStore, SharedSnapshotStore};

pub use error::RegistryError;
pub use room::{Room, RoomPlayerCredential};

const LOG_TARGET: &str = "holdem_poker::registry";
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ROOM_CODE_LEN: usize = 6;
const ROOM_CODE_MAX_ATTEMPTS: usize = 32;

/// Owns every room for the process. One `Registry` backs the whole server;
/// each `Room` inside it owns its own game lane (§3.4, §5).
pub struct Registry {
    rooms: DashMap<String, Arc<Room>>,
    /// Current game id -> room code, so routes keyed by `gameId` (§6.1) can
    /// find the owning room without scanning every room.
    game_index: DashMap<Uuid, String>,
    event_store: SharedEventStore,
    snapshot_store: SharedSnapshotStore,
}

impl Registry {
    pub fn new(event_store: SharedEventStore, snapshot_store: SharedSnapshotStore) -> Self {
        Self {
            rooms: DashMap::new(),
            game_index: DashMap::new(),
            event_store,
            snapshot_store,
        }
    }

    fn generate_room_code(&self) -> Result<String, RegistryError> {
        let mut rng = rand::thread_rng();
        for _ in 0..ROOM_CODE_MAX_ATTEMPTS {
            let code: String = (0..ROOM_CODE_LEN)
                .map(|_| {
                    let idx = rng.gen_range(0..ROOM_CODE_ALPHABET.len());
                    ROOM_CODE_ALPHABET[idx] as char
                })
                .collect();
            if !self.rooms.contains_key(&code) {
                return Ok(code);
            }
        }
        Err(RegistryError::CodeGenerationExhausted)
    }

    /// `CreateGame` (§6.1): allocates a fresh room with its first game.
    #[instrument(skip(self, config), target = LOG_TARGET)]
    pub fn create_room(&self, config: GameConfig) -> Result<Arc<Room>, RegistryError> {
        let room_code = self.generate_room_code()?;
        let game_id = Uuid::new_v4();
        let seed = rand::thread_rng().gen::<u64>();
        let room = Arc::new(Room::new(
            room_code.clone(),
            game_id,
            config,
            seed,
            self.event_store.clone(),
            self.snapshot_store.clone(),
        ));
        self.rooms.insert(room_code.clone(), room.clone());
        self.game_index.insert(game_id, room_code.clone());
        info!(target: LOG_TARGET, room_code, %game_id, "created room");
        Ok(room)
    }

    pub fn get_room(&self, room_code: &str) -> Result<Arc<Room>, RegistryError> {
        self.rooms
            .get(room_code)
            .map(|entry| entry.clone())
            .ok_or(RegistryError::RoomNotFound)
    }

    /// Looks up the room currently hosting `game_id` (§6.1 routes keyed by
    /// `gameId` rather than `roomCode`).
    pub fn get_room_by_game_id(&self, game_id: Uuid) -> Result<Arc<Room>, RegistryError> {
        let room_code = self
            .game_index
            .get(&game_id)
            .map(|entry| entry.clone())
            .ok_or(RegistryError::RoomNotFound)?;
        self.get_room(&room_code)
    }

    /// `NextGame` (§4.6): archives the room's current game and starts a
    /// fresh one; room-scoped credentials survive, hand state does not.
    #[instrument(skip(self), target = LOG_TARGET)]
    pub async fn rotate_game(&self, room_code: &str) -> Result<Uuid, RegistryError> {
        let room = self.get_room(room_code)?;
        let old_game_id = room.game().game_id;
        let new_game_id = room.rotate_game().await?;
        self.game_index.remove(&old_game_id);
        self.game_index.insert(new_game_id, room_code.to_string());
        info!(target: LOG_TARGET, room_code, %new_game_id, "rotated to fresh game");
        Ok(new_game_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
