//! A single room: its room-scoped credentials plus the one active game
//! lane that owns all of that game's mutation (§3.4, §5). Grounded on the
//! teacher's `ledger::worker::LedgerWorker` mpsc-mailbox actor shape,
//! adapted from a curve-generic envelope processor into this engine's
//! plan-then-commit command loop.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{info, instrument, warn};

use crate::engine::{
    self, ActionKind, Chips, GameConfig, GameState, OrchestratorError, PlayerId, SeatId,
};
use crate::store::{SharedEventStore, SharedSnapshotStore};

use super::error::RegistryError;

const LOG_TARGET: &str = "holdem_poker::registry::room";
const PROJECTION_BROADCAST_CAPACITY: usize = 64;

#[derive(Clone, Debug)]
pub struct RoomPlayerCredential {
    pub player_id: PlayerId,
    pub salt: [u8; 16],
    pub password_hash: String,
}

/// Salted password hash (§6.2 "password is stored salted-hashed"), grounded
/// on the teacher's own `sha2` dependency rather than pulling in a new
/// password-hashing crate.
fn hash_password(password: &str, salt: &[u8; 16]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn random_salt() -> [u8; 16] {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill(&mut salt);
    salt
}

enum Command {
    Join { player_id: PlayerId, name: String },
    StartHand,
    Act { seat: SeatId, kind: ActionKind, amount: Option<Chips> },
    RevealCard { seat: SeatId },
    Advance,
    NextHand,
}

struct Envelope {
    command: Command,
    reply: oneshot::Sender<Result<Arc<GameState>, OrchestratorError>>,
}

/// A live handle to a game's command lane. Cloning is cheap; every clone
/// talks to the same actor task.
#[derive(Clone)]
pub struct GameHandle {
    pub game_id: Uuid,
    tx: mpsc::Sender<Envelope>,
    updates: broadcast::Sender<Arc<GameState>>,
    current: Arc<RwLock<Arc<GameState>>>,
}

impl GameHandle {
    fn spawn(
        room_code: String,
        game_id: Uuid,
        config: GameConfig,
        seed: u64,
        event_store: SharedEventStore,
        snapshot_store: SharedSnapshotStore,
    ) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let (updates, _) = broadcast::channel(PROJECTION_BROADCAST_CAPACITY);
        let initial = Arc::new(GameState::new(game_id, room_code.clone(), config, seed));
        let current = Arc::new(RwLock::new(initial.clone()));

        let actor = GameActor {
            room_code,
            rx,
            state: (*initial).clone(),
            event_store,
            snapshot_store,
            updates: updates.clone(),
            current: current.clone(),
        };
        tokio::spawn(actor.run());

        Self { game_id, tx, updates, current }
    }

    pub fn snapshot(&self) -> Arc<GameState> {
        self.current.read().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<GameState>> {
        self.updates.subscribe()
    }

    async fn dispatch(&self, command: Command) -> Result<Arc<GameState>, OrchestratorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope { command, reply: reply_tx })
            .await
            .map_err(|_| OrchestratorError::Internal)?;
        reply_rx.await.map_err(|_| OrchestratorError::Internal)?
    }

    pub async fn join(&self, player_id: PlayerId, name: String) -> Result<Arc<GameState>, OrchestratorError> {
        self.dispatch(Command::Join { player_id, name }).await
    }

    pub async fn start_hand(&self) -> Result<Arc<GameState>, OrchestratorError> {
        self.dispatch(Command::StartHand).await
    }

    pub async fn act(&self, seat: SeatId, kind: ActionKind, amount: Option<Chips>) -> Result<Arc<GameState>, OrchestratorError> {
        self.dispatch(Command::Act { seat, kind, amount }).await
    }

    pub async fn reveal_card(&self, seat: SeatId) -> Result<Arc<GameState>, OrchestratorError> {
        self.dispatch(Command::RevealCard { seat }).await
    }

    pub async fn advance(&self) -> Result<Arc<GameState>, OrchestratorError> {
        self.dispatch(Command::Advance).await
    }

    pub async fn next_hand(&self) -> Result<Arc<GameState>, OrchestratorError> {
        self.dispatch(Command::NextHand).await
    }
}

struct GameActor {
    room_code: String,
    rx: mpsc::Receiver<Envelope>,
    state: GameState,
    event_store: SharedEventStore,
    snapshot_store: SharedSnapshotStore,
    updates: broadcast::Sender<Arc<GameState>>,
    current: Arc<RwLock<Arc<GameState>>>,
}

impl GameActor {
    #[instrument(skip(self), target = LOG_TARGET, fields(room_code = %self.room_code))]
    async fn run(mut self) {
        info!(target: LOG_TARGET, "game actor starting");
        self.persist_creation().await;
        while let Some(envelope) = self.rx.recv().await {
            let result = self.handle(envelope.command).await;
            let _ = envelope.reply.send(result);
        }
        info!(target: LOG_TARGET, "game actor exiting: all handles dropped");
    }

    /// Persists the `GameCreated` event (§4.5) that seeds this game's log
    /// before any command-driven event, so `derive` replayed from an empty
    /// state reproduces `self.state` exactly (§8 replay equivalence).
    async fn persist_creation(&mut self) {
        let created = engine::GameEvent::GameCreated {
            room_code: self.room_code.clone(),
            config: self.state.config,
            seed: self.state.seed,
        };
        self.state = engine::apply_event(self.state.clone(), &created);
        if let Err(err) = self.event_store.append_events(self.state.id, 0, &[created]).await {
            warn!(target: LOG_TARGET, error = %err, "failed to persist GameCreated; continuing in-memory only");
        }
        let shared = Arc::new(self.state.clone());
        *self.current.write() = shared.clone();
        let _ = self.updates.send(shared);
    }

    /// Plans the command's events against the current state, persists them,
    /// and only then swaps the in-memory state — §4.4.5's transactional
    /// guarantee realized as plan-then-commit.
    #[instrument(skip(self), target = LOG_TARGET)]
    async fn handle(&mut self, command: Command) -> Result<Arc<GameState>, OrchestratorError> {
        let events = match command {
            Command::Join { player_id, name } => engine::orchestrator::plan_join_game(&self.state, player_id, &name)?,
            Command::StartHand => engine::orchestrator::plan_start_hand(&self.state)?,
            Command::Act { seat, kind, amount } => engine::orchestrator::plan_act(&self.state, seat, kind, amount)?,
            Command::RevealCard { seat } => engine::orchestrator::plan_reveal_card(&self.state, seat)?,
            Command::Advance => engine::orchestrator::plan_advance(&self.state)?,
            Command::NextHand => engine::orchestrator::plan_next_hand(&self.state)?,
        };

        let new_state = events.iter().fold(self.state.clone(), |s, e| engine::apply_event(s, e));

        // §7: a storage failure is retried once before surfacing as
        // `StorageUnavailable` to the caller.
        let mut attempt = self
            .event_store
            .append_events(self.state.id, new_state.hand_number, &events)
            .await;
        if attempt.is_err() {
            warn!(target: LOG_TARGET, "failed to persist events; retrying once");
            attempt = self
                .event_store
                .append_events(self.state.id, new_state.hand_number, &events)
                .await;
        }
        if let Err(err) = attempt {
            warn!(target: LOG_TARGET, error = %err, "failed to persist events after retry; command rejected");
            return Err(OrchestratorError::StorageUnavailable);
        }

        self.state = new_state;
        let shared = Arc::new(self.state.clone());
        *self.current.write() = shared.clone();
        let _ = self.updates.send(shared.clone());

        if self.state.revision % 20 == 0 {
            if let Err(err) = self
                .snapshot_store
                .write_snapshot(self.state.id, self.state.hand_number, self.state.revision, &self.state)
                .await
            {
                warn!(target: LOG_TARGET, error = %err, "failed to write snapshot (non-fatal)");
            }
        }

        Ok(shared)
    }
}

/// A room: its room-scoped credentials and the single game currently in
/// play (§3.1 Room, §4.6).
pub struct Room {
    pub room_code: String,
    config: GameConfig,
    credentials: RwLock<HashMap<String, RoomPlayerCredential>>,
    game: RwLock<GameHandle>,
    event_store: SharedEventStore,
    snapshot_store: SharedSnapshotStore,
}

impl Room {
    pub fn new(
        room_code: String,
        game_id: Uuid,
        config: GameConfig,
        seed: u64,
        event_store: SharedEventStore,
        snapshot_store: SharedSnapshotStore,
    ) -> Self {
        let game = GameHandle::spawn(room_code.clone(), game_id, config, seed, event_store.clone(), snapshot_store.clone());
        Self {
            room_code,
            config,
            credentials: RwLock::new(HashMap::new()),
            game: RwLock::new(game),
            event_store,
            snapshot_store,
        }
    }

    pub fn game(&self) -> GameHandle {
        self.game.read().clone()
    }

    /// `JoinGame`/`AuthGame` (§6.1, §6.2): first join for a name mints a
    /// salted-hash credential; a later join/auth with the same name must
    /// present the matching password.
    #[instrument(skip(self, password), target = LOG_TARGET)]
    pub fn authenticate(&self, name: &str, password: &str) -> Result<PlayerId, RegistryError> {
        let mut credentials = self.credentials.write();
        match credentials.get(name) {
            Some(existing) => {
                if existing.password_hash != hash_password(password, &existing.salt) {
                    return Err(RegistryError::InvalidCredential);
                }
                Ok(existing.player_id)
            }
            None => {
                let player_id = PlayerId::new_v4();
                let salt = random_salt();
                let password_hash = hash_password(password, &salt);
                credentials.insert(
                    name.to_string(),
                    RoomPlayerCredential { player_id, salt, password_hash },
                );
                Ok(player_id)
            }
        }
    }

    /// `NextGame` (§4.6): archives the current game and spawns a fresh one
    /// with a new id and seed, preserving credentials.
    #[instrument(skip(self), target = LOG_TARGET)]
    pub async fn rotate_game(&self) -> Result<Uuid, RegistryError> {
        let new_game_id = Uuid::new_v4();
        let seed = rand::thread_rng().gen::<u64>();
        let new_handle = GameHandle::spawn(
            self.room_code.clone(),
            new_game_id,
            self.config,
            seed,
            self.event_store.clone(),
            self.snapshot_store.clone(),
        );
        *self.game.write() = new_handle;
        Ok(new_game_id)
    }
}
