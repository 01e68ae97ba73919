//! Request/response DTOs for the logical command API (§6.1), one struct per
//! endpoint, grounded on the teacher's `server::dto` convention (plain
//! `#[derive(Serialize)]`/`#[derive(Deserialize)]` structs with a
//! `from_domain`-style constructor where the domain type isn't already
//! wire-shaped).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dispatch::GameStateProjection;
use crate::engine::{ActionKind, Chips, GameConfig, LegalActions, TableStakes};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub starting_chips: Chips,
}

impl CreateGameRequest {
    pub fn into_config(self) -> GameConfig {
        GameConfig {
            stakes: TableStakes { small_blind: self.small_blind, big_blind: self.big_blind },
            starting_chips: self.starting_chips,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    pub game_id: Uuid,
    pub room_code: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameResponse {
    pub seat_id: u8,
    pub auth_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitActionRequest {
    pub kind: ActionKind,
    pub amount: Option<Chips>,
}

/// Wraps every command's success response: the resulting projected state,
/// from this caller's own point of view (§6.1 "returns the new projected
/// state or a typed error").
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub state: GameStateProjection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalActionsResponse {
    #[serde(flatten)]
    pub legal_actions: LegalActions,
}

/// `NextGame` (§4.6): the fresh game id a room rotated onto.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextGameResponse {
    pub game_id: Uuid,
}
