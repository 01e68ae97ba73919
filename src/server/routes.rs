//! axum routes realizing §6.1's logical command API, grounded on the
//! teacher's `server::routes::LegitPokerServer` (context-in-`Extension`,
//! CORS + request-logging layers, one handler function per endpoint).

use std::sync::Arc;

use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware;
use axum::routing::{get, post};
use axum::{extract::Path, extract::State, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::auth::{SessionClaims, SessionStore, SessionToken};
use crate::dispatch::{project, SubscriptionMode};
use crate::engine::{legal_actions_for, SeatId};
use crate::registry::Registry;

use super::dto::{
    CommandResponse, CreateGameRequest, CreateGameResponse, JoinGameRequest, JoinGameResponse,
    LegalActionsResponse, NextGameResponse, SubmitActionRequest,
};
use super::error::ApiError;
use super::ws::subscribe_ws;

/// Shared state every handler closes over: the room/game registry and the
/// process-wide session token table (§6.2). Grounded on the teacher's
/// `ServerContext<C>` (there: `coordinator` + `lobby`).
#[derive(Clone)]
pub struct ServerContext {
    pub registry: Arc<Registry>,
    pub sessions: Arc<SessionStore>,
}

pub fn build_router(ctx: Arc<ServerContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/games", post(create_game))
        .route("/rooms/:room_code/join", post(join_game))
        .route("/rooms/:room_code/auth", post(auth_game))
        .route("/rooms/:room_code/next-game", post(next_game))
        .route("/games/:game_id/start", post(start_hand))
        .route("/games/:game_id/actions", post(submit_action))
        .route("/games/:game_id/reveal", post(reveal_card))
        .route("/games/:game_id/advance", post(advance))
        .route("/games/:game_id/next-hand", post(next_hand))
        .route("/games/:game_id/legal-actions", get(legal_actions))
        .route("/ws/subscribe", get(subscribe_ws))
        .layer(middleware::from_fn(super::logging::log_requests))
        .layer(cors)
        .with_state(ctx)
}

fn extract_claims(ctx: &ServerContext, headers: &HeaderMap) -> Result<SessionClaims, ApiError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;
    let token_str = raw.strip_prefix("Bearer ").unwrap_or(raw);
    let token: SessionToken = token_str.parse().map_err(|_| ApiError::Unauthenticated)?;
    ctx.sessions.resolve(token).ok_or(ApiError::Unauthenticated)
}

fn require_same_game(claims: &SessionClaims, game_id: Uuid) -> Result<(), ApiError> {
    if claims.game_id != game_id {
        return Err(ApiError::Forbidden("token was issued for a different game".into()));
    }
    Ok(())
}

fn require_same_room(claims: &SessionClaims, room_code: &str) -> Result<(), ApiError> {
    if claims.room_code != room_code {
        return Err(ApiError::Forbidden("token was issued for a different room".into()));
    }
    Ok(())
}

fn require_seat(claims: &SessionClaims) -> Result<SeatId, ApiError> {
    claims
        .seat
        .ok_or_else(|| ApiError::Forbidden("no seat assigned to this token yet".into()))
}

async fn create_game(
    State(ctx): State<Arc<ServerContext>>,
    Json(req): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let config = req.into_config();
    let room = ctx.registry.create_room(config)?;
    Ok(Json(CreateGameResponse {
        game_id: room.game().game_id,
        room_code: room.room_code.clone(),
    }))
}

async fn join_game(
    State(ctx): State<Arc<ServerContext>>,
    Path(room_code): Path<String>,
    Json(req): Json<JoinGameRequest>,
) -> Result<Json<JoinGameResponse>, ApiError> {
    let room = ctx.registry.get_room(&room_code)?;
    let player_id = room.authenticate(&req.name, &req.password)?;
    let handle = room.game();
    let state = handle.join(player_id, req.name.clone()).await?;
    let seat_id = state
        .seats
        .iter()
        .find(|s| s.id == player_id)
        .map(|s| s.position)
        .ok_or_else(|| ApiError::internal("seat missing immediately after join"))?;
    let token = ctx.sessions.issue(player_id, room_code, handle.game_id);
    ctx.sessions.bind_seat(token, seat_id);
    Ok(Json(JoinGameResponse { seat_id, auth_token: token.to_string() }))
}

/// `AuthGame` (§6.1, §6.2): re-issues a token for a player who already has a
/// seat in the current game, without appending another `PlayerJoined`.
async fn auth_game(
    State(ctx): State<Arc<ServerContext>>,
    Path(room_code): Path<String>,
    Json(req): Json<JoinGameRequest>,
) -> Result<Json<JoinGameResponse>, ApiError> {
    let room = ctx.registry.get_room(&room_code)?;
    let player_id = room.authenticate(&req.name, &req.password)?;
    let handle = room.game();
    let state = handle.snapshot();
    let seat_id = state
        .seats
        .iter()
        .find(|s| s.id == player_id)
        .map(|s| s.position)
        .ok_or_else(|| ApiError::InvalidState("credential has not joined the current game".into()))?;
    let token = ctx.sessions.issue(player_id, room_code, handle.game_id);
    ctx.sessions.bind_seat(token, seat_id);
    Ok(Json(JoinGameResponse { seat_id, auth_token: token.to_string() }))
}

/// `NextGame` (§4.6): rotates the room onto a fresh game once the current one
/// has reached `Complete`, so the room's `roomCode` can host another hand
/// without requiring a brand-new `CreateGame`.
async fn next_game(
    State(ctx): State<Arc<ServerContext>>,
    Path(room_code): Path<String>,
    headers: HeaderMap,
) -> Result<Json<NextGameResponse>, ApiError> {
    let claims = extract_claims(&ctx, &headers)?;
    require_same_room(&claims, &room_code)?;
    let game_id = ctx.registry.rotate_game(&room_code).await?;
    Ok(Json(NextGameResponse { game_id }))
}

async fn start_hand(
    State(ctx): State<Arc<ServerContext>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<CommandResponse>, ApiError> {
    let room = ctx.registry.get_room_by_game_id(game_id)?;
    let state = room.game().start_hand().await?;
    Ok(Json(CommandResponse { state: project(&state, SubscriptionMode::Table) }))
}

async fn submit_action(
    State(ctx): State<Arc<ServerContext>>,
    Path(game_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<SubmitActionRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let claims = extract_claims(&ctx, &headers)?;
    require_same_game(&claims, game_id)?;
    let seat = require_seat(&claims)?;
    let room = ctx.registry.get_room_by_game_id(game_id)?;
    let state = room.game().act(seat, req.kind, req.amount).await?;
    Ok(Json(CommandResponse { state: project(&state, SubscriptionMode::Player { seat }) }))
}

async fn reveal_card(
    State(ctx): State<Arc<ServerContext>>,
    Path(game_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<CommandResponse>, ApiError> {
    let claims = extract_claims(&ctx, &headers)?;
    require_same_game(&claims, game_id)?;
    let seat = require_seat(&claims)?;
    let room = ctx.registry.get_room_by_game_id(game_id)?;
    let state = room.game().reveal_card(seat).await?;
    Ok(Json(CommandResponse { state: project(&state, SubscriptionMode::Player { seat }) }))
}

async fn advance(
    State(ctx): State<Arc<ServerContext>>,
    Path(game_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<CommandResponse>, ApiError> {
    let claims = extract_claims(&ctx, &headers)?;
    require_same_game(&claims, game_id)?;
    let room = ctx.registry.get_room_by_game_id(game_id)?;
    let state = room.game().advance().await?;
    let mode = claims.seat.map(|seat| SubscriptionMode::Player { seat }).unwrap_or(SubscriptionMode::Table);
    Ok(Json(CommandResponse { state: project(&state, mode) }))
}

async fn next_hand(
    State(ctx): State<Arc<ServerContext>>,
    Path(game_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<CommandResponse>, ApiError> {
    let claims = extract_claims(&ctx, &headers)?;
    require_same_game(&claims, game_id)?;
    let room = ctx.registry.get_room_by_game_id(game_id)?;
    let state = room.game().next_hand().await?;
    let mode = claims.seat.map(|seat| SubscriptionMode::Player { seat }).unwrap_or(SubscriptionMode::Table);
    Ok(Json(CommandResponse { state: project(&state, mode) }))
}

async fn legal_actions(
    State(ctx): State<Arc<ServerContext>>,
    Path(game_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<LegalActionsResponse>, ApiError> {
    let claims = extract_claims(&ctx, &headers)?;
    require_same_game(&claims, game_id)?;
    let seat = require_seat(&claims)?;
    let room = ctx.registry.get_room_by_game_id(game_id)?;
    let state = room.game().snapshot();
    Ok(Json(LegalActionsResponse { legal_actions: legal_actions_for(&state, seat) }))
}

/// Trivial liveness probe, useful for container orchestration; not part of
/// §6.1's logical API but ambient ops surface every HTTP service carries.
pub async fn health() -> StatusCode {
    StatusCode::OK
}
