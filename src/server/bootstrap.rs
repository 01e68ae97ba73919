//! Process wiring: picks a storage backend, builds the registry and session
//! store, and serves the router until a shutdown signal arrives. Grounded on
//! the teacher's `server::bootstrap::run_server`/`shutdown_signal`
//! (`axum::serve(...).with_graceful_shutdown(...)` over a `ctrl_c` future),
//! stripped of the curve-generic shuffler-bootstrap step this engine has no
//! counterpart for.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::auth::SessionStore;
use crate::config::ServerConfig;
use crate::db;
use crate::registry::Registry;
use crate::store::memory::{InMemoryEventStore, InMemorySnapshotStore};
use crate::store::sea_orm_store::{SeaOrmEventStore, SeaOrmSnapshotStore};
use crate::store::{SharedEventStore, SharedSnapshotStore};

use super::routes::{build_router, ServerContext};

const LOG_TARGET: &str = "server::bootstrap";

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let (event_store, snapshot_store) = build_stores(&config).await?;

    let registry = Arc::new(Registry::new(event_store, snapshot_store));
    let sessions = Arc::new(SessionStore::new());
    let context = Arc::new(ServerContext { registry, sessions });

    let router = build_router(context);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let local_addr = listener.local_addr()?;
    info!(target: LOG_TARGET, %local_addr, "holdem server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")
}

async fn build_stores(config: &ServerConfig) -> Result<(SharedEventStore, SharedSnapshotStore)> {
    if config.use_in_memory_store {
        info!(target: LOG_TARGET, "using in-memory event/snapshot stores");
        return Ok((
            Arc::new(InMemoryEventStore::new()),
            Arc::new(InMemorySnapshotStore::new()),
        ));
    }

    let conn = db::connect().await.context("failed to connect to database")?;
    Ok((
        Arc::new(SeaOrmEventStore::new(conn.clone())),
        Arc::new(SeaOrmSnapshotStore::new(conn)),
    ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target: LOG_TARGET, error = %err, "failed to install ctrl-c handler");
    }
    info!(target: LOG_TARGET, "shutdown signal received");
}
