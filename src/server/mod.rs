//! The HTTP/WebSocket outer layer (§2 [AMBIENT]): turns the engine, registry,
//! and session store into a running service. Grounded on the teacher's
//! `server` module shape — `bootstrap` (process wiring), `routes` (the
//! router and its shared context), `dto` (wire structs), `error` (the
//! `ApiError` taxonomy), plus a `logging` middleware module and a `ws`
//! module replacing the teacher's `demo::stream` SSE endpoint.

pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod logging;
pub mod routes;
pub mod ws;

pub use bootstrap::run_server;
pub use error::ApiError;
pub use routes::{build_router, ServerContext};
