//! sea-orm entity models backing the storage interface (§6.4).

pub mod events;
pub mod games;
pub mod room_players;
pub mod snapshots;
