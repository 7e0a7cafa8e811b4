//! devpulse adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `sources`: HTTP/RSS article source adapters, one per provider
//! - `state`: SQLite and in-memory user state stores

mod state_memory;
mod state_sqlite;

pub mod sources;

/// Re-exports for state adapters
pub mod state {
    pub use crate::state_memory::InMemoryUserStateStore;
    pub use crate::state_sqlite::SqliteUserStateStore;
}
