//! Durable task store
//!
//! A single SQLite file holding the `tasks` table. Every operation is
//! serialized through one connection and commits before returning.

mod schema;
mod sqlite;

pub use schema::SCHEMA_VERSION;
pub use sqlite::{TaskStore, DB_FILENAME};
