//! Persistence layer for mentor: row types, connection pool, migrations,
//! and per-table query functions.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
