//! Core contracts for provisioning infrastructure: remote shell sessions and
//! the database lifecycle driven over them.
//! This crate is intentionally small to keep dependency surface minimal.

pub mod database;
pub mod ssh;
