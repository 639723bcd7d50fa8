//! Persistence collaborators for the note store.
//!
//! # Responsibility
//! - Define the key-value blob contract the store writes through.
//! - Keep SQLite details out of the store and query layers.

pub mod kv_repo;
