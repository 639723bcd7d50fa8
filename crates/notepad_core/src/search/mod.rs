//! Derived views over the note collection.
//!
//! # Responsibility
//! - Compute the visible note list from the full collection and view state.
//! - Stay pure: no storage access, no hidden state.

pub mod filter;
