//! Flutter-facing bindings for the notepad core.

pub mod api;
