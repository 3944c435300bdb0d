//! File-backed persistence adapters.
//!
//! The user document is a JSON array on local disk. Writes go through a
//! temporary file and an atomic rename; see [`JsonFileUserStore`] for the
//! locking protocol.

mod atomic_io;
mod json_user_store;

pub use json_user_store::JsonFileUserStore;
