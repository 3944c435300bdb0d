//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: the JSON user document on local disk
//! - **password**: Argon2id password hashing
//!
//! Adapters are thin translators between domain types and their
//! infrastructure representation. They contain no business logic.

pub mod password;
pub mod persistence;
