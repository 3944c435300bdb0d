//! Domain ports defining the edges of the hexagon.
//!
//! The registration pipeline only talks to storage and hashing through these
//! traits. Each exposes a typed error so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod password_hasher;
mod user_store;

pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
pub use user_store::{InMemoryUserStore, StoreLease, UserStore, UserStoreError};
