//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the registration use-case and stay testable without disk or hashing
//! cost.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::RegistrationService;
use crate::domain::ports::{FixturePasswordHasher, InMemoryUserStore};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration pipeline bound to the configured store and hasher.
    pub registration: RegistrationService,
}

impl HttpState {
    /// Wrap an already wired registration service.
    #[must_use]
    pub const fn new(registration: RegistrationService) -> Self {
        Self { registration }
    }

    /// State backed by `store` with the reversible fixture hasher and the
    /// system clock. Intended for handler tests.
    #[must_use]
    pub fn with_in_memory_store(store: Arc<InMemoryUserStore>) -> Self {
        Self::new(RegistrationService::new(
            store,
            Arc::new(FixturePasswordHasher),
            Arc::new(DefaultClock),
        ))
    }
}
