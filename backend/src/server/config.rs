//! HTTP server configuration object.

use std::net::SocketAddr;

use signup::domain::RegistrationService;

/// Everything `create_server` needs, resolved from settings.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) registration: RegistrationService,
}

impl ServerConfig {
    /// Pair a bind address with the wired registration pipeline.
    #[must_use]
    pub const fn new(bind_addr: SocketAddr, registration: RegistrationService) -> Self {
        Self {
            bind_addr,
            registration,
        }
    }
}
