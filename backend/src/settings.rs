//! Application settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `SIGNUP_*` environment variables and
//! configuration files; anything left unset falls back to the defaults below.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::password::HashCost;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_USERS_FILE: &str = "users.json";

/// Runtime configuration for the registration server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SIGNUP")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Location of the JSON user document.
    pub users_file: Option<PathBuf>,
    /// Argon2 memory cost in KiB.
    pub hash_memory_kib: Option<u32>,
    /// Argon2 iteration count.
    pub hash_iterations: Option<u32>,
    /// Argon2 lane count.
    pub hash_parallelism: Option<u32>,
}

impl AppSettings {
    /// Configured host, or every interface.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Configured port, or 8080.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Resolve `host:port` to the first matching socket address.
    ///
    /// # Errors
    /// Returns [`io::Error`] when the host does not resolve.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        (self.host(), self.port())
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("{}:{} did not resolve", self.host(), self.port()),
                )
            })
    }

    /// Path of the user document, or `users.json` in the working directory.
    ///
    /// # Errors
    /// Returns [`io::Error`] when the configured path is not valid UTF-8.
    pub fn users_file(&self) -> io::Result<Utf8PathBuf> {
        self.users_file.clone().map_or_else(
            || Ok(Utf8PathBuf::from(DEFAULT_USERS_FILE)),
            |path| {
                Utf8PathBuf::from_path_buf(path).map_err(|path| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("users file path is not UTF-8: {}", path.display()),
                    )
                })
            },
        )
    }

    /// Argon2 cost with unset values taken from the library defaults.
    #[must_use]
    pub fn hash_cost(&self) -> HashCost {
        let defaults = HashCost::default();
        HashCost {
            memory_kib: self.hash_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.hash_iterations.unwrap_or(defaults.iterations),
            parallelism: self.hash_parallelism.unwrap_or(defaults.parallelism),
        }
    }
}
