//! Server entry-point: loads settings, opens the user document and serves the
//! registration form and API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use signup::domain::RegistrationService;
use signup::inbound::http::health::HealthState;
use signup::outbound::password::Argon2PasswordHasher;
use signup::outbound::persistence::JsonFileUserStore;
use signup::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;

    let users_file = settings.users_file()?;
    let store = JsonFileUserStore::open(&users_file)
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let hasher = Argon2PasswordHasher::with_cost(settings.hash_cost())
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let registration =
        RegistrationService::new(Arc::new(store), Arc::new(hasher), Arc::new(DefaultClock));

    let bind_addr = settings.bind_addr()?;
    info!(%bind_addr, users_file = %users_file, "starting registration server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, registration))?;
    server.await
}
